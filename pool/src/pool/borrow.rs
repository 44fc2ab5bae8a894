use sep_41_token::TokenClient;
use soroban_sdk::{panic_with_error, Address, Env};

use crate::{errors::PoolError, events, validator::require_positive};

use super::{emode, health_factor::PositionData, pool::Pool, reserve::Reserve, user::User};

/// Borrow `amount` of `asset` against the collateral of `user` and send it to `to`.
///
/// Returns the d tokens minted
///
/// ### Panics
/// If the pool is paused, the reserve can't be borrowed, the borrow cap or available
/// liquidity is exceeded, or the new debt is not covered by the user's collateral
pub fn execute_borrow(e: &Env, user: &Address, asset: &Address, amount: i128, to: &Address) -> i128 {
    require_positive(e, &amount);
    let mut pool = Pool::load(e);
    pool.require_not_paused(e);

    let mut reserve = pool.load_reserve(e, asset);
    let mut user_state = User::load(e, user);
    let d_tokens_minted = open_debt(e, &mut reserve, &mut user_state, amount);
    let borrow_rate = reserve.data.borrow_rate;
    pool.cache_reserve(reserve, true);

    let position_data =
        PositionData::calculate_from_positions(e, &mut pool, &user_state.positions);
    position_data.require_within_ltv(e);
    position_data.require_healthy(e);

    pool.store_cached_reserves(e);
    user_state.store(e);

    TokenClient::new(e, asset).transfer(&e.current_contract_address(), to, &amount);

    events::borrow(e, asset, user, to, amount, d_tokens_minted, borrow_rate);
    d_tokens_minted
}

/// Open `amount` of variable debt for the user against the reserve, releasing the underlying
/// from the reserve's backing and updating its rates. Does not check the user's collateral.
///
/// Returns the d tokens minted
pub(crate) fn open_debt(
    e: &Env,
    reserve: &mut Reserve,
    user: &mut User,
    amount: i128,
) -> i128 {
    reserve.require_accepts_new_positions(e);
    if !reserve.config.borrowable {
        panic_with_error!(e, PoolError::BorrowingDisabled);
    }
    let category = emode::load_category(e, user.positions.e_mode);
    if !emode::is_borrowable(&category, reserve.config.index) {
        panic_with_error!(e, PoolError::NotBorrowableInEMode);
    }
    reserve.require_liquidity(e, amount);

    let d_tokens_minted = reserve.to_d_token(e, amount);
    if d_tokens_minted == 0 {
        panic_with_error!(e, PoolError::InvalidAmount);
    }
    user.add_liabilities(reserve, d_tokens_minted);
    reserve.data.backing -= amount;
    reserve.require_borrow_cap(e);
    reserve.update_rates(e);
    d_tokens_minted
}
