use sep_41_token::TokenClient;
use soroban_sdk::{panic_with_error, Address, Env};

use crate::{errors::PoolError, events, validator::require_positive};

use super::{health_factor::PositionData, pool::Pool, user::User};

/// Withdraw `amount` of `asset` from the supply position of `user` and send it to `to`.
/// An amount of `i128::MAX` withdraws the entire position.
///
/// Returns the amount of underlying withdrawn
///
/// ### Panics
/// If the pool is paused, the position or the reserve's liquidity is too small, or the
/// withdrawal leaves a borrowing user unhealthy
pub fn execute_withdraw(
    e: &Env,
    user: &Address,
    asset: &Address,
    amount: i128,
    to: &Address,
) -> i128 {
    require_positive(e, &amount);
    let mut pool = Pool::load(e);
    pool.require_not_paused(e);

    let mut reserve = pool.load_reserve(e, asset);
    reserve.require_active(e);

    let mut user_state = User::load(e, user);
    let index = reserve.config.index;
    let b_token_balance = user_state.get_supply(index);
    let balance = reserve.to_asset_from_b_token(e, b_token_balance);
    if b_token_balance == 0 {
        panic_with_error!(e, PoolError::BalanceError);
    }

    let (to_withdraw, b_tokens_burnt) = if amount == i128::MAX {
        (balance, b_token_balance)
    } else {
        if amount > balance {
            panic_with_error!(e, PoolError::BalanceError);
        }
        let b_tokens = reserve.to_b_token(e, amount).min(b_token_balance);
        if b_tokens == 0 {
            panic_with_error!(e, PoolError::InvalidAmount);
        }
        (amount, b_tokens)
    };
    reserve.require_liquidity(e, to_withdraw);

    let was_collateral = user_state.is_collateral(index);
    user_state.remove_supply(e, &mut reserve, b_tokens_burnt);
    reserve.data.backing -= to_withdraw;
    reserve.update_rates(e);
    pool.cache_reserve(reserve, true);

    if was_collateral && user_state.is_borrowing_any() {
        PositionData::calculate_from_positions(e, &mut pool, &user_state.positions)
            .require_healthy(e);
    }

    pool.store_cached_reserves(e);
    user_state.store(e);

    TokenClient::new(e, asset).transfer(&e.current_contract_address(), to, &to_withdraw);

    if was_collateral && !user_state.is_collateral(index) {
        events::collateral_usage(e, asset, user, false);
    }
    events::withdraw(e, asset, user, to, to_withdraw, b_tokens_burnt);
    to_withdraw
}
