use sep_41_token::TokenClient;
use soroban_sdk::{panic_with_error, Address, Env};

use crate::{errors::PoolError, events, validator::require_positive};

use super::{pool::Pool, reserve::Reserve, user::User};

/// Repay up to `amount` of the `asset` debt of `on_behalf_of` with underlying from `from`.
/// The amount is clamped to the outstanding debt, so `i128::MAX` repays everything.
///
/// Returns the amount of underlying repaid
pub fn execute_repay(
    e: &Env,
    from: &Address,
    asset: &Address,
    amount: i128,
    on_behalf_of: &Address,
) -> i128 {
    repay_with_underlying(e, from, asset, amount, on_behalf_of, None)
}

/// Repay debt like [execute_repay], approving the pool to pull the funds from `from` inside the
/// same invocation instead of transferring them directly.
///
/// Returns the amount of underlying repaid
pub fn execute_repay_with_permit(
    e: &Env,
    from: &Address,
    asset: &Address,
    amount: i128,
    on_behalf_of: &Address,
    expiration_ledger: u32,
) -> i128 {
    repay_with_underlying(e, from, asset, amount, on_behalf_of, Some(expiration_ledger))
}

/// Repay the `asset` debt of `user` by burning their own supply of the same reserve. The amount
/// is clamped to both the debt and the supply position.
///
/// Returns the amount of underlying repaid
pub fn execute_repay_with_b_tokens(e: &Env, user: &Address, asset: &Address, amount: i128) -> i128 {
    require_positive(e, &amount);
    let mut pool = Pool::load(e);
    pool.require_not_paused(e);

    let mut reserve = pool.load_reserve(e, asset);
    reserve.require_active(e);
    let mut user_state = User::load(e, user);
    let index = reserve.config.index;

    let b_token_balance = user_state.get_supply(index);
    if b_token_balance == 0 {
        panic_with_error!(e, PoolError::BalanceError);
    }
    let supply = reserve.to_asset_from_b_token(e, b_token_balance);
    let (repaid, d_tokens_burnt) = calc_repayment(e, &reserve, &user_state, amount.min(supply));
    let b_tokens_burnt = if repaid == supply {
        b_token_balance
    } else {
        reserve.to_b_token(e, repaid).min(b_token_balance)
    };

    let was_collateral = user_state.is_collateral(index);
    user_state.remove_liabilities(e, &mut reserve, d_tokens_burnt);
    user_state.remove_supply(e, &mut reserve, b_tokens_burnt);
    reserve.update_rates(e);
    pool.cache_reserve(reserve, true);

    pool.store_cached_reserves(e);
    user_state.store(e);

    if was_collateral && !user_state.is_collateral(index) {
        events::collateral_usage(e, asset, user, false);
    }
    events::repay(e, asset, user, user, repaid, d_tokens_burnt, true);
    repaid
}

fn repay_with_underlying(
    e: &Env,
    from: &Address,
    asset: &Address,
    amount: i128,
    on_behalf_of: &Address,
    permit_expiration: Option<u32>,
) -> i128 {
    require_positive(e, &amount);
    let mut pool = Pool::load(e);
    pool.require_not_paused(e);

    let mut reserve = pool.load_reserve(e, asset);
    reserve.require_active(e);
    let mut user_state = User::load(e, on_behalf_of);

    let (repaid, d_tokens_burnt) = calc_repayment(e, &reserve, &user_state, amount);
    user_state.remove_liabilities(e, &mut reserve, d_tokens_burnt);
    reserve.data.backing += repaid;
    reserve.update_rates(e);
    pool.cache_reserve(reserve, true);

    let token = TokenClient::new(e, asset);
    let pool_address = e.current_contract_address();
    match permit_expiration {
        Some(expiration_ledger) => {
            token.approve(from, &pool_address, &repaid, &expiration_ledger);
            token.transfer_from(&pool_address, from, &pool_address, &repaid);
        }
        None => token.transfer(from, &pool_address, &repaid),
    }

    pool.store_cached_reserves(e);
    user_state.store(e);

    events::repay(e, asset, on_behalf_of, from, repaid, d_tokens_burnt, false);
    repaid
}

/// Calculate the underlying repaid and the d tokens burnt to repay up to `amount` of the user's
/// debt. Repaying the full debt burns the full d token balance.
fn calc_repayment(e: &Env, reserve: &Reserve, user: &User, amount: i128) -> (i128, i128) {
    let d_token_balance = user.get_liabilities(reserve.config.index);
    if d_token_balance == 0 {
        panic_with_error!(e, PoolError::NoDebt);
    }
    let debt = reserve.to_asset_from_d_token(e, d_token_balance);
    if amount >= debt {
        return (debt, d_token_balance);
    }
    let d_tokens_burnt = reserve.to_d_token(e, amount).min(d_token_balance);
    if d_tokens_burnt == 0 {
        panic_with_error!(e, PoolError::InvalidAmount);
    }
    (amount, d_tokens_burnt)
}
