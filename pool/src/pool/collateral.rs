use soroban_sdk::{panic_with_error, Address, Env};

use crate::{errors::PoolError, events, storage};

use super::{health_factor::PositionData, pool::Pool, user::User};

/// Enable or disable the supply of `asset` as collateral for `user`
///
/// ### Panics
/// If enabling a reserve with no supply or a zero loan to value, or if disabling leaves a
/// borrowing user unhealthy
pub fn execute_set_collateral_usage(e: &Env, user: &Address, asset: &Address, enabled: bool) {
    let mut pool = Pool::load(e);
    pool.require_not_paused(e);

    let reserve = pool.load_reserve(e, asset);
    reserve.require_active(e);
    let index = reserve.config.index;
    let mut user_state = User::load(e, user);

    if user_state.is_collateral(index) == enabled {
        return;
    }
    if enabled {
        if user_state.get_supply(index) == 0 {
            panic_with_error!(e, PoolError::BalanceError);
        }
        if reserve.config.ltv == 0 {
            panic_with_error!(e, PoolError::BadRequest);
        }
    }
    pool.cache_reserve(reserve, false);

    user_state.set_collateral(index, enabled);
    if !enabled && user_state.is_borrowing_any() {
        PositionData::calculate_from_positions(e, &mut pool, &user_state.positions)
            .require_healthy(e);
    }
    user_state.store(e);

    events::collateral_usage(e, asset, user, enabled);
}

/// Approve or revoke `manager` as a position manager of `user`
pub fn execute_set_position_manager(e: &Env, user: &Address, manager: &Address, approved: bool) {
    if user == manager {
        panic_with_error!(e, PoolError::BadRequest);
    }
    storage::set_manager(e, user, manager, approved);
    events::position_manager(e, user, manager, approved);
}
