use soroban_sdk::{panic_with_error, Address, Env};

use crate::{
    constants::PERCENTAGE_FACTOR, errors::PoolError, events, storage, storage::EModeCategory,
};

use super::{
    health_factor::PositionData,
    pool::Pool,
    reserve::Reserve,
    user::User,
    user_config::{is_reserve_in_bitmap, UserConfigurator},
};

/// The risk parameters applied to a reserve for a user, in bps
#[derive(Clone, Debug, PartialEq)]
pub struct RiskParams {
    pub ltv: u32,
    pub liq_threshold: u32,
    pub liq_bonus: u32,
}

/// Load an E-Mode category. Category 0 means no category.
///
/// ### Panics
/// If a non-zero category does not exist
pub fn load_category(e: &Env, id: u32) -> Option<EModeCategory> {
    if id == 0 {
        return None;
    }
    match storage::get_emode_category(e, id) {
        Some(category) => Some(category),
        None => panic_with_error!(e, PoolError::InvalidEModeCategory),
    }
}

/// Fetch the risk parameters for a reserve, applying the category override when the
/// reserve is part of the category's collateral set
pub fn risk_params(reserve: &Reserve, category: &Option<EModeCategory>) -> RiskParams {
    match category {
        Some(category) if is_reserve_in_bitmap(category.collateral, reserve.config.index) => {
            RiskParams {
                ltv: category.ltv,
                liq_threshold: category.liq_threshold,
                liq_bonus: category.liq_bonus,
            }
        }
        _ => RiskParams {
            ltv: reserve.config.ltv,
            liq_threshold: reserve.config.liq_threshold,
            liq_bonus: reserve.config.liq_bonus,
        },
    }
}

/// Check if the reserve at `index` can be borrowed under the category
pub fn is_borrowable(category: &Option<EModeCategory>, index: u32) -> bool {
    match category {
        Some(category) => is_reserve_in_bitmap(category.borrowable, index),
        None => true,
    }
}

/// Require that an E-Mode category's parameters are consistent
pub fn require_valid_category(e: &Env, category: &EModeCategory) {
    if category.ltv == 0
        || category.ltv > category.liq_threshold
        || i128::from(category.liq_threshold) * (PERCENTAGE_FACTOR + i128::from(category.liq_bonus))
            > PERCENTAGE_FACTOR * PERCENTAGE_FACTOR
    {
        panic_with_error!(e, PoolError::InvalidEModeCategory);
    }
}

/// Select the E-Mode category for a user
///
/// ### Arguments
/// * `user` - The user changing category
/// * `category_id` - The new category, 0 to leave E-Mode
///
/// ### Panics
/// If the category does not exist, the user borrows an asset the category does not allow,
/// or the user's position is unhealthy under the new category
pub fn execute_set_user_emode(e: &Env, user: &Address, category_id: u32) {
    let mut pool = Pool::load(e);
    pool.require_not_paused(e);
    let mut user_state = User::load(e, user);
    let category = load_category(e, category_id);

    let user_config = user_state.positions.user_config();
    if category.is_some() {
        for index in user_state.positions.liabilities.keys().iter() {
            if user_config.is_borrowing(index) && !is_borrowable(&category, index) {
                panic_with_error!(e, PoolError::NotBorrowableInEMode);
            }
        }
    }

    user_state.positions.e_mode = category_id;
    if user_state.is_borrowing_any() {
        let position_data =
            PositionData::calculate_from_positions(e, &mut pool, &user_state.positions);
        position_data.require_healthy(e);
    }
    user_state.store(e);

    events::user_emode(e, user, category_id);
}
