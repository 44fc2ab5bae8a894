use soroban_sdk::Env;

use crate::{
    math::{compounded_interest, linear_interest, percent_mul, ray_div, ray_mul},
    storage::ReserveData,
};

/// The reserve indexes after accruing interest to `now`
#[derive(Clone, Debug, PartialEq)]
pub struct Accrual {
    pub liquidity_index: i128,
    pub borrow_index: i128,
    /// New b tokens owed to the treasury
    pub to_treasury: i128,
}

/// Calculate the reserve indexes accrued from the stored rates between the last update and `now`.
///
/// The liquidity index grows linearly and the borrow index compounds. The reserve factor share of
/// the interest accrued on the outstanding debt is owed to the treasury as b tokens.
///
/// ### Arguments
/// * `data` - The reserve data as of its last update
/// * `reserve_factor` - The share of borrow interest owed to the treasury, in bps
/// * `now` - The current timestamp
pub fn calc_accrual(e: &Env, data: &ReserveData, reserve_factor: u32, now: u64) -> Accrual {
    let mut liquidity_index = data.liquidity_index;
    let mut borrow_index = data.borrow_index;

    if data.liquidity_rate != 0 {
        let factor = linear_interest(e, data.liquidity_rate, data.last_time, now);
        liquidity_index = ray_mul(e, factor, liquidity_index);
    }
    if data.d_supply != 0 {
        let factor = compounded_interest(e, data.borrow_rate, data.last_time, now);
        borrow_index = ray_mul(e, factor, borrow_index);
    }

    let prev_debt = ray_mul(e, data.d_supply, data.borrow_index);
    let next_debt = ray_mul(e, data.d_supply, borrow_index);
    let to_treasury_underlying = percent_mul(e, next_debt - prev_debt, i128::from(reserve_factor));
    let to_treasury = if to_treasury_underlying > 0 {
        ray_div(e, to_treasury_underlying, liquidity_index)
    } else {
        0
    };

    Accrual {
        liquidity_index,
        borrow_index,
        to_treasury,
    }
}
