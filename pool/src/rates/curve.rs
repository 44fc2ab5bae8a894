use soroban_sdk::Env;

use crate::{
    constants::{PERCENTAGE_FACTOR, RAY},
    math::{bps_to_ray, percent_mul, ray_div, ray_mul},
    storage::InterestRateParams,
};

/// Calculate the utilization of a reserve, in rays
///
/// ### Arguments
/// * `total_debt` - The outstanding debt of the reserve, in underlying
/// * `available_liquidity` - The underlying available in the reserve
pub fn calc_utilization(e: &Env, total_debt: i128, available_liquidity: i128) -> i128 {
    if total_debt == 0 {
        return 0;
    }
    ray_div(e, total_debt, available_liquidity + total_debt)
}

/// Calculate the borrow rate from the reserve's two slope utilization curve, in rays
///
/// Below the optimal usage the rate grows linearly from `base_rate` to `base_rate + slope_1`.
/// Above it, `slope_2` is added linearly over the remaining utilization.
///
/// ### Arguments
/// * `params` - The interest rate curve
/// * `utilization` - The current utilization, in rays
pub fn calc_base_rate(e: &Env, params: &InterestRateParams, utilization: i128) -> i128 {
    let optimal = bps_to_ray(e, i128::from(params.optimal_usage));
    let base = bps_to_ray(e, i128::from(params.base_rate));
    let slope_1 = bps_to_ray(e, i128::from(params.slope_1));

    if utilization > optimal {
        let slope_2 = bps_to_ray(e, i128::from(params.slope_2));
        let excess = ray_div(e, utilization - optimal, RAY - optimal);
        base + slope_1 + ray_mul(e, slope_2, excess)
    } else {
        base + ray_mul(e, slope_1, ray_div(e, utilization, optimal))
    }
}

/// Calculate the supply rate paid to lenders, in rays
///
/// ### Arguments
/// * `borrow_rate` - The variable borrow rate, in rays
/// * `utilization` - The current utilization, in rays
/// * `reserve_factor` - The share of interest kept by the treasury, in bps
pub fn calc_liquidity_rate(
    e: &Env,
    borrow_rate: i128,
    utilization: i128,
    reserve_factor: u32,
) -> i128 {
    let gross = ray_mul(e, borrow_rate, utilization);
    percent_mul(e, gross, PERCENTAGE_FACTOR - i128::from(reserve_factor))
}
