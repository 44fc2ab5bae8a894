use cast::i128;
use soroban_fixed_point_math::FixedPoint;
use soroban_sdk::{panic_with_error, Env, I256};

use crate::{
    constants::{BPS_TO_RAY, PERCENTAGE_FACTOR, RAY, SECONDS_PER_YEAR},
    errors::PoolError,
};

/// Compute `(a * b + denominator / 2) / denominator` for non-negative operands.
///
/// The product is computed in 128 bits when it fits and in 256 bits otherwise.
///
/// ### Panics
/// If the denominator is zero or the result does not fit in an i128
pub fn mul_div_half_up(e: &Env, a: i128, b: i128, denominator: i128) -> i128 {
    if denominator == 0 {
        panic_with_error!(e, PoolError::DivideByZero);
    }
    let half = denominator / 2;
    if let Some(numerator) = a.checked_mul(b).and_then(|p| p.checked_add(half)) {
        return numerator / denominator;
    }
    let numerator = I256::from_i128(e, a)
        .mul(&I256::from_i128(e, b))
        .add(&I256::from_i128(e, half));
    to_i128(e, &numerator.div(&I256::from_i128(e, denominator)))
}

/// Compute `floor(a * b / denominator)` for non-negative operands.
///
/// ### Panics
/// If the denominator is zero or the result does not fit in an i128
pub fn mul_div_floor(e: &Env, a: i128, b: i128, denominator: i128) -> i128 {
    if denominator == 0 {
        panic_with_error!(e, PoolError::DivideByZero);
    }
    if let Some(result) = a.fixed_mul_floor(b, denominator) {
        return result;
    }
    let product = I256::from_i128(e, a).mul(&I256::from_i128(e, b));
    to_i128(e, &product.div(&I256::from_i128(e, denominator)))
}

/// Compute `ceil(a * b / denominator)` for non-negative operands.
///
/// ### Panics
/// If the denominator is zero or the result does not fit in an i128
pub fn mul_div_ceil(e: &Env, a: i128, b: i128, denominator: i128) -> i128 {
    if denominator == 0 {
        panic_with_error!(e, PoolError::DivideByZero);
    }
    if let Some(result) = a.fixed_mul_ceil(b, denominator) {
        return result;
    }
    let numerator = I256::from_i128(e, a)
        .mul(&I256::from_i128(e, b))
        .add(&I256::from_i128(e, denominator - 1));
    to_i128(e, &numerator.div(&I256::from_i128(e, denominator)))
}

/// Multiply two ray values, rounding half up
pub fn ray_mul(e: &Env, a: i128, b: i128) -> i128 {
    mul_div_half_up(e, a, b, RAY)
}

/// Divide two ray values, rounding half up
pub fn ray_div(e: &Env, a: i128, b: i128) -> i128 {
    mul_div_half_up(e, a, RAY, b)
}

/// Apply a basis point percentage to a value, rounding half up
pub fn percent_mul(e: &Env, value: i128, percentage: i128) -> i128 {
    mul_div_half_up(e, value, percentage, PERCENTAGE_FACTOR)
}

/// Divide a value by a basis point percentage, rounding half up
pub fn percent_div(e: &Env, value: i128, percentage: i128) -> i128 {
    mul_div_half_up(e, value, PERCENTAGE_FACTOR, percentage)
}

/// Convert a basis point value into a ray
pub fn bps_to_ray(e: &Env, bps: i128) -> i128 {
    bps.checked_mul(BPS_TO_RAY)
        .unwrap_or_else(|| panic_with_error!(e, PoolError::OverflowError))
}

/// Convert a ray value into basis points, rounding half up
pub fn ray_to_bps(e: &Env, ray: i128) -> i128 {
    mul_div_half_up(e, ray, 1, BPS_TO_RAY)
}

/// Calculate the interest factor accumulated with a linear rate over a time period, in rays
///
/// ### Arguments
/// * `rate` - The annual rate, in rays
/// * `last_time` - The timestamp the period started at
/// * `now` - The current timestamp
pub fn linear_interest(e: &Env, rate: i128, last_time: u64, now: u64) -> i128 {
    let elapsed = i128(now.saturating_sub(last_time));
    let accrued = rate
        .checked_mul(elapsed)
        .unwrap_or_else(|| panic_with_error!(e, PoolError::OverflowError))
        / i128(SECONDS_PER_YEAR);
    RAY + accrued
}

/// Calculate the interest factor accumulated with a compounded rate over a time period, in rays.
///
/// Approximates `(1 + rate / SECONDS_PER_YEAR) ^ elapsed` with the first three terms of the
/// binomial expansion, which slightly underestimates the true value.
///
/// ### Arguments
/// * `rate` - The annual rate, in rays
/// * `last_time` - The timestamp the period started at
/// * `now` - The current timestamp
pub fn compounded_interest(e: &Env, rate: i128, last_time: u64, now: u64) -> i128 {
    let exp = i128(now.saturating_sub(last_time));
    if exp == 0 {
        return RAY;
    }
    let exp_minus_one = exp - 1;
    let exp_minus_two = if exp > 2 { exp - 2 } else { 0 };
    let year = i128(SECONDS_PER_YEAR);

    let base_power_two = ray_mul(e, rate, rate) / (year * year);
    let base_power_three = ray_mul(e, base_power_two, rate) / year;

    let first_term = checked(e, rate.checked_mul(exp)) / year;
    let second_term = checked(
        e,
        exp.checked_mul(exp_minus_one)
            .and_then(|v| v.checked_mul(base_power_two)),
    ) / 2;
    let third_term = checked(
        e,
        exp.checked_mul(exp_minus_one)
            .and_then(|v| v.checked_mul(exp_minus_two))
            .and_then(|v| v.checked_mul(base_power_three)),
    ) / 6;

    checked(
        e,
        RAY.checked_add(first_term)
            .and_then(|v| v.checked_add(second_term))
            .and_then(|v| v.checked_add(third_term)),
    )
}

fn checked(e: &Env, value: Option<i128>) -> i128 {
    value.unwrap_or_else(|| panic_with_error!(e, PoolError::OverflowError))
}

fn to_i128(e: &Env, value: &I256) -> i128 {
    if *value > I256::from_i128(e, i128::MAX) || *value < I256::from_i128(e, i128::MIN) {
        panic_with_error!(e, PoolError::OverflowError);
    }
    let mut buf = [0u8; 16];
    value.to_be_bytes().slice(16..32).copy_into_slice(&mut buf);
    i128::from_be_bytes(buf)
}
