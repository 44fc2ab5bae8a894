use soroban_sdk::{Env, Vec};

use crate::{
    constants::{
        MAX_FUTURES_ADJUSTMENT, MAX_REGIONAL_ADJUSTMENT, MAX_SEASONAL_FACTOR,
        MAX_WEATHER_SENSITIVITY, MIN_SEASONAL_FACTOR, SEASONAL_BASE, SECONDS_PER_MONTH,
    },
    math::{bps_to_ray, percent_mul},
    storage::{CommodityParams, SubCommodityProfile, WeatherEvent},
};

/// Fetch the month of the year (0 to 11) for a timestamp, using 30 day months
pub fn month_index(timestamp: u64) -> u32 {
    ((timestamp / SECONDS_PER_MONTH) % 12) as u32
}

fn clamp_factor(factor: u32) -> u32 {
    factor.clamp(MIN_SEASONAL_FACTOR, MAX_SEASONAL_FACTOR)
}

/// Fetch the seasonal multiplier for the current month from a 12 month profile, in bps.
/// Returns 100% if no profile is set.
pub fn seasonal_factor(profile: &Option<Vec<u32>>, timestamp: u64) -> u32 {
    match profile {
        Some(factors) => factors
            .get(month_index(timestamp))
            .map(clamp_factor)
            .unwrap_or(SEASONAL_BASE),
        None => SEASONAL_BASE,
    }
}

/// Check if `month` is inside the inclusive window `[start, end]`, which may wrap the year end
fn in_window(month: u32, start: u32, end: u32) -> bool {
    if start <= end {
        month >= start && month <= end
    } else {
        month >= start || month <= end
    }
}

/// Fetch the seasonal multiplier of a sub-commodity for the current month, in bps.
///
/// Southern hemisphere profiles are shifted by six months. The peak demand month takes
/// priority over the harvest window.
pub fn sub_commodity_factor(profile: &SubCommodityProfile, timestamp: u64) -> u32 {
    let mut month = month_index(timestamp);
    if profile.southern {
        month = (month + 6) % 12;
    }
    let factor = if month == profile.peak_month {
        profile.peak_factor
    } else if in_window(month, profile.harvest_start, profile.harvest_end) {
        profile.harvest_factor
    } else {
        profile.base_factor
    };
    clamp_factor(factor)
}

/// Scale a rate by a multiplier expressed in bps
pub fn apply_multiplier(e: &Env, rate: i128, factor: u32) -> i128 {
    percent_mul(e, rate, i128::from(factor))
}

/// Add a signed bps adjustment to a rate, flooring the result at zero
pub fn apply_additive(e: &Env, rate: i128, adjustment_bps: i128) -> i128 {
    (rate + bps_to_ray(e, adjustment_bps)).max(0)
}

/// The combined storage cost, quality decay and contango adjustment, in signed bps
pub fn carry_adjustment(params: &CommodityParams) -> i128 {
    i128::from(params.storage_cost) + i128::from(params.quality_decay) + i128::from(params.contango)
}

/// Bound an annualized futures basis to the maximum futures adjustment
pub fn futures_adjustment(basis: i128) -> i128 {
    basis.clamp(-MAX_FUTURES_ADJUSTMENT, MAX_FUTURES_ADJUSTMENT)
}

/// Bound a regional basis to the maximum regional adjustment
pub fn regional_adjustment(basis: i128) -> i128 {
    basis.clamp(-MAX_REGIONAL_ADJUSTMENT, MAX_REGIONAL_ADJUSTMENT)
}

/// Check if a weather event covers `timestamp`
pub fn is_weather_active(event: &WeatherEvent, timestamp: u64) -> bool {
    event.start <= timestamp && timestamp <= event.start.saturating_add(event.duration)
}

/// The adjustment of an active weather event scaled by the reserve's sensitivity, in signed bps
pub fn weather_adjustment(event: &WeatherEvent, sensitivity: u32, timestamp: u64) -> i128 {
    if !is_weather_active(event, timestamp) {
        return 0;
    }
    let sensitivity = i128::from(sensitivity.min(MAX_WEATHER_SENSITIVITY));
    i128::from(event.impact) * sensitivity / i128::from(MAX_WEATHER_SENSITIVITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::ray_to_bps;
    use soroban_sdk::{vec, Symbol};

    fn grain_profile(e: &Env, southern: bool) -> SubCommodityProfile {
        SubCommodityProfile {
            commodity_type: Symbol::new(e, "WHEAT"),
            harvest_start: 10,
            harvest_end: 1,
            peak_month: 5,
            southern,
            harvest_factor: 8_000,
            peak_factor: 13_000,
            base_factor: 10_000,
        }
    }

    #[test]
    fn test_month_index() {
        assert_eq!(month_index(0), 0);
        assert_eq!(month_index(SECONDS_PER_MONTH - 1), 0);
        assert_eq!(month_index(SECONDS_PER_MONTH), 1);
        assert_eq!(month_index(11 * SECONDS_PER_MONTH + 5), 11);
        assert_eq!(month_index(12 * SECONDS_PER_MONTH), 0);
    }

    #[test]
    fn test_seasonal_multiplier() {
        let e = Env::default();
        let profile = Some(vec![
            &e, 12_000, 10_000, 10_000, 10_000, 10_000, 10_000, 10_000, 10_000, 10_000, 10_000,
            10_000, 9_000,
        ]);

        let factor = seasonal_factor(&profile, 0);
        assert_eq!(factor, 12_000);
        let rate = apply_multiplier(&e, bps_to_ray(&e, 500), factor);
        assert_eq!(ray_to_bps(&e, rate), 600);

        assert_eq!(seasonal_factor(&profile, 11 * SECONDS_PER_MONTH), 9_000);
        assert_eq!(seasonal_factor(&None, 0), SEASONAL_BASE);
    }

    #[test]
    fn test_seasonal_factor_always_bounded() {
        let e = Env::default();
        let profile = Some(vec![
            &e, 0, 6_999, 7_000, 15_000, 15_001, 40_000, 10_000, 10_000, 10_000, 10_000, 10_000,
            10_000,
        ]);

        for month in 0..12 {
            let factor = seasonal_factor(&profile, month * SECONDS_PER_MONTH);
            assert!(factor >= MIN_SEASONAL_FACTOR && factor <= MAX_SEASONAL_FACTOR);
        }
        // a profile with missing months falls back to 100%
        let short = Some(vec![&e, 12_000]);
        assert_eq!(seasonal_factor(&short, 3 * SECONDS_PER_MONTH), SEASONAL_BASE);
    }

    #[test]
    fn test_sub_commodity_factor_wrapping_harvest() {
        let e = Env::default();
        let profile = grain_profile(&e, false);

        assert_eq!(sub_commodity_factor(&profile, 10 * SECONDS_PER_MONTH), 8_000);
        assert_eq!(sub_commodity_factor(&profile, 0), 8_000);
        assert_eq!(sub_commodity_factor(&profile, SECONDS_PER_MONTH), 8_000);
        assert_eq!(sub_commodity_factor(&profile, 2 * SECONDS_PER_MONTH), 10_000);
        assert_eq!(sub_commodity_factor(&profile, 5 * SECONDS_PER_MONTH), 13_000);
    }

    #[test]
    fn test_sub_commodity_factor_southern_shift() {
        let e = Env::default();
        let profile = grain_profile(&e, true);

        // month 11 shifts to month 5, the peak
        assert_eq!(sub_commodity_factor(&profile, 11 * SECONDS_PER_MONTH), 13_000);
        // month 4 shifts to month 10, inside the harvest
        assert_eq!(sub_commodity_factor(&profile, 4 * SECONDS_PER_MONTH), 8_000);
        // month 0 shifts to month 6
        assert_eq!(sub_commodity_factor(&profile, 0), 10_000);
    }

    #[test]
    fn test_apply_additive_floors_at_zero() {
        let e = Env::default();
        let rate = bps_to_ray(&e, 100);

        assert_eq!(ray_to_bps(&e, apply_additive(&e, rate, 250)), 350);
        assert_eq!(apply_additive(&e, rate, -300), 0);
    }

    #[test]
    fn test_carry_adjustment() {
        let params = CommodityParams {
            seasonal: false,
            storage_cost: 50,
            quality_decay: 25,
            contango: -100,
        };
        assert_eq!(carry_adjustment(&params), -25);
    }

    #[test]
    fn test_market_adjustments_bounded() {
        for basis in [-5_000, -1_001, -1_000, -3, 0, 420, 1_000, 1_001, 9_999] {
            let futures = futures_adjustment(basis);
            assert!(futures.abs() <= MAX_FUTURES_ADJUSTMENT);
            let regional = regional_adjustment(basis);
            assert!(regional.abs() <= MAX_REGIONAL_ADJUSTMENT);
        }
        assert_eq!(futures_adjustment(420), 420);
        assert_eq!(futures_adjustment(2_500), 1_000);
        assert_eq!(regional_adjustment(-2_500), -500);
    }

    #[test]
    fn test_weather_adjustment() {
        let e = Env::default();
        let event = WeatherEvent {
            kind: Symbol::new(&e, "DROUGHT"),
            impact: 400,
            start: 1_000,
            duration: 500,
        };

        assert_eq!(weather_adjustment(&event, 50, 999), 0);
        assert_eq!(weather_adjustment(&event, 50, 1_000), 200);
        assert_eq!(weather_adjustment(&event, 50, 1_500), 200);
        assert_eq!(weather_adjustment(&event, 50, 1_501), 0);
        assert_eq!(weather_adjustment(&event, 100, 1_200), 400);
        assert_eq!(weather_adjustment(&event, 0, 1_200), 0);
    }
}
