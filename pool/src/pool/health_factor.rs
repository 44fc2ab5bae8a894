use cast::i128;
use soroban_sdk::{contracttype, panic_with_error, Env};

use crate::{
    constants::{HEALTH_FACTOR_LIQUIDATION_THRESHOLD, PERCENTAGE_FACTOR, WAD},
    errors::PoolError,
    math::{mul_div_ceil, mul_div_floor},
};

use super::{emode, pool::Pool, user_config::UserConfigurator, Positions};

pub struct PositionData {
    /// The collateral balance denominated in the base asset
    pub collateral_base: i128,
    /// The collateral balance weighted by each reserve's liquidation threshold
    pub weighted_threshold: i128,
    /// The collateral balance weighted by each reserve's loan to value
    pub weighted_ltv: i128,
    /// The liability balance denominated in the base asset
    pub liability_base: i128,
    /// The scalar for the base asset
    pub scalar: i128,
}

/// A summary of a user's account, denominated in the oracle's base asset
#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct AccountData {
    pub collateral_base: i128,
    pub debt_base: i128,
    pub available_borrows_base: i128,
    pub liq_threshold: u32, // the collateral weighted liquidation threshold, in bps
    pub ltv: u32,           // the collateral weighted loan to value, in bps
    pub health_factor: i128, // 18 decimals
}

impl PositionData {
    /// Calculate the position data for a given set of positions. Only supply flagged as
    /// collateral counts towards the collateral balances.
    ///
    /// ### Arguments
    /// * pool - The pool
    /// * positions - The positions to calculate the health factor for
    pub fn calculate_from_positions(e: &Env, pool: &mut Pool, positions: &Positions) -> Self {
        let oracle_scalar = 10i128.pow(pool.load_price_decimals(e));
        let category = emode::load_category(e, positions.e_mode);
        let user_config = positions.user_config();

        let mut collateral_base = 0;
        let mut weighted_threshold = 0;
        let mut weighted_ltv = 0;
        let mut liability_base = 0;
        for (index, b_token_balance) in positions.supply.iter() {
            if b_token_balance == 0 || !user_config.is_collateral(index) {
                continue;
            }
            let asset = pool.reserve_asset(e, index);
            let reserve = pool.load_reserve(e, &asset);
            let asset_to_base = pool.load_price(e, &asset);
            let risk = emode::risk_params(&reserve, &category);

            let asset_collateral = reserve.to_asset_from_b_token(e, b_token_balance);
            let value = mul_div_floor(e, asset_collateral, asset_to_base, reserve.scalar);
            collateral_base += value;
            weighted_threshold +=
                mul_div_floor(e, value, i128(risk.liq_threshold), PERCENTAGE_FACTOR);
            weighted_ltv += mul_div_floor(e, value, i128(risk.ltv), PERCENTAGE_FACTOR);

            pool.cache_reserve(reserve, false);
        }
        for (index, d_token_balance) in positions.liabilities.iter() {
            if d_token_balance == 0 {
                continue;
            }
            let asset = pool.reserve_asset(e, index);
            let reserve = pool.load_reserve(e, &asset);
            let asset_to_base = pool.load_price(e, &asset);

            let asset_liability = reserve.to_asset_from_d_token(e, d_token_balance);
            liability_base += mul_div_ceil(e, asset_liability, asset_to_base, reserve.scalar);

            pool.cache_reserve(reserve, false);
        }

        PositionData {
            collateral_base,
            weighted_threshold,
            weighted_ltv,
            liability_base,
            scalar: oracle_scalar,
        }
    }

    /// Return the health factor with 18 decimals. A position without liabilities
    /// returns i128::MAX.
    pub fn as_health_factor(&self, e: &Env) -> i128 {
        if self.liability_base == 0 {
            return i128::MAX;
        }
        mul_div_floor(e, self.weighted_threshold, WAD, self.liability_base)
    }

    /// Check if the position data meets the minimum health factor, panic if not
    pub fn require_healthy(&self, e: &Env) {
        if self.liability_base == 0 {
            return;
        }
        if self.as_health_factor(e) < HEALTH_FACTOR_LIQUIDATION_THRESHOLD {
            panic_with_error!(e, PoolError::InvalidHf);
        }
    }

    /// Check if the liabilities are covered by the loan to value of the collateral, panic if not
    pub fn require_within_ltv(&self, e: &Env) {
        if self.collateral_base == 0 {
            panic_with_error!(e, PoolError::NoCollateral);
        }
        if self.liability_base > self.weighted_ltv {
            panic_with_error!(e, PoolError::LtvExceeded);
        }
    }

    /// Summarize the position data
    pub fn as_account_data(&self, e: &Env) -> AccountData {
        let (liq_threshold, ltv) = if self.collateral_base == 0 {
            (0, 0)
        } else {
            (
                mul_div_floor(e, self.weighted_threshold, PERCENTAGE_FACTOR, self.collateral_base),
                mul_div_floor(e, self.weighted_ltv, PERCENTAGE_FACTOR, self.collateral_base),
            )
        };
        AccountData {
            collateral_base: self.collateral_base,
            debt_base: self.liability_base,
            available_borrows_base: (self.weighted_ltv - self.liability_base).max(0),
            liq_threshold: liq_threshold as u32,
            ltv: ltv as u32,
            health_factor: self.as_health_factor(e),
        }
    }
}
