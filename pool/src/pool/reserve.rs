use soroban_sdk::{contracttype, panic_with_error, Address, Env};

use crate::{
    constants::RAY,
    errors::PoolError,
    events,
    math::{ray_div, ray_mul},
    rates::{self, RateInput},
    storage::{
        self, CommodityParams, ExtendedParams, InterestRateParams, ReserveConfig, ReserveData,
    },
};

use super::interest::calc_accrual;

#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct Reserve {
    pub asset: Address,               // the underlying asset address
    pub config: ReserveConfig,        // the risk configuration
    pub curve: InterestRateParams,    // the utilization curve
    pub commodity: CommodityParams,   // the commodity rate adjustments
    pub extended: ExtendedParams,     // the extended rate model inputs
    pub data: ReserveData,            // the accounting data
    pub scalar: i128,                 // scalar used for balances
}

impl Reserve {
    /// Load a Reserve from the ledger and accrue interest to the current ledger timestamp.
    ///
    /// **NOTE**: This function is not cached, and should be called from the Pool.
    ///
    /// ### Arguments
    /// * asset - The address of the underlying asset
    ///
    /// ### Panics
    /// Panics if the asset is not supported or the accrual overflows
    pub fn load(e: &Env, asset: &Address) -> Reserve {
        let config = storage::get_res_config(e, asset);
        let mut reserve = Reserve {
            asset: asset.clone(),
            scalar: 10i128.pow(config.decimals),
            curve: storage::get_rate_params(e, asset),
            commodity: storage::get_commodity_params(e, asset),
            extended: storage::get_extended_params(e, asset),
            data: storage::get_res_data(e, asset),
            config,
        };

        // short circuit if the reserve has already been updated this ledger
        let now = e.ledger().timestamp();
        if now == reserve.data.last_time {
            return reserve;
        }

        let accrual = calc_accrual(e, &reserve.data, reserve.config.reserve_factor, now);
        reserve.data.liquidity_index = accrual.liquidity_index;
        reserve.data.borrow_index = accrual.borrow_index;
        reserve.data.accrued_to_treasury += accrual.to_treasury;
        reserve.data.last_time = now;
        reserve
    }

    /// Store the updated reserve data to the ledger.
    pub fn store(&self, e: &Env) {
        storage::set_res_data(e, &self.asset, &self.data);
    }

    /// Recalculate the reserve's rates from its current state and emit the new state.
    ///
    /// Must be called after any change to the reserve's debt or available liquidity.
    pub fn update_rates(&mut self, e: &Env) {
        let input = RateInput {
            total_debt: self.total_liabilities(e),
            available_liquidity: self.data.backing,
            reserve_factor: self.config.reserve_factor,
            timestamp: e.ledger().timestamp(),
        };
        let new_rates = rates::calc_rates(
            e,
            &storage::get_futures_oracle(e),
            &self.asset,
            &self.curve,
            &self.commodity,
            &self.extended,
            &input,
        );
        self.data.liquidity_rate = new_rates.liquidity_rate;
        self.data.borrow_rate = new_rates.borrow_rate;
        events::reserve_updated(e, &self.asset, &self.data);
    }

    /// Add `amount` of underlying to the liquidity index, distributing it to all suppliers.
    /// Does nothing if the reserve has no supply.
    pub fn cumulate_to_liquidity_index(&mut self, e: &Env, amount: i128) {
        let total_liquidity = self.total_supply(e);
        if total_liquidity == 0 || amount == 0 {
            return;
        }
        let growth = ray_div(e, amount, total_liquidity) + RAY;
        self.data.liquidity_index = ray_mul(e, growth, self.data.liquidity_index);
    }

    /// Fetch the current utilization rate for the reserve, in rays
    pub fn utilization(&self, e: &Env) -> i128 {
        rates::calc_utilization(e, self.total_liabilities(e), self.data.backing)
    }

    /// Fetch the total liabilities for the reserve in underlying tokens
    pub fn total_liabilities(&self, e: &Env) -> i128 {
        self.to_asset_from_d_token(e, self.data.d_supply)
    }

    /// Fetch the total supply for the reserve in underlying tokens, including the supply
    /// owed to the treasury
    pub fn total_supply(&self, e: &Env) -> i128 {
        self.to_asset_from_b_token(e, self.data.b_supply + self.data.accrued_to_treasury)
    }

    /********** Validation **********/

    /// Require that the reserve is active, or panic.
    pub fn require_active(&self, e: &Env) {
        if !self.config.active {
            panic_with_error!(e, PoolError::ReserveInactive);
        }
    }

    /// Require that the reserve is active and not frozen, or panic.
    pub fn require_accepts_new_positions(&self, e: &Env) {
        self.require_active(e);
        if self.config.frozen {
            panic_with_error!(e, PoolError::ReserveFrozen);
        }
    }

    /// Require that the reserve has at least `amount` of underlying available, or panic.
    pub fn require_liquidity(&self, e: &Env, amount: i128) {
        if amount > self.data.backing {
            panic_with_error!(e, PoolError::InsufficientLiquidity);
        }
    }

    /// Require that the total supply is within the supply cap, or panic.
    pub fn require_supply_cap(&self, e: &Env) {
        if self.config.supply_cap != 0
            && self.total_supply(e) > self.config.supply_cap * self.scalar
        {
            panic_with_error!(e, PoolError::SupplyCapExceeded);
        }
    }

    /// Require that the total liabilities are within the borrow cap, or panic.
    pub fn require_borrow_cap(&self, e: &Env) {
        if self.config.borrow_cap != 0
            && self.total_liabilities(e) > self.config.borrow_cap * self.scalar
        {
            panic_with_error!(e, PoolError::BorrowCapExceeded);
        }
    }

    /********** Conversion Functions **********/

    /// Convert d_tokens to the corresponding asset value
    ///
    /// ### Arguments
    /// * `d_tokens` - The amount of tokens to convert
    pub fn to_asset_from_d_token(&self, e: &Env, d_tokens: i128) -> i128 {
        ray_mul(e, d_tokens, self.data.borrow_index)
    }

    /// Convert b_tokens to the corresponding asset value
    ///
    /// ### Arguments
    /// * `b_tokens` - The amount of tokens to convert
    pub fn to_asset_from_b_token(&self, e: &Env, b_tokens: i128) -> i128 {
        ray_mul(e, b_tokens, self.data.liquidity_index)
    }

    /// Convert asset tokens to the corresponding d token value
    ///
    /// ### Arguments
    /// * `amount` - The amount of tokens to convert
    pub fn to_d_token(&self, e: &Env, amount: i128) -> i128 {
        ray_div(e, amount, self.data.borrow_index)
    }

    /// Convert asset tokens to the corresponding b token value
    ///
    /// ### Arguments
    /// * `amount` - The amount of tokens to convert
    pub fn to_b_token(&self, e: &Env, amount: i128) -> i128 {
        ray_div(e, amount, self.data.liquidity_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{constants::SECONDS_PER_YEAR, testutils};
    use soroban_sdk::testutils::{Address as _, Ledger, LedgerInfo};

    #[test]
    fn test_load_reserve() {
        let e = Env::default();
        e.mock_all_auths();

        e.ledger().set(LedgerInfo {
            timestamp: SECONDS_PER_YEAR,
            protocol_version: 20,
            sequence_number: 123456,
            network_id: Default::default(),
            base_reserve: 10,
            min_temp_entry_ttl: 10,
            min_persistent_entry_ttl: 10,
            max_entry_ttl: 2000000,
        });

        let bombadil = Address::generate(&e);
        let pool = testutils::create_pool(&e);

        let (underlying, _) = testutils::create_token_contract(&e, &bombadil);
        let (reserve_config, mut reserve_data) = testutils::default_reserve_meta();
        reserve_data.liquidity_rate = RAY / 20;
        reserve_data.borrow_rate = RAY / 10;
        testutils::create_reserve(&e, &pool, &underlying, &reserve_config, &reserve_data);

        e.as_contract(&pool, || {
            let reserve = Reserve::load(&e, &underlying);

            assert_eq!(reserve.scalar, 1_0000000);
            assert_eq!(reserve.data.last_time, SECONDS_PER_YEAR);
            assert_eq!(
                reserve.data.liquidity_index,
                1_050_000_000_000_000_000_000_000_000
            );
            assert!(reserve.data.borrow_index > 1_105_100_000_000_000_000_000_000_000);
            assert!(reserve.data.accrued_to_treasury > 0);
            // rates are not recalculated on load
            assert_eq!(reserve.data.borrow_rate, RAY / 10);
        });
    }

    #[test]
    fn test_load_reserve_twice_same_timestamp() {
        let e = Env::default();
        e.mock_all_auths();

        e.ledger().set(LedgerInfo {
            timestamp: 86400,
            protocol_version: 20,
            sequence_number: 123456,
            network_id: Default::default(),
            base_reserve: 10,
            min_temp_entry_ttl: 10,
            min_persistent_entry_ttl: 10,
            max_entry_ttl: 2000000,
        });

        let bombadil = Address::generate(&e);
        let pool = testutils::create_pool(&e);

        let (underlying, _) = testutils::create_token_contract(&e, &bombadil);
        let (reserve_config, mut reserve_data) = testutils::default_reserve_meta();
        reserve_data.liquidity_rate = RAY / 20;
        reserve_data.borrow_rate = RAY / 10;
        testutils::create_reserve(&e, &pool, &underlying, &reserve_config, &reserve_data);

        e.as_contract(&pool, || {
            let reserve = Reserve::load(&e, &underlying);
            reserve.store(&e);

            // accruing over 0 seconds after accruing over t is the same as accruing over t
            let reloaded = Reserve::load(&e, &underlying);
            assert_eq!(reloaded.data, reserve.data);
        });
    }

    #[test]
    fn test_update_rates() {
        let e = Env::default();
        e.mock_all_auths();

        let bombadil = Address::generate(&e);
        let pool = testutils::create_pool(&e);

        let (underlying, _) = testutils::create_token_contract(&e, &bombadil);
        let (reserve_config, reserve_data) = testutils::default_reserve_meta();
        testutils::create_reserve(&e, &pool, &underlying, &reserve_config, &reserve_data);

        e.as_contract(&pool, || {
            let mut reserve = Reserve::load(&e, &underlying);
            // 75 borrowed of 100 supplied, below the 80% kink
            reserve.update_rates(&e);

            assert_eq!(reserve.utilization(&e), 750_000_000_000_000_000_000_000_000);
            // 400 * 0.75 / 0.8 = 375 bps
            assert_eq!(reserve.data.borrow_rate, 37_500_000_000_000_000_000_000_000);
            // 375 * 0.75 * 0.9 = 253.125 bps
            assert_eq!(reserve.data.liquidity_rate, 25_312_500_000_000_000_000_000_000);
        });
    }

    #[test]
    fn test_cumulate_to_liquidity_index() {
        let e = Env::default();
        let mut reserve = testutils::default_reserve(&e);

        // 100 supplied, 1 distributed
        reserve.cumulate_to_liquidity_index(&e, 1_0000000);
        assert_eq!(reserve.data.liquidity_index, 1_010_000_000_000_000_000_000_000_000);
        assert_eq!(reserve.total_supply(&e), 101_0000000);

        reserve.data.b_supply = 0;
        reserve.cumulate_to_liquidity_index(&e, 1_0000000);
        assert_eq!(reserve.data.liquidity_index, 1_010_000_000_000_000_000_000_000_000);
    }

    #[test]
    fn test_conversions() {
        let e = Env::default();
        let mut reserve = testutils::default_reserve(&e);
        reserve.data.liquidity_index = 1_100_000_000_000_000_000_000_000_000;
        reserve.data.borrow_index = 1_250_000_000_000_000_000_000_000_000;

        assert_eq!(reserve.to_b_token(&e, 11_0000000), 10_0000000);
        assert_eq!(reserve.to_asset_from_b_token(&e, 10_0000000), 11_0000000);
        assert_eq!(reserve.to_d_token(&e, 12_5000000), 10_0000000);
        assert_eq!(reserve.to_asset_from_d_token(&e, 10_0000000), 12_5000000);
        // half up rounding
        assert_eq!(reserve.to_b_token(&e, 1), 1);
        assert_eq!(reserve.to_d_token(&e, 1), 1);
        assert_eq!(reserve.to_d_token(&e, 3), 2);
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #1215)")]
    fn test_require_supply_cap() {
        let e = Env::default();
        let mut reserve = testutils::default_reserve(&e);
        reserve.config.supply_cap = 100;
        reserve.require_supply_cap(&e);

        reserve.data.b_supply += 1;
        reserve.require_supply_cap(&e);
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #1216)")]
    fn test_require_borrow_cap() {
        let e = Env::default();
        let mut reserve = testutils::default_reserve(&e);
        reserve.config.borrow_cap = 75;
        reserve.require_borrow_cap(&e);

        reserve.data.d_supply += 1;
        reserve.require_borrow_cap(&e);
    }
}
