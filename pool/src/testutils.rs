#![cfg(test)]

use crate::{
    constants::{RAY, SCALAR_7},
    pool::Reserve,
    rates::default_region,
    storage::{
        self, CommodityParams, ExtendedParams, InterestRateParams, PoolConfig, ReserveConfig,
        ReserveData,
    },
    PoolContract,
};
use sep_40_oracle::testutils::{MockPriceOracleClient, MockPriceOracleWASM};
use sep_41_token::testutils::{MockTokenClient, MockTokenWASM};
use soroban_sdk::{testutils::Address as _, Address, Env, IntoVal};

pub(crate) fn create_pool(e: &Env) -> Address {
    e.register_contract(None, PoolContract {})
}

//************************************************
//           External Contract Helpers
//************************************************

// ***** Token *****

pub(crate) fn create_token_contract<'a>(
    e: &Env,
    admin: &Address,
) -> (Address, MockTokenClient<'a>) {
    let contract_address = Address::generate(e);
    e.register_contract_wasm(&contract_address, MockTokenWASM);
    let client = MockTokenClient::new(e, &contract_address);
    client.initialize(admin, &7, &"unit".into_val(e), &"test".into_val(e));
    (contract_address, client)
}

//***** Oracle ******

pub(crate) fn create_mock_oracle(e: &Env) -> (Address, MockPriceOracleClient) {
    let contract_address = e.register_contract_wasm(None, MockPriceOracleWASM);
    (
        contract_address.clone(),
        MockPriceOracleClient::new(e, &contract_address),
    )
}

//************************************************
//           Object Creation Helpers
//************************************************

//***** Pool *****

/// A pool config with a 0.09% flash loan premium kept entirely by suppliers
pub(crate) fn default_pool_config(e: &Env, oracle: &Address) -> PoolConfig {
    PoolConfig {
        oracle: oracle.clone(),
        treasury: Address::generate(e),
        flash_premium_total: 9,
        flash_premium_to_protocol: 0,
        paused: false,
    }
}

//***** Reserve *****

pub(crate) fn default_rate_params() -> InterestRateParams {
    InterestRateParams {
        optimal_usage: 8_000,
        base_rate: 0,
        slope_1: 400,
        slope_2: 6_000,
    }
}

pub(crate) fn default_commodity_params() -> CommodityParams {
    CommodityParams {
        seasonal: false,
        storage_cost: 0,
        quality_decay: 0,
        contango: 0,
    }
}

pub(crate) fn default_extended_params(e: &Env) -> ExtendedParams {
    ExtendedParams {
        sub_commodity: 0,
        futures: false,
        regional: false,
        weather_sensitivity: 0,
        region: default_region(e),
    }
}

/// A 7 decimal reserve with 100 supplied and 75 borrowed
pub(crate) fn default_reserve(e: &Env) -> Reserve {
    let (config, data) = default_reserve_meta();
    Reserve {
        asset: Address::generate(e),
        config,
        curve: default_rate_params(),
        commodity: default_commodity_params(),
        extended: default_extended_params(e),
        data,
        scalar: SCALAR_7,
    }
}

pub(crate) fn default_reserve_meta() -> (ReserveConfig, ReserveData) {
    (
        ReserveConfig {
            index: 0,
            decimals: 7,
            ltv: 7_500,
            liq_threshold: 8_000,
            liq_bonus: 500,
            liq_protocol_fee: 1_000,
            reserve_factor: 1_000,
            supply_cap: 0,
            borrow_cap: 0,
            active: true,
            frozen: false,
            borrowable: true,
            flash_loanable: true,
        },
        ReserveData {
            liquidity_index: RAY,
            borrow_index: RAY,
            liquidity_rate: 0,
            borrow_rate: 0,
            b_supply: 100 * SCALAR_7,
            d_supply: 75 * SCALAR_7,
            backing: 25 * SCALAR_7,
            accrued_to_treasury: 0,
            last_time: 0,
        },
    )
}

/// Create a reserve for `asset` in the pool and mint the reserve's backing to the pool.
/// The reserve is placed at the next index regardless of `reserve_config.index`.
pub(crate) fn create_reserve(
    e: &Env,
    pool_address: &Address,
    asset: &Address,
    reserve_config: &ReserveConfig,
    reserve_data: &ReserveData,
) {
    e.as_contract(pool_address, || {
        let index = storage::push_res_list(e, asset);
        let mut config = reserve_config.clone();
        config.index = index;
        storage::set_res_config(e, asset, &config);
        storage::set_res_data(e, asset, reserve_data);
        storage::set_rate_params(e, asset, &default_rate_params());
        storage::set_commodity_params(e, asset, &default_commodity_params());
        storage::set_extended_params(e, asset, &default_extended_params(e));
    });
    if reserve_data.backing > 0 {
        MockTokenClient::new(e, asset)
            .mock_all_auths()
            .mint(pool_address, &reserve_data.backing);
    }
}
