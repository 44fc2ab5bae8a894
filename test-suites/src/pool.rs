pub use ::pool::{
    EModeCategory, InterestRateParams, PoolClient, PoolContract, PoolError, ReserveConfig,
};

/// A reserve config accepting collateral at 75% / 80% with a 5% liquidation bonus
pub fn default_reserve_config(decimals: u32) -> ReserveConfig {
    ReserveConfig {
        index: 0,
        decimals,
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
    }
}

pub fn default_rate_params() -> InterestRateParams {
    InterestRateParams {
        optimal_usage: 8_000,
        base_rate: 0,
        slope_1: 400,
        slope_2: 6_000,
    }
}
