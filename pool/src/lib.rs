#![no_std]

#[cfg(any(test, feature = "testutils"))]
extern crate std;

mod auth;
mod constants;
mod contract;
mod dependencies;
mod errors;
mod events;
mod math;
mod pool;
mod rates;
mod storage;
mod testutils;
mod validator;

pub use contract::*;
pub use dependencies::{
    FlashLoanReceiver, FlashLoanReceiverClient, FuturesOracle, FuturesOracleClient,
};
pub use errors::PoolError;
pub use pool::{AccountData, LiquidationResult, Positions, Reserve, MODE_DEBT, MODE_REPAY};
pub use storage::{
    CommodityParams, EModeCategory, ExtendedParams, InterestRateParams, PoolConfig,
    ReserveConfig, ReserveData, SubCommodityProfile, WeatherEvent,
};
