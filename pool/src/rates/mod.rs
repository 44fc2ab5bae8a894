mod curve;
pub use curve::{calc_base_rate, calc_liquidity_rate, calc_utilization};

pub mod layers;

mod model;
pub use model::{
    calc_rates, default_region, fetch_market_data, is_extended, CommodityRateModel,
    ExtendedRateModel, MarketData, RateInput, RateModel, Rates,
};
