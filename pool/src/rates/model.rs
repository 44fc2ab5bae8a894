use soroban_sdk::{Address, Env, Symbol, Vec};

use crate::{
    constants::{FUTURES_MAX_AGE, SEASONAL_BASE},
    dependencies::FuturesOracleClient,
    storage::{
        self, CommodityParams, ExtendedParams, InterestRateParams, SubCommodityProfile,
        WeatherEvent,
    },
};

use super::{
    curve::{calc_base_rate, calc_liquidity_rate, calc_utilization},
    layers,
};

/// The reserve state the rate models are evaluated against
#[derive(Clone, Debug)]
pub struct RateInput {
    pub total_debt: i128,
    pub available_liquidity: i128,
    pub reserve_factor: u32,
    pub timestamp: u64,
}

/// Annual rates produced by a rate model, in rays
#[derive(Clone, Debug, PartialEq)]
pub struct Rates {
    pub liquidity_rate: i128,
    pub borrow_rate: i128,
}

/// An interest rate model: a utilization curve followed by an ordered set of adjustment layers
pub trait RateModel {
    /// The borrow rate from the utilization curve, in rays
    fn base_rate(&self, e: &Env, utilization: i128) -> i128;

    /// The seasonal multiplier for `timestamp`, in bps
    fn seasonal_factor(&self, timestamp: u64) -> u32;

    /// The storage cost, quality decay and contango adjustment, in signed bps
    fn carry_adjustment(&self) -> i128;

    /// Layers applied after the carry adjustment
    fn market_adjust(&self, _e: &Env, rate: i128, _timestamp: u64) -> i128 {
        rate
    }

    /// Run the adjustment pipeline over a curve rate
    fn adjust(&self, e: &Env, rate: i128, timestamp: u64) -> i128 {
        let rate = layers::apply_multiplier(e, rate, self.seasonal_factor(timestamp));
        let rate = layers::apply_additive(e, rate, self.carry_adjustment());
        self.market_adjust(e, rate, timestamp)
    }

    /// Calculate the borrow and liquidity rates for a reserve
    fn calculate(&self, e: &Env, input: &RateInput) -> Rates {
        let utilization = calc_utilization(e, input.total_debt, input.available_liquidity);
        let borrow_rate = self.adjust(e, self.base_rate(e, utilization), input.timestamp);
        Rates {
            liquidity_rate: calc_liquidity_rate(e, borrow_rate, utilization, input.reserve_factor),
            borrow_rate,
        }
    }
}

/// The baseline model: the utilization curve with the seasonal and carry layers
#[derive(Clone)]
pub struct CommodityRateModel {
    pub curve: InterestRateParams,
    pub commodity: CommodityParams,
    pub seasonal: Option<Vec<u32>>,
}

impl RateModel for CommodityRateModel {
    fn base_rate(&self, e: &Env, utilization: i128) -> i128 {
        calc_base_rate(e, &self.curve, utilization)
    }

    fn seasonal_factor(&self, timestamp: u64) -> u32 {
        if !self.commodity.seasonal {
            return SEASONAL_BASE;
        }
        layers::seasonal_factor(&self.seasonal, timestamp)
    }

    fn carry_adjustment(&self) -> i128 {
        layers::carry_adjustment(&self.commodity)
    }
}

/// Observations from outside the pool consumed by the extended model
#[derive(Clone, Default)]
pub struct MarketData {
    pub futures_basis: Option<i128>,
    pub regional_basis: Option<i128>,
    pub weather: Option<WeatherEvent>,
}

/// Wraps a model with the sub-commodity seasonal, futures curve, regional basis and weather
/// layers. A sub-commodity profile replaces the wrapped model's seasonal multiplier.
#[derive(Clone)]
pub struct ExtendedRateModel<M: RateModel> {
    pub inner: M,
    pub sub_commodity: Option<SubCommodityProfile>,
    pub market: MarketData,
    pub weather_sensitivity: u32,
}

impl<M: RateModel> RateModel for ExtendedRateModel<M> {
    fn base_rate(&self, e: &Env, utilization: i128) -> i128 {
        self.inner.base_rate(e, utilization)
    }

    fn seasonal_factor(&self, timestamp: u64) -> u32 {
        match &self.sub_commodity {
            Some(profile) => layers::sub_commodity_factor(profile, timestamp),
            None => self.inner.seasonal_factor(timestamp),
        }
    }

    fn carry_adjustment(&self) -> i128 {
        self.inner.carry_adjustment()
    }

    fn market_adjust(&self, e: &Env, rate: i128, timestamp: u64) -> i128 {
        let mut rate = self.inner.market_adjust(e, rate, timestamp);
        if let Some(basis) = self.market.futures_basis {
            rate = layers::apply_additive(e, rate, layers::futures_adjustment(basis));
        }
        if let Some(basis) = self.market.regional_basis {
            rate = layers::apply_additive(e, rate, layers::regional_adjustment(basis));
        }
        if let Some(event) = &self.market.weather {
            let adjustment =
                layers::weather_adjustment(event, self.weather_sensitivity, timestamp);
            rate = layers::apply_additive(e, rate, adjustment);
        }
        rate
    }
}

/// Check if any extended model layer is enabled for a reserve
pub fn is_extended(params: &ExtendedParams) -> bool {
    params.sub_commodity != 0 || params.futures || params.regional || params.weather_sensitivity > 0
}

/// Read the futures curve oracle for a reserve.
///
/// Every failure mode is soft: a missing oracle, a failing call, or data older than four hours
/// skips the futures and regional layers.
pub fn fetch_market_data(
    e: &Env,
    futures_oracle: &Option<Address>,
    asset: &Address,
    params: &ExtendedParams,
) -> MarketData {
    let mut market = MarketData {
        weather: if params.weather_sensitivity > 0 {
            storage::get_weather_event(e, &params.region)
        } else {
            None
        },
        ..Default::default()
    };
    if !(params.futures || params.regional) {
        return market;
    }
    let oracle = match futures_oracle {
        Some(oracle) => FuturesOracleClient::new(e, oracle),
        None => return market,
    };
    if !matches!(oracle.try_is_fresh(asset, &FUTURES_MAX_AGE), Ok(Ok(true))) {
        return market;
    }
    if params.futures {
        if let Ok(Ok(basis)) = oracle.try_annualized_basis(asset) {
            market.futures_basis = Some(basis);
        }
    }
    if params.regional {
        if let Ok(Ok(basis)) = oracle.try_regional_basis(asset, &params.region) {
            market.regional_basis = Some(basis);
        }
    }
    market
}

/// Evaluate the rate model configured for a reserve
///
/// ### Arguments
/// * `futures_oracle` - The pool's futures curve oracle, if any
/// * `asset` - The reserve's underlying asset
/// * `curve` - The reserve's utilization curve
/// * `commodity` - The reserve's commodity adjustments
/// * `extended` - The reserve's extended model inputs
/// * `input` - The reserve state to evaluate
pub fn calc_rates(
    e: &Env,
    futures_oracle: &Option<Address>,
    asset: &Address,
    curve: &InterestRateParams,
    commodity: &CommodityParams,
    extended: &ExtendedParams,
    input: &RateInput,
) -> Rates {
    let baseline = CommodityRateModel {
        curve: curve.clone(),
        commodity: commodity.clone(),
        seasonal: if commodity.seasonal {
            storage::get_seasonal_profile(e, asset)
        } else {
            None
        },
    };
    if !is_extended(extended) {
        return baseline.calculate(e, input);
    }
    let sub_commodity = if extended.sub_commodity != 0 {
        storage::get_sub_commodity(e, extended.sub_commodity)
    } else {
        None
    };
    ExtendedRateModel {
        inner: baseline,
        sub_commodity,
        market: fetch_market_data(e, futures_oracle, asset, extended),
        weather_sensitivity: extended.weather_sensitivity,
    }
    .calculate(e, input)
}

/// The default region tag for reserves without a regional market
pub fn default_region(e: &Env) -> Symbol {
    Symbol::new(e, "GLOBAL")
}
