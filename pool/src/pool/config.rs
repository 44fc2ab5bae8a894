use crate::{
    auth::{Authorized, Role},
    constants::{
        MAX_BORROW_RATE, MAX_CONTANGO, MAX_OPTIMAL_POINT, MAX_QUALITY_DECAY, MAX_SEASONAL_FACTOR,
        MAX_STORAGE_COST, MAX_WEATHER_IMPACT, MAX_WEATHER_SENSITIVITY, MIN_OPTIMAL_POINT,
        MIN_SEASONAL_FACTOR, PERCENTAGE_FACTOR, RAY,
    },
    errors::PoolError,
    events,
    rates::default_region,
    storage::{
        self, CommodityParams, EModeCategory, ExtendedParams, InterestRateParams, PoolConfig,
        ReserveConfig, ReserveData, SubCommodityProfile, WeatherEvent,
    },
};
use soroban_sdk::{panic_with_error, Address, Env, Symbol, Vec};

use super::{emode, pool::Pool, reserve::Reserve};

/// Initialize the pool
///
/// Panics if the pool is already initialized or the arguments are invalid
pub fn execute_initialize(
    e: &Env,
    admin: &Address,
    name: &Symbol,
    oracle: &Address,
    treasury: &Address,
    flash_premium_total: u32,
    flash_premium_to_protocol: u32,
) {
    if storage::has_admin(e) {
        panic_with_error!(e, PoolError::AlreadyInitializedError);
    }

    if flash_premium_total > PERCENTAGE_FACTOR as u32
        || flash_premium_to_protocol > PERCENTAGE_FACTOR as u32
    {
        panic_with_error!(e, PoolError::InvalidPoolInitArgs);
    }

    storage::set_admin(e, admin);
    storage::set_name(e, name);
    storage::set_pool_config(
        e,
        &PoolConfig {
            oracle: oracle.clone(),
            treasury: treasury.clone(),
            flash_premium_total,
            flash_premium_to_protocol,
            paused: false,
        },
    );
}

/// Transfer the admin role to `new_admin`
pub fn execute_set_admin(e: &Env, auth: &Authorized, new_admin: &Address) {
    auth.require(e, Role::Admin);
    storage::set_admin(e, new_admin);
    events::set_admin(e, auth.address(), new_admin);
}

/// Grant or revoke the configurator role
pub fn execute_set_configurator(e: &Env, auth: &Authorized, address: &Address, enabled: bool) {
    auth.require(e, Role::Admin);
    storage::set_configurator(e, address, enabled);
    events::set_configurator(e, address, enabled);
}

/// Pause or unpause the pool. A paused pool rejects every user action.
pub fn execute_set_paused(e: &Env, auth: &Authorized, paused: bool) {
    auth.require(e, Role::Admin);
    let mut pool_config = storage::get_pool_config(e);
    pool_config.paused = paused;
    storage::set_pool_config(e, &pool_config);
    events::set_status(e, auth.address(), paused);
}

/// Set or remove the futures curve oracle used by the extended rate model
pub fn execute_set_futures_oracle(e: &Env, auth: &Authorized, oracle: &Option<Address>) {
    auth.require(e, Role::Admin);
    storage::set_futures_oracle(e, oracle);
    events::set_futures_oracle(e, auth.address(), oracle);
}

/// Update the flash loan premium and the treasury's share of it
pub fn execute_update_flash_premiums(e: &Env, auth: &Authorized, total: u32, to_protocol: u32) {
    auth.require(e, Role::Admin);
    if total > PERCENTAGE_FACTOR as u32 || to_protocol > PERCENTAGE_FACTOR as u32 {
        panic_with_error!(e, PoolError::BadRequest);
    }
    let mut pool_config = storage::get_pool_config(e);
    pool_config.flash_premium_total = total;
    pool_config.flash_premium_to_protocol = to_protocol;
    storage::set_pool_config(e, &pool_config);
    events::update_flash_premiums(e, total, to_protocol);
}

/// Exempt an address from paying the flash loan premium, or revoke the exemption
pub fn execute_set_flash_borrower(e: &Env, auth: &Authorized, address: &Address, enabled: bool) {
    auth.require(e, Role::Admin);
    storage::set_flash_borrower(e, address, enabled);
    events::set_flash_borrower(e, address, enabled);
}

/********** Reserves **********/

/// Initialize a reserve for the pool. The reserve starts with no commodity or extended layers.
///
/// Returns the index of the new reserve
pub fn execute_init_reserve(
    e: &Env,
    auth: &Authorized,
    asset: &Address,
    config: &ReserveConfig,
    rate_params: &InterestRateParams,
) -> u32 {
    auth.require(e, Role::Admin);
    if storage::has_res(e, asset) {
        panic_with_error!(e, PoolError::ReserveAlreadyInitialized);
    }
    require_valid_reserve_config(e, config);
    require_valid_rate_params(e, rate_params);

    let index = storage::push_res_list(e, asset);
    let mut reserve_config = config.clone();
    reserve_config.index = index;
    storage::set_res_config(e, asset, &reserve_config);
    storage::set_rate_params(e, asset, rate_params);
    storage::set_commodity_params(
        e,
        asset,
        &CommodityParams {
            seasonal: false,
            storage_cost: 0,
            quality_decay: 0,
            contango: 0,
        },
    );
    storage::set_extended_params(
        e,
        asset,
        &ExtendedParams {
            sub_commodity: 0,
            futures: false,
            regional: false,
            weather_sensitivity: 0,
            region: default_region(e),
        },
    );
    storage::set_res_data(
        e,
        asset,
        &ReserveData {
            liquidity_index: RAY,
            borrow_index: RAY,
            liquidity_rate: 0,
            borrow_rate: 0,
            b_supply: 0,
            d_supply: 0,
            backing: 0,
            accrued_to_treasury: 0,
            last_time: e.ledger().timestamp(),
        },
    );
    update_reserve_state(e, asset, |_| {});

    events::init_reserve(e, asset, index);
    index
}

/// Update the risk configuration of a reserve. The index and decimals cannot change.
pub fn execute_update_reserve(e: &Env, auth: &Authorized, asset: &Address, config: &ReserveConfig) {
    auth.require(e, Role::Configurator);
    require_valid_reserve_config(e, config);

    let reserve_config = storage::get_res_config(e, asset);
    let mut new_config = config.clone();
    new_config.index = reserve_config.index;
    new_config.decimals = reserve_config.decimals;

    // accrue under the old reserve factor
    update_reserve_state(e, asset, |reserve| {
        reserve.config = new_config.clone();
    });
    storage::set_res_config(e, asset, &new_config);
    events::update_reserve(e, asset, &new_config);
}

/// Update the utilization curve of a reserve
pub fn execute_update_rate_params(
    e: &Env,
    auth: &Authorized,
    asset: &Address,
    params: &InterestRateParams,
) {
    auth.require(e, Role::Configurator);
    require_valid_rate_params(e, params);

    update_reserve_state(e, asset, |reserve| {
        reserve.curve = params.clone();
    });
    storage::set_rate_params(e, asset, params);
    events::update_rate_params(e, asset, params);
}

/// Update the commodity rate adjustments of a reserve
pub fn execute_update_commodity_params(
    e: &Env,
    auth: &Authorized,
    asset: &Address,
    params: &CommodityParams,
) {
    auth.require(e, Role::Configurator);
    require_valid_commodity_params(e, params);

    update_reserve_state(e, asset, |reserve| {
        reserve.commodity = params.clone();
    });
    storage::set_commodity_params(e, asset, params);
    events::update_commodity_params(e, asset, params);
}

/// Update the extended rate model inputs of a reserve
pub fn execute_update_extended_params(
    e: &Env,
    auth: &Authorized,
    asset: &Address,
    params: &ExtendedParams,
) {
    auth.require(e, Role::Configurator);
    if params.weather_sensitivity > MAX_WEATHER_SENSITIVITY
        || (params.sub_commodity != 0 && storage::get_sub_commodity(e, params.sub_commodity).is_none())
    {
        panic_with_error!(e, PoolError::InvalidCommodityParams);
    }

    update_reserve_state(e, asset, |reserve| {
        reserve.extended = params.clone();
    });
    storage::set_extended_params(e, asset, params);
    events::update_extended_params(e, asset, params);
}

/// Set the 12 month seasonal multiplier profile of a reserve
pub fn execute_set_seasonal_profile(
    e: &Env,
    auth: &Authorized,
    asset: &Address,
    profile: &Vec<u32>,
) {
    auth.require(e, Role::Configurator);
    if profile.len() != 12 || profile.iter().any(|factor| !is_valid_seasonal_factor(factor)) {
        panic_with_error!(e, PoolError::InvalidSeasonalProfile);
    }

    // accrue under the old profile before it is replaced
    let pool = Pool::load(e);
    let mut reserve = pool.load_reserve(e, asset);
    storage::set_seasonal_profile(e, asset, profile);
    reserve.update_rates(e);
    reserve.store(e);

    events::set_seasonal_profile(e, asset, profile);
}

/// Create or replace a sub-commodity seasonal profile. Id 0 is reserved for "no profile".
///
/// Reserves referencing the profile pick up the change on their next rate update.
pub fn execute_set_sub_commodity_profile(
    e: &Env,
    auth: &Authorized,
    id: u32,
    profile: &SubCommodityProfile,
) {
    auth.require(e, Role::Configurator);
    if id == 0
        || profile.harvest_start > 11
        || profile.harvest_end > 11
        || profile.peak_month > 11
        || !is_valid_seasonal_factor(profile.harvest_factor)
        || !is_valid_seasonal_factor(profile.peak_factor)
        || !is_valid_seasonal_factor(profile.base_factor)
    {
        panic_with_error!(e, PoolError::InvalidSeasonalProfile);
    }
    storage::set_sub_commodity(e, id, profile);
    events::set_sub_commodity(e, id, &profile.commodity_type);
}

/// Record a weather event for a region. Replaces any existing event for the region.
pub fn execute_set_weather_event(e: &Env, auth: &Authorized, region: &Symbol, event: &WeatherEvent) {
    auth.require(e, Role::Configurator);
    if event.impact.abs() > MAX_WEATHER_IMPACT || event.duration == 0 {
        panic_with_error!(e, PoolError::BadRequest);
    }
    storage::set_weather_event(e, region, event);
    events::set_weather_event(e, region, event);
}

/// Remove the weather event of a region
pub fn execute_clear_weather_event(e: &Env, auth: &Authorized, region: &Symbol) {
    auth.require(e, Role::Configurator);
    storage::remove_weather_event(e, region);
    events::clear_weather_event(e, region);
}

/// Create or replace an E-Mode category. Id 0 is reserved for "no category".
pub fn execute_set_emode_category(e: &Env, auth: &Authorized, id: u32, category: &EModeCategory) {
    auth.require(e, Role::Configurator);
    if id == 0 {
        panic_with_error!(e, PoolError::InvalidEModeCategory);
    }
    emode::require_valid_category(e, category);
    storage::set_emode_category(e, id, category);
    events::set_emode_category(e, id, category);
}

/// Accrue a reserve to now under its current parameters, apply `update`, and recalculate
/// its rates under the updated parameters
fn update_reserve_state(e: &Env, asset: &Address, update: impl FnOnce(&mut Reserve)) {
    let pool = Pool::load(e);
    let mut reserve = pool.load_reserve(e, asset);
    update(&mut reserve);
    reserve.update_rates(e);
    reserve.store(e);
}

fn is_valid_seasonal_factor(factor: u32) -> bool {
    (MIN_SEASONAL_FACTOR..=MAX_SEASONAL_FACTOR).contains(&factor)
}

fn require_valid_reserve_config(e: &Env, config: &ReserveConfig) {
    let max_bps = PERCENTAGE_FACTOR as u32;
    if config.decimals > 18
        || config.ltv > config.liq_threshold
        || config.liq_threshold > max_bps
        || i128::from(config.liq_threshold) * (PERCENTAGE_FACTOR + i128::from(config.liq_bonus))
            > PERCENTAGE_FACTOR * PERCENTAGE_FACTOR
        || config.liq_protocol_fee > max_bps
        || config.reserve_factor > max_bps
        || config.supply_cap < 0
        || config.borrow_cap < 0
    {
        panic_with_error!(e, PoolError::InvalidReserveConfig);
    }
}

fn require_valid_rate_params(e: &Env, params: &InterestRateParams) {
    if params.optimal_usage < MIN_OPTIMAL_POINT
        || params.optimal_usage > MAX_OPTIMAL_POINT
        || params.slope_1 > params.slope_2
        || u64::from(params.base_rate) + u64::from(params.slope_1) + u64::from(params.slope_2)
            > u64::from(MAX_BORROW_RATE)
    {
        panic_with_error!(e, PoolError::InvalidRateParams);
    }
}

fn require_valid_commodity_params(e: &Env, params: &CommodityParams) {
    if params.storage_cost > MAX_STORAGE_COST
        || params.quality_decay > MAX_QUALITY_DECAY
        || params.contango.abs() > MAX_CONTANGO
    {
        panic_with_error!(e, PoolError::InvalidCommodityParams);
    }
}
