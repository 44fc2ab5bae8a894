use soroban_sdk::{
    contracttype, panic_with_error, unwrap::UnwrapOptimized, vec, Address, Env, IntoVal, Symbol,
    TryFromVal, Val, Vec,
};

use crate::{constants::MAX_RESERVES, pool::Positions, PoolError};

pub(crate) const LEDGER_THRESHOLD_SHARED: u32 = 172800; // ~ 10 days
pub(crate) const LEDGER_BUMP_SHARED: u32 = 241920; // ~ 14 days

pub(crate) const LEDGER_THRESHOLD_USER: u32 = 518400; // ~ 30 days
pub(crate) const LEDGER_BUMP_USER: u32 = 535670; // ~ 31 days

/********** Storage Types **********/

/// The pool's config
#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct PoolConfig {
    pub oracle: Address,                  // the SEP-40 price oracle
    pub treasury: Address,                // receives the protocol share of interest and fees
    pub flash_premium_total: u32,         // flash loan premium in bps of the amount
    pub flash_premium_to_protocol: u32,   // share of the flash loan premium for the treasury in bps
    pub paused: bool,
}

/// The risk configuration of a reserve asset, expressed in basis points unless noted
#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct ReserveConfig {
    pub index: u32,            // the index of the reserve in the list
    pub decimals: u32,         // the decimals of the underlying asset
    pub ltv: u32,              // the maximum loan to value of the collateral
    pub liq_threshold: u32,    // the value of the collateral counted towards the health factor
    pub liq_bonus: u32,        // the bonus paid to liquidators on top of the covered debt
    pub liq_protocol_fee: u32, // the share of the liquidation bonus sent to the treasury
    pub reserve_factor: u32,   // the share of borrow interest sent to the treasury
    pub supply_cap: i128,      // in whole tokens, 0 for no cap
    pub borrow_cap: i128,      // in whole tokens, 0 for no cap
    pub active: bool,
    pub frozen: bool,
    pub borrowable: bool,
    pub flash_loanable: bool,
}

/// The interest rate curve of a reserve asset, expressed in basis points
#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct InterestRateParams {
    pub optimal_usage: u32,
    pub base_rate: u32,
    pub slope_1: u32,
    pub slope_2: u32,
}

/// Commodity specific rate adjustments, expressed in basis points
#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct CommodityParams {
    pub seasonal: bool,    // apply the reserve's monthly seasonal profile
    pub storage_cost: u32, // annual cost of storing the physical commodity
    pub quality_decay: u32,
    pub contango: i32, // positive for contango, negative for backwardation
}

/// Inputs for the extended rate model layers
#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct ExtendedParams {
    pub sub_commodity: u32, // the sub-commodity profile id, 0 for none
    pub futures: bool,
    pub regional: bool,
    pub weather_sensitivity: u32, // 0 to 100
    pub region: Symbol,
}

/// The accounting data for a reserve asset
#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct ReserveData {
    pub liquidity_index: i128, // the conversion rate from bToken to underlying, in rays
    pub borrow_index: i128,    // the conversion rate from dToken to underlying, in rays
    pub liquidity_rate: i128,  // the current annual supply rate, in rays
    pub borrow_rate: i128,     // the current annual variable borrow rate, in rays
    pub b_supply: i128,        // the total supply of b tokens
    pub d_supply: i128,        // the total supply of d tokens
    pub backing: i128,         // the underlying tokens available to borrow or withdraw
    pub accrued_to_treasury: i128, // b tokens owed to the treasury but not yet minted
    pub last_time: u64,        // the last timestamp the data was updated
}

/// A sub-commodity's seasonal demand profile. Months are 0 indexed.
#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct SubCommodityProfile {
    pub commodity_type: Symbol,
    pub harvest_start: u32,
    pub harvest_end: u32,
    pub peak_month: u32,
    pub southern: bool,
    pub harvest_factor: u32,
    pub peak_factor: u32,
    pub base_factor: u32,
}

/// A weather event affecting the rates of every reserve in a region
#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct WeatherEvent {
    pub kind: Symbol,
    pub impact: i32, // rate impact at full sensitivity, in bps
    pub start: u64,
    pub duration: u64,
}

/// An efficiency mode category that overrides the risk parameters of its collateral
#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct EModeCategory {
    pub ltv: u32,
    pub liq_threshold: u32,
    pub liq_bonus: u32,
    pub collateral: u128, // bitmap of reserve indexes that receive the override
    pub borrowable: u128, // bitmap of reserve indexes that can be borrowed in the category
    pub label: Symbol,
}

/********** Storage Key Types **********/

const ADMIN_KEY: &str = "Admin";
const NAME_KEY: &str = "Name";
const POOL_CONFIG_KEY: &str = "Config";
const FUTURES_ORACLE_KEY: &str = "FutOracle";
const RES_LIST_KEY: &str = "ResList";

#[derive(Clone)]
#[contracttype]
pub struct ManagerKey {
    user: Address,
    manager: Address,
}

#[derive(Clone)]
#[contracttype]
pub enum PoolDataKey {
    // A map of underlying asset's contract address to reserve config
    ResConfig(Address),
    // A map of underlying asset's contract address to reserve data
    ResData(Address),
    // The reserve's interest rate curve
    RateParams(Address),
    // The reserve's commodity adjustments
    CommParams(Address),
    // The reserve's extended model inputs
    ExtParams(Address),
    // The reserve's monthly seasonal multipliers
    Seasonal(Address),
    // Sub-commodity seasonal profiles by id
    SubCommodity(u32),
    // Active weather event by region
    Weather(Symbol),
    // E-Mode categories by id
    EMode(u32),
    // Map of positions in the pool for a user
    Positions(Address),
    // Addresses allowed to change reserve parameters
    Configurator(Address),
    // Addresses exempt from the flash loan premium
    FlashBorrower(Address),
    // Position managers approved by a user
    Manager(ManagerKey),
}

/********** Storage **********/

/// Bump the instance rent for the contract
pub fn extend_instance(e: &Env) {
    e.storage()
        .instance()
        .extend_ttl(LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

/// Fetch an entry in persistent storage that has a default value if it doesn't exist
fn get_persistent_default<K: IntoVal<Env, Val>, V: TryFromVal<Env, Val>>(
    e: &Env,
    key: &K,
    default: V,
    bump_threshold: u32,
    bump_amount: u32,
) -> V {
    if let Some(result) = e.storage().persistent().get::<K, V>(key) {
        e.storage()
            .persistent()
            .extend_ttl(key, bump_threshold, bump_amount);
        result
    } else {
        default
    }
}

/// Set an entry in persistent storage and bump its rent
fn set_persistent<K: IntoVal<Env, Val>, V: IntoVal<Env, Val>>(
    e: &Env,
    key: &K,
    value: &V,
    bump_threshold: u32,
    bump_amount: u32,
) {
    e.storage().persistent().set::<K, V>(key, value);
    e.storage()
        .persistent()
        .extend_ttl(key, bump_threshold, bump_amount);
}

/********** User **********/

/// Fetch the user's positions or return an empty Positions struct
///
/// ### Arguments
/// * `user` - The address of the user
pub fn get_user_positions(e: &Env, user: &Address) -> Positions {
    let key = PoolDataKey::Positions(user.clone());
    get_persistent_default(
        e,
        &key,
        Positions::env_default(e),
        LEDGER_THRESHOLD_USER,
        LEDGER_BUMP_USER,
    )
}

/// Set the user's positions
///
/// ### Arguments
/// * `user` - The address of the user
/// * `positions` - The new positions for the user
pub fn set_user_positions(e: &Env, user: &Address, positions: &Positions) {
    let key = PoolDataKey::Positions(user.clone());
    set_persistent(e, &key, positions, LEDGER_THRESHOLD_USER, LEDGER_BUMP_USER);
}

/// Check if `manager` is approved to manage the positions of `user`
pub fn is_manager(e: &Env, user: &Address, manager: &Address) -> bool {
    let key = PoolDataKey::Manager(ManagerKey {
        user: user.clone(),
        manager: manager.clone(),
    });
    get_persistent_default(e, &key, false, LEDGER_THRESHOLD_USER, LEDGER_BUMP_USER)
}

/// Approve or revoke `manager` as a manager of the positions of `user`
pub fn set_manager(e: &Env, user: &Address, manager: &Address, approved: bool) {
    let key = PoolDataKey::Manager(ManagerKey {
        user: user.clone(),
        manager: manager.clone(),
    });
    if approved {
        set_persistent(e, &key, &true, LEDGER_THRESHOLD_USER, LEDGER_BUMP_USER);
    } else {
        e.storage().persistent().remove(&key);
    }
}

/********** Admin **********/

/// Fetch the current admin Address
///
/// ### Panics
/// If the admin does not exist
pub fn get_admin(e: &Env) -> Address {
    e.storage()
        .instance()
        .get(&Symbol::new(e, ADMIN_KEY))
        .unwrap_optimized()
}

/// Set a new admin
///
/// ### Arguments
/// * `new_admin` - The Address for the admin
pub fn set_admin(e: &Env, new_admin: &Address) {
    e.storage()
        .instance()
        .set::<Symbol, Address>(&Symbol::new(e, ADMIN_KEY), new_admin);
}

/// Checks if an admin is set
pub fn has_admin(e: &Env) -> bool {
    e.storage().instance().has(&Symbol::new(e, ADMIN_KEY))
}

/// Check if an address holds the configurator role
pub fn is_configurator(e: &Env, address: &Address) -> bool {
    let key = PoolDataKey::Configurator(address.clone());
    get_persistent_default(e, &key, false, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED)
}

/// Grant or revoke the configurator role
pub fn set_configurator(e: &Env, address: &Address, enabled: bool) {
    let key = PoolDataKey::Configurator(address.clone());
    if enabled {
        set_persistent(e, &key, &true, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
    } else {
        e.storage().persistent().remove(&key);
    }
}

/// Check if an address is exempt from flash loan premiums
pub fn is_flash_borrower(e: &Env, address: &Address) -> bool {
    let key = PoolDataKey::FlashBorrower(address.clone());
    get_persistent_default(e, &key, false, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED)
}

/// Flag or unflag an address as exempt from flash loan premiums
pub fn set_flash_borrower(e: &Env, address: &Address, enabled: bool) {
    let key = PoolDataKey::FlashBorrower(address.clone());
    if enabled {
        set_persistent(e, &key, &true, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
    } else {
        e.storage().persistent().remove(&key);
    }
}

/********** Metadata **********/

/// Set a pool name
///
/// ### Arguments
/// * `name` - The Name of the pool
pub fn set_name(e: &Env, name: &Symbol) {
    e.storage()
        .instance()
        .set::<Symbol, Symbol>(&Symbol::new(e, NAME_KEY), name);
}

/********** Pool Config **********/

/// Fetch the pool configuration
///
/// ### Panics
/// If the pool's config is not set
pub fn get_pool_config(e: &Env) -> PoolConfig {
    e.storage()
        .instance()
        .get(&Symbol::new(e, POOL_CONFIG_KEY))
        .unwrap_optimized()
}

/// Set the pool configuration
///
/// ### Arguments
/// * `config` - The pool configuration
pub fn set_pool_config(e: &Env, config: &PoolConfig) {
    e.storage()
        .instance()
        .set::<Symbol, PoolConfig>(&Symbol::new(e, POOL_CONFIG_KEY), config);
}

/// Fetch the futures curve oracle used by the extended rate model, if one is set
pub fn get_futures_oracle(e: &Env) -> Option<Address> {
    e.storage()
        .instance()
        .get::<Symbol, Address>(&Symbol::new(e, FUTURES_ORACLE_KEY))
}

/// Set or remove the futures curve oracle
///
/// ### Arguments
/// * `oracle` - The futures oracle, or None to disable the futures and regional layers
pub fn set_futures_oracle(e: &Env, oracle: &Option<Address>) {
    let key = Symbol::new(e, FUTURES_ORACLE_KEY);
    match oracle {
        Some(oracle) => e.storage().instance().set::<Symbol, Address>(&key, oracle),
        None => e.storage().instance().remove(&key),
    }
}

/********** Reserve Config (ResConfig) **********/

/// Fetch the reserve config for an asset
///
/// ### Arguments
/// * `asset` - The contract address of the asset
///
/// ### Panics
/// If the reserve does not exist
pub fn get_res_config(e: &Env, asset: &Address) -> ReserveConfig {
    let key = PoolDataKey::ResConfig(asset.clone());
    match e.storage().persistent().get::<PoolDataKey, ReserveConfig>(&key) {
        Some(config) => {
            e.storage()
                .persistent()
                .extend_ttl(&key, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
            config
        }
        None => panic_with_error!(e, PoolError::ReserveNotFound),
    }
}

/// Set the reserve configuration for an asset
///
/// ### Arguments
/// * `asset` - The contract address of the asset
/// * `config` - The reserve configuration for the asset
pub fn set_res_config(e: &Env, asset: &Address, config: &ReserveConfig) {
    let key = PoolDataKey::ResConfig(asset.clone());
    set_persistent(e, &key, config, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

/// Checks if a reserve exists for an asset
///
/// ### Arguments
/// * `asset` - The contract address of the asset
pub fn has_res(e: &Env, asset: &Address) -> bool {
    let key = PoolDataKey::ResConfig(asset.clone());
    e.storage().persistent().has(&key)
}

/********** Reserve Data (ResData) **********/

/// Fetch the reserve data for an asset
///
/// ### Arguments
/// * `asset` - The contract address of the asset
///
/// ### Panics
/// If the reserve does not exist
pub fn get_res_data(e: &Env, asset: &Address) -> ReserveData {
    let key = PoolDataKey::ResData(asset.clone());
    e.storage()
        .persistent()
        .extend_ttl(&key, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
    e.storage()
        .persistent()
        .get::<PoolDataKey, ReserveData>(&key)
        .unwrap_optimized()
}

/// Set the reserve data for an asset
///
/// ### Arguments
/// * `asset` - The contract address of the asset
/// * `data` - The reserve data for the asset
pub fn set_res_data(e: &Env, asset: &Address, data: &ReserveData) {
    let key = PoolDataKey::ResData(asset.clone());
    set_persistent(e, &key, data, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

/********** Reserve Rate Inputs **********/

pub fn get_rate_params(e: &Env, asset: &Address) -> InterestRateParams {
    let key = PoolDataKey::RateParams(asset.clone());
    e.storage()
        .persistent()
        .extend_ttl(&key, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
    e.storage()
        .persistent()
        .get::<PoolDataKey, InterestRateParams>(&key)
        .unwrap_optimized()
}

pub fn set_rate_params(e: &Env, asset: &Address, params: &InterestRateParams) {
    let key = PoolDataKey::RateParams(asset.clone());
    set_persistent(e, &key, params, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

pub fn get_commodity_params(e: &Env, asset: &Address) -> CommodityParams {
    let key = PoolDataKey::CommParams(asset.clone());
    e.storage()
        .persistent()
        .extend_ttl(&key, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
    e.storage()
        .persistent()
        .get::<PoolDataKey, CommodityParams>(&key)
        .unwrap_optimized()
}

pub fn set_commodity_params(e: &Env, asset: &Address, params: &CommodityParams) {
    let key = PoolDataKey::CommParams(asset.clone());
    set_persistent(e, &key, params, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

pub fn get_extended_params(e: &Env, asset: &Address) -> ExtendedParams {
    let key = PoolDataKey::ExtParams(asset.clone());
    e.storage()
        .persistent()
        .extend_ttl(&key, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
    e.storage()
        .persistent()
        .get::<PoolDataKey, ExtendedParams>(&key)
        .unwrap_optimized()
}

pub fn set_extended_params(e: &Env, asset: &Address, params: &ExtendedParams) {
    let key = PoolDataKey::ExtParams(asset.clone());
    set_persistent(e, &key, params, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

/// Fetch the 12 monthly seasonal multipliers for an asset, if set
pub fn get_seasonal_profile(e: &Env, asset: &Address) -> Option<Vec<u32>> {
    let key = PoolDataKey::Seasonal(asset.clone());
    get_persistent_default(e, &key, None, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED)
}

pub fn set_seasonal_profile(e: &Env, asset: &Address, profile: &Vec<u32>) {
    let key = PoolDataKey::Seasonal(asset.clone());
    set_persistent(e, &key, profile, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

pub fn get_sub_commodity(e: &Env, id: u32) -> Option<SubCommodityProfile> {
    let key = PoolDataKey::SubCommodity(id);
    get_persistent_default(e, &key, None, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED)
}

pub fn set_sub_commodity(e: &Env, id: u32, profile: &SubCommodityProfile) {
    let key = PoolDataKey::SubCommodity(id);
    set_persistent(e, &key, profile, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

/********** Weather **********/

pub fn get_weather_event(e: &Env, region: &Symbol) -> Option<WeatherEvent> {
    let key = PoolDataKey::Weather(region.clone());
    get_persistent_default(e, &key, None, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED)
}

pub fn set_weather_event(e: &Env, region: &Symbol, event: &WeatherEvent) {
    let key = PoolDataKey::Weather(region.clone());
    set_persistent(e, &key, event, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

pub fn remove_weather_event(e: &Env, region: &Symbol) {
    e.storage()
        .persistent()
        .remove(&PoolDataKey::Weather(region.clone()));
}

/********** E-Mode **********/

pub fn get_emode_category(e: &Env, id: u32) -> Option<EModeCategory> {
    let key = PoolDataKey::EMode(id);
    get_persistent_default(e, &key, None, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED)
}

pub fn set_emode_category(e: &Env, id: u32, category: &EModeCategory) {
    let key = PoolDataKey::EMode(id);
    set_persistent(e, &key, category, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

/********** Reserve List (ResList) **********/

/// Fetch the list of reserves
pub fn get_res_list(e: &Env) -> Vec<Address> {
    get_persistent_default(
        e,
        &Symbol::new(e, RES_LIST_KEY),
        vec![e],
        LEDGER_THRESHOLD_SHARED,
        LEDGER_BUMP_SHARED,
    )
}

/// Add a reserve to the back of the list and returns the index
///
/// ### Arguments
/// * `asset` - The contract address of the underlying asset
///
/// ### Panics
/// If the number of reserves in the list exceeds the maximum
///
// @dev: Once added it can't be removed
pub fn push_res_list(e: &Env, asset: &Address) -> u32 {
    let mut res_list = get_res_list(e);
    if res_list.len() == MAX_RESERVES {
        panic_with_error!(e, PoolError::MaxReservesExceeded)
    }
    res_list.push_back(asset.clone());
    let new_index = res_list.len() - 1;
    set_persistent(
        e,
        &Symbol::new(e, RES_LIST_KEY),
        &res_list,
        LEDGER_THRESHOLD_SHARED,
        LEDGER_BUMP_SHARED,
    );
    new_index
}
