/// Fixed point scalar for interest indexes and annual rates (27 decimals)
pub const RAY: i128 = 1_000_000_000_000_000_000_000_000_000;
pub const HALF_RAY: i128 = RAY / 2;

/// Fixed point scalar for health factors (18 decimals)
pub const WAD: i128 = 1_000_000_000_000_000_000;

/// Basis point scalar, 10_000 = 100%
pub const PERCENTAGE_FACTOR: i128 = 1_0000;

/// Multiplier that converts a basis point value into a ray
pub const BPS_TO_RAY: i128 = RAY / PERCENTAGE_FACTOR;

pub const SECONDS_PER_YEAR: u64 = 31_536_000;
pub const SECONDS_PER_MONTH: u64 = 30 * 24 * 60 * 60;

/********** Interest Rate Curve **********/

/// Maximum base + slope_1 + slope_2, in bps (1000% APR)
pub const MAX_BORROW_RATE: u32 = 100_000;
pub const MIN_OPTIMAL_POINT: u32 = 100;
pub const MAX_OPTIMAL_POINT: u32 = 9_900;

/********** Commodity Layers **********/

pub const SEASONAL_BASE: u32 = 10_000;
pub const MIN_SEASONAL_FACTOR: u32 = 7_000;
pub const MAX_SEASONAL_FACTOR: u32 = 15_000;

pub const MAX_STORAGE_COST: u32 = 2_000;
pub const MAX_QUALITY_DECAY: u32 = 2_000;
pub const MAX_CONTANGO: i32 = 2_000;

/// Futures curve data older than this is ignored (4 hours)
pub const FUTURES_MAX_AGE: u64 = 4 * 60 * 60;
pub const MAX_FUTURES_ADJUSTMENT: i128 = 1_000;
pub const MAX_REGIONAL_ADJUSTMENT: i128 = 500;

pub const MAX_WEATHER_SENSITIVITY: u32 = 100;
pub const MAX_WEATHER_IMPACT: i32 = 5_000;

/********** Risk **********/

/// Health factor below which a position can be liquidated
pub const HEALTH_FACTOR_LIQUIDATION_THRESHOLD: i128 = WAD;
/// Health factor below which the full debt position can be liquidated in one call
pub const CLOSE_FACTOR_HF_THRESHOLD: i128 = 950_000_000_000_000_000;
pub const DEFAULT_LIQUIDATION_CLOSE_FACTOR: u32 = 5_000;
pub const MAX_LIQUIDATION_CLOSE_FACTOR: u32 = 10_000;

/// Maximum age of an oracle price before it is considered stale (24 hours)
pub const MAX_PRICE_AGE: u64 = 24 * 60 * 60;

pub const MAX_RESERVES: u32 = 64;

/// Fixed point scalar for 7 decimal token balances and prices
pub const SCALAR_7: i128 = 1_0000000;
