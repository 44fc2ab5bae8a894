use soroban_sdk::{contractclient, Address, Env, Symbol};

/// Interface of the futures curve oracle read by the extended rate model
#[contractclient(name = "FuturesOracleClient")]
pub trait FuturesOracle {
    /// Check if the curve data for `asset` was updated within `max_age` seconds
    fn is_fresh(e: Env, asset: Address, max_age: u64) -> bool;

    /// Fetch the annualized futures basis for `asset`, in signed bps
    fn annualized_basis(e: Env, asset: Address) -> i128;

    /// Fetch the basis of `region` against the reference market for `asset`, in signed bps
    fn regional_basis(e: Env, asset: Address, region: Symbol) -> i128;
}
