use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, panic_with_error, Address, Env, Symbol,
};

#[derive(Clone)]
#[contracttype]
pub struct Curve {
    pub basis: i128,
    pub updated: u64,
}

#[derive(Clone)]
#[contracttype]
pub enum MockFuturesOracleDataKey {
    // MOCK: The curve data reported for an asset
    Curve(Address),
    // MOCK: The regional basis reported for an asset and region
    Regional(Address, Symbol),
    // MOCK: If the oracle should fail
    ToError,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum MockFuturesOracleError {
    OracleDown = 1,
}

/// ### Mock Futures Oracle
///
/// Contract that reports mocked futures curve data.
///
/// ### Dev
/// For testing purposes only!
#[contract]
pub struct MockFuturesOracle;

fn require_up(e: &Env) {
    let to_error = e
        .storage()
        .instance()
        .get::<MockFuturesOracleDataKey, bool>(&MockFuturesOracleDataKey::ToError)
        .unwrap_or(false);
    if to_error {
        panic_with_error!(e, MockFuturesOracleError::OracleDown);
    }
}

#[contractimpl]
impl MockFuturesOracle {
    pub fn is_fresh(e: Env, asset: Address, max_age: u64) -> bool {
        require_up(&e);
        match e
            .storage()
            .instance()
            .get::<MockFuturesOracleDataKey, Curve>(&MockFuturesOracleDataKey::Curve(asset))
        {
            Some(curve) => e.ledger().timestamp() <= curve.updated + max_age,
            None => false,
        }
    }

    pub fn annualized_basis(e: Env, asset: Address) -> i128 {
        require_up(&e);
        e.storage()
            .instance()
            .get::<MockFuturesOracleDataKey, Curve>(&MockFuturesOracleDataKey::Curve(asset))
            .map(|curve| curve.basis)
            .unwrap_or(0)
    }

    pub fn regional_basis(e: Env, asset: Address, region: Symbol) -> i128 {
        require_up(&e);
        e.storage()
            .instance()
            .get::<MockFuturesOracleDataKey, i128>(&MockFuturesOracleDataKey::Regional(
                asset, region,
            ))
            .unwrap_or(0)
    }

    /// Sets the mocked curve for an asset
    pub fn set_curve(e: Env, asset: Address, basis: i128, updated: u64) {
        e.storage().instance().set(
            &MockFuturesOracleDataKey::Curve(asset),
            &Curve { basis, updated },
        );
    }

    /// Sets the mocked regional basis for an asset
    pub fn set_regional_basis(e: Env, asset: Address, region: Symbol, basis: i128) {
        e.storage()
            .instance()
            .set(&MockFuturesOracleDataKey::Regional(asset, region), &basis);
    }

    /// Sets the oracle error status
    pub fn set_error(e: Env, to_error: bool) {
        e.storage()
            .instance()
            .set(&MockFuturesOracleDataKey::ToError, &to_error);
    }
}
