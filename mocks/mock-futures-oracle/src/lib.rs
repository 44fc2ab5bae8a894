#![no_std]

#[cfg(any(test, feature = "testutils"))]
extern crate std;

mod mock_futures_oracle;

pub use crate::mock_futures_oracle::{MockFuturesOracle, MockFuturesOracleClient};
