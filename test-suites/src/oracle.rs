use mock_futures_oracle::{MockFuturesOracle, MockFuturesOracleClient};
use sep_40_oracle::testutils::{MockPriceOracleClient, MockPriceOracleWASM};
use soroban_sdk::{Address, Env};

pub fn create_mock_oracle<'a>(e: &Env) -> (Address, MockPriceOracleClient<'a>) {
    let contract_id = e.register_contract_wasm(None, MockPriceOracleWASM);
    (contract_id.clone(), MockPriceOracleClient::new(e, &contract_id))
}

pub fn create_mock_futures_oracle<'a>(e: &Env) -> (Address, MockFuturesOracleClient<'a>) {
    let contract_id = e.register_contract(None, MockFuturesOracle {});
    (
        contract_id.clone(),
        MockFuturesOracleClient::new(e, &contract_id),
    )
}
