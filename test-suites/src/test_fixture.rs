use crate::oracle::{create_mock_futures_oracle, create_mock_oracle};
use crate::pool::{InterestRateParams, PoolClient, PoolContract, ReserveConfig};
use crate::token::create_token;
use mock_futures_oracle::MockFuturesOracleClient;
use sep_40_oracle::testutils::{Asset, MockPriceOracleClient};
use sep_41_token::testutils::MockTokenClient;
use soroban_sdk::testutils::{Address as _, Ledger, LedgerInfo};
use soroban_sdk::{vec as svec, Address, Env, Symbol};

pub const SCALAR_7: i128 = 1_000_0000;
pub const SCALAR_9: i128 = 1_000_000_000;
pub const SCALAR_6: i128 = 1_000_000;

/// Seconds in a month as counted by the seasonal rate layers
pub const MONTH: u64 = 30 * 24 * 60 * 60;
/// Start of the first month of a seasonal year
pub const START_TIMESTAMP: u64 = 600 * MONTH;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(usize)]
pub enum TokenIndex {
    WHEAT = 0,
    CORN = 1,
    GOLD = 2,
    USDC = 3,
}

pub struct TestFixture<'a> {
    pub env: Env,
    pub bombadil: Address,
    pub treasury: Address,
    pub oracle: MockPriceOracleClient<'a>,
    pub futures_oracle: MockFuturesOracleClient<'a>,
    pub pool: PoolClient<'a>,
    pub tokens: Vec<MockTokenClient<'a>>,
    pub prices: Vec<i128>,
}

impl TestFixture<'_> {
    /// Create a new TestFixture with an initialized pool and no reserves
    ///
    /// Deploys WHEAT (0), CORN (1), GOLD (2) and USDC (3) test tokens priced by a mock SEP-40
    /// oracle with 7 decimals, and a mock futures oracle set on the pool.
    pub fn create<'a>() -> TestFixture<'a> {
        let e = Env::default();
        e.mock_all_auths();
        e.budget().reset_unlimited();

        let bombadil = Address::generate(&e);
        let treasury = Address::generate(&e);

        e.ledger().set(LedgerInfo {
            timestamp: START_TIMESTAMP,
            protocol_version: 20,
            sequence_number: 100,
            network_id: Default::default(),
            base_reserve: 10,
            min_temp_entry_ttl: 10,
            min_persistent_entry_ttl: 500_000,
            max_entry_ttl: 9_999_999,
        });

        // deploy tokens
        let (wheat_id, wheat_client) = create_token(&e, &bombadil, 7, "WHEAT");
        let (corn_id, corn_client) = create_token(&e, &bombadil, 7, "CORN");
        let (gold_id, gold_client) = create_token(&e, &bombadil, 9, "GOLD");
        let (usdc_id, usdc_client) = create_token(&e, &bombadil, 6, "USDC");

        // initialize oracles
        let (oracle_id, oracle_client) = create_mock_oracle(&e);
        oracle_client.set_data(
            &bombadil,
            &Asset::Other(Symbol::new(&e, "USD")),
            &svec![
                &e,
                Asset::Stellar(wheat_id),
                Asset::Stellar(corn_id),
                Asset::Stellar(gold_id),
                Asset::Stellar(usdc_id),
            ],
            &7,
            &300,
        );
        let prices = vec![6_5000000, 4_5000000, 2000_0000000, 1_0000000];
        oracle_client.set_price_stable(&svec![&e, prices[0], prices[1], prices[2], prices[3]]);
        let (futures_oracle_id, futures_oracle_client) = create_mock_futures_oracle(&e);

        // deploy pool
        let pool_id = e.register_contract(None, PoolContract {});
        let pool_client = PoolClient::new(&e, &pool_id);
        pool_client.initialize(
            &bombadil,
            &Symbol::new(&e, "Harvest"),
            &oracle_id,
            &treasury,
            &9,
            &1_000,
        );
        pool_client.set_futures_oracle(&Some(futures_oracle_id));

        TestFixture {
            env: e,
            bombadil,
            treasury,
            oracle: oracle_client,
            futures_oracle: futures_oracle_client,
            pool: pool_client,
            tokens: vec![wheat_client, corn_client, gold_client, usdc_client],
            prices,
        }
    }

    /// Initialize a reserve for the token and return its index in the pool
    pub fn create_pool_reserve(
        &self,
        token_index: TokenIndex,
        reserve_config: &ReserveConfig,
        rate_params: &InterestRateParams,
    ) -> u32 {
        let token = &self.tokens[token_index as usize];
        self.pool
            .init_reserve(&token.address, reserve_config, rate_params)
    }

    pub fn token(&self, token_index: TokenIndex) -> &MockTokenClient {
        &self.tokens[token_index as usize]
    }

    pub fn scalar(&self, token_index: TokenIndex) -> i128 {
        10i128.pow(self.token(token_index).decimals())
    }

    /// Update the oracle price of a token, with 7 decimals
    pub fn set_price(&mut self, token_index: TokenIndex, price: i128) {
        self.prices[token_index as usize] = price;
        self.oracle.set_price_stable(&svec![
            &self.env,
            self.prices[0],
            self.prices[1],
            self.prices[2],
            self.prices[3]
        ]);
    }

    /********** Chain Helpers ***********/

    /// Advance the ledger clock by `time` seconds in a single ledger
    pub fn jump(&self, time: u64) {
        self.env.ledger().set(LedgerInfo {
            timestamp: self.env.ledger().timestamp().saturating_add(time),
            protocol_version: 20,
            sequence_number: self.env.ledger().sequence() + 1,
            network_id: Default::default(),
            base_reserve: 10,
            min_temp_entry_ttl: 10,
            min_persistent_entry_ttl: 500_000,
            max_entry_ttl: 9_999_999,
        });
    }
}
