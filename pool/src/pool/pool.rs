use soroban_sdk::{map, panic_with_error, vec, Address, Env, Map, Vec};

use sep_40_oracle::{Asset, PriceFeedClient};

use crate::{
    constants::MAX_PRICE_AGE,
    errors::PoolError,
    storage::{self, PoolConfig},
};

use super::reserve::Reserve;

pub struct Pool {
    pub config: PoolConfig,
    pub reserves: Map<Address, Reserve>,
    reserves_to_store: Vec<Address>,
    reserve_list: Option<Vec<Address>>,
    price_decimals: Option<u32>,
    prices: Map<Address, i128>,
}

impl Pool {
    /// Load the Pool from the ledger
    pub fn load(e: &Env) -> Self {
        let pool_config = storage::get_pool_config(e);
        Pool {
            config: pool_config,
            reserves: map![e],
            reserves_to_store: vec![e],
            reserve_list: None,
            price_decimals: None,
            prices: map![e],
        }
    }

    /// Load a Reserve from the ledger and update to the current ledger timestamp. Returns
    /// a cached version if it exists.
    ///
    /// ### Arguments
    /// * asset - The address of the underlying asset
    pub fn load_reserve(&self, e: &Env, asset: &Address) -> Reserve {
        if let Some(reserve) = self.reserves.get(asset.clone()) {
            return reserve;
        }
        Reserve::load(e, asset)
    }

    /// Cache the updated reserve in the pool.
    ///
    /// ### Arguments
    /// * reserve - The updated reserve
    /// * write - If the reserve needs to be written to the ledger
    pub fn cache_reserve(&mut self, reserve: Reserve, write: bool) {
        if !self.reserves_to_store.contains(&reserve.asset) && write {
            self.reserves_to_store.push_back(reserve.asset.clone());
        }
        self.reserves.set(reserve.asset.clone(), reserve);
    }

    /// Store the cached reserves to the ledger that need to be written.
    pub fn store_cached_reserves(&self, e: &Env) {
        for address in self.reserves_to_store.iter() {
            let reserve = self.reserves.get_unchecked(address);
            reserve.store(e);
        }
    }

    /// Fetch the asset of the reserve at `index`
    ///
    /// ### Panics
    /// If no reserve exists at the index
    pub fn reserve_asset(&mut self, e: &Env, index: u32) -> Address {
        let list = match &self.reserve_list {
            Some(list) => list.clone(),
            None => {
                let list = storage::get_res_list(e);
                self.reserve_list = Some(list.clone());
                list
            }
        };
        list.get(index)
            .unwrap_or_else(|| panic_with_error!(e, PoolError::ReserveNotFound))
    }

    /// Require that the pool is not paused, or panic.
    pub fn require_not_paused(&self, e: &Env) {
        if self.config.paused {
            panic_with_error!(e, PoolError::PoolPaused);
        }
    }

    /// Load the decimals of the prices for the Pool's oracle. Returns a cached version if one
    /// already exists.
    pub fn load_price_decimals(&mut self, e: &Env) -> u32 {
        if let Some(decimals) = self.price_decimals {
            return decimals;
        }
        let oracle_client = PriceFeedClient::new(e, &self.config.oracle);
        let decimals = oracle_client.decimals();
        self.price_decimals = Some(decimals);
        decimals
    }

    /// Load a price from the Pool's oracle. Returns a cached version if one already exists.
    ///
    /// ### Arguments
    /// * asset - The address of the underlying asset
    ///
    /// ### Panics
    /// If the price is missing or stale
    pub fn load_price(&mut self, e: &Env, asset: &Address) -> i128 {
        if let Some(price) = self.prices.get(asset.clone()) {
            return price;
        }
        let oracle_client = PriceFeedClient::new(e, &self.config.oracle);
        let oracle_asset = Asset::Stellar(asset.clone());
        let price_data = oracle_client
            .lastprice(&oracle_asset)
            .unwrap_or_else(|| panic_with_error!(e, PoolError::StalePrice));
        if price_data.timestamp + MAX_PRICE_AGE < e.ledger().timestamp() || price_data.price <= 0
        {
            panic_with_error!(e, PoolError::StalePrice);
        }
        self.prices.set(asset.clone(), price_data.price);
        price_data.price
    }
}

#[cfg(test)]
mod tests {
    use sep_40_oracle::testutils::Asset;
    use soroban_sdk::{
        testutils::{Address as _, Ledger, LedgerInfo},
        Symbol,
    };

    use crate::testutils;

    use super::*;

    #[test]
    fn test_reserve_cache() {
        let e = Env::default();
        e.mock_all_auths();

        e.ledger().set(LedgerInfo {
            timestamp: 123456 * 5,
            protocol_version: 20,
            sequence_number: 123456,
            network_id: Default::default(),
            base_reserve: 10,
            min_temp_entry_ttl: 10,
            min_persistent_entry_ttl: 10,
            max_entry_ttl: 2000000,
        });

        let bombadil = Address::generate(&e);
        let pool = testutils::create_pool(&e);
        let oracle = Address::generate(&e);

        let (underlying, _) = testutils::create_token_contract(&e, &bombadil);
        let (reserve_config, reserve_data) = testutils::default_reserve_meta();
        testutils::create_reserve(&e, &pool, &underlying, &reserve_config, &reserve_data);

        let pool_config = testutils::default_pool_config(&e, &oracle);
        e.as_contract(&pool, || {
            storage::set_pool_config(&e, &pool_config);
            let mut pool = Pool::load(&e);
            let mut reserve = pool.load_reserve(&e, &underlying);
            reserve.data.b_supply += 1;
            pool.cache_reserve(reserve.clone(), true);

            let cached = pool.load_reserve(&e, &underlying);
            assert_eq!(cached.data.b_supply, reserve.data.b_supply);

            // store all cached reserves and verify the data is updated
            pool.store_cached_reserves(&e);
            let new_reserve_data = storage::get_res_data(&e, &underlying);
            assert_eq!(new_reserve_data.b_supply, reserve.data.b_supply);
            assert_eq!(new_reserve_data.last_time, 123456 * 5);
        });
    }

    #[test]
    fn test_reserve_cache_stores_only_marked() {
        let e = Env::default();
        e.mock_all_auths();

        let bombadil = Address::generate(&e);
        let pool = testutils::create_pool(&e);
        let oracle = Address::generate(&e);

        let (underlying_0, _) = testutils::create_token_contract(&e, &bombadil);
        let (underlying_1, _) = testutils::create_token_contract(&e, &bombadil);
        let (reserve_config, reserve_data) = testutils::default_reserve_meta();
        testutils::create_reserve(&e, &pool, &underlying_0, &reserve_config, &reserve_data);
        testutils::create_reserve(&e, &pool, &underlying_1, &reserve_config, &reserve_data);

        let pool_config = testutils::default_pool_config(&e, &oracle);
        e.as_contract(&pool, || {
            storage::set_pool_config(&e, &pool_config);
            let mut pool = Pool::load(&e);

            let mut reserve_0 = pool.load_reserve(&e, &underlying_0);
            reserve_0.data.d_supply = 123;
            pool.cache_reserve(reserve_0, false);

            let mut reserve_1 = pool.load_reserve(&e, &underlying_1);
            reserve_1.data.d_supply = 456;
            pool.cache_reserve(reserve_1.clone(), true);
            // a duplicate cache takes the most recently cached
            reserve_1.data.d_supply = 789;
            pool.cache_reserve(reserve_1, true);

            pool.store_cached_reserves(&e);
            assert_eq!(storage::get_res_data(&e, &underlying_0).d_supply, 75_0000000);
            assert_eq!(storage::get_res_data(&e, &underlying_1).d_supply, 789);

            assert_eq!(pool.reserve_asset(&e, 1), underlying_1);
        });
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #1211)")]
    fn test_require_not_paused() {
        let e = Env::default();

        let pool = testutils::create_pool(&e);
        let oracle = Address::generate(&e);
        let mut pool_config = testutils::default_pool_config(&e, &oracle);
        pool_config.paused = true;
        e.as_contract(&pool, || {
            storage::set_pool_config(&e, &pool_config);
            let pool = Pool::load(&e);

            pool.require_not_paused(&e);
        });
    }

    #[test]
    fn test_load_price_decimals() {
        let e = Env::default();
        e.mock_all_auths();

        let pool = testutils::create_pool(&e);
        let (oracle, oracle_client) = testutils::create_mock_oracle(&e);
        oracle_client.set_data(
            &Address::generate(&e),
            &Asset::Stellar(Address::generate(&e)),
            &vec![&e, Asset::Stellar(Address::generate(&e))],
            &7,
            &300,
        );
        let pool_config = testutils::default_pool_config(&e, &oracle);
        e.as_contract(&pool, || {
            storage::set_pool_config(&e, &pool_config);
            let mut pool = Pool::load(&e);

            let decimals = pool.load_price_decimals(&e);
            assert_eq!(decimals, 7);
        });
    }

    #[test]
    fn test_load_price() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();

        let bombadil = Address::generate(&e);
        let pool = testutils::create_pool(&e);
        let asset_0 = Address::generate(&e);
        let asset_1 = Address::generate(&e);
        let (oracle, oracle_client) = testutils::create_mock_oracle(&e);

        oracle_client.set_data(
            &bombadil,
            &Asset::Other(Symbol::new(&e, "USD")),
            &vec![
                &e,
                Asset::Stellar(asset_0.clone()),
                Asset::Stellar(asset_1.clone()),
            ],
            &7,
            &300,
        );
        oracle_client.set_price_stable(&vec![&e, 123, 456]);

        let pool_config = testutils::default_pool_config(&e, &oracle);
        e.as_contract(&pool, || {
            storage::set_pool_config(&e, &pool_config);
            let mut pool = Pool::load(&e);

            let price = pool.load_price(&e, &asset_0);
            assert_eq!(price, 123);

            let price = pool.load_price(&e, &asset_1);
            assert_eq!(price, 456);

            // verify the price is cached
            oracle_client.set_price_stable(&vec![&e, 789, 101112]);
            let price = pool.load_price(&e, &asset_0);
            assert_eq!(price, 123);
        });
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #1230)")]
    fn test_load_price_panics_if_stale() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();

        e.ledger().set(LedgerInfo {
            timestamp: 1000 + 24 * 60 * 60 + 1,
            protocol_version: 20,
            sequence_number: 1234,
            network_id: Default::default(),
            base_reserve: 10,
            min_temp_entry_ttl: 10,
            min_persistent_entry_ttl: 10,
            max_entry_ttl: 2000000,
        });

        let bombadil = Address::generate(&e);
        let pool = testutils::create_pool(&e);
        let asset = Address::generate(&e);
        let (oracle, oracle_client) = testutils::create_mock_oracle(&e);
        oracle_client.set_data(
            &bombadil,
            &Asset::Other(Symbol::new(&e, "USD")),
            &vec![&e, Asset::Stellar(asset.clone())],
            &7,
            &300,
        );
        oracle_client.set_price(&vec![&e, 123], &1000);
        let pool_config = testutils::default_pool_config(&e, &oracle);
        e.as_contract(&pool, || {
            storage::set_pool_config(&e, &pool_config);
            let mut pool = Pool::load(&e);

            pool.load_price(&e, &asset);
        });
    }
}
