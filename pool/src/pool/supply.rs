use sep_41_token::TokenClient;
use soroban_sdk::{panic_with_error, Address, Env};

use crate::{errors::PoolError, events, validator::require_positive};

use super::{pool::Pool, user::User};

/// Supply `amount` of `asset` from `from` and credit the supply position of `on_behalf_of`.
///
/// The first supply of a reserve with a non-zero loan to value is enabled as collateral.
///
/// Returns the b tokens minted
///
/// ### Panics
/// If the pool is paused, the reserve does not accept new positions, or the supply cap is
/// exceeded
pub fn execute_supply(
    e: &Env,
    from: &Address,
    asset: &Address,
    amount: i128,
    on_behalf_of: &Address,
) -> i128 {
    require_positive(e, &amount);
    let mut pool = Pool::load(e);
    pool.require_not_paused(e);

    let mut reserve = pool.load_reserve(e, asset);
    reserve.require_accepts_new_positions(e);

    let mut user = User::load(e, on_behalf_of);
    let is_first_supply = user.get_supply(reserve.config.index) == 0;

    let b_tokens_minted = reserve.to_b_token(e, amount);
    if b_tokens_minted == 0 {
        panic_with_error!(e, PoolError::InvalidAmount);
    }
    user.add_supply(&mut reserve, b_tokens_minted);
    reserve.data.backing += amount;
    reserve.require_supply_cap(e);

    if is_first_supply && reserve.config.ltv != 0 && !user.is_collateral(reserve.config.index) {
        user.set_collateral(reserve.config.index, true);
        events::collateral_usage(e, asset, on_behalf_of, true);
    }

    reserve.update_rates(e);
    pool.cache_reserve(reserve, true);

    TokenClient::new(e, asset).transfer(from, &e.current_contract_address(), &amount);

    pool.store_cached_reserves(e);
    user.store(e);

    events::supply(e, asset, on_behalf_of, from, amount, b_tokens_minted);
    b_tokens_minted
}

#[cfg(test)]
mod tests {
    use crate::{
        constants::{BPS_TO_RAY, RAY},
        storage, testutils,
    };

    use super::*;
    use soroban_sdk::testutils::{Address as _, Ledger, LedgerInfo};

    #[test]
    fn test_execute_supply() {
        let e = Env::default();
        e.budget().reset_unlimited();
        e.mock_all_auths_allowing_non_root_auth();

        let bombadil = Address::generate(&e);
        let samwise = Address::generate(&e);
        let frodo = Address::generate(&e);
        let pool = testutils::create_pool(&e);
        let oracle = Address::generate(&e);

        let (underlying, underlying_client) = testutils::create_token_contract(&e, &bombadil);
        let (reserve_config, reserve_data) = testutils::default_reserve_meta();
        testutils::create_reserve(&e, &pool, &underlying, &reserve_config, &reserve_data);
        underlying_client.mint(&samwise, &100_0000000);

        e.as_contract(&pool, || {
            storage::set_pool_config(&e, &testutils::default_pool_config(&e, &oracle));

            // samwise supplies for frodo
            let minted = execute_supply(&e, &samwise, &underlying, 75_0000000, &frodo);
            assert_eq!(minted, 75_0000000);

            let positions = storage::get_user_positions(&e, &frodo);
            assert_eq!(positions.supply.get_unchecked(0), 75_0000000);
            assert_eq!(positions.config, 0b10);
            assert_eq!(storage::get_user_positions(&e, &samwise).supply.len(), 0);

            let data = storage::get_res_data(&e, &underlying);
            assert_eq!(data.b_supply, 175_0000000);
            assert_eq!(data.backing, 100_0000000);
            // 75 / 175 debt is under the kink
            assert!(data.borrow_rate > 0 && data.borrow_rate < 400 * BPS_TO_RAY);
            assert_eq!(data.liquidity_index, RAY);

            assert_eq!(underlying_client.balance(&samwise), 25_0000000);
            assert_eq!(underlying_client.balance(&pool), 100_0000000);
        });
    }

    #[test]
    fn test_execute_supply_with_accrued_index() {
        let e = Env::default();
        e.budget().reset_unlimited();
        e.mock_all_auths_allowing_non_root_auth();
        e.ledger().set(LedgerInfo {
            timestamp: 0,
            protocol_version: 20,
            sequence_number: 100,
            network_id: Default::default(),
            base_reserve: 10,
            min_temp_entry_ttl: 10,
            min_persistent_entry_ttl: 10,
            max_entry_ttl: 2000000,
        });

        let bombadil = Address::generate(&e);
        let samwise = Address::generate(&e);
        let pool = testutils::create_pool(&e);
        let oracle = Address::generate(&e);

        let (underlying, underlying_client) = testutils::create_token_contract(&e, &bombadil);
        let (reserve_config, mut reserve_data) = testutils::default_reserve_meta();
        reserve_data.liquidity_index = 2 * RAY;
        testutils::create_reserve(&e, &pool, &underlying, &reserve_config, &reserve_data);
        underlying_client.mint(&samwise, &10_0000000);

        e.as_contract(&pool, || {
            storage::set_pool_config(&e, &testutils::default_pool_config(&e, &oracle));

            let minted = execute_supply(&e, &samwise, &underlying, 10_0000000, &samwise);
            assert_eq!(minted, 5_0000000);
            assert_eq!(storage::get_user_positions(&e, &samwise).supply.get_unchecked(0), 5_0000000);
        });
    }

    #[test]
    fn test_execute_supply_zero_ltv_not_collateral() {
        let e = Env::default();
        e.budget().reset_unlimited();
        e.mock_all_auths_allowing_non_root_auth();

        let bombadil = Address::generate(&e);
        let samwise = Address::generate(&e);
        let pool = testutils::create_pool(&e);
        let oracle = Address::generate(&e);

        let (underlying, underlying_client) = testutils::create_token_contract(&e, &bombadil);
        let (mut reserve_config, reserve_data) = testutils::default_reserve_meta();
        reserve_config.ltv = 0;
        testutils::create_reserve(&e, &pool, &underlying, &reserve_config, &reserve_data);
        underlying_client.mint(&samwise, &10_0000000);

        e.as_contract(&pool, || {
            storage::set_pool_config(&e, &testutils::default_pool_config(&e, &oracle));

            execute_supply(&e, &samwise, &underlying, 10_0000000, &samwise);
            let positions = storage::get_user_positions(&e, &samwise);
            assert_eq!(positions.supply.get_unchecked(0), 10_0000000);
            assert_eq!(positions.config, 0);
        });
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #1215)")]
    fn test_execute_supply_cap() {
        let e = Env::default();
        e.budget().reset_unlimited();
        e.mock_all_auths_allowing_non_root_auth();

        let bombadil = Address::generate(&e);
        let samwise = Address::generate(&e);
        let pool = testutils::create_pool(&e);
        let oracle = Address::generate(&e);

        let (underlying, underlying_client) = testutils::create_token_contract(&e, &bombadil);
        let (mut reserve_config, reserve_data) = testutils::default_reserve_meta();
        reserve_config.supply_cap = 110;
        testutils::create_reserve(&e, &pool, &underlying, &reserve_config, &reserve_data);
        underlying_client.mint(&samwise, &20_0000000);

        e.as_contract(&pool, || {
            storage::set_pool_config(&e, &testutils::default_pool_config(&e, &oracle));

            execute_supply(&e, &samwise, &underlying, 10_0000000, &samwise);
            execute_supply(&e, &samwise, &underlying, 1, &samwise);
        });
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #1213)")]
    fn test_execute_supply_frozen() {
        let e = Env::default();
        e.budget().reset_unlimited();
        e.mock_all_auths_allowing_non_root_auth();

        let bombadil = Address::generate(&e);
        let samwise = Address::generate(&e);
        let pool = testutils::create_pool(&e);
        let oracle = Address::generate(&e);

        let (underlying, underlying_client) = testutils::create_token_contract(&e, &bombadil);
        let (mut reserve_config, reserve_data) = testutils::default_reserve_meta();
        reserve_config.frozen = true;
        testutils::create_reserve(&e, &pool, &underlying, &reserve_config, &reserve_data);
        underlying_client.mint(&samwise, &20_0000000);

        e.as_contract(&pool, || {
            storage::set_pool_config(&e, &testutils::default_pool_config(&e, &oracle));

            execute_supply(&e, &samwise, &underlying, 10_0000000, &samwise);
        });
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #1211)")]
    fn test_execute_supply_paused() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();

        let bombadil = Address::generate(&e);
        let samwise = Address::generate(&e);
        let pool = testutils::create_pool(&e);
        let oracle = Address::generate(&e);

        let (underlying, _) = testutils::create_token_contract(&e, &bombadil);
        let (reserve_config, reserve_data) = testutils::default_reserve_meta();
        testutils::create_reserve(&e, &pool, &underlying, &reserve_config, &reserve_data);

        let mut pool_config = testutils::default_pool_config(&e, &oracle);
        pool_config.paused = true;
        e.as_contract(&pool, || {
            storage::set_pool_config(&e, &pool_config);
            execute_supply(&e, &samwise, &underlying, 10_0000000, &samwise);
        });
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #1207)")]
    fn test_execute_supply_zero() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();

        let bombadil = Address::generate(&e);
        let samwise = Address::generate(&e);
        let pool = testutils::create_pool(&e);
        let oracle = Address::generate(&e);

        let (underlying, _) = testutils::create_token_contract(&e, &bombadil);
        let (reserve_config, reserve_data) = testutils::default_reserve_meta();
        testutils::create_reserve(&e, &pool, &underlying, &reserve_config, &reserve_data);

        e.as_contract(&pool, || {
            storage::set_pool_config(&e, &testutils::default_pool_config(&e, &oracle));
            execute_supply(&e, &samwise, &underlying, 0, &samwise);
        });
    }
}
