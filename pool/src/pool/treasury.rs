use soroban_sdk::{Address, Env, Vec};

use crate::events;

use super::{pool::Pool, user::User};

/// Mint the b tokens accrued to the treasury for each of `assets` into the treasury's supply
/// position. Reserves with nothing accrued are skipped.
///
/// Returns the b tokens minted per asset
pub fn execute_mint_to_treasury(e: &Env, assets: &Vec<Address>) -> Vec<i128> {
    let mut pool = Pool::load(e);
    let treasury = pool.config.treasury.clone();
    let mut treasury_state = User::load(e, &treasury);

    let mut minted: Vec<i128> = Vec::new(e);
    for asset in assets.iter() {
        let mut reserve = pool.load_reserve(e, &asset);
        let to_mint = reserve.data.accrued_to_treasury;
        if to_mint > 0 {
            reserve.data.accrued_to_treasury = 0;
            treasury_state.add_supply(&mut reserve, to_mint);
            events::mint_to_treasury(e, &asset, &treasury, to_mint);
        }
        pool.cache_reserve(reserve, true);
        minted.push_back(to_mint);
    }

    pool.store_cached_reserves(e);
    treasury_state.store(e);
    minted
}
