use soroban_sdk::{testutils::Address as _, Address, Symbol};

use crate::{
    pool::{default_rate_params, default_reserve_config, EModeCategory},
    test_fixture::{TestFixture, TokenIndex, SCALAR_6, SCALAR_7, SCALAR_9},
};

/// The E-Mode category id of the grains category created by `create_fixture_with_data`
pub const GRAINS_EMODE: u32 = 1;

/// Create a test fixture with a pool holding a reserve for every token and a liquidity provider
///
/// Returns the fixture and the liquidity provider, frodo, who has supplied 100k WHEAT, 100k CORN,
/// 100 GOLD and 500k USDC. WHEAT and CORN form the grains E-Mode category.
pub fn create_fixture_with_data<'a>() -> (TestFixture<'a>, Address) {
    let fixture = TestFixture::create();
    let frodo = Address::generate(&fixture.env);

    // create reserves
    for token_index in [
        TokenIndex::WHEAT,
        TokenIndex::CORN,
        TokenIndex::GOLD,
        TokenIndex::USDC,
    ] {
        let decimals = fixture.token(token_index).decimals();
        fixture.create_pool_reserve(
            token_index,
            &default_reserve_config(decimals),
            &default_rate_params(),
        );
    }

    fixture.pool.set_emode_category(
        &fixture.bombadil,
        &GRAINS_EMODE,
        &EModeCategory {
            ltv: 9_000,
            liq_threshold: 9_300,
            liq_bonus: 200,
            collateral: 0b0011,
            borrowable: 0b0011,
            label: Symbol::new(&fixture.env, "GRAINS"),
        },
    );

    // supply liquidity
    let deposits = [
        (TokenIndex::WHEAT, 100_000 * SCALAR_7),
        (TokenIndex::CORN, 100_000 * SCALAR_7),
        (TokenIndex::GOLD, 100 * SCALAR_9),
        (TokenIndex::USDC, 500_000 * SCALAR_6),
    ];
    for (token_index, amount) in deposits {
        let token = fixture.token(token_index);
        token.mint(&frodo, &amount);
        fixture
            .pool
            .supply(&frodo, &token.address, &amount, &frodo);
    }

    (fixture, frodo)
}
