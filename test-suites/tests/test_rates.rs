#![cfg(test)]
use pool::{CommodityParams, InterestRateParams, PoolError, SubCommodityProfile, WeatherEvent};
use soroban_sdk::{testutils::Address as _, vec, Address, Error, Symbol, Vec};
use test_suites::{
    create_fixture_with_data,
    test_fixture::{TestFixture, TokenIndex, MONTH, SCALAR_6, SCALAR_7},
};

const BPS_TO_RAY: i128 = 100_000_000_000_000_000_000_000;

fn flat_curve(base_rate: u32) -> InterestRateParams {
    InterestRateParams {
        optimal_usage: 8_000,
        base_rate,
        slope_1: 0,
        slope_2: 0,
    }
}

fn borrow_rate_bps(fixture: &TestFixture, asset: &Address) -> i128 {
    fixture.pool.get_reserve(asset).data.borrow_rate / BPS_TO_RAY
}

/// Recalculate the rates of a reserve without changing its parameters
fn touch(fixture: &TestFixture, asset: &Address) {
    let extended = fixture.pool.get_reserve(asset).extended;
    fixture
        .pool
        .update_extended_params(&fixture.bombadil, asset, &extended);
}

#[test]
fn test_utilization_curve() {
    let (fixture, _) = create_fixture_with_data();
    let wheat = fixture.token(TokenIndex::WHEAT);
    let usdc = fixture.token(TokenIndex::USDC);

    let samwise = Address::generate(&fixture.env);
    wheat.mint(&samwise, &(150_000 * SCALAR_7));
    fixture
        .pool
        .supply(&samwise, &wheat.address, &(150_000 * SCALAR_7), &samwise);
    assert_eq!(borrow_rate_bps(&fixture, &usdc.address), 0);

    // 40% utilization is half way to the kink
    fixture.pool.borrow(
        &samwise,
        &samwise,
        &usdc.address,
        &(200_000 * SCALAR_6),
        &samwise,
    );
    let reserve = fixture.pool.get_reserve(&usdc.address);
    assert_eq!(reserve.data.borrow_rate, 200 * BPS_TO_RAY);
    // 200 bps * 40% utilization * 90%
    assert_eq!(reserve.data.liquidity_rate, 72 * BPS_TO_RAY);

    // 90% utilization is half way up the second slope
    fixture.pool.borrow(
        &samwise,
        &samwise,
        &usdc.address,
        &(250_000 * SCALAR_6),
        &samwise,
    );
    assert_eq!(borrow_rate_bps(&fixture, &usdc.address), 3_400);

    let mut params = fixture.pool.get_reserve(&usdc.address).curve;
    params.slope_2 = 3_000;
    fixture
        .pool
        .update_rate_params(&fixture.bombadil, &usdc.address, &params);
    assert_eq!(borrow_rate_bps(&fixture, &usdc.address), 1_900);

    // the rate is limited to 1000% APR
    params.slope_2 = 100_000;
    let result =
        fixture
            .pool
            .try_update_rate_params(&fixture.bombadil, &usdc.address, &params);
    assert_eq!(
        result.err(),
        Some(Ok(Error::from_contract_error(
            PoolError::InvalidRateParams as u32
        )))
    );

    // and the curve cannot flatten above the kink
    params.slope_2 = 300;
    let result =
        fixture
            .pool
            .try_update_rate_params(&fixture.bombadil, &usdc.address, &params);
    assert_eq!(
        result.err(),
        Some(Ok(Error::from_contract_error(
            PoolError::InvalidRateParams as u32
        )))
    );
    assert_eq!(borrow_rate_bps(&fixture, &usdc.address), 1_900);
}

#[test]
fn test_seasonal_and_carry_layers() {
    let (fixture, frodo) = create_fixture_with_data();
    let wheat = fixture.token(TokenIndex::WHEAT);
    let pool = &fixture.pool;

    pool.update_rate_params(&fixture.bombadil, &wheat.address, &flat_curve(500));
    assert_eq!(borrow_rate_bps(&fixture, &wheat.address), 500);

    pool.set_seasonal_profile(
        &fixture.bombadil,
        &wheat.address,
        &vec![
            &fixture.env,
            12_000,
            10_000,
            10_000,
            10_000,
            10_000,
            10_000,
            10_000,
            10_000,
            10_000,
            10_000,
            10_000,
            9_000,
        ],
    );
    // the profile is ignored until seasonality is enabled
    assert_eq!(borrow_rate_bps(&fixture, &wheat.address), 500);

    let mut commodity = CommodityParams {
        seasonal: true,
        storage_cost: 0,
        quality_decay: 0,
        contango: 0,
    };
    pool.update_commodity_params(&fixture.bombadil, &wheat.address, &commodity);
    // the fixture starts in the first month of the year
    assert_eq!(borrow_rate_bps(&fixture, &wheat.address), 600);

    fixture.jump(MONTH);
    wheat.mint(&frodo, &SCALAR_7);
    pool.supply(&frodo, &wheat.address, &SCALAR_7, &frodo);
    assert_eq!(borrow_rate_bps(&fixture, &wheat.address), 500);

    fixture.jump(10 * MONTH);
    touch(&fixture, &wheat.address);
    assert_eq!(borrow_rate_bps(&fixture, &wheat.address), 450);

    // carry costs are added after the seasonal multiplier
    commodity.storage_cost = 50;
    commodity.quality_decay = 25;
    commodity.contango = -25;
    pool.update_commodity_params(&fixture.bombadil, &wheat.address, &commodity);
    assert_eq!(borrow_rate_bps(&fixture, &wheat.address), 500);

    // backwardation can floor the rate at zero
    commodity.storage_cost = 0;
    commodity.quality_decay = 0;
    commodity.contango = -2_000;
    pool.update_commodity_params(&fixture.bombadil, &wheat.address, &commodity);
    assert_eq!(pool.get_reserve(&wheat.address).data.borrow_rate, 0);

    commodity.contango = -2_001;
    let result = pool.try_update_commodity_params(&fixture.bombadil, &wheat.address, &commodity);
    assert_eq!(
        result.err(),
        Some(Ok(Error::from_contract_error(
            PoolError::InvalidCommodityParams as u32
        )))
    );
}

#[test]
fn test_invalid_seasonal_profile() {
    let (fixture, _) = create_fixture_with_data();
    let wheat = fixture.token(TokenIndex::WHEAT);

    let mut short_profile: Vec<u32> = Vec::new(&fixture.env);
    for _ in 0..11 {
        short_profile.push_back(10_000);
    }
    let result =
        fixture
            .pool
            .try_set_seasonal_profile(&fixture.bombadil, &wheat.address, &short_profile);
    assert_eq!(
        result.err(),
        Some(Ok(Error::from_contract_error(
            PoolError::InvalidSeasonalProfile as u32
        )))
    );

    let mut profile = short_profile.clone();
    profile.push_back(10_000);
    profile.set(4, 15_001);
    let result = fixture
        .pool
        .try_set_seasonal_profile(&fixture.bombadil, &wheat.address, &profile);
    assert_eq!(
        result.err(),
        Some(Ok(Error::from_contract_error(
            PoolError::InvalidSeasonalProfile as u32
        )))
    );
}

#[test]
fn test_sub_commodity_profile() {
    let (fixture, _) = create_fixture_with_data();
    let wheat = fixture.token(TokenIndex::WHEAT);
    let pool = &fixture.pool;

    pool.update_rate_params(&fixture.bombadil, &wheat.address, &flat_curve(700));
    let mut profile = SubCommodityProfile {
        commodity_type: Symbol::new(&fixture.env, "HARD_RED_WINTER"),
        harvest_start: 5,
        harvest_end: 7,
        peak_month: 0,
        southern: false,
        harvest_factor: 8_000,
        peak_factor: 13_000,
        base_factor: 10_000,
    };
    pool.set_sub_commodity_profile(&fixture.bombadil, &1, &profile);

    let mut extended = pool.get_reserve(&wheat.address).extended;
    extended.sub_commodity = 1;
    pool.update_extended_params(&fixture.bombadil, &wheat.address, &extended);
    // peak demand month
    assert_eq!(borrow_rate_bps(&fixture, &wheat.address), 910);

    // southern hemisphere profiles are shifted six months into the harvest
    profile.southern = true;
    pool.set_sub_commodity_profile(&fixture.bombadil, &1, &profile);
    touch(&fixture, &wheat.address);
    assert_eq!(borrow_rate_bps(&fixture, &wheat.address), 560);

    // referencing a missing profile fails
    extended.sub_commodity = 2;
    let result = pool.try_update_extended_params(&fixture.bombadil, &wheat.address, &extended);
    assert_eq!(
        result.err(),
        Some(Ok(Error::from_contract_error(
            PoolError::InvalidCommodityParams as u32
        )))
    );
}

#[test]
fn test_futures_curve_layer() {
    let (fixture, _) = create_fixture_with_data();
    let corn = fixture.token(TokenIndex::CORN);
    let pool = &fixture.pool;
    let now = fixture.env.ledger().timestamp();

    pool.update_rate_params(&fixture.bombadil, &corn.address, &flat_curve(700));

    // data older than four hours is ignored
    fixture
        .futures_oracle
        .set_curve(&corn.address, &900, &(now - 4 * 60 * 60 - 1));
    let mut extended = pool.get_reserve(&corn.address).extended;
    extended.futures = true;
    pool.update_extended_params(&fixture.bombadil, &corn.address, &extended);
    assert_eq!(borrow_rate_bps(&fixture, &corn.address), 700);

    fixture.futures_oracle.set_curve(&corn.address, &900, &now);
    touch(&fixture, &corn.address);
    assert_eq!(borrow_rate_bps(&fixture, &corn.address), 1_600);

    // the adjustment is capped
    fixture.futures_oracle.set_curve(&corn.address, &2_500, &now);
    touch(&fixture, &corn.address);
    assert_eq!(borrow_rate_bps(&fixture, &corn.address), 1_700);

    // a failing oracle is skipped
    fixture.futures_oracle.set_error(&true);
    touch(&fixture, &corn.address);
    assert_eq!(borrow_rate_bps(&fixture, &corn.address), 700);
    fixture.futures_oracle.set_error(&false);

    // the layer ages out without a new update
    fixture.jump(4 * 60 * 60 + 1);
    touch(&fixture, &corn.address);
    assert_eq!(borrow_rate_bps(&fixture, &corn.address), 700);
}

#[test]
fn test_regional_basis_layer() {
    let (fixture, _) = create_fixture_with_data();
    let corn = fixture.token(TokenIndex::CORN);
    let pool = &fixture.pool;
    let now = fixture.env.ledger().timestamp();
    let region = Symbol::new(&fixture.env, "ROTTERDAM");

    pool.update_rate_params(&fixture.bombadil, &corn.address, &flat_curve(700));
    fixture.futures_oracle.set_curve(&corn.address, &300, &now);
    fixture
        .futures_oracle
        .set_regional_basis(&corn.address, &region, &-700);

    let mut extended = pool.get_reserve(&corn.address).extended;
    extended.regional = true;
    extended.region = region.clone();
    pool.update_extended_params(&fixture.bombadil, &corn.address, &extended);
    // capped at -500, the futures layer stays disabled
    assert_eq!(borrow_rate_bps(&fixture, &corn.address), 200);

    extended.futures = true;
    pool.update_extended_params(&fixture.bombadil, &corn.address, &extended);
    assert_eq!(borrow_rate_bps(&fixture, &corn.address), 500);

    // other regions are unaffected
    extended.region = Symbol::new(&fixture.env, "CHICAGO");
    pool.update_extended_params(&fixture.bombadil, &corn.address, &extended);
    assert_eq!(borrow_rate_bps(&fixture, &corn.address), 1_000);
}

#[test]
fn test_weather_layer() {
    let (fixture, _) = create_fixture_with_data();
    let gold = fixture.token(TokenIndex::GOLD);
    let pool = &fixture.pool;
    let now = fixture.env.ledger().timestamp();
    let region = Symbol::new(&fixture.env, "KANSAS");

    pool.update_rate_params(&fixture.bombadil, &gold.address, &flat_curve(700));
    let mut extended = pool.get_reserve(&gold.address).extended;
    extended.weather_sensitivity = 50;
    extended.region = region.clone();
    pool.update_extended_params(&fixture.bombadil, &gold.address, &extended);
    assert_eq!(borrow_rate_bps(&fixture, &gold.address), 700);

    let event = WeatherEvent {
        kind: Symbol::new(&fixture.env, "DROUGHT"),
        impact: 400,
        start: now,
        duration: 7 * 24 * 60 * 60,
    };
    pool.set_weather_event(&fixture.bombadil, &region, &event);
    // applied on the next rate update
    assert_eq!(borrow_rate_bps(&fixture, &gold.address), 700);
    touch(&fixture, &gold.address);
    assert_eq!(borrow_rate_bps(&fixture, &gold.address), 900);

    // expired events have no effect
    fixture.jump(8 * 24 * 60 * 60);
    touch(&fixture, &gold.address);
    assert_eq!(borrow_rate_bps(&fixture, &gold.address), 700);

    let event = WeatherEvent {
        start: fixture.env.ledger().timestamp(),
        ..event
    };
    pool.set_weather_event(&fixture.bombadil, &region, &event);
    touch(&fixture, &gold.address);
    assert_eq!(borrow_rate_bps(&fixture, &gold.address), 900);

    pool.clear_weather_event(&fixture.bombadil, &region);
    touch(&fixture, &gold.address);
    assert_eq!(borrow_rate_bps(&fixture, &gold.address), 700);

    // only configurators can report weather
    let merry = Address::generate(&fixture.env);
    let result = pool.try_set_weather_event(&merry, &region, &event);
    assert_eq!(
        result.err(),
        Some(Ok(Error::from_contract_error(
            PoolError::UnauthorizedError as u32
        )))
    );
}
