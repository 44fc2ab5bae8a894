use soroban_sdk::{Address, Env, Symbol, Vec};

use crate::storage::{
    CommodityParams, EModeCategory, ExtendedParams, InterestRateParams, ReserveConfig,
    ReserveData, WeatherEvent,
};

/********** Reserve **********/

/// Emitted whenever a reserve's rates are recalculated
///
/// - topics - `["reserve_updated", asset: Address]`
/// - data - `[liquidity_rate: i128, borrow_rate: i128, liquidity_index: i128, borrow_index: i128]`
pub(crate) fn reserve_updated(e: &Env, asset: &Address, data: &ReserveData) {
    let topics = (Symbol::new(e, "reserve_updated"), asset.clone());
    e.events().publish(
        topics,
        (
            data.liquidity_rate,
            data.borrow_rate,
            data.liquidity_index,
            data.borrow_index,
        ),
    );
}

/********** User Actions **********/

/// - topics - `["supply", asset: Address, on_behalf_of: Address]`
/// - data - `[from: Address, amount: i128, b_tokens_minted: i128]`
pub(crate) fn supply(
    e: &Env,
    asset: &Address,
    on_behalf_of: &Address,
    from: &Address,
    amount: i128,
    b_tokens_minted: i128,
) {
    let topics = (Symbol::new(e, "supply"), asset.clone(), on_behalf_of.clone());
    e.events()
        .publish(topics, (from.clone(), amount, b_tokens_minted));
}

/// - topics - `["withdraw", asset: Address, user: Address]`
/// - data - `[to: Address, amount: i128, b_tokens_burnt: i128]`
pub(crate) fn withdraw(
    e: &Env,
    asset: &Address,
    user: &Address,
    to: &Address,
    amount: i128,
    b_tokens_burnt: i128,
) {
    let topics = (Symbol::new(e, "withdraw"), asset.clone(), user.clone());
    e.events()
        .publish(topics, (to.clone(), amount, b_tokens_burnt));
}

/// - topics - `["borrow", asset: Address, user: Address]`
/// - data - `[to: Address, amount: i128, d_tokens_minted: i128, borrow_rate: i128]`
pub(crate) fn borrow(
    e: &Env,
    asset: &Address,
    user: &Address,
    to: &Address,
    amount: i128,
    d_tokens_minted: i128,
    borrow_rate: i128,
) {
    let topics = (Symbol::new(e, "borrow"), asset.clone(), user.clone());
    e.events()
        .publish(topics, (to.clone(), amount, d_tokens_minted, borrow_rate));
}

/// - topics - `["repay", asset: Address, user: Address]`
/// - data - `[from: Address, amount: i128, d_tokens_burnt: i128, with_b_tokens: bool]`
pub(crate) fn repay(
    e: &Env,
    asset: &Address,
    user: &Address,
    from: &Address,
    amount: i128,
    d_tokens_burnt: i128,
    with_b_tokens: bool,
) {
    let topics = (Symbol::new(e, "repay"), asset.clone(), user.clone());
    e.events()
        .publish(topics, (from.clone(), amount, d_tokens_burnt, with_b_tokens));
}

/// - topics - `["collateral_usage", asset: Address, user: Address]`
/// - data - `enabled: bool`
pub(crate) fn collateral_usage(e: &Env, asset: &Address, user: &Address, enabled: bool) {
    let topics = (
        Symbol::new(e, "collateral_usage"),
        asset.clone(),
        user.clone(),
    );
    e.events().publish(topics, enabled);
}

/// - topics - `["user_emode", user: Address]`
/// - data - `category: u32`
pub(crate) fn user_emode(e: &Env, user: &Address, category: u32) {
    let topics = (Symbol::new(e, "user_emode"), user.clone());
    e.events().publish(topics, category);
}

/// - topics - `["manager", user: Address, manager: Address]`
/// - data - `approved: bool`
pub(crate) fn position_manager(e: &Env, user: &Address, manager: &Address, approved: bool) {
    let topics = (Symbol::new(e, "manager"), user.clone(), manager.clone());
    e.events().publish(topics, approved);
}

/// - topics - `["liquidation", collateral_asset: Address, debt_asset: Address, user: Address]`
/// - data - `[liquidator: Address, debt_covered: i128, collateral_seized: i128, protocol_fee: i128, receive_b_tokens: bool]`
#[allow(clippy::too_many_arguments)]
pub(crate) fn liquidation(
    e: &Env,
    collateral_asset: &Address,
    debt_asset: &Address,
    user: &Address,
    liquidator: &Address,
    debt_covered: i128,
    collateral_seized: i128,
    protocol_fee: i128,
    receive_b_tokens: bool,
) {
    let topics = (
        Symbol::new(e, "liquidation"),
        collateral_asset.clone(),
        debt_asset.clone(),
        user.clone(),
    );
    e.events().publish(
        topics,
        (
            liquidator.clone(),
            debt_covered,
            collateral_seized,
            protocol_fee,
            receive_b_tokens,
        ),
    );
}

/// - topics - `["flash_loan", asset: Address, receiver: Address]`
/// - data - `[initiator: Address, amount: i128, mode: u32, premium: i128]`
pub(crate) fn flash_loan(
    e: &Env,
    asset: &Address,
    receiver: &Address,
    initiator: &Address,
    amount: i128,
    mode: u32,
    premium: i128,
) {
    let topics = (Symbol::new(e, "flash_loan"), asset.clone(), receiver.clone());
    e.events()
        .publish(topics, (initiator.clone(), amount, mode, premium));
}

/// - topics - `["mint_to_treasury", asset: Address, treasury: Address]`
/// - data - `b_tokens: i128`
pub(crate) fn mint_to_treasury(e: &Env, asset: &Address, treasury: &Address, b_tokens: i128) {
    let topics = (
        Symbol::new(e, "mint_to_treasury"),
        asset.clone(),
        treasury.clone(),
    );
    e.events().publish(topics, b_tokens);
}

/********** Admin **********/

pub(crate) fn set_admin(e: &Env, admin: &Address, new_admin: &Address) {
    let topics = (Symbol::new(e, "set_admin"), admin.clone());
    e.events().publish(topics, new_admin.clone());
}

pub(crate) fn set_configurator(e: &Env, address: &Address, enabled: bool) {
    let topics = (Symbol::new(e, "set_configurator"), address.clone());
    e.events().publish(topics, enabled);
}

pub(crate) fn set_status(e: &Env, admin: &Address, paused: bool) {
    let topics = (Symbol::new(e, "set_status"), admin.clone());
    e.events().publish(topics, paused);
}

pub(crate) fn set_futures_oracle(e: &Env, admin: &Address, oracle: &Option<Address>) {
    let topics = (Symbol::new(e, "set_futures_oracle"), admin.clone());
    e.events().publish(topics, oracle.clone());
}

pub(crate) fn update_flash_premiums(e: &Env, total: u32, to_protocol: u32) {
    let topics = (Symbol::new(e, "update_flash_premiums"),);
    e.events().publish(topics, (total, to_protocol));
}

pub(crate) fn set_flash_borrower(e: &Env, address: &Address, enabled: bool) {
    let topics = (Symbol::new(e, "set_flash_borrower"), address.clone());
    e.events().publish(topics, enabled);
}

pub(crate) fn init_reserve(e: &Env, asset: &Address, index: u32) {
    let topics = (Symbol::new(e, "init_reserve"), asset.clone());
    e.events().publish(topics, index);
}

pub(crate) fn update_reserve(e: &Env, asset: &Address, config: &ReserveConfig) {
    let topics = (Symbol::new(e, "update_reserve"), asset.clone());
    e.events().publish(topics, config.clone());
}

pub(crate) fn update_rate_params(e: &Env, asset: &Address, params: &InterestRateParams) {
    let topics = (Symbol::new(e, "update_rate_params"), asset.clone());
    e.events().publish(topics, params.clone());
}

pub(crate) fn update_commodity_params(e: &Env, asset: &Address, params: &CommodityParams) {
    let topics = (Symbol::new(e, "update_commodity_params"), asset.clone());
    e.events().publish(topics, params.clone());
}

pub(crate) fn update_extended_params(e: &Env, asset: &Address, params: &ExtendedParams) {
    let topics = (Symbol::new(e, "update_extended_params"), asset.clone());
    e.events().publish(topics, params.clone());
}

pub(crate) fn set_seasonal_profile(e: &Env, asset: &Address, profile: &Vec<u32>) {
    let topics = (Symbol::new(e, "set_seasonal_profile"), asset.clone());
    e.events().publish(topics, profile.clone());
}

pub(crate) fn set_sub_commodity(e: &Env, id: u32, commodity_type: &Symbol) {
    let topics = (Symbol::new(e, "set_sub_commodity"), id);
    e.events().publish(topics, commodity_type.clone());
}

pub(crate) fn set_weather_event(e: &Env, region: &Symbol, event: &WeatherEvent) {
    let topics = (Symbol::new(e, "set_weather_event"), region.clone());
    e.events().publish(topics, event.clone());
}

pub(crate) fn clear_weather_event(e: &Env, region: &Symbol) {
    let topics = (Symbol::new(e, "clear_weather_event"), region.clone());
    e.events().publish(topics, ());
}

pub(crate) fn set_emode_category(e: &Env, id: u32, category: &EModeCategory) {
    let topics = (Symbol::new(e, "set_emode_category"), id);
    e.events().publish(topics, category.clone());
}
