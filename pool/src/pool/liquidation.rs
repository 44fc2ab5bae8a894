use cast::i128;
use sep_41_token::TokenClient;
use soroban_sdk::{contracttype, panic_with_error, Address, Env};

use crate::{
    constants::{
        CLOSE_FACTOR_HF_THRESHOLD, DEFAULT_LIQUIDATION_CLOSE_FACTOR,
        HEALTH_FACTOR_LIQUIDATION_THRESHOLD, MAX_LIQUIDATION_CLOSE_FACTOR, PERCENTAGE_FACTOR,
    },
    errors::PoolError,
    events,
    math::{mul_div_floor, percent_div, percent_mul},
    validator::require_positive,
};

use super::{emode, health_factor::PositionData, pool::Pool, user::User};

/// The outcome of a liquidation, in underlying tokens
#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct LiquidationResult {
    pub debt_covered: i128,
    pub collateral_seized: i128, // includes the protocol fee
    pub protocol_fee: i128,
}

/// Liquidate part of an unhealthy position. The liquidator repays `debt_to_cover` of the
/// user's `debt_asset` debt and receives the equivalent `collateral_asset` plus the
/// liquidation bonus, either as underlying or as a supply position.
///
/// `debt_to_cover` of `i128::MAX` covers as much debt as the close factor allows.
///
/// ### Panics
/// If the position is healthy, the user has no debt or collateral in the selected reserves,
/// or `debt_to_cover` exceeds the close factor
pub fn execute_liquidation_call(
    e: &Env,
    liquidator: &Address,
    user: &Address,
    collateral_asset: &Address,
    debt_asset: &Address,
    debt_to_cover: i128,
    receive_b_tokens: bool,
) -> LiquidationResult {
    require_positive(e, &debt_to_cover);
    if liquidator == user {
        panic_with_error!(e, PoolError::BadRequest);
    }
    let mut pool = Pool::load(e);
    pool.require_not_paused(e);
    let mut user_state = User::load(e, user);

    let position_data =
        PositionData::calculate_from_positions(e, &mut pool, &user_state.positions);
    let health_factor = position_data.as_health_factor(e);
    if health_factor >= HEALTH_FACTOR_LIQUIDATION_THRESHOLD {
        panic_with_error!(e, PoolError::HealthyPosition);
    }

    let mut debt_reserve = pool.load_reserve(e, debt_asset);
    debt_reserve.require_active(e);
    let collateral_reserve = pool.load_reserve(e, collateral_asset);
    collateral_reserve.require_active(e);
    let debt_index = debt_reserve.config.index;
    let collateral_index = collateral_reserve.config.index;

    let user_d_tokens = user_state.get_liabilities(debt_index);
    if user_d_tokens == 0 {
        panic_with_error!(e, PoolError::NoDebtOfSelectedType);
    }
    let user_b_tokens = user_state.get_supply(collateral_index);
    if user_b_tokens == 0 || !user_state.is_collateral(collateral_index) {
        panic_with_error!(e, PoolError::NoCollateralOfSelectedType);
    }

    // close factor
    let user_debt = debt_reserve.to_asset_from_d_token(e, user_d_tokens);
    let close_factor = if health_factor > CLOSE_FACTOR_HF_THRESHOLD {
        DEFAULT_LIQUIDATION_CLOSE_FACTOR
    } else {
        MAX_LIQUIDATION_CLOSE_FACTOR
    };
    let max_debt_to_cover = percent_mul(e, user_debt, i128(close_factor)).min(user_debt);
    let requested_debt = if debt_to_cover == i128::MAX {
        max_debt_to_cover
    } else if debt_to_cover > max_debt_to_cover {
        panic_with_error!(e, PoolError::CloseFactorExceeded);
    } else {
        debt_to_cover
    };

    // collateral to seize
    let category = emode::load_category(e, user_state.positions.e_mode);
    let liq_bonus = i128(emode::risk_params(&collateral_reserve, &category).liq_bonus);
    let user_collateral = collateral_reserve.to_asset_from_b_token(e, user_b_tokens);
    let debt_price = pool.load_price(e, debt_asset);
    let collateral_price = pool.load_price(e, collateral_asset);

    let debt_base = mul_div_floor(e, requested_debt, debt_price, debt_reserve.scalar);
    let base_collateral = mul_div_floor(e, debt_base, collateral_reserve.scalar, collateral_price);
    let max_collateral = percent_mul(e, base_collateral, PERCENTAGE_FACTOR + liq_bonus);
    let (collateral_seized, debt_covered) = if max_collateral > user_collateral {
        let collateral_base =
            mul_div_floor(e, user_collateral, collateral_price, collateral_reserve.scalar);
        let debt_equivalent = mul_div_floor(e, collateral_base, debt_reserve.scalar, debt_price);
        (
            user_collateral,
            percent_div(e, debt_equivalent, PERCENTAGE_FACTOR + liq_bonus),
        )
    } else {
        (max_collateral, requested_debt)
    };
    if debt_covered == 0 || collateral_seized == 0 {
        panic_with_error!(e, PoolError::InvalidAmount);
    }
    let protocol_fee = if collateral_reserve.config.liq_protocol_fee != 0 {
        let bonus_collateral =
            collateral_seized - percent_div(e, collateral_seized, PERCENTAGE_FACTOR + liq_bonus);
        percent_mul(
            e,
            bonus_collateral,
            i128(collateral_reserve.config.liq_protocol_fee),
        )
    } else {
        0
    };
    let liquidator_collateral = collateral_seized - protocol_fee;

    // burn the covered debt
    let d_tokens_burnt = if debt_covered >= user_debt {
        user_d_tokens
    } else {
        debt_reserve.to_d_token(e, debt_covered).min(user_d_tokens)
    };
    user_state.remove_liabilities(e, &mut debt_reserve, d_tokens_burnt);
    debt_reserve.data.backing += debt_covered;
    debt_reserve.update_rates(e);
    pool.cache_reserve(debt_reserve, true);

    // seize the collateral. reload in case the debt and collateral reserve are the same
    let mut collateral_reserve = pool.load_reserve(e, collateral_asset);
    let b_tokens_seized = if collateral_seized == user_collateral {
        user_b_tokens
    } else {
        collateral_reserve
            .to_b_token(e, collateral_seized)
            .min(user_b_tokens)
    };
    let fee_b_tokens = collateral_reserve
        .to_b_token(e, protocol_fee)
        .min(b_tokens_seized);
    user_state.remove_supply(e, &mut collateral_reserve, b_tokens_seized);
    collateral_reserve.data.accrued_to_treasury += fee_b_tokens;

    let mut liquidator_state = None;
    if receive_b_tokens {
        let mut liquidator_user = User::load(e, liquidator);
        let is_first_supply = liquidator_user.get_supply(collateral_index) == 0;
        liquidator_user.add_supply(&mut collateral_reserve, b_tokens_seized - fee_b_tokens);
        if is_first_supply && collateral_reserve.config.ltv != 0 {
            liquidator_user.set_collateral(collateral_index, true);
        }
        liquidator_state = Some(liquidator_user);
    } else {
        collateral_reserve.require_liquidity(e, liquidator_collateral);
        collateral_reserve.data.backing -= liquidator_collateral;
    }
    collateral_reserve.update_rates(e);
    pool.cache_reserve(collateral_reserve, true);

    let pool_address = e.current_contract_address();
    TokenClient::new(e, debt_asset).transfer(liquidator, &pool_address, &debt_covered);

    pool.store_cached_reserves(e);
    user_state.store(e);
    if let Some(liquidator_user) = liquidator_state {
        liquidator_user.store(e);
    } else {
        TokenClient::new(e, collateral_asset).transfer(
            &pool_address,
            liquidator,
            &liquidator_collateral,
        );
    }

    events::liquidation(
        e,
        collateral_asset,
        debt_asset,
        user,
        liquidator,
        debt_covered,
        collateral_seized,
        protocol_fee,
        receive_b_tokens,
    );
    LiquidationResult {
        debt_covered,
        collateral_seized,
        protocol_fee,
    }
}
