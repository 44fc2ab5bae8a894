use cast::i128;
use sep_41_token::TokenClient;
use soroban_sdk::{contracttype, panic_with_error, vec, Address, Bytes, Env, Vec};

use crate::{
    auth::require_position_authority, dependencies::FlashLoanReceiverClient, errors::PoolError,
    events, math::percent_mul, storage, validator::require_positive,
};

use super::{borrow::open_debt, health_factor::PositionData, pool::Pool, user::User};

/// Flash loan that must be returned with the premium before the callback ends
pub const MODE_REPAY: u32 = 0;
/// Flash loan that is kept by the receiver and opened as variable debt
pub const MODE_DEBT: u32 = 2;

/// A flash loaned asset recorded before the receiver is called
#[derive(Clone)]
#[contracttype]
pub struct FlashLoan {
    pub asset: Address,
    pub amount: i128,
    pub mode: u32,
    pub premium: i128,
    pub balance_before: i128, // the pool's balance before the asset was sent
}

/// Flash loan `amount` of `asset` to `receiver`. The receiver must return `amount` plus the
/// premium before its `execute_operation` callback returns.
///
/// Returns the premium paid
pub fn execute_flash_loan_simple(
    e: &Env,
    initiator: &Address,
    receiver: &Address,
    asset: &Address,
    amount: i128,
    params: &Bytes,
) -> i128 {
    let premiums = execute_flash_loan(
        e,
        initiator,
        receiver,
        &vec![e, asset.clone()],
        &vec![e, amount],
        &vec![e, MODE_REPAY],
        initiator,
        params,
    );
    premiums.get_unchecked(0)
}

/// Flash loan a batch of assets to `receiver`. Assets borrowed with [MODE_REPAY] must be
/// returned with the premium during the callback. Assets borrowed with [MODE_DEBT] are kept
/// by the receiver and opened as variable debt for `on_behalf_of`, which must be the
/// initiator or have approved it as a position manager.
///
/// Returns the premium charged for each asset
///
/// ### Panics
/// If the batch is malformed, a reserve can't be flash loaned, the receiver fails or rejects
/// the loan, the pool's balances are short after the callback, or the opened debt leaves
/// `on_behalf_of` unhealthy
#[allow(clippy::too_many_arguments)]
pub fn execute_flash_loan(
    e: &Env,
    initiator: &Address,
    receiver: &Address,
    assets: &Vec<Address>,
    amounts: &Vec<i128>,
    modes: &Vec<u32>,
    on_behalf_of: &Address,
    params: &Bytes,
) -> Vec<i128> {
    let mut pool = Pool::load(e);
    pool.require_not_paused(e);
    let loans = extend(e, &mut pool, initiator, receiver, assets, amounts, modes);

    let mut premiums: Vec<i128> = vec![e];
    for loan in loans.iter() {
        premiums.push_back(loan.premium);
    }
    let receiver_client = FlashLoanReceiverClient::new(e, receiver);
    match receiver_client.try_execute_operation(assets, amounts, &premiums, initiator, params) {
        Ok(Ok(true)) => {}
        Ok(Ok(false)) => panic_with_error!(e, PoolError::FlashLoanRejected),
        _ => panic_with_error!(e, PoolError::FlashLoanReceiverFailed),
    }

    settle(e, &mut pool, initiator, receiver, on_behalf_of, &loans);
    premiums
}

/// Validate the batch, record the pool's balances and send the assets to the receiver
fn extend(
    e: &Env,
    pool: &mut Pool,
    initiator: &Address,
    receiver: &Address,
    assets: &Vec<Address>,
    amounts: &Vec<i128>,
    modes: &Vec<u32>,
) -> Vec<FlashLoan> {
    if assets.is_empty() || assets.len() != amounts.len() || assets.len() != modes.len() {
        panic_with_error!(e, PoolError::BadRequest);
    }
    let premium_exempt = storage::is_flash_borrower(e, initiator);
    let pool_address = e.current_contract_address();

    let mut loans: Vec<FlashLoan> = vec![e];
    for i in 0..assets.len() {
        let asset = assets.get_unchecked(i);
        let amount = amounts.get_unchecked(i);
        let mode = modes.get_unchecked(i);
        if assets.first_index_of(&asset) != Some(i) {
            panic_with_error!(e, PoolError::BadRequest);
        }
        if mode != MODE_REPAY && mode != MODE_DEBT {
            panic_with_error!(e, PoolError::InvalidFlashLoanMode);
        }
        require_positive(e, &amount);

        let reserve = pool.load_reserve(e, &asset);
        reserve.require_active(e);
        if !reserve.config.flash_loanable {
            panic_with_error!(e, PoolError::FlashLoanDisabled);
        }
        reserve.require_liquidity(e, amount);
        pool.cache_reserve(reserve, true);

        let premium = if mode == MODE_REPAY && !premium_exempt {
            percent_mul(e, amount, i128(pool.config.flash_premium_total))
        } else {
            0
        };
        let token = TokenClient::new(e, &asset);
        let balance_before = token.balance(&pool_address);
        token.transfer(&pool_address, receiver, &amount);
        loans.push_back(FlashLoan {
            asset,
            amount,
            mode,
            premium,
            balance_before,
        });
    }
    loans
}

/// Verify the pool's balances after the callback and book the premiums and opened debt
fn settle(
    e: &Env,
    pool: &mut Pool,
    initiator: &Address,
    receiver: &Address,
    on_behalf_of: &Address,
    loans: &Vec<FlashLoan>,
) {
    let pool_address = e.current_contract_address();
    let mut debtor: Option<User> = None;
    for loan in loans.iter() {
        let balance_after = TokenClient::new(e, &loan.asset).balance(&pool_address);
        let mut reserve = pool.load_reserve(e, &loan.asset);
        if loan.mode == MODE_REPAY {
            if balance_after < loan.balance_before + loan.premium {
                panic_with_error!(e, PoolError::FlashLoanNotRepaid);
            }
            let to_protocol = percent_mul(
                e,
                loan.premium,
                i128(pool.config.flash_premium_to_protocol),
            );
            reserve.cumulate_to_liquidity_index(e, loan.premium - to_protocol);
            reserve.data.accrued_to_treasury += reserve.to_b_token(e, to_protocol);
            reserve.data.backing += loan.premium;
            reserve.update_rates(e);
        } else {
            if balance_after < loan.balance_before - loan.amount {
                panic_with_error!(e, PoolError::FlashLoanNotRepaid);
            }
            let mut user = match debtor.take() {
                Some(user) => user,
                None => {
                    require_position_authority(e, initiator, on_behalf_of);
                    User::load(e, on_behalf_of)
                }
            };
            let d_tokens_minted = open_debt(e, &mut reserve, &mut user, loan.amount);
            events::borrow(
                e,
                &loan.asset,
                on_behalf_of,
                receiver,
                loan.amount,
                d_tokens_minted,
                reserve.data.borrow_rate,
            );
            debtor = Some(user);
        }
        pool.cache_reserve(reserve, true);
        events::flash_loan(
            e,
            &loan.asset,
            receiver,
            initiator,
            loan.amount,
            loan.mode,
            loan.premium,
        );
    }

    if let Some(user) = debtor {
        let position_data = PositionData::calculate_from_positions(e, pool, &user.positions);
        position_data.require_within_ltv(e);
        position_data.require_healthy(e);
        user.store(e);
    }
    pool.store_cached_reserves(e);
}
