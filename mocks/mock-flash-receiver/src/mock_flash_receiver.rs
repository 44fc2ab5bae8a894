use sep_41_token::TokenClient;
use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, panic_with_error, Address, Bytes, Env,
    Vec,
};

/// How the receiver settles a flash loan
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
#[repr(u32)]
pub enum Behavior {
    /// Return the amount and the premium
    Repay = 0,
    /// Return the amount without the premium
    Underpay = 1,
    /// Return the amount and the premium, then report failure
    Reject = 2,
    /// Trap during the callback
    Fail = 3,
    /// Keep the funds and report success
    Keep = 4,
}

#[derive(Clone)]
#[contracttype]
pub enum MockFlashReceiverDataKey {
    Pool,
    Behavior,
    // The initiator of the last flash loan received
    LastInitiator,
    // The params of the last flash loan received
    LastParams,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum MockFlashReceiverError {
    Trapped = 1,
}

/// ### Mock Flash Receiver
///
/// Flash loan receiver whose settlement behavior can be configured.
///
/// ### Dev
/// For testing purposes only!
#[contract]
pub struct MockFlashReceiver;

#[contractimpl]
impl MockFlashReceiver {
    pub fn initialize(e: Env, pool: Address) {
        e.storage()
            .instance()
            .set(&MockFlashReceiverDataKey::Pool, &pool);
        e.storage()
            .instance()
            .set(&MockFlashReceiverDataKey::Behavior, &Behavior::Repay);
    }

    pub fn set_behavior(e: Env, behavior: Behavior) {
        e.storage()
            .instance()
            .set(&MockFlashReceiverDataKey::Behavior, &behavior);
    }

    pub fn last_initiator(e: Env) -> Option<Address> {
        e.storage()
            .instance()
            .get(&MockFlashReceiverDataKey::LastInitiator)
    }

    pub fn last_params(e: Env) -> Option<Bytes> {
        e.storage()
            .instance()
            .get(&MockFlashReceiverDataKey::LastParams)
    }

    pub fn execute_operation(
        e: Env,
        assets: Vec<Address>,
        amounts: Vec<i128>,
        premiums: Vec<i128>,
        initiator: Address,
        params: Bytes,
    ) -> bool {
        let pool: Address = e
            .storage()
            .instance()
            .get(&MockFlashReceiverDataKey::Pool)
            .unwrap();
        let behavior: Behavior = e
            .storage()
            .instance()
            .get(&MockFlashReceiverDataKey::Behavior)
            .unwrap_or(Behavior::Repay);
        e.storage()
            .instance()
            .set(&MockFlashReceiverDataKey::LastInitiator, &initiator);
        e.storage()
            .instance()
            .set(&MockFlashReceiverDataKey::LastParams, &params);

        if behavior == Behavior::Fail {
            panic_with_error!(&e, MockFlashReceiverError::Trapped);
        }
        if behavior == Behavior::Keep {
            return true;
        }
        for i in 0..assets.len() {
            let mut amount = amounts.get_unchecked(i);
            if behavior != Behavior::Underpay {
                amount += premiums.get_unchecked(i);
            }
            TokenClient::new(&e, &assets.get_unchecked(i)).transfer(
                &e.current_contract_address(),
                &pool,
                &amount,
            );
        }
        behavior != Behavior::Reject
    }
}
