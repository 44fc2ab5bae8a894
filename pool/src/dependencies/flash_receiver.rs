use soroban_sdk::{contractclient, Address, Bytes, Env, Vec};

/// Interface a contract must implement to receive flash loans from the pool
#[contractclient(name = "FlashLoanReceiverClient")]
pub trait FlashLoanReceiver {
    /// Called after the pool transferred `amounts` of `assets` to the receiver.
    ///
    /// Before returning, the receiver must transfer `amount + premium` of each asset borrowed
    /// without opening debt back to the pool. Returns true if the operation succeeded.
    fn execute_operation(
        e: Env,
        assets: Vec<Address>,
        amounts: Vec<i128>,
        premiums: Vec<i128>,
        initiator: Address,
        params: Bytes,
    ) -> bool;
}
