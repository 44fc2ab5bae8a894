mod futures_oracle;
pub use futures_oracle::{FuturesOracle, FuturesOracleClient};

mod flash_receiver;
pub use flash_receiver::{FlashLoanReceiver, FlashLoanReceiverClient};
