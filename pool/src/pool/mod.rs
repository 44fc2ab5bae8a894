mod borrow;
pub use borrow::execute_borrow;

mod collateral;
pub use collateral::{execute_set_collateral_usage, execute_set_position_manager};

mod config;
pub use config::{
    execute_clear_weather_event, execute_init_reserve, execute_initialize,
    execute_set_admin, execute_set_configurator, execute_set_emode_category,
    execute_set_flash_borrower, execute_set_futures_oracle, execute_set_paused,
    execute_set_seasonal_profile, execute_set_sub_commodity_profile, execute_set_weather_event,
    execute_update_commodity_params, execute_update_extended_params,
    execute_update_flash_premiums, execute_update_rate_params, execute_update_reserve,
};

mod emode;
pub use emode::execute_set_user_emode;

mod flash_loan;
pub use flash_loan::{execute_flash_loan, execute_flash_loan_simple, MODE_DEBT, MODE_REPAY};

mod health_factor;
pub use health_factor::{AccountData, PositionData};

mod interest;

mod liquidation;
pub use liquidation::{execute_liquidation_call, LiquidationResult};

#[allow(clippy::module_inception)]
mod pool;
pub use pool::Pool;

mod repay;
pub use repay::{execute_repay, execute_repay_with_b_tokens, execute_repay_with_permit};

mod reserve;
pub use reserve::Reserve;

mod supply;
pub use supply::execute_supply;

mod treasury;
pub use treasury::execute_mint_to_treasury;

mod user;
pub use user::{Positions, User};

mod user_config;

mod withdrawal;
pub use withdrawal::execute_withdraw;
