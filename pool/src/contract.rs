use crate::{
    auth::{require_position_authority, Authorized},
    pool::{self, AccountData, LiquidationResult, PositionData, Positions, Reserve},
    storage::{
        self, CommodityParams, EModeCategory, ExtendedParams, InterestRateParams, PoolConfig,
        ReserveConfig, SubCommodityProfile, WeatherEvent,
    },
};
use soroban_sdk::{contract, contractclient, contractimpl, Address, Bytes, Env, Symbol, Vec};

/// ### Pool
///
/// A lending pool for commodity backed assets with commodity aware interest rates.
#[contract]
pub struct PoolContract;

#[contractclient(name = "PoolClient")]
pub trait Pool {
    /// Initialize the pool
    ///
    /// ### Arguments
    /// * `admin` - The Address for the admin
    /// * `name` - The name of the pool
    /// * `oracle` - The contract address of the SEP-40 price oracle
    /// * `treasury` - The Address that receives the protocol's share of interest and fees
    /// * `flash_premium_total` - The flash loan premium in bps
    /// * `flash_premium_to_protocol` - The treasury's share of the flash loan premium in bps
    ///
    /// ### Panics
    /// If the pool is already initialized or a premium is over 100%
    fn initialize(
        e: Env,
        admin: Address,
        name: Symbol,
        oracle: Address,
        treasury: Address,
        flash_premium_total: u32,
        flash_premium_to_protocol: u32,
    );

    /// (Admin only) Set a new address as the admin of this pool
    ///
    /// ### Arguments
    /// * `new_admin` - The new admin address
    ///
    /// ### Panics
    /// If the caller is not the admin
    fn set_admin(e: Env, new_admin: Address);

    /// (Admin only) Grant or revoke the configurator role. Configurators can change reserve
    /// parameters but not the pool config.
    ///
    /// ### Arguments
    /// * `address` - The address to update
    /// * `enabled` - If the address holds the role
    fn set_configurator(e: Env, address: Address, enabled: bool);

    /// (Admin only) Pause or unpause every user action in the pool
    fn set_paused(e: Env, paused: bool);

    /// (Admin only) Set or remove the futures curve oracle used by the extended rate model
    fn set_futures_oracle(e: Env, futures_oracle: Option<Address>);

    /// (Admin only) Update the flash loan premium and the treasury's share of it, in bps
    ///
    /// ### Panics
    /// If either value is over 100%
    fn update_flash_premiums(e: Env, total: u32, to_protocol: u32);

    /// (Admin only) Exempt or stop exempting an address from the flash loan premium
    fn set_flash_borrower(e: Env, address: Address, enabled: bool);

    /// (Admin only) Initialize a reserve in the pool
    ///
    /// Returns the index of the reserve
    ///
    /// ### Arguments
    /// * `asset` - The underlying asset to add as a reserve
    /// * `config` - The ReserveConfig for the reserve
    /// * `rate_params` - The interest rate curve for the reserve
    ///
    /// ### Panics
    /// If the caller is not the admin, the reserve is already setup, or the config is invalid
    fn init_reserve(
        e: Env,
        asset: Address,
        config: ReserveConfig,
        rate_params: InterestRateParams,
    ) -> u32;

    /// (Configurator) Update the risk configuration of a reserve
    ///
    /// ### Arguments
    /// * `caller` - The admin or a configurator
    /// * `asset` - The underlying asset of the reserve
    /// * `config` - The new ReserveConfig. The index and decimals are ignored.
    fn update_reserve(e: Env, caller: Address, asset: Address, config: ReserveConfig);

    /// (Configurator) Update the interest rate curve of a reserve
    fn update_rate_params(e: Env, caller: Address, asset: Address, params: InterestRateParams);

    /// (Configurator) Update the commodity rate adjustments of a reserve
    fn update_commodity_params(e: Env, caller: Address, asset: Address, params: CommodityParams);

    /// (Configurator) Update the extended rate model inputs of a reserve
    fn update_extended_params(e: Env, caller: Address, asset: Address, params: ExtendedParams);

    /// (Configurator) Set the 12 monthly seasonal multipliers of a reserve, in bps
    fn set_seasonal_profile(e: Env, caller: Address, asset: Address, profile: Vec<u32>);

    /// (Configurator) Create or replace a sub-commodity seasonal profile
    fn set_sub_commodity_profile(e: Env, caller: Address, id: u32, profile: SubCommodityProfile);

    /// (Configurator) Set the active weather event for a region
    fn set_weather_event(e: Env, caller: Address, region: Symbol, event: WeatherEvent);

    /// (Configurator) Clear the weather event for a region
    fn clear_weather_event(e: Env, caller: Address, region: Symbol);

    /// (Configurator) Create or replace an E-Mode category
    fn set_emode_category(e: Env, caller: Address, id: u32, category: EModeCategory);

    /// Mint the interest and fees accrued to the treasury as supply of each asset
    ///
    /// Returns the b tokens minted per asset
    fn mint_to_treasury(e: Env, assets: Vec<Address>) -> Vec<i128>;

    /********* User Functions **********/

    /// Supply `amount` of `asset` from `from` and credit the position of `on_behalf_of`
    ///
    /// Returns the b tokens minted
    fn supply(e: Env, from: Address, asset: Address, amount: i128, on_behalf_of: Address) -> i128;

    /// Withdraw `amount` of `asset` from the position of `on_behalf_of` and send it to `to`.
    /// An amount of `i128::MAX` withdraws everything.
    ///
    /// Returns the amount withdrawn
    ///
    /// ### Arguments
    /// * `caller` - The user or an approved position manager of the user
    fn withdraw(
        e: Env,
        caller: Address,
        on_behalf_of: Address,
        asset: Address,
        amount: i128,
        to: Address,
    ) -> i128;

    /// Borrow `amount` of `asset` against the collateral of `on_behalf_of` and send it to `to`
    ///
    /// Returns the d tokens minted
    ///
    /// ### Arguments
    /// * `caller` - The user or an approved position manager of the user
    fn borrow(
        e: Env,
        caller: Address,
        on_behalf_of: Address,
        asset: Address,
        amount: i128,
        to: Address,
    ) -> i128;

    /// Repay up to `amount` of the `asset` debt of `on_behalf_of` with funds from `from`.
    /// An amount of `i128::MAX` repays everything.
    ///
    /// Returns the amount repaid
    fn repay(e: Env, from: Address, asset: Address, amount: i128, on_behalf_of: Address) -> i128;

    /// Repay like `repay`, with the pool pulling the funds from `from` through an allowance
    /// approved within the same invocation
    ///
    /// Returns the amount repaid
    fn repay_with_permit(
        e: Env,
        from: Address,
        asset: Address,
        amount: i128,
        on_behalf_of: Address,
        expiration_ledger: u32,
    ) -> i128;

    /// Repay up to `amount` of the `asset` debt of `from` with their supply of the same asset
    ///
    /// Returns the amount repaid
    fn repay_with_b_tokens(e: Env, from: Address, asset: Address, amount: i128) -> i128;

    /// Enable or disable the supply of `asset` as collateral for `user`
    fn set_collateral(e: Env, caller: Address, user: Address, asset: Address, enabled: bool);

    /// Select the E-Mode category of `user`, 0 for none
    fn set_user_emode(e: Env, caller: Address, user: Address, category: u32);

    /// Approve or revoke `manager` as a position manager of `user`
    fn approve_position_manager(e: Env, user: Address, manager: Address, approved: bool);

    /// Stop managing the positions of `user`
    fn renounce_position_manager(e: Env, manager: Address, user: Address);

    /***** Liquidation Functions *****/

    /// Liquidate an unhealthy position by repaying `debt_to_cover` of its `debt_asset` debt in
    /// exchange for `collateral_asset` plus the liquidation bonus. A `debt_to_cover` of
    /// `i128::MAX` covers the maximum the close factor allows.
    ///
    /// ### Arguments
    /// * `receive_b_tokens` - Receive the collateral as supply instead of underlying
    ///
    /// ### Panics
    /// If the position is healthy or holds no debt or collateral in the selected assets
    fn liquidation_call(
        e: Env,
        liquidator: Address,
        user: Address,
        collateral_asset: Address,
        debt_asset: Address,
        debt_to_cover: i128,
        receive_b_tokens: bool,
    ) -> LiquidationResult;

    /***** Flash Loan Functions *****/

    /// Flash loan `amount` of `asset` to `receiver`, which must return it with the premium
    /// before its callback returns
    ///
    /// Returns the premium paid
    fn flash_loan_simple(
        e: Env,
        initiator: Address,
        receiver: Address,
        asset: Address,
        amount: i128,
        params: Bytes,
    ) -> i128;

    /// Flash loan a batch of assets to `receiver`. Mode 0 loans must be returned with the
    /// premium, mode 2 loans are opened as variable debt of `on_behalf_of`.
    ///
    /// Returns the premium charged per asset
    #[allow(clippy::too_many_arguments)]
    fn flash_loan(
        e: Env,
        initiator: Address,
        receiver: Address,
        assets: Vec<Address>,
        amounts: Vec<i128>,
        modes: Vec<u32>,
        on_behalf_of: Address,
        params: Bytes,
    ) -> Vec<i128>;

    /***** Views *****/

    /// Fetch a reserve, accrued to the current ledger timestamp
    fn get_reserve(e: Env, asset: Address) -> Reserve;

    /// Fetch the underlying assets of the reserves in index order
    fn get_reserve_list(e: Env) -> Vec<Address>;

    /// Fetch the positions for an address
    fn get_positions(e: Env, address: Address) -> Positions;

    /// Fetch the collateral, debt and health factor of an address
    fn get_user_account_data(e: Env, address: Address) -> AccountData;

    /// Fetch an E-Mode category
    fn get_emode_category(e: Env, id: u32) -> Option<EModeCategory>;

    /// Fetch the pool config
    fn get_config(e: Env) -> PoolConfig;
}

#[contractimpl]
impl Pool for PoolContract {
    fn initialize(
        e: Env,
        admin: Address,
        name: Symbol,
        oracle: Address,
        treasury: Address,
        flash_premium_total: u32,
        flash_premium_to_protocol: u32,
    ) {
        storage::extend_instance(&e);

        pool::execute_initialize(
            &e,
            &admin,
            &name,
            &oracle,
            &treasury,
            flash_premium_total,
            flash_premium_to_protocol,
        );
    }

    fn set_admin(e: Env, new_admin: Address) {
        storage::extend_instance(&e);
        let auth = Authorized::admin(&e);

        pool::execute_set_admin(&e, &auth, &new_admin);
    }

    fn set_configurator(e: Env, address: Address, enabled: bool) {
        storage::extend_instance(&e);
        let auth = Authorized::admin(&e);

        pool::execute_set_configurator(&e, &auth, &address, enabled);
    }

    fn set_paused(e: Env, paused: bool) {
        storage::extend_instance(&e);
        let auth = Authorized::admin(&e);

        pool::execute_set_paused(&e, &auth, paused);
    }

    fn set_futures_oracle(e: Env, futures_oracle: Option<Address>) {
        storage::extend_instance(&e);
        let auth = Authorized::admin(&e);

        pool::execute_set_futures_oracle(&e, &auth, &futures_oracle);
    }

    fn update_flash_premiums(e: Env, total: u32, to_protocol: u32) {
        storage::extend_instance(&e);
        let auth = Authorized::admin(&e);

        pool::execute_update_flash_premiums(&e, &auth, total, to_protocol);
    }

    fn set_flash_borrower(e: Env, address: Address, enabled: bool) {
        storage::extend_instance(&e);
        let auth = Authorized::admin(&e);

        pool::execute_set_flash_borrower(&e, &auth, &address, enabled);
    }

    fn init_reserve(
        e: Env,
        asset: Address,
        config: ReserveConfig,
        rate_params: InterestRateParams,
    ) -> u32 {
        storage::extend_instance(&e);
        let auth = Authorized::admin(&e);

        pool::execute_init_reserve(&e, &auth, &asset, &config, &rate_params)
    }

    fn update_reserve(e: Env, caller: Address, asset: Address, config: ReserveConfig) {
        storage::extend_instance(&e);
        let auth = Authorized::configurator(&e, &caller);

        pool::execute_update_reserve(&e, &auth, &asset, &config);
    }

    fn update_rate_params(e: Env, caller: Address, asset: Address, params: InterestRateParams) {
        storage::extend_instance(&e);
        let auth = Authorized::configurator(&e, &caller);

        pool::execute_update_rate_params(&e, &auth, &asset, &params);
    }

    fn update_commodity_params(e: Env, caller: Address, asset: Address, params: CommodityParams) {
        storage::extend_instance(&e);
        let auth = Authorized::configurator(&e, &caller);

        pool::execute_update_commodity_params(&e, &auth, &asset, &params);
    }

    fn update_extended_params(e: Env, caller: Address, asset: Address, params: ExtendedParams) {
        storage::extend_instance(&e);
        let auth = Authorized::configurator(&e, &caller);

        pool::execute_update_extended_params(&e, &auth, &asset, &params);
    }

    fn set_seasonal_profile(e: Env, caller: Address, asset: Address, profile: Vec<u32>) {
        storage::extend_instance(&e);
        let auth = Authorized::configurator(&e, &caller);

        pool::execute_set_seasonal_profile(&e, &auth, &asset, &profile);
    }

    fn set_sub_commodity_profile(e: Env, caller: Address, id: u32, profile: SubCommodityProfile) {
        storage::extend_instance(&e);
        let auth = Authorized::configurator(&e, &caller);

        pool::execute_set_sub_commodity_profile(&e, &auth, id, &profile);
    }

    fn set_weather_event(e: Env, caller: Address, region: Symbol, event: WeatherEvent) {
        storage::extend_instance(&e);
        let auth = Authorized::configurator(&e, &caller);

        pool::execute_set_weather_event(&e, &auth, &region, &event);
    }

    fn clear_weather_event(e: Env, caller: Address, region: Symbol) {
        storage::extend_instance(&e);
        let auth = Authorized::configurator(&e, &caller);

        pool::execute_clear_weather_event(&e, &auth, &region);
    }

    fn set_emode_category(e: Env, caller: Address, id: u32, category: EModeCategory) {
        storage::extend_instance(&e);
        let auth = Authorized::configurator(&e, &caller);

        pool::execute_set_emode_category(&e, &auth, id, &category);
    }

    fn mint_to_treasury(e: Env, assets: Vec<Address>) -> Vec<i128> {
        storage::extend_instance(&e);

        pool::execute_mint_to_treasury(&e, &assets)
    }

    /********* User Functions **********/

    fn supply(e: Env, from: Address, asset: Address, amount: i128, on_behalf_of: Address) -> i128 {
        storage::extend_instance(&e);
        from.require_auth();

        pool::execute_supply(&e, &from, &asset, amount, &on_behalf_of)
    }

    fn withdraw(
        e: Env,
        caller: Address,
        on_behalf_of: Address,
        asset: Address,
        amount: i128,
        to: Address,
    ) -> i128 {
        storage::extend_instance(&e);
        caller.require_auth();
        require_position_authority(&e, &caller, &on_behalf_of);

        pool::execute_withdraw(&e, &on_behalf_of, &asset, amount, &to)
    }

    fn borrow(
        e: Env,
        caller: Address,
        on_behalf_of: Address,
        asset: Address,
        amount: i128,
        to: Address,
    ) -> i128 {
        storage::extend_instance(&e);
        caller.require_auth();
        require_position_authority(&e, &caller, &on_behalf_of);

        pool::execute_borrow(&e, &on_behalf_of, &asset, amount, &to)
    }

    fn repay(e: Env, from: Address, asset: Address, amount: i128, on_behalf_of: Address) -> i128 {
        storage::extend_instance(&e);
        from.require_auth();

        pool::execute_repay(&e, &from, &asset, amount, &on_behalf_of)
    }

    fn repay_with_permit(
        e: Env,
        from: Address,
        asset: Address,
        amount: i128,
        on_behalf_of: Address,
        expiration_ledger: u32,
    ) -> i128 {
        storage::extend_instance(&e);
        from.require_auth();

        pool::execute_repay_with_permit(
            &e,
            &from,
            &asset,
            amount,
            &on_behalf_of,
            expiration_ledger,
        )
    }

    fn repay_with_b_tokens(e: Env, from: Address, asset: Address, amount: i128) -> i128 {
        storage::extend_instance(&e);
        from.require_auth();

        pool::execute_repay_with_b_tokens(&e, &from, &asset, amount)
    }

    fn set_collateral(e: Env, caller: Address, user: Address, asset: Address, enabled: bool) {
        storage::extend_instance(&e);
        caller.require_auth();
        require_position_authority(&e, &caller, &user);

        pool::execute_set_collateral_usage(&e, &user, &asset, enabled);
    }

    fn set_user_emode(e: Env, caller: Address, user: Address, category: u32) {
        storage::extend_instance(&e);
        caller.require_auth();
        require_position_authority(&e, &caller, &user);

        pool::execute_set_user_emode(&e, &user, category);
    }

    fn approve_position_manager(e: Env, user: Address, manager: Address, approved: bool) {
        storage::extend_instance(&e);
        user.require_auth();

        pool::execute_set_position_manager(&e, &user, &manager, approved);
    }

    fn renounce_position_manager(e: Env, manager: Address, user: Address) {
        storage::extend_instance(&e);
        manager.require_auth();

        pool::execute_set_position_manager(&e, &user, &manager, false);
    }

    /***** Liquidation Functions *****/

    fn liquidation_call(
        e: Env,
        liquidator: Address,
        user: Address,
        collateral_asset: Address,
        debt_asset: Address,
        debt_to_cover: i128,
        receive_b_tokens: bool,
    ) -> LiquidationResult {
        storage::extend_instance(&e);
        liquidator.require_auth();

        pool::execute_liquidation_call(
            &e,
            &liquidator,
            &user,
            &collateral_asset,
            &debt_asset,
            debt_to_cover,
            receive_b_tokens,
        )
    }

    /***** Flash Loan Functions *****/

    fn flash_loan_simple(
        e: Env,
        initiator: Address,
        receiver: Address,
        asset: Address,
        amount: i128,
        params: Bytes,
    ) -> i128 {
        storage::extend_instance(&e);
        initiator.require_auth();

        pool::execute_flash_loan_simple(&e, &initiator, &receiver, &asset, amount, &params)
    }

    #[allow(clippy::too_many_arguments)]
    fn flash_loan(
        e: Env,
        initiator: Address,
        receiver: Address,
        assets: Vec<Address>,
        amounts: Vec<i128>,
        modes: Vec<u32>,
        on_behalf_of: Address,
        params: Bytes,
    ) -> Vec<i128> {
        storage::extend_instance(&e);
        initiator.require_auth();

        pool::execute_flash_loan(
            &e,
            &initiator,
            &receiver,
            &assets,
            &amounts,
            &modes,
            &on_behalf_of,
            &params,
        )
    }

    /***** Views *****/

    fn get_reserve(e: Env, asset: Address) -> Reserve {
        Reserve::load(&e, &asset)
    }

    fn get_reserve_list(e: Env) -> Vec<Address> {
        storage::get_res_list(&e)
    }

    fn get_positions(e: Env, address: Address) -> Positions {
        storage::get_user_positions(&e, &address)
    }

    fn get_user_account_data(e: Env, address: Address) -> AccountData {
        let mut pool = pool::Pool::load(&e);
        let positions = storage::get_user_positions(&e, &address);
        PositionData::calculate_from_positions(&e, &mut pool, &positions).as_account_data(&e)
    }

    fn get_emode_category(e: Env, id: u32) -> Option<EModeCategory> {
        storage::get_emode_category(&e, id)
    }

    fn get_config(e: Env) -> PoolConfig {
        storage::get_pool_config(&e)
    }
}
