use soroban_sdk::{contracttype, Address, Env, Map};

use crate::{storage, validator::require_nonnegative};

use super::{
    user_config::{UserConfig, UserConfigurator},
    Reserve,
};

/// A user / contracts position's with the pool, stored as scaled b and d token balances
#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct Positions {
    pub config: u128,                // Bitmap of borrowed and collateral reserves
    pub e_mode: u32,                 // The selected E-Mode category, 0 for none
    pub liabilities: Map<u32, i128>, // Map of Reserve Index to liability share balance
    pub supply: Map<u32, i128>,      // Map of Reserve Index to supply share balance
}

impl Positions {
    /// Create an empty Positions object in the environment
    pub fn env_default(e: &Env) -> Self {
        Positions {
            config: 0,
            e_mode: 0,
            liabilities: Map::new(e),
            supply: Map::new(e),
        }
    }

    pub fn user_config(&self) -> UserConfig {
        UserConfig::new(self.config)
    }
}

/// A user / contracts position's with the pool
#[derive(Clone)]
pub struct User {
    pub address: Address,
    pub positions: Positions,
}

impl User {
    /// Load the User's positions from the ledger
    pub fn load(e: &Env, address: &Address) -> Self {
        User {
            address: address.clone(),
            positions: storage::get_user_positions(e, address),
        }
    }

    /// Store the user's positions to the ledger
    pub fn store(&self, e: &Env) {
        storage::set_user_positions(e, &self.address, &self.positions);
    }

    /// Get the debtToken position for the reserve at the given index
    pub fn get_liabilities(&self, reserve_index: u32) -> i128 {
        self.positions.liabilities.get(reserve_index).unwrap_or(0)
    }

    /// Add liabilities to the position expressed in debtTokens. Marks the reserve as borrowed
    /// and updates the reserve's d_supply.
    pub fn add_liabilities(&mut self, reserve: &mut Reserve, amount: i128) {
        let balance = self.get_liabilities(reserve.config.index);
        self.positions
            .liabilities
            .set(reserve.config.index, balance + amount);
        self.set_borrowing(reserve.config.index, true);
        reserve.data.d_supply += amount;
    }

    /// Remove liabilities from the position expressed in debtTokens. Clears the borrowed flag
    /// once the balance reaches zero and updates the reserve's d_supply.
    pub fn remove_liabilities(&mut self, e: &Env, reserve: &mut Reserve, amount: i128) {
        let balance = self.get_liabilities(reserve.config.index);
        let new_balance = balance - amount;
        require_nonnegative(e, &new_balance);
        if new_balance == 0 {
            self.positions.liabilities.remove(reserve.config.index);
            self.set_borrowing(reserve.config.index, false);
        } else {
            self.positions
                .liabilities
                .set(reserve.config.index, new_balance);
        }
        reserve.data.d_supply -= amount;
    }

    /// Get the b-token supply position for the reserve at the given index
    pub fn get_supply(&self, reserve_index: u32) -> i128 {
        self.positions.supply.get(reserve_index).unwrap_or(0)
    }

    /// Add supply to the position expressed in bTokens and update the reserve's b_supply.
    pub fn add_supply(&mut self, reserve: &mut Reserve, amount: i128) {
        let balance = self.get_supply(reserve.config.index);
        self.positions
            .supply
            .set(reserve.config.index, balance + amount);
        reserve.data.b_supply += amount;
    }

    /// Remove supply from the position expressed in bTokens. Clears the collateral flag once
    /// the balance reaches zero and updates the reserve's b_supply.
    pub fn remove_supply(&mut self, e: &Env, reserve: &mut Reserve, amount: i128) {
        let balance = self.get_supply(reserve.config.index);
        let new_balance = balance - amount;
        require_nonnegative(e, &new_balance);
        if new_balance == 0 {
            self.positions.supply.remove(reserve.config.index);
            self.set_collateral(reserve.config.index, false);
        } else {
            self.positions.supply.set(reserve.config.index, new_balance);
        }
        reserve.data.b_supply -= amount;
    }

    /********** Configuration **********/

    pub fn is_collateral(&self, reserve_index: u32) -> bool {
        self.positions.user_config().is_collateral(reserve_index)
    }

    pub fn is_borrowing(&self, reserve_index: u32) -> bool {
        self.positions.user_config().is_borrowing(reserve_index)
    }

    pub fn is_borrowing_any(&self) -> bool {
        self.positions.user_config().is_borrowing_any()
    }

    pub fn set_collateral(&mut self, reserve_index: u32, collateral: bool) {
        let mut config = self.positions.user_config();
        config.set_collateral(reserve_index, collateral);
        self.positions.config = config.config;
    }

    fn set_borrowing(&mut self, reserve_index: u32, borrowing: bool) {
        let mut config = self.positions.user_config();
        config.set_borrowing(reserve_index, borrowing);
        self.positions.config = config.config;
    }
}
