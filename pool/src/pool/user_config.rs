/**
 *  Adapted from: https://github.com/aave/aave-v3-core/blob/master/contracts/protocol/libraries/configuration/UserConfiguration.sol
 */

/// Two bits per reserve: bit `index * 2` is set while the user borrows the reserve and bit
/// `index * 2 + 1` is set while the user's supply of the reserve counts as collateral.
pub trait UserConfigurator {
    /// Determine is a reserve is being used by a user, where used means
    /// the asset is used as collateral or borrowed by the user
    ///
    /// ### Arguments
    /// * `res_index` - The index of the reserve to check
    fn is_using_reserve(&self, res_index: u32) -> bool;

    /// Checks if the user is borrowing a reserve
    ///
    /// ### Arguments
    /// * `res_index` - The index of the reserve to check
    fn is_borrowing(&self, res_index: u32) -> bool;

    /// Checks if the user is using the reserve as collateral
    ///
    /// ### Arguments
    /// * `res_index` - The index of the reserve to check
    fn is_collateral(&self, res_index: u32) -> bool;

    /// Set the user config based on the new borrowing status of the reserve at the res_index
    ///
    /// ### Arguments
    /// * `res_index` - The index of the reserve
    /// * `borrowing` - If the user is borrowing the reserve
    fn set_borrowing(&mut self, res_index: u32, borrowing: bool);

    /// Set the user config based on the new collateral status of the reserve at the res_index
    ///
    /// ### Arguments
    /// * `res_index` - The index of the reserve
    /// * `collateral` - If the user is using the reserve as collateral
    fn set_collateral(&mut self, res_index: u32, collateral: bool);

    /// Checks if the user is borrowing any reserve
    fn is_borrowing_any(&self) -> bool;

    /// Checks if the user is neither borrowing nor using collateral
    fn is_empty(&self) -> bool;
}

const BORROWING_MASK: u128 = 0x5555_5555_5555_5555_5555_5555_5555_5555;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UserConfig {
    pub config: u128,
}

impl UserConfig {
    pub fn new(user_config: u128) -> UserConfig {
        UserConfig {
            config: user_config,
        }
    }
}

impl UserConfigurator for UserConfig {
    fn is_using_reserve(&self, res_index: u32) -> bool {
        let to_res_shift = res_index * 2;
        (self.config >> to_res_shift) & 0b11 != 0
    }

    fn is_borrowing(&self, res_index: u32) -> bool {
        let to_res_shift = res_index * 2;
        (self.config >> to_res_shift) & 0b01 != 0
    }

    fn is_collateral(&self, res_index: u32) -> bool {
        let to_res_shift = res_index * 2;
        (self.config >> to_res_shift) & 0b10 != 0
    }

    fn set_borrowing(&mut self, res_index: u32, borrowing: bool) {
        let res_borrow_bit = 1u128 << (res_index * 2);
        if borrowing {
            self.config |= res_borrow_bit;
        } else {
            self.config &= !res_borrow_bit;
        }
    }

    fn set_collateral(&mut self, res_index: u32, collateral: bool) {
        let res_collateral_bit = 1u128 << (res_index * 2 + 1);
        if collateral {
            self.config |= res_collateral_bit;
        } else {
            self.config &= !res_collateral_bit;
        }
    }

    fn is_borrowing_any(&self) -> bool {
        self.config & BORROWING_MASK != 0
    }

    fn is_empty(&self) -> bool {
        self.config == 0
    }
}

/// Check if the reserve at `res_index` is set in a one bit per reserve bitmap
pub fn is_reserve_in_bitmap(bitmap: u128, res_index: u32) -> bool {
    res_index < 128 && (bitmap >> res_index) & 1 != 0
}
