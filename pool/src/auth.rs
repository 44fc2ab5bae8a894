use soroban_sdk::{panic_with_error, Address, Env};

use crate::{errors::PoolError, storage};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Admin,
    Configurator,
}

/// A caller whose signature and role have been verified at the contract entry point.
///
/// Handlers that change pool or reserve parameters take an `Authorized` and check the role they
/// require before touching any state. The admin satisfies every role.
#[derive(Clone)]
pub struct Authorized {
    address: Address,
    role: Role,
}

impl Authorized {
    /// Authenticate the pool admin
    ///
    /// ### Panics
    /// If the admin did not authorize the invocation
    pub fn admin(e: &Env) -> Self {
        let admin = storage::get_admin(e);
        admin.require_auth();
        Authorized {
            address: admin,
            role: Role::Admin,
        }
    }

    /// Authenticate `caller` as the admin or a configurator
    ///
    /// ### Panics
    /// If `caller` did not authorize the invocation or holds neither role
    pub fn configurator(e: &Env, caller: &Address) -> Self {
        caller.require_auth();
        let role = if *caller == storage::get_admin(e) {
            Role::Admin
        } else if storage::is_configurator(e, caller) {
            Role::Configurator
        } else {
            panic_with_error!(e, PoolError::UnauthorizedError);
        };
        Authorized {
            address: caller.clone(),
            role,
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Require that the caller holds `role`
    ///
    /// ### Panics
    /// If the caller's role does not satisfy `role`
    pub fn require(&self, e: &Env, role: Role) {
        let allowed = match role {
            Role::Admin => self.role == Role::Admin,
            Role::Configurator => true,
        };
        if !allowed {
            panic_with_error!(e, PoolError::UnauthorizedError);
        }
    }
}

/// Require that `caller` may act on the positions of `user`. A user always may, and any
/// address the user approved as a position manager may.
///
/// ### Panics
/// If `caller` is not `user` and is not an approved manager of `user`
pub fn require_position_authority(e: &Env, caller: &Address, user: &Address) {
    if caller != user && !storage::is_manager(e, user, caller) {
        panic_with_error!(e, PoolError::UnauthorizedError);
    }
}
