use serde::{Deserialize, Serialize};

use super::domain::{AccountId, Role};

/// Authenticated caller as resolved by the session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub account_id: AccountId,
    pub role: Role,
}

impl Actor {
    pub const fn new(account_id: AccountId, role: Role) -> Self {
        Self { account_id, role }
    }

    pub const fn admin(account_id: AccountId) -> Self {
        Self::new(account_id, Role::Admin)
    }

    pub const fn student(account_id: AccountId) -> Self {
        Self::new(account_id, Role::Student)
    }

    pub const fn company(account_id: AccountId) -> Self {
        Self::new(account_id, Role::Company)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation} requires the {required} role, account {account_id} is {actual}")]
pub struct AccessError {
    pub account_id: AccountId,
    pub operation: &'static str,
    pub required: Role,
    pub actual: Role,
}

/// Capability check run at the top of every role-restricted operation.
pub fn authorize(actor: &Actor, required: Role, operation: &'static str) -> Result<(), AccessError> {
    if actor.role == required {
        return Ok(());
    }

    tracing::warn!(
        account_id = actor.account_id.0,
        required = required.as_str(),
        actual = actor.role.as_str(),
        operation,
        "access denied"
    );
    Err(AccessError {
        account_id: actor.account_id,
        operation,
        required,
        actual: actor.role,
    })
}
