use crate::error::{AppResult, DomainError};
use crate::models::types::UserId;
use crate::models::user::User;
use serde::{Deserialize, Serialize};

/// The user on whose behalf an action runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub id: UserId,
    pub is_admin: bool,
}

impl Caller {
    pub fn admin(id: UserId) -> Self {
        Self { id, is_admin: true }
    }

    pub fn member(id: UserId) -> Self {
        Self { id, is_admin: false }
    }

    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin {
            Ok(())
        } else {
            Err(DomainError::PermissionDenied)
        }
    }

    /// Admins manage everyone, members only themselves.
    pub fn require_manage(&self, target: UserId) -> AppResult<()> {
        if self.is_admin || self.id == target {
            Ok(())
        } else {
            Err(DomainError::PermissionDenied)
        }
    }
}

impl From<&User> for Caller {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            is_admin: user.is_admin,
        }
    }
}
