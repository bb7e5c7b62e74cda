//! Explicit authorization context.
//!
//! Operations never consult ambient "current user" state; the acting user
//! and their role are passed in on every call.

use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// Role of an acting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Regular authenticated member
    Member,
    /// Administrator with moderation privileges
    Admin,
}

/// The authenticated user performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// The acting user
    pub id: UserId,
    /// Their role
    pub role: Role,
}

impl Actor {
    /// Create a member-level actor.
    pub fn member(id: UserId) -> Self {
        Self {
            id,
            role: Role::Member,
        }
    }

    /// Create an admin-level actor.
    pub fn admin(id: UserId) -> Self {
        Self {
            id,
            role: Role::Admin,
        }
    }

    /// Whether this actor holds admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
