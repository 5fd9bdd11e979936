//! Authenticated caller identity.
//!
//! Supplied by the identity provider and trusted as-is by every messaging
//! operation.

use crate::db::{Role, User};

/// The authenticated user performing an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// User ID.
    pub id: i64,
    /// Username.
    pub username: String,
    /// Role granted by the identity provider.
    pub role: Role,
}

impl Identity {
    /// Create a new identity.
    pub fn new(id: i64, username: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            role,
        }
    }

    /// Whether the caller may use the administrative message listing.
    pub fn is_privileged(&self) -> bool {
        self.role.can_access(Role::Staff)
    }

    /// Whether the caller may read content of messages they are not part of.
    pub fn can_read_all_content(&self) -> bool {
        self.role.can_access(Role::Superuser)
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.username.clone(), user.role)
    }
}
