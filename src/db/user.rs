//! User model for vimi.
//!
//! Users are owned by the identity provider; this is the local directory
//! used to resolve recipient usernames and to label senders and recipients.

use std::fmt;
use std::str::FromStr;

/// Account role, ordered by privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Role {
    /// Regular forum member.
    #[default]
    Member = 0,
    /// Staff account with access to the administrative listing.
    Staff = 1,
    /// Superuser, the only role allowed to read other people's messages.
    Superuser = 2,
}

impl Role {
    /// Convert role to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Staff => "staff",
            Role::Superuser => "superuser",
        }
    }

    /// Check if this role has at least the required permission level.
    ///
    /// # Examples
    ///
    /// ```
    /// use vimi::db::Role;
    ///
    /// assert!(Role::Superuser.can_access(Role::Staff));
    /// assert!(Role::Staff.can_access(Role::Staff));
    /// assert!(!Role::Member.can_access(Role::Staff));
    /// ```
    pub fn can_access(&self, required: Role) -> bool {
        *self >= required
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "member" => Ok(Role::Member),
            "staff" => Ok(Role::Staff),
            "superuser" => Ok(Role::Superuser),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

/// A registered user.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID (shared with the identity provider).
    pub id: i64,
    /// Username (unique, matched exactly).
    pub username: String,
    /// Email address (optional).
    pub email: Option<String>,
    /// Account role.
    pub role: Role,
    /// Whether the account is active.
    pub is_active: bool,
    /// Account creation timestamp.
    pub created_at: String,
}

impl User {
    /// Check if this user has at least the required role level.
    pub fn has_role(&self, required: Role) -> bool {
        self.role >= required
    }
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Username.
    pub username: String,
    /// Email address (optional).
    pub email: Option<String>,
    /// User role (defaults to Member).
    pub role: Role,
}

impl NewUser {
    /// Create a new member.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: None,
            role: Role::Member,
        }
    }

    /// Set the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}
