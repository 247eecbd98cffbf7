//! Users, roles and the acting principal
//!
//! Every mutating operation in the domain crates receives an [`Actor`]
//! describing who is performing it. Ownership checks compare the actor's
//! id against the reporter or claimant of a record; admins bypass them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::identifiers::UserId;

/// Role held by a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            other => Err(CoreError::InvalidRole(other.to_string())),
        }
    }
}

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with the current timestamp
    pub fn new(email: impl Into<String>, name: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: UserId::new_v7(),
            email: email.into(),
            name: name.into(),
            role,
            created_at: Utc::now(),
        }
    }

    /// Returns the actor view of this user
    pub fn as_actor(&self) -> Actor {
        Actor {
            user_id: self.id,
            display_name: self.name.clone(),
            role: self.role,
        }
    }
}

/// The authenticated principal performing an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub display_name: String,
    pub role: UserRole,
}

impl Actor {
    pub fn new(user_id: UserId, display_name: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// True if the actor is `owner` or holds the admin role
    pub fn owns_or_admin(&self, owner: UserId) -> bool {
        self.user_id == owner || self.is_admin()
    }
}
