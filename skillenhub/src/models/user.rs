use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HubError;
use crate::models::core::UserId;

/// Role of a user account.
///
/// The `users.role` column is declared with the values `student` and `admin` and
/// defaults to `student`. The seed row shipped with the schema carries a blank
/// role, which is kept as `Unassigned` rather than being coerced into either
/// declared value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Student,
    Admin,
    /// Blank role, as found on the seed row
    #[serde(rename = "")]
    Unassigned,
}

impl Role {
    /// Returns the string representation used in storage and display.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Admin => "admin",
            Role::Unassigned => "",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "admin" => Ok(Role::Admin),
            "" => Ok(Role::Unassigned),
            _ => Err(HubError::InvalidEnumValue {
                field: "users.role",
                value: s.to_string(),
            }),
        }
    }
}

/// A row of the `users` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub profile_pic: Option<String>,
    pub bio: Option<String>,
    pub education: Option<String>,
    pub skills: Option<String>,
    pub github_link: Option<String>,
    pub linkedin_link: Option<String>,
    pub resume_file: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Values needed to insert a new user. Profile columns start out empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    /// `None` lets the column default (`student`) apply
    pub role: Option<Role>,
}

impl NewUser {
    #[must_use]
    pub fn new(full_name: &str, email: &str, password_hash: &str) -> Self {
        NewUser {
            full_name: full_name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role: None,
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }
}

/// Partial update of a user, `None` leaves the column untouched.
///
/// Nullable profile columns take an `Option<Option<_>>` so they may be cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub profile_pic: Option<Option<String>>,
    pub bio: Option<Option<String>>,
    pub education: Option<Option<String>>,
    pub skills: Option<Option<String>>,
    pub github_link: Option<Option<String>>,
    pub linkedin_link: Option<Option<String>>,
    pub resume_file: Option<Option<String>>,
}
