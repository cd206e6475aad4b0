/// User domain types
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::UserId;
use super::validation::{FieldErrorKind, ValidationErrors};

/// Minimum username length, in characters, after trimming
pub const USERNAME_MIN_LEN: usize = 3;

/// Whether `c` may appear in a username
///
/// Usernames end up in album ids, and album ids are URL path segments.
pub fn is_username_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// User account
///
/// Deliberately carries no password hash; see [`UserCredentials`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier (the username)
    pub id: UserId,

    /// Login name
    pub username: String,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

/// A user together with their stored password hash
///
/// Only returned by the explicit credential lookup used at login. Not
/// serializable, so it can't leak into a response body.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    /// The account
    pub user: User,

    /// bcrypt hash of the password
    pub password_hash: String,
}

/// Fields of a `User` that can fail validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserField {
    /// `username`
    Username,
}

/// Data for a user about to be created
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Trimmed login name; also becomes the id
    pub username: String,

    /// bcrypt hash of the password
    pub password_hash: String,
}

impl NewUser {
    /// Build a new user, trimming the username
    pub fn new(username: &str, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.trim().to_string(),
            password_hash: password_hash.into(),
        }
    }

    /// The id this user will be stored under
    pub fn id(&self) -> UserId {
        UserId::from_username(&self.username)
    }

    /// Validate a username
    pub fn validate_username(username: &str) -> Result<(), ValidationErrors<UserField>> {
        let mut errors = ValidationErrors::new();
        let username = username.trim();

        if username.is_empty() {
            errors.add(
                UserField::Username,
                FieldErrorKind::Required,
                "Username is required",
            );
        } else if username.chars().count() < USERNAME_MIN_LEN {
            errors.add(
                UserField::Username,
                FieldErrorKind::TooShort,
                "That's too short",
            );
        } else if !username.chars().all(is_username_char) {
            errors.add(
                UserField::Username,
                FieldErrorKind::InvalidCharacters,
                "Only letters, digits, '.', '_' and '-' are allowed",
            );
        }

        errors.into_result()
    }

    /// Validate this user's fields
    pub fn validate(&self) -> Result<(), ValidationErrors<UserField>> {
        Self::validate_username(&self.username)
    }
}
