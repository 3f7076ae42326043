//! User model
//!
//! Users are created by an external registration flow. This service only
//! reads them to check credentials and resolve sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registered user.
///
/// A user can log in with either their email or their nickname.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Email address (unique)
    pub email: String,
    /// Nickname (unique)
    pub nickname: String,
    /// Password hash (argon2 PHC string or bcrypt)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new User with the given parameters.
    ///
    /// The password must already be hashed; see `services::password::hash_password()`.
    pub fn new(email: String, nickname: String, password_hash: String) -> Self {
        Self {
            id: 0, // Will be set by the database
            email,
            nickname,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new(
            "alice@example.com".to_string(),
            "alice".to_string(),
            "secret-hash".to_string(),
        );

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("password_hash"));
    }
}
