//! Session model

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Persisted login session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque session token (also the primary key)
    pub token: String,
    /// Owning user ID
    pub user_id: i64,
    /// Absolute expiration timestamp
    pub expires_at: DateTime<Utc>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a session that expires `lifetime` after `now`.
    ///
    /// The expiry is fixed here and never changes afterwards. Returns `None`
    /// when `now + lifetime` is outside the representable date range.
    pub fn new(token: String, user_id: i64, now: DateTime<Utc>, lifetime: Duration) -> Option<Self> {
        let expires_at = now.checked_add_signed(lifetime)?;

        Some(Self {
            token,
            user_id,
            expires_at,
            created_at: now,
        })
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Check expiry against an explicit point in time
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// Outcome of looking up a session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// Token maps to a session that has not expired
    Active(Session),
    /// Token maps to a session whose expiry has passed
    Expired(Session),
    /// No token was supplied, or no session matches it
    Absent,
}

impl SessionStatus {
    /// Only an active session authenticates the caller
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionStatus::Active(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_expiring_in(lifetime: Duration) -> Session {
        Session::new("token".to_string(), 1, Utc::now(), lifetime).unwrap()
    }

    #[test]
    fn test_new_sets_expiry_from_lifetime() {
        let now = Utc::now();
        let session = Session::new("abc".to_string(), 7, now, Duration::minutes(15)).unwrap();

        assert_eq!(session.created_at, now);
        assert_eq!(session.expires_at - session.created_at, Duration::seconds(900));
        assert_eq!(session.user_id, 7);
    }

    #[test]
    fn test_new_rejects_unrepresentable_expiry() {
        // Roughly a million years, past chrono's maximum date
        let lifetime = Duration::days(365 * 1_000_000);

        assert!(Session::new("abc".to_string(), 1, Utc::now(), lifetime).is_none());
    }

    #[test]
    fn test_is_expired() {
        assert!(!session_expiring_in(Duration::hours(1)).is_expired());
        assert!(session_expiring_in(Duration::hours(-1)).is_expired());
    }

    #[test]
    fn test_is_expired_at_boundary() {
        let now = Utc::now();
        let session = Session::new("abc".to_string(), 1, now, Duration::seconds(60)).unwrap();

        assert!(!session.is_expired_at(session.expires_at));
        assert!(session.is_expired_at(session.expires_at + Duration::milliseconds(1)));
    }

    #[test]
    fn test_status_is_authenticated() {
        let session = session_expiring_in(Duration::hours(1));

        assert!(SessionStatus::Active(session.clone()).is_authenticated());
        assert!(!SessionStatus::Expired(session).is_authenticated());
        assert!(!SessionStatus::Absent.is_authenticated());
    }
}
