//! Identity user entity, claims and lockout rules.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Normalize an email for lookups and uniqueness checks.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Identity error reported when the email is already registered.
pub fn duplicate_email_message(email: &str) -> String {
    format!("Email '{}' is already taken.", email)
}

/// Identity user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub normalized_email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email_confirmed: bool,
    pub lockout_enabled: bool,
    pub access_failed_count: i32,
    pub lockout_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lockout state as stored right after a failed sign-in was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessFailure {
    pub access_failed_count: i32,
    pub lockout_end: Option<DateTime<Utc>>,
}

impl AccessFailure {
    /// Counters as stored after a failed sign-in. A lockout end that has
    /// already passed is dropped.
    pub fn observed(
        access_failed_count: i32,
        lockout_end: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            access_failed_count,
            lockout_end: lockout_end.filter(|end| *end > now),
        }
    }

    /// Whether the account is locked after this failure.
    pub fn locked(&self) -> bool {
        self.lockout_end.is_some()
    }
}

impl User {
    /// Create a newly registered user. Email confirmation is not required,
    /// so the flag starts set.
    pub fn new(email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            normalized_email: normalize_email(&email),
            email,
            password_hash,
            email_confirmed: true,
            lockout_enabled: true,
            access_failed_count: 0,
            lockout_end: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the account is locked at `now`
    pub fn is_locked_out(&self, now: DateTime<Utc>) -> bool {
        self.lockout_enabled && self.lockout_end.is_some_and(|end| end > now)
    }

    /// Remaining lockout time, if any.
    pub fn lockout_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.lockout_end
            .filter(|_| self.is_locked_out(now))
            .map(|end| end - now)
    }
}

/// Named permission grant attached to a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserClaim {
    #[serde(rename = "type")]
    #[schema(example = "RemoveSupplier")]
    pub claim_type: String,
    #[serde(rename = "value")]
    #[schema(example = "")]
    pub claim_value: String,
}

impl UserClaim {
    pub fn new(claim_type: impl Into<String>, claim_value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            claim_value: claim_value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_is_confirmed_and_unlocked() {
        let user = User::new("Someone@Example.com".into(), "hash".into());
        assert!(user.email_confirmed);
        assert!(user.lockout_enabled);
        assert_eq!(user.normalized_email, "someone@example.com");
        assert!(!user.is_locked_out(Utc::now()));
    }

    #[test]
    fn lockout_expires() {
        let mut user = User::new("a@b.com".into(), "hash".into());
        let now = Utc::now();
        user.lockout_end = Some(now + Duration::minutes(5));

        assert!(user.is_locked_out(now));
        assert!(!user.is_locked_out(now + Duration::minutes(6)));
        assert_eq!(user.lockout_remaining(now), Some(Duration::minutes(5)));
    }

    #[test]
    fn lockout_disabled_is_never_locked() {
        let mut user = User::new("a@b.com".into(), "hash".into());
        user.lockout_enabled = false;
        user.lockout_end = Some(Utc::now() + Duration::minutes(5));

        assert!(!user.is_locked_out(Utc::now()));
    }

    #[test]
    fn observed_failure_ignores_expired_lockout() {
        let now = Utc::now();

        let stale = AccessFailure::observed(1, Some(now - Duration::minutes(1)), now);
        assert!(!stale.locked());

        let fresh = AccessFailure::observed(0, Some(now + Duration::minutes(5)), now);
        assert!(fresh.locked());
    }

    #[test]
    fn claim_serializes_as_type_and_value() {
        let json = serde_json::to_value(UserClaim::new("RemoveSupplier", "")).unwrap();
        assert_eq!(json["type"], "RemoveSupplier");
        assert_eq!(json["value"], "");
    }
}
