//! Manage access and refresh tokens.

pub mod jwt;

use std::fmt;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::error::TokenError;
use crate::rule::Rule;

pub use jwt::JwtImplementation;

pub type Result<T> = std::result::Result<T, TokenError>;

const SECONDS_PER_MINUTE: u64 = 60;

/// Pieces of information carried by a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInformation {
    id: String,
    time: u64,
}

impl TokenInformation {
    /// Create a new [`TokenInformation`]. `time` is the expiry instant in
    /// Unix milliseconds.
    pub fn new(id: impl Into<String>, time: u64) -> Self {
        Self {
            id: id.into(),
            time,
        }
    }

    /// Subject of the token (user ID).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Expiry instant in Unix milliseconds.
    pub fn time(&self) -> u64 {
        self.time
    }
}

/// Strategy turning [`TokenInformation`] into a signed string and back.
pub trait TokenManagerImplementation: Send + Sync {
    /// Encode `info` and sign it with `sign_key`.
    fn create_token(&self, info: &TokenInformation, sign_key: &str) -> Result<String>;

    /// Decode and authenticate `token` against `sign_key`.
    fn verify(&self, token: &str, sign_key: &str) -> Result<TokenInformation>;
}

/// Issue and verify access and refresh tokens.
///
/// Configuration goes through `&mut self`; share the manager behind an
/// [`Arc`] once it is configured.
#[derive(Clone)]
pub struct TokenManager {
    implementation: Arc<dyn TokenManagerImplementation>,
    clock: Arc<dyn Clock>,

    access_rule: Rule<u64>,
    refresh_rule: Rule<u64>,
    sign_key_rule: Rule<String>,

    access_expire: u64,
    refresh_expire: u64,
    sign_key: String,
}

impl TokenManager {
    /// Create a new [`TokenManager`] instance.
    ///
    /// Expiry windows start at zero minutes and the signing key is empty
    /// until the setters adopt other values.
    pub fn new(
        implementation: Arc<dyn TokenManagerImplementation>,
        access_rule: Rule<u64>,
        refresh_rule: Rule<u64>,
        sign_key_rule: Rule<String>,
    ) -> Self {
        Self {
            implementation,
            clock: Arc::new(SystemClock),
            access_rule,
            refresh_rule,
            sign_key_rule,
            access_expire: 0,
            refresh_expire: 0,
            sign_key: String::default(),
        }
    }

    /// Replace the clock used to compute expiry instants at issuance.
    ///
    /// Expiry checks on [`TokenManager::verify`] use the implementation's own
    /// clock, e.g. [`JwtImplementation::with_clock`].
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Access token lifetime, in minutes.
    pub fn access_expire(&self) -> u64 {
        self.access_expire
    }

    /// Refresh token lifetime, in minutes.
    pub fn refresh_expire(&self) -> u64 {
        self.refresh_expire
    }

    /// Set access token lifetime. Returns `false` if the rule refused it.
    pub fn set_access_expire(&mut self, minutes: u64) -> bool {
        if !self.access_rule.is_satisfied_by(&minutes) {
            tracing::warn!(minutes, "access token lifetime rejected");
            return false;
        }

        self.access_expire = minutes;
        true
    }

    /// Set refresh token lifetime. Returns `false` if the rule refused it.
    pub fn set_refresh_expire(&mut self, minutes: u64) -> bool {
        if !self.refresh_rule.is_satisfied_by(&minutes) {
            tracing::warn!(minutes, "refresh token lifetime rejected");
            return false;
        }

        self.refresh_expire = minutes;
        true
    }

    /// Set signing key. Returns `false` if the rule refused it.
    pub fn set_sign_key(&mut self, key: impl Into<String>) -> bool {
        let key = key.into();
        if !self.sign_key_rule.is_satisfied_by(&key) {
            tracing::warn!("signing key rejected");
            return false;
        }

        self.sign_key = key;
        true
    }

    /// Create a new short-lived access token for `user_id`.
    pub fn new_access_token(&self, user_id: &str) -> Result<String> {
        self.issue(user_id, self.access_expire, "access")
    }

    /// Create a new long-lived refresh token for `user_id`.
    pub fn new_refresh_token(&self, user_id: &str) -> Result<String> {
        self.issue(user_id, self.refresh_expire, "refresh")
    }

    /// Decode and check a token.
    pub fn verify(&self, token: &str) -> Result<TokenInformation> {
        let result = self.implementation.verify(token, &self.sign_key);

        let outcome = match &result {
            Ok(_) => "valid",
            Err(err) => {
                tracing::debug!(error = %err, "token rejected");
                "rejected"
            },
        };
        metrics::counter!("tokens_verified_total", "outcome" => outcome).increment(1);

        result
    }

    fn issue(&self, user_id: &str, minutes: u64, kind: &'static str) -> Result<String> {
        let expire_at = self
            .clock
            .now()
            .saturating_add(minutes.saturating_mul(SECONDS_PER_MINUTE))
            .saturating_mul(1000);
        let info = TokenInformation::new(user_id, expire_at);

        let token = self.implementation.create_token(&info, &self.sign_key)?;
        metrics::counter!("tokens_issued_total", "kind" => kind).increment(1);

        Ok(token)
    }
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("access_expire", &self.access_expire)
            .field("refresh_expire", &self.refresh_expire)
            .field("sign_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    const NOW: u64 = 4_000_000_000;

    fn manager(key: &str, access: u64) -> TokenManager {
        let clock = Arc::new(FixedClock::new(NOW));
        let mut manager = TokenManager::new(
            Arc::new(JwtImplementation::new().with_clock(clock.clone())),
            Rule::new(|m: &u64| *m > 0),
            Rule::new(|m: &u64| *m > 0),
            Rule::new(|k: &String| !k.is_empty()),
        )
        .with_clock(clock);

        assert!(manager.set_access_expire(access));
        assert!(manager.set_refresh_expire(60 * 24 * 14));
        assert!(manager.set_sign_key(key));
        manager
    }

    #[test]
    fn test_access_token_round_trip() {
        let manager = manager("s3cr3t", 15);

        let token = manager.new_access_token("user-42").unwrap();
        assert_eq!(token.split('.').count(), 3);

        let info = manager.verify(&token).unwrap();
        assert_eq!(info, TokenInformation::new("user-42", (NOW + 15 * 60) * 1000));
    }

    #[test]
    fn test_refresh_token_uses_refresh_window() {
        let manager = manager("s3cr3t", 15);

        let token = manager.new_refresh_token("user-42").unwrap();
        let info = manager.verify(&token).unwrap();
        assert_eq!(info.time(), (NOW + 60 * 24 * 14 * 60) * 1000);
    }

    #[test]
    fn test_rejected_setters_keep_value() {
        let mut manager = manager("s3cr3t", 5);

        assert!(!manager.set_access_expire(0));
        assert!(!manager.set_refresh_expire(0));
        assert!(!manager.set_sign_key(""));
        assert_eq!(manager.access_expire(), 5);
        assert_eq!(manager.refresh_expire(), 60 * 24 * 14);

        // Key is unchanged: tokens still verify.
        let token = manager.new_access_token("user").unwrap();
        assert!(manager.verify(&token).is_ok());
    }

    #[test]
    fn test_accepted_setter_changes_next_token() {
        let mut manager = manager("s3cr3t", 5);
        let before = manager
            .verify(&manager.new_access_token("user").unwrap())
            .unwrap()
            .time();

        assert!(manager.set_access_expire(60));
        let after = manager
            .verify(&manager.new_access_token("user").unwrap())
            .unwrap()
            .time();

        assert_eq!(after - before, 55 * 60 * 1000);
    }

    #[test]
    fn test_different_keys() {
        let first = manager("s3cr3t", 15);
        let second = manager("another-s3cr3t", 15);

        let token = first.new_access_token("user-42").unwrap();
        assert_eq!(second.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_unconfigured_key() {
        let manager = TokenManager::new(
            Arc::new(JwtImplementation::new()),
            Rule::any(),
            Rule::any(),
            Rule::any(),
        );

        assert!(matches!(
            manager.new_access_token("user"),
            Err(TokenError::Signing(_))
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let manager = manager("s3cr3t", 15);
        assert!(!format!("{manager:?}").contains("s3cr3t"));
    }
}
