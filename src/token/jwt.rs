//! Json web token implementation signed with HMAC-SHA256.

use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::{Result, TokenInformation, TokenManagerImplementation};
use crate::clock::{Clock, SystemClock};
use crate::error::TokenError;

/// Claims written on a JWT.
#[derive(Debug, Serialize)]
struct Claims<'a> {
    /// User ID.
    sub: &'a str,
    /// Expiration time, in seconds since Unix epoch.
    exp: u64,
}

/// Claims read back from a JWT. The subject may be missing, or not a string,
/// on foreign tokens.
#[derive(Debug, Deserialize)]
struct DecodedClaims {
    sub: Option<serde_json::Value>,
    exp: u64,
}

/// [`TokenManagerImplementation`] producing compact JWS strings.
#[derive(Clone)]
pub struct JwtImplementation {
    algorithm: Algorithm,
    clock: Arc<dyn Clock>,
}

impl JwtImplementation {
    /// Create a new [`JwtImplementation`] checking expiry against the system
    /// clock.
    pub fn new() -> Self {
        Self {
            algorithm: Algorithm::HS256,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used to check expiry.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

impl Default for JwtImplementation {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for JwtImplementation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtImplementation")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
            TokenError::InvalidSignature
        },
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    }
}

impl TokenManagerImplementation for JwtImplementation {
    fn create_token(&self, info: &TokenInformation, sign_key: &str) -> Result<String> {
        if sign_key.is_empty() {
            return Err(TokenError::Signing("signing key is empty".into()));
        }
        // `exp` only holds whole seconds.
        if info.time() % 1000 != 0 {
            return Err(TokenError::Signing(
                "expiry is not a whole second".into(),
            ));
        }

        let claims = Claims {
            sub: info.id(),
            exp: info.time() / 1000,
        };

        encode(
            &Header::new(self.algorithm),
            &claims,
            &EncodingKey::from_secret(sign_key.as_bytes()),
        )
        .map_err(|err| TokenError::Signing(err.to_string()))
    }

    fn verify(&self, token: &str, sign_key: &str) -> Result<TokenInformation> {
        // Expiry is checked below against our own clock.
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let claims = decode::<DecodedClaims>(
            token,
            &DecodingKey::from_secret(sign_key.as_bytes()),
            &validation,
        )
        .map_err(classify)?
        .claims;

        let id = match claims.sub {
            Some(serde_json::Value::String(sub)) if !sub.is_empty() => sub,
            _ => return Err(TokenError::MissingSubject),
        };

        let time = claims.exp.saturating_mul(1000);
        if time <= self.clock.now_millis() {
            return Err(TokenError::Expired);
        }

        Ok(TokenInformation::new(id, time))
    }
}
