//! services/api/src/adapters/tokens.rs
//!
//! JWT implementation of the `TokenService` port using HS256. Tokens are
//! stateless: nothing is recorded server-side at issuance, so verification is
//! a pure signature-and-expiry check.

use book_reviews_core::ports::{PortError, PortResult, TokenService};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Fixed validity window for every issued token.
const TOKEN_TTL_SECS: i64 = 60 * 60;

/// Claims embedded in every token the service issues.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Standard JWT subject - set to the username.
    pub sub: String,
    /// Issued-at (Unix timestamp, seconds).
    pub iat: i64,
    /// Standard JWT expiry (Unix timestamp, seconds).
    pub exp: i64,
}

/// A token service signing with a single process-wide secret, injected at
/// construction from `Config`.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtTokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::default();
        // Default leeway would let a token outlive its expiry instant by a
        // minute; the contract is that verification fails strictly after exp.
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, username: &str) -> PortResult<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: username.to_string(),
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| PortError::Unexpected(format!("failed to sign token: {}", e)))
    }

    fn verify(&self, token: &str) -> PortResult<String> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => PortError::Expired,
                _ => PortError::InvalidToken,
            }
        })?;
        Ok(data.claims.sub)
    }
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn issued_token_verifies_back_to_its_username() {
        let service = JwtTokenService::new(SECRET);
        let token = service.issue("alice").unwrap();
        assert_eq!(service.verify(&token).unwrap(), "alice");
    }

    #[test]
    fn garbage_and_foreign_signatures_are_invalid() {
        let service = JwtTokenService::new(SECRET);
        assert!(matches!(
            service.verify("not-a-token").unwrap_err(),
            PortError::InvalidToken
        ));

        let other = JwtTokenService::new("some-other-secret");
        let token = other.issue("alice").unwrap();
        assert!(matches!(
            service.verify(&token).unwrap_err(),
            PortError::InvalidToken
        ));
    }

    #[test]
    fn token_past_its_expiry_instant_is_expired() {
        let service = JwtTokenService::new(SECRET);
        // Hand-craft claims that expired one second ago, signed with the
        // same secret the service trusts.
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "alice".to_string(),
            iat: now - TOKEN_TTL_SECS,
            exp: now - 1,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            service.verify(&token).unwrap_err(),
            PortError::Expired
        ));
    }
}
