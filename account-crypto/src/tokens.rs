//! Bearer token signing and verification.
//!
//! A token embeds exactly one thing: the identifier of the user it was
//! issued for. Tokens are signed with an HS256 secret that is process-wide
//! configuration, loaded once at startup and injected here. There is no
//! rotation logic.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Token service configuration.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HS256 signing secret shared by every instance of the service.
    pub secret: String,
    /// Token lifetime in seconds.
    pub ttl_seconds: i64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: "development-secret".to_string(),
            ttl_seconds: 24 * 60 * 60,
        }
    }
}

/// Token signing or verification failure.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// Signature invalid, token malformed, or expired.
    #[error("token verification failed: {0}")]
    Verification(#[source] jsonwebtoken::errors::Error),

    /// The token verified but its subject is not a user identifier.
    #[error("token subject is not a valid identifier")]
    InvalidSubject,
}

/// Claims carried by every issued token.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the user identifier the token was issued for.
    pub sub: String,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

/// Signs user identifiers into bearer tokens and decodes them again.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_seconds: i64,
}

impl TokenSigner {
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl_seconds: config.ttl_seconds,
        }
    }

    /// Sign `subject` into a fresh bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] if the signing primitive fails.
    pub fn generate(&self, subject: Uuid) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: subject.to_string(),
            iat: now,
            exp: now + self.ttl_seconds,
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Signing)
    }

    /// Verify a token and return the subject identifier embedded in it.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Verification`] when the signature is invalid,
    /// the token is malformed, or it has expired, and
    /// [`TokenError::InvalidSubject`] when the subject claim does not parse
    /// as a user identifier.
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let data = decode::<TokenClaims>(token, &self.decoding, &Validation::default())
            .map_err(TokenError::Verification)?;
        data.claims
            .sub
            .parse()
            .map_err(|_| TokenError::InvalidSubject)
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new(&TokenConfig {
            secret: "test-secret".to_string(),
            ttl_seconds: 3600,
        })
    }

    #[test]
    fn token_roundtrip_decodes_subject() {
        let signer = signer();
        let subject = Uuid::new_v4();

        let token = signer.generate(subject).unwrap();
        assert_eq!(signer.verify(&token).unwrap(), subject);
    }

    #[test]
    fn tampered_token_fails_verification() {
        let signer = signer();
        let mut token = signer.generate(Uuid::new_v4()).unwrap();
        token.push('x');

        assert!(matches!(
            signer.verify(&token),
            Err(TokenError::Verification(_))
        ));
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let signer = signer();
        let other = TokenSigner::new(&TokenConfig {
            secret: "different-secret".to_string(),
            ttl_seconds: 3600,
        });

        let token = signer.generate(Uuid::new_v4()).unwrap();
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn expired_token_fails_verification() {
        // Issued with a lifetime far in the past; default validation
        // allows 60 seconds of leeway, so go well beyond it.
        let signer = TokenSigner::new(&TokenConfig {
            secret: "test-secret".to_string(),
            ttl_seconds: -3600,
        });

        let token = signer.generate(Uuid::new_v4()).unwrap();
        assert!(signer.verify(&token).is_err());
    }

    #[test]
    fn garbage_token_fails_verification() {
        assert!(signer().verify("not.a.token").is_err());
    }
}
