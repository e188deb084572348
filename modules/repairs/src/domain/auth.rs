//! Password hashing (Argon2, PHC strings) and HS256 access tokens.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Argon2 is CPU-bound; both calls run on the blocking pool.
pub async fn hash_password(plain: &str) -> Result<String, DomainError> {
    let plain = plain.to_owned();
    tokio::task::spawn_blocking(move || hash_blocking(&plain))
        .await
        .map_err(|e| DomainError::internal(format!("password hashing task failed: {e}")))?
}

/// False for a wrong password and for an unparsable stored hash alike.
pub async fn verify_password(plain: &str, stored: &str) -> Result<bool, DomainError> {
    let (plain, stored) = (plain.to_owned(), stored.to_owned());
    tokio::task::spawn_blocking(move || verify_blocking(&plain, &stored))
        .await
        .map_err(|e| DomainError::internal(format!("password check task failed: {e}")))
}

fn hash_blocking(plain: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| DomainError::internal(format!("password hashing failed: {e}")))
}

fn verify_blocking(plain: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash is malformed");
            false
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    pub fn issue(&self, user_id: Uuid) -> Result<String, DomainError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| DomainError::internal(format!("token encoding failed: {e}")))
    }

    /// Subject of a valid, unexpired token.
    pub fn verify(&self, token: &str) -> Result<Uuid, DomainError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|e| {
                tracing::debug!(error = %e, "token rejected");
                DomainError::InvalidToken
            })?;
        Uuid::parse_str(&data.claims.sub).map_err(|_| DomainError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn password_hash_verifies_only_the_original() {
        let hash = hash_password("admin123").await.unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("admin123", &hash).await.unwrap());
        assert!(!verify_password("admin124", &hash).await.unwrap());
        assert!(!verify_password("admin123", "not-a-phc-string").await.unwrap());
    }

    #[test]
    fn token_roundtrip_yields_subject() {
        let issuer = TokenIssuer::new("secret", 30);
        let id = Uuid::new_v4();
        let token = issuer.issue(id).unwrap();
        assert_eq!(issuer.verify(&token).unwrap(), id);
    }

    #[test]
    fn foreign_and_expired_tokens_are_rejected() {
        let id = Uuid::new_v4();
        let other = TokenIssuer::new("other", 30).issue(id).unwrap();
        let issuer = TokenIssuer::new("secret", 30);
        assert!(matches!(issuer.verify(&other), Err(DomainError::InvalidToken)));

        let expired = TokenIssuer::new("secret", -10).issue(id).unwrap();
        assert!(matches!(issuer.verify(&expired), Err(DomainError::InvalidToken)));
        assert!(matches!(issuer.verify("garbage"), Err(DomainError::InvalidToken)));
    }
}
