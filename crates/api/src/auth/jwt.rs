//! JWT encoding and validation for the Bearer-token auth scheme.
//!
//! Token issuance (login, refresh) is handled by the identity service in
//! front of this API; handlers here only validate already-issued tokens
//! and read the caller's id and role from the claims.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use reqcine_core::types::DbId;

/// JWT settings loaded from the environment.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC signing secret (`JWT_SECRET`).
    pub secret: String,
    /// Token lifetime in seconds (`JWT_EXPIRY_SECS`, default one day).
    pub expiry_secs: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using development default");
            "dev-secret-do-not-use-in-production".into()
        });
        let expiry_secs: i64 = std::env::var("JWT_EXPIRY_SECS")
            .unwrap_or_else(|_| "86400".into())
            .parse()
            .expect("JWT_EXPIRY_SECS must be a valid i64");
        Self {
            secret,
            expiry_secs,
        }
    }
}

/// Claims carried by every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The user's internal database id.
    pub sub: DbId,
    /// The user's role name (`admin` or `user`).
    pub role: String,
    /// Expiry as a Unix timestamp.
    pub exp: i64,
}

/// Issue a token for a user (used by tooling and tests).
pub fn generate_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::seconds(config.expiry_secs)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate a token's signature and expiry, returning its claims.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".into(),
            expiry_secs: 3600,
        }
    }

    #[test]
    fn token_round_trips() {
        let config = test_config();
        let token = generate_token(42, "admin", &config).unwrap();
        let claims = validate_token(&token, &config).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, "admin");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let config = test_config();
        let token = generate_token(42, "user", &config).unwrap();

        let other = JwtConfig {
            secret: "other-secret".into(),
            expiry_secs: 3600,
        };
        assert!(validate_token(&token, &other).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = JwtConfig {
            secret: "test-secret".into(),
            expiry_secs: -120,
        };
        let token = generate_token(42, "user", &config).unwrap();
        assert!(validate_token(&token, &config).is_err());
    }
}
