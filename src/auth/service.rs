use crate::error::{AppError, AuthError};
use crate::session::UserId;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, decode, Header, EncodingKey, DecodingKey, Validation, Algorithm};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // Platform user id
    pub exp: i64,     // Expiration time
    pub iat: i64,     // Issued at
}

/// Validates gateway tokens. Tokens are minted by the platform front-end
/// with the shared secret; the subject is the platform user id.
pub struct AuthService {
    jwt_secret: String,
    token_expiry_hours: i64,
}

impl AuthService {
    pub fn new(jwt_secret: String, token_expiry_hours: i64) -> Self {
        Self {
            jwt_secret,
            token_expiry_hours,
        }
    }

    /// Mints a token the way the platform front-end does. The server never
    /// calls this itself; local clients and the gateway tests use it to log in.
    pub fn issue_token(&self, user: UserId) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.to_string(),
            exp: (now + Duration::hours(self.token_expiry_hours)).timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }

    pub fn validate_token(&self, token: &str) -> Result<UserId, AppError> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?
        .claims;

        claims
            .sub
            .parse::<UserId>()
            .map_err(|_| AppError::AuthError(AuthError::InvalidToken))
    }
}
