//! Signed session tokens (HS256 JWTs) handed out when a user signs in.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MarketError;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Sign a token naming `user_id` that expires after `ttl`.
pub fn issue_session_token(secret: &str, user_id: &str, ttl: Duration) -> Result<String, MarketError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

/// The user id a token was issued to, if the signature holds and it has not
/// expired.
pub fn verify_session_token(secret: &str, token: &str) -> Option<String> {
    let mut validation = Validation::default();
    validation.leeway = 0;
    match decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation) {
        Ok(data) => Some(data.claims.sub).filter(|sub| !sub.is_empty()),
        Err(err) => {
            debug!(error = %err, "session token rejected");
            None
        }
    }
}
