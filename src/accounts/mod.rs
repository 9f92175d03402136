//! Accounts - users, credentials and address books.

mod password;
mod service;
mod token;
mod user;

use std::fmt;

use chrono::Duration;

pub use password::{generate_token, hash_token, MIN_PASSWORD_LEN};
pub use service::{AccountService, ProfilePatch, Registration};
pub use token::{issue_session_token, verify_session_token};
pub use user::{normalize_email, AccountStatus, Address, Role, User, UserProfile};

pub(crate) use service::require_admin;

/// Knobs for credential handling and the links mailed to users.
#[derive(Clone)]
pub struct AccountPolicy {
    pub bcrypt_cost: u32,
    pub reset_token_ttl: Duration,
    /// Base URL of the storefront UI; links are `{public_url}/#/{route}/{token}`.
    pub public_url: String,
    /// HMAC key for session tokens.
    pub session_secret: String,
    pub session_ttl: Duration,
}

impl fmt::Debug for AccountPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountPolicy")
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("reset_token_ttl", &self.reset_token_ttl)
            .field("public_url", &self.public_url)
            .field("session_secret", &"<redacted>")
            .field("session_ttl", &self.session_ttl)
            .finish()
    }
}

/// A fresh random secret, so tokens are only good for this process.
impl Default for AccountPolicy {
    fn default() -> Self {
        AccountPolicy {
            bcrypt_cost: bcrypt::DEFAULT_COST,
            reset_token_ttl: Duration::minutes(10),
            public_url: "http://localhost:3000".to_string(),
            session_secret: generate_token(),
            session_ttl: Duration::days(30),
        }
    }
}

impl AccountPolicy {
    /// Cheapest bcrypt cost, for tests.
    pub fn for_tests() -> Self {
        AccountPolicy {
            bcrypt_cost: 4,
            ..Default::default()
        }
    }

    pub(crate) fn link(&self, route: &str, token: &str) -> String {
        format!("{}/#/{}/{}", self.public_url.trim_end_matches('/'), route, token)
    }
}
