use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MarketError;
use crate::model::Model;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Admin,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    #[default]
    Active,
    Blocked,
}

/// An entry in a customer's address book.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub id: String,
    pub label: String,
    pub street: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub lga: String,
    pub state: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
}

impl Address {
    /// Label, street, LGA, state and phone are required.
    pub fn validate(&self) -> Result<(), MarketError> {
        let required = [
            ("label", &self.label),
            ("street", &self.street),
            ("lga", &self.lga),
            ("state", &self.state),
            ("phone", &self.phone),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(MarketError::validation(format!("Address {field} is required")));
            }
        }
        Ok(())
    }
}

/// A stored account, including its credentials.
///
/// Never serialize this onto the wire; hand out [`UserProfile`] instead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    /// Trimmed and lowercased.
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub status: AccountStatus,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub verification_token: Option<String>,
    /// SHA-256 hex of the raw reset token; the raw token only leaves in the
    /// reset link.
    #[serde(default)]
    pub reset_password_token: Option<String>,
    #[serde(default)]
    pub reset_password_expire: Option<DateTime<Utc>>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    pub join_date: String,
    #[serde(default)]
    pub addresses: Vec<Address>,
}

impl Model for User {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> &str {
        &self.id
    }
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_blocked(&self) -> bool {
        self.status == AccountStatus::Blocked
    }

    pub fn address(&self, address_id: &str) -> Option<&Address> {
        self.addresses.iter().find(|a| a.id == address_id)
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile::from(self)
    }

    /// Whether this user may act on records belonging to `owner_id`.
    pub fn can_act_for(&self, owner_id: &str) -> bool {
        self.is_admin() || self.id == owner_id
    }
}

/// What the outside world gets to see of an account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: AccountStatus,
    pub is_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub join_date: String,
    pub addresses: Vec<Address>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        UserProfile {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            status: user.status,
            is_verified: user.is_verified,
            phone: user.phone.clone(),
            photo_url: user.photo_url.clone(),
            join_date: user.join_date.clone(),
            addresses: user.addresses.clone(),
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
