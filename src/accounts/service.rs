use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::password::{
    check_password_rules, generate_token, hash_password, hash_token, verify_password,
};
use super::user::{normalize_email, AccountStatus, Address, Role, User};
use super::token::{issue_session_token, verify_session_token};
use super::AccountPolicy;
use crate::error::MarketError;
use crate::model::{ModelStore, ModelsExt};
use crate::notify::{self, deliver, Notifier};

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Partial profile edit. `status` is only honoured for admins.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub password: Option<String>,
    pub addresses: Option<Vec<Address>>,
    pub status: Option<AccountStatus>,
}

pub(crate) fn require_admin(actor: &User) -> Result<(), MarketError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(MarketError::not_authorized("Not authorized as an admin"))
    }
}

fn user_not_found(id: &str) -> MarketError {
    MarketError::not_found("User", id)
}

/// Registration, login, verification, password reset and profile upkeep.
pub struct AccountService<'a, S> {
    store: &'a S,
    notifier: &'a dyn Notifier,
    policy: &'a AccountPolicy,
}

impl<'a, S: ModelStore> AccountService<'a, S> {
    pub fn new(store: &'a S, notifier: &'a dyn Notifier, policy: &'a AccountPolicy) -> Self {
        Self {
            store,
            notifier,
            policy,
        }
    }

    pub fn get(&self, id: &str) -> Result<User, MarketError> {
        self.store
            .models::<User>()
            .get(id)?
            .map(|v| v.data)
            .ok_or_else(|| user_not_found(id))
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<User>, MarketError> {
        let email = normalize_email(email);
        Ok(self
            .store
            .models::<User>()
            .find_one(&|u: &User| u.email == email)?)
    }

    /// Create an unverified customer and send the verification link.
    ///
    /// Uniqueness is a lookup followed by an insert, so two simultaneous
    /// registrations of one address can both pass the check.
    pub fn register(&self, input: Registration) -> Result<User, MarketError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(MarketError::validation("Name is required"));
        }
        let email = normalize_email(&input.email);
        if !email.contains('@') {
            return Err(MarketError::validation("A valid email is required"));
        }
        check_password_rules(&input.password)?;

        if self.find_by_email(&email)?.is_some() {
            return Err(MarketError::Conflict("User already exists".into()));
        }

        let token = generate_token();
        let user = User {
            id: Uuid::new_v4().to_string(),
            photo_url: Some(avatar_url(&name)),
            name,
            email,
            password_hash: hash_password(&input.password, self.policy.bcrypt_cost)?,
            role: Role::Customer,
            status: AccountStatus::Active,
            is_verified: false,
            verification_token: Some(token.clone()),
            reset_password_token: None,
            reset_password_expire: None,
            phone: None,
            join_date: Utc::now().date_naive().to_string(),
            addresses: Vec::new(),
        };
        self.store.models::<User>().insert(&user)?;
        info!(user_id = %user.id, "account registered");

        let link = self.policy.link("verify-email", &token);
        deliver(
            self.notifier,
            &notify::verification(&user.name, &user.email, &link),
        );
        Ok(user)
    }

    /// Check credentials. Unverified accounts may log in; blocked ones may not.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User, MarketError> {
        let user = self
            .find_by_email(email)?
            .filter(|u| verify_password(password, &u.password_hash))
            .ok_or(MarketError::InvalidCredentials)?;
        if user.is_blocked() {
            return Err(MarketError::AccountSuspended);
        }
        Ok(user)
    }

    /// Sign a session token for `user`.
    pub fn session_token(&self, user: &User) -> Result<String, MarketError> {
        issue_session_token(&self.policy.session_secret, &user.id, self.policy.session_ttl)
    }

    /// The user id a session token was issued to, if it is still good.
    pub fn session_user(&self, token: &str) -> Option<String> {
        verify_session_token(&self.policy.session_secret, token)
    }

    /// Issue a fresh verification token. A send failure is reported.
    pub fn resend_verification(&self, user_id: &str) -> Result<(), MarketError> {
        let token = generate_token();
        let (user, ()) = self
            .store
            .models::<User>()
            .modify(user_id, |u| {
                if u.is_verified {
                    return Err(MarketError::validation("Account already verified"));
                }
                u.verification_token = Some(token.clone());
                Ok(())
            })?
            .ok_or_else(|| user_not_found(user_id))?;

        let link = self.policy.link("verify-email", &token);
        self.notifier
            .send(&notify::verification(&user.name, &user.email, &link))?;
        Ok(())
    }

    /// Consume a verification token.
    pub fn verify_email(&self, token: &str) -> Result<User, MarketError> {
        let invalid = || MarketError::validation("Invalid or expired verification token");
        let found = self
            .store
            .models::<User>()
            .find_one(&|u: &User| u.verification_token.as_deref() == Some(token))?
            .ok_or_else(invalid)?;

        let (user, ()) = self
            .store
            .models::<User>()
            .modify(&found.id, |u| {
                if u.verification_token.as_deref() != Some(token) {
                    return Err(invalid());
                }
                u.is_verified = true;
                u.verification_token = None;
                Ok(())
            })?
            .ok_or_else(invalid)?;
        info!(user_id = %user.id, "email verified");
        Ok(user)
    }

    /// Store a hashed reset token and mail the raw one.
    ///
    /// When the mail cannot be sent the token is withdrawn again and the
    /// failure is returned to the caller.
    pub fn forgot_password(&self, email: &str) -> Result<(), MarketError> {
        let user = self
            .find_by_email(email)?
            .ok_or_else(|| user_not_found(email))?;

        let raw = generate_token();
        let hashed = hash_token(&raw);
        let expires = Utc::now() + self.policy.reset_token_ttl;
        self.store.models::<User>().modify(&user.id, |u| {
            u.reset_password_token = Some(hashed.clone());
            u.reset_password_expire = Some(expires);
            Ok::<_, MarketError>(())
        })?;

        let link = self.policy.link("reset-password", &raw);
        if let Err(err) = self
            .notifier
            .send(&notify::password_reset(&user.email, &link))
        {
            warn!(user_id = %user.id, error = %err, "reset email failed, withdrawing token");
            self.store.models::<User>().modify(&user.id, |u| {
                u.reset_password_token = None;
                u.reset_password_expire = None;
                Ok::<_, MarketError>(())
            })?;
            return Err(err.into());
        }
        Ok(())
    }

    /// Set a new password given an unexpired reset token.
    pub fn reset_password(&self, token: &str, password: &str) -> Result<User, MarketError> {
        check_password_rules(password)?;
        let invalid = || MarketError::validation("Invalid or expired token");
        let hashed = hash_token(token);
        let now = Utc::now();
        let live = |u: &User| {
            u.reset_password_token.as_deref() == Some(hashed.as_str())
                && u.reset_password_expire.is_some_and(|at| at > now)
        };

        let found = self
            .store
            .models::<User>()
            .find_one(&|u: &User| live(u))?
            .ok_or_else(invalid)?;

        let password_hash = hash_password(password, self.policy.bcrypt_cost)?;
        let (user, ()) = self
            .store
            .models::<User>()
            .modify(&found.id, |u| {
                if !live(u) {
                    return Err(invalid());
                }
                u.password_hash = password_hash.clone();
                u.reset_password_token = None;
                u.reset_password_expire = None;
                Ok(())
            })?
            .ok_or_else(invalid)?;
        info!(user_id = %user.id, "password reset");
        Ok(user)
    }

    pub fn update_profile(
        &self,
        actor: &User,
        user_id: &str,
        patch: ProfilePatch,
    ) -> Result<User, MarketError> {
        if !actor.can_act_for(user_id) {
            return Err(MarketError::not_authorized(
                "Not authorized to update this profile",
            ));
        }

        let email = patch.email.as_deref().map(normalize_email);
        if let Some(email) = &email {
            if !email.contains('@') {
                return Err(MarketError::validation("A valid email is required"));
            }
            if let Some(other) = self.find_by_email(email)? {
                if other.id != user_id {
                    return Err(MarketError::Conflict("Email already in use".into()));
                }
            }
        }
        let password_hash = match patch.password.as_deref() {
            Some(password) => {
                check_password_rules(password)?;
                Some(hash_password(password, self.policy.bcrypt_cost)?)
            }
            None => None,
        };
        let addresses = patch
            .addresses
            .map(|list| list.into_iter().map(with_id).collect::<Result<Vec<_>, _>>())
            .transpose()?;
        let status = patch.status.filter(|_| actor.is_admin());

        let (user, ()) = self
            .store
            .models::<User>()
            .modify(user_id, |u| {
                if let Some(name) = patch.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
                    u.name = name.to_string();
                }
                if let Some(email) = &email {
                    u.email = email.clone();
                }
                if let Some(phone) = &patch.phone {
                    u.phone = Some(phone.clone());
                }
                if let Some(photo_url) = &patch.photo_url {
                    u.photo_url = Some(photo_url.clone());
                }
                if let Some(hash) = &password_hash {
                    u.password_hash = hash.clone();
                }
                if let Some(addresses) = &addresses {
                    u.addresses = addresses.clone();
                }
                if let Some(status) = status {
                    u.status = status;
                }
                Ok::<_, MarketError>(())
            })?
            .ok_or_else(|| user_not_found(user_id))?;
        Ok(user)
    }

    pub fn add_address(
        &self,
        actor: &User,
        user_id: &str,
        address: Address,
    ) -> Result<User, MarketError> {
        let address = with_id(address)?;
        self.edit_addresses(actor, user_id, |list| {
            list.push(address.clone());
            Ok(())
        })
    }

    pub fn update_address(
        &self,
        actor: &User,
        user_id: &str,
        address_id: &str,
        address: Address,
    ) -> Result<User, MarketError> {
        address.validate()?;
        self.edit_addresses(actor, user_id, |list| {
            let slot = list
                .iter_mut()
                .find(|a| a.id == address_id)
                .ok_or_else(|| MarketError::not_found("Address", address_id))?;
            *slot = Address {
                id: address_id.to_string(),
                ..address.clone()
            };
            Ok(())
        })
    }

    pub fn remove_address(
        &self,
        actor: &User,
        user_id: &str,
        address_id: &str,
    ) -> Result<User, MarketError> {
        self.edit_addresses(actor, user_id, |list| {
            let before = list.len();
            list.retain(|a| a.id != address_id);
            if list.len() == before {
                return Err(MarketError::not_found("Address", address_id));
            }
            Ok(())
        })
    }

    fn edit_addresses<F>(&self, actor: &User, user_id: &str, mut edit: F) -> Result<User, MarketError>
    where
        F: FnMut(&mut Vec<Address>) -> Result<(), MarketError>,
    {
        if !actor.can_act_for(user_id) {
            return Err(MarketError::not_authorized("Not authorized"));
        }
        let (user, ()) = self
            .store
            .models::<User>()
            .modify(user_id, |u| edit(&mut u.addresses))?
            .ok_or_else(|| user_not_found(user_id))?;
        Ok(user)
    }

    /// Block or unblock an account (admin).
    pub fn set_status(
        &self,
        actor: &User,
        user_id: &str,
        status: AccountStatus,
    ) -> Result<User, MarketError> {
        require_admin(actor)?;
        let (user, ()) = self
            .store
            .models::<User>()
            .modify(user_id, |u| {
                u.status = status;
                Ok::<_, MarketError>(())
            })?
            .ok_or_else(|| user_not_found(user_id))?;
        info!(user_id, status = ?status, "account status changed");
        Ok(user)
    }

    pub fn list(&self, actor: &User) -> Result<Vec<User>, MarketError> {
        require_admin(actor)?;
        let mut users = self.store.models::<User>().all()?;
        users.sort_by(|a, b| a.join_date.cmp(&b.join_date).then_with(|| a.name.cmp(&b.name)));
        Ok(users)
    }

    /// Make sure an admin account exists for `email`, creating a verified
    /// one or promoting the existing account.
    pub fn bootstrap_admin(&self, name: &str, email: &str, password: &str) -> Result<User, MarketError> {
        if let Some(existing) = self.find_by_email(email)? {
            let (user, ()) = self
                .store
                .models::<User>()
                .modify(&existing.id, |u| {
                    u.role = Role::Admin;
                    u.status = AccountStatus::Active;
                    Ok::<_, MarketError>(())
                })?
                .ok_or_else(|| user_not_found(&existing.id))?;
            return Ok(user);
        }

        check_password_rules(password)?;
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: normalize_email(email),
            password_hash: hash_password(password, self.policy.bcrypt_cost)?,
            role: Role::Admin,
            status: AccountStatus::Active,
            is_verified: true,
            verification_token: None,
            reset_password_token: None,
            reset_password_expire: None,
            phone: None,
            photo_url: Some(avatar_url(name)),
            join_date: Utc::now().date_naive().to_string(),
            addresses: Vec::new(),
        };
        self.store.models::<User>().insert(&user)?;
        info!(user_id = %user.id, "admin account created");
        Ok(user)
    }
}

fn with_id(mut address: Address) -> Result<Address, MarketError> {
    address.validate()?;
    if address.id.is_empty() {
        address.id = Uuid::new_v4().to_string();
    }
    Ok(address)
}

fn avatar_url(name: &str) -> String {
    format!(
        "https://ui-avatars.com/api/?name={}&background=143f17&color=fff",
        name.split_whitespace().collect::<Vec<_>>().join("+")
    )
}
