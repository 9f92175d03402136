//! Caller identity for one dispatch.

use std::collections::BTreeMap;

/// Prefix of every header the gateway forwards into a session.
pub const SESSION_PREFIX: &str = "x-freshfarm-";

/// Session variable holding the authenticated user's id. It is set by the
/// service once a bearer token checks out, or directly by in-process
/// callers; a request header of the same name is ignored.
pub const USER_ID_VAR: &str = "x-freshfarm-user-id";

/// The `x-freshfarm-*` variables of one request, keys lowercased, plus the
/// bearer token the request presented.
///
/// Roles are never taken from here; handlers load the account and use its
/// stored role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    variables: BTreeMap<String, String>,
    bearer: Option<String>,
}

impl Session {
    /// An anonymous session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a session from request headers: the gateway variables and the
    /// `Authorization: Bearer` token. Everything else is dropped, and so is
    /// any attempt to assert a user id by header.
    pub fn from_headers<'h>(headers: impl IntoIterator<Item = (&'h str, &'h str)>) -> Self {
        let mut session = Self::new();
        for (name, value) in headers {
            let name = name.to_ascii_lowercase();
            if name == "authorization" {
                session.bearer = bearer_token(value).map(str::to_string);
            } else if name.starts_with(SESSION_PREFIX) && name != USER_ID_VAR {
                session.variables.insert(name, value.trim().to_string());
            }
        }
        session
    }

    /// A session already authenticated as `user_id`. For in-process callers.
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self::new().with(USER_ID_VAR, user_id)
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.variables.insert(key.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Swap the presented token for the identity it proved.
    pub fn authenticated(mut self, user_id: impl Into<String>) -> Self {
        self.bearer = None;
        self.with(USER_ID_VAR, user_id)
    }

    /// The authenticated user id. A blank value counts as no user.
    pub fn user_id(&self) -> Option<&str> {
        self.get(USER_ID_VAR).filter(|id| !id.is_empty())
    }

    pub fn bearer(&self) -> Option<&str> {
        self.bearer.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    pub fn is_anonymous(&self) -> bool {
        self.user_id().is_none() && self.bearer.is_none()
    }
}

fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
