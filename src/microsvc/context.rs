//! What a handler sees of one command invocation.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::HandlerError;
use super::session::Session;

/// One dispatch: the command name, its JSON input (path parameters already
/// merged in), the caller's session and the shared application state `A`.
pub struct Context<'a, A> {
    command: &'a str,
    input: Value,
    session: Session,
    app: &'a A,
}

impl<'a, A> Context<'a, A> {
    pub(crate) fn new(command: &'a str, input: Value, session: Session, app: &'a A) -> Self {
        Self {
            command,
            input,
            session,
            app,
        }
    }

    /// Decode the input into the handler's own `Input` type.
    pub fn input<T: DeserializeOwned>(&self) -> Result<T, HandlerError> {
        T::deserialize(&self.input).map_err(|err| {
            HandlerError::DecodeFailed(format!("{}: {}", self.command, err))
        })
    }

    pub fn raw_input(&self) -> &Value {
        &self.input
    }

    pub fn command(&self) -> &str {
        self.command
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The caller's user id, or `Unauthenticated`.
    pub fn user_id(&self) -> Result<&str, HandlerError> {
        self.session
            .user_id()
            .ok_or_else(|| HandlerError::Unauthenticated("Not authorized, no token".into()))
    }

    pub fn app(&self) -> &'a A {
        self.app
    }

    /// A field counts as present when it exists and is not `null`.
    pub fn has_field(&self, field: &str) -> bool {
        !matches!(self.input.get(field), None | Some(Value::Null))
    }

    pub fn has_fields(&self, fields: &[&str]) -> bool {
        fields.iter().all(|field| self.has_field(field))
    }
}
