//! The command registry.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, info_span, warn};

use super::context::Context;
use super::error::HandlerError;
use super::session::Session;

type Guard<A> = Box<dyn Fn(&Context<A>) -> bool + Send + Sync>;
type Handle<A> = Box<dyn Fn(&Context<A>) -> Result<Value, HandlerError> + Send + Sync>;
type Authenticator<A> = Box<dyn Fn(&A, &str) -> Option<String> + Send + Sync>;

struct Registered<A> {
    guard: Option<Guard<A>>,
    handle: Handle<A>,
}

/// Application state `A` plus the commands that run against it.
///
/// Built once at startup and shared behind an `Arc`; dispatch only needs
/// `&self`, so any number of requests can run at the same time.
pub struct Service<A> {
    app: A,
    commands: BTreeMap<String, Registered<A>>,
    authenticator: Option<Authenticator<A>>,
}

impl<A: Send + Sync + 'static> Service<A> {
    pub fn new(app: A) -> Self {
        Self {
            app,
            commands: BTreeMap::new(),
            authenticator: None,
        }
    }

    /// Turn a session's bearer token into a user id. A token the
    /// authenticator refuses fails the dispatch with `Unauthenticated`;
    /// without an authenticator tokens are ignored.
    pub fn authenticate_with<F>(mut self, authenticator: F) -> Self
    where
        F: Fn(&A, &str) -> Option<String> + Send + Sync + 'static,
    {
        self.authenticator = Some(Box::new(authenticator));
        self
    }

    /// Register a command that accepts any input.
    pub fn command<F>(self, name: &str, handle: F) -> Self
    where
        F: Fn(&Context<A>) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.register(name, None, Box::new(handle))
    }

    /// Register a command whose input must first pass `guard`; a `false`
    /// answer is `GuardRejected` and the handler never runs.
    pub fn command_guarded<G, F>(self, name: &str, guard: G, handle: F) -> Self
    where
        G: Fn(&Context<A>) -> bool + Send + Sync + 'static,
        F: Fn(&Context<A>) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.register(name, Some(Box::new(guard)), Box::new(handle))
    }

    fn register(mut self, name: &str, guard: Option<Guard<A>>, handle: Handle<A>) -> Self {
        if self
            .commands
            .insert(name.to_string(), Registered { guard, handle })
            .is_some()
        {
            warn!(command = name, "command registered twice, keeping the later handler");
        }
        self
    }

    /// Run one command inside a `command` span carrying the caller's id.
    pub fn dispatch(
        &self,
        command: &str,
        input: Value,
        session: Session,
    ) -> Result<Value, HandlerError> {
        let session = self.authenticate(session)?;
        let span = info_span!("command", command, user_id = session.user_id().unwrap_or("-"));
        let _entered = span.enter();

        let Some(registered) = self.commands.get(command) else {
            debug!("unknown command");
            return Err(HandlerError::UnknownCommand(command.to_string()));
        };
        let ctx = Context::new(command, input, session, &self.app);

        if let Some(guard) = &registered.guard {
            if !guard(&ctx) {
                debug!("guard rejected input");
                return Err(HandlerError::GuardRejected(command.to_string()));
            }
        }

        let outcome = (registered.handle)(&ctx);
        match &outcome {
            Ok(_) => debug!("command handled"),
            Err(err) if err.status_code() >= 500 => warn!(error = %err, "command failed"),
            Err(err) => debug!(error = %err, status = err.status_code(), "command refused"),
        }
        outcome
    }

    fn authenticate(&self, session: Session) -> Result<Session, HandlerError> {
        let (Some(token), Some(authenticator)) = (session.bearer(), &self.authenticator) else {
            return Ok(session);
        };
        match authenticator(&self.app, token) {
            Some(user_id) => Ok(session.authenticated(user_id)),
            None => {
                debug!("bearer token refused");
                Err(HandlerError::Unauthenticated(
                    "Not authorized, token failed".into(),
                ))
            }
        }
    }

    /// Registered command names in order.
    pub fn commands(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    pub fn app(&self) -> &A {
        &self.app
    }
}
