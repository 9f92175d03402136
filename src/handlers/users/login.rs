//! Handler: user.login
//!
//! Unverified accounts may log in; the profile's `isVerified` tells the UI
//! to nag. The reply carries the bearer `token` for later requests.

use serde::Deserialize;
use serde_json::Value;

use crate::handlers::{signed_in, App};
use crate::microsvc::{Context, HandlerError};

pub const COMMAND: &str = "user.login";

#[derive(Deserialize)]
pub struct Input {
    pub email: String,
    pub password: String,
}

pub fn guard(ctx: &Context<App>) -> bool {
    ctx.has_fields(&["email", "password"])
}

pub fn handle(ctx: &Context<App>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    let user = ctx
        .app()
        .accounts()
        .authenticate(&input.email, &input.password)?;
    signed_in(ctx, &user)
}
