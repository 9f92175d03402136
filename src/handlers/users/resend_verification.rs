//! Handler: user.resend_verification

use serde_json::{json, Value};

use crate::handlers::{actor, App};
use crate::microsvc::{Context, HandlerError};

pub const COMMAND: &str = "user.resend_verification";

pub fn guard(_ctx: &Context<App>) -> bool {
    true
}

pub fn handle(ctx: &Context<App>) -> Result<Value, HandlerError> {
    let user = actor(ctx)?;
    ctx.app().accounts().resend_verification(&user.id)?;
    Ok(json!({ "message": "Verification email sent" }))
}
