//! Handler: user.verify

use serde::Deserialize;
use serde_json::{json, Value};

use crate::handlers::App;
use crate::microsvc::{Context, HandlerError};

pub const COMMAND: &str = "user.verify";

#[derive(Deserialize)]
pub struct Input {
    pub token: String,
}

pub fn guard(ctx: &Context<App>) -> bool {
    ctx.has_fields(&["token"])
}

pub fn handle(ctx: &Context<App>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    let user = ctx.app().accounts().verify_email(&input.token)?;
    Ok(json!({
        "success": true,
        "message": "Email verified successfully",
        "token": ctx.app().accounts().session_token(&user)?,
        "user": user.profile(),
    }))
}
