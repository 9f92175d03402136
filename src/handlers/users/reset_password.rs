//! Handler: user.reset_password

use serde::Deserialize;
use serde_json::{json, Value};

use crate::handlers::App;
use crate::microsvc::{Context, HandlerError};

pub const COMMAND: &str = "user.reset_password";

#[derive(Deserialize)]
pub struct Input {
    pub token: String,
    pub password: String,
}

pub fn guard(ctx: &Context<App>) -> bool {
    ctx.has_fields(&["token", "password"])
}

pub fn handle(ctx: &Context<App>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    let user = ctx
        .app()
        .accounts()
        .reset_password(&input.token, &input.password)?;
    Ok(json!({
        "success": true,
        "id": user.id,
        "token": ctx.app().accounts().session_token(&user)?,
    }))
}
