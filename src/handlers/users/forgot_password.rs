//! Handler: user.forgot_password

use serde::Deserialize;
use serde_json::{json, Value};

use crate::handlers::App;
use crate::microsvc::{Context, HandlerError};

pub const COMMAND: &str = "user.forgot_password";

#[derive(Deserialize)]
pub struct Input {
    pub email: String,
}

pub fn guard(ctx: &Context<App>) -> bool {
    ctx.has_fields(&["email"])
}

pub fn handle(ctx: &Context<App>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    ctx.app().accounts().forgot_password(&input.email)?;
    Ok(json!({ "success": true, "data": "Email sent" }))
}
