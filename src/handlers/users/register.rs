//! Handler: user.register

use serde_json::{json, Value};

use crate::accounts::Registration;
use crate::handlers::{signed_in, App};
use crate::microsvc::{Context, HandlerError};

pub const COMMAND: &str = "user.register";

pub fn guard(ctx: &Context<App>) -> bool {
    ctx.has_fields(&["name", "email", "password"])
}

pub fn handle(ctx: &Context<App>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Registration>()?;
    let user = ctx.app().accounts().register(input)?;
    let mut body = signed_in(ctx, &user)?;
    if let Value::Object(fields) = &mut body {
        fields.insert(
            "message".into(),
            json!("Registration successful. Please check your email to verify account."),
        );
    }
    Ok(body)
}
