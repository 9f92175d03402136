//! Handler: vendor.delete

use serde::Deserialize;
use serde_json::{json, Value};

use crate::handlers::{actor, App};
use crate::microsvc::{Context, HandlerError};

pub const COMMAND: &str = "vendor.delete";

#[derive(Deserialize)]
pub struct Input {
    pub id: String,
}

pub fn guard(ctx: &Context<App>) -> bool {
    ctx.has_fields(&["id"])
}

pub fn handle(ctx: &Context<App>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    let admin = actor(ctx)?;
    ctx.app().vendors().delete(&admin, &input.id)?;
    Ok(json!({ "message": "Vendor removed", "id": input.id }))
}
