//! Handler: product.delete

use serde::Deserialize;
use serde_json::{json, Value};

use crate::handlers::{actor, App};
use crate::microsvc::{Context, HandlerError};

pub const COMMAND: &str = "product.delete";

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
    ctx.app().catalog().delete(&admin, &input.id)?;
    Ok(json!({ "message": "Product removed", "id": input.id }))
}
