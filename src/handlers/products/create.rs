//! Handler: product.create

use serde_json::Value;

use crate::catalog::ProductInput;
use crate::handlers::{actor, reply, App};
use crate::microsvc::{Context, HandlerError};

pub const COMMAND: &str = "product.create";

pub fn guard(ctx: &Context<App>) -> bool {
    ctx.has_fields(&["name", "price", "unit", "category"])
}

pub fn handle(ctx: &Context<App>) -> Result<Value, HandlerError> {
    let admin = actor(ctx)?;
    let input = ctx.input::<ProductInput>()?;
    reply(&ctx.app().catalog().create(&admin, input)?)
}
