//! Handler: product.get

use serde::Deserialize;
use serde_json::Value;

use crate::handlers::{reply, App};
use crate::microsvc::{Context, HandlerError};

pub const COMMAND: &str = "product.get";

#[derive(Deserialize)]
pub struct Input {
    pub id: String,
}

pub fn guard(ctx: &Context<App>) -> bool {
    ctx.has_fields(&["id"])
}

pub fn handle(ctx: &Context<App>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    reply(&ctx.app().catalog().get(&input.id)?)
}
