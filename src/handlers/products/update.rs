//! Handler: product.update

use serde::Deserialize;
use serde_json::Value;

use crate::catalog::ProductPatch;
use crate::handlers::{actor, reply, App};
use crate::microsvc::{Context, HandlerError};

pub const COMMAND: &str = "product.update";

#[derive(Deserialize)]
pub struct Input {
    pub id: String,
    #[serde(flatten)]
    pub patch: ProductPatch,
}

pub fn guard(ctx: &Context<App>) -> bool {
    ctx.has_fields(&["id"])
}

pub fn handle(ctx: &Context<App>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    let admin = actor(ctx)?;
    reply(&ctx.app().catalog().update(&admin, &input.id, input.patch)?)
}
