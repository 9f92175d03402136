//! Handler: vendor.update

use serde::Deserialize;
use serde_json::Value;

use crate::handlers::{actor, reply, App};
use crate::microsvc::{Context, HandlerError};
use crate::vendors::VendorPatch;

pub const COMMAND: &str = "vendor.update";

#[derive(Deserialize)]
pub struct Input {
    pub id: String,
    #[serde(flatten)]
    pub patch: VendorPatch,
}

pub fn guard(ctx: &Context<App>) -> bool {
    ctx.has_fields(&["id"])
}

pub fn handle(ctx: &Context<App>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    let admin = actor(ctx)?;
    reply(&ctx.app().vendors().update(&admin, &input.id, input.patch)?)
}
