//! Handler: vendor.create

use serde_json::Value;

use crate::handlers::{actor, reply, App};
use crate::microsvc::{Context, HandlerError};
use crate::vendors::VendorInput;

pub const COMMAND: &str = "vendor.create";

pub fn guard(ctx: &Context<App>) -> bool {
    ctx.has_fields(&["name", "location"])
}

pub fn handle(ctx: &Context<App>) -> Result<Value, HandlerError> {
    let admin = actor(ctx)?;
    let input = ctx.input::<VendorInput>()?;
    reply(&ctx.app().vendors().create(&admin, input)?)
}
