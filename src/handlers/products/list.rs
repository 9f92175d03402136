//! Handler: product.list

use serde_json::Value;

use crate::handlers::{reply, App};
use crate::microsvc::{Context, HandlerError};

pub const COMMAND: &str = "product.list";

pub fn guard(_ctx: &Context<App>) -> bool {
    true
}

pub fn handle(ctx: &Context<App>) -> Result<Value, HandlerError> {
    reply(&ctx.app().catalog().list()?)
}
