//! Handler: order.list

use serde_json::Value;

use crate::handlers::{actor, reply, App};
use crate::microsvc::{Context, HandlerError};

pub const COMMAND: &str = "order.list";

pub fn guard(_ctx: &Context<App>) -> bool {
    true
}

pub fn handle(ctx: &Context<App>) -> Result<Value, HandlerError> {
    let user = actor(ctx)?;
    reply(&ctx.app().orders().list(&user)?)
}
