//! Handler: order.cancel

use serde::Deserialize;
use serde_json::Value;

use crate::handlers::{actor, reply, App};
use crate::microsvc::{Context, HandlerError};

pub const COMMAND: &str = "order.cancel";

#[derive(Deserialize)]
pub struct Input {
    pub id: String,
}

pub fn guard(ctx: &Context<App>) -> bool {
    ctx.has_fields(&["id"])
}

pub fn handle(ctx: &Context<App>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    let user = actor(ctx)?;
    reply(&ctx.app().orders().cancel(&user, &input.id)?)
}
