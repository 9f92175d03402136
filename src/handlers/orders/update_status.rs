//! Handler: order.update_status

use serde::Deserialize;
use serde_json::Value;

use crate::handlers::{actor, reply, App};
use crate::microsvc::{Context, HandlerError};

pub const COMMAND: &str = "order.update_status";

#[derive(Deserialize)]
pub struct Input {
    pub id: String,
    pub status: String,
}

pub fn guard(ctx: &Context<App>) -> bool {
    ctx.has_fields(&["id", "status"])
}

pub fn handle(ctx: &Context<App>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    let admin = actor(ctx)?;
    let order = ctx
        .app()
        .orders()
        .update_status(&admin, &input.id, &input.status)?;
    reply(&order)
}
