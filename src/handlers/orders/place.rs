//! Handler: order.place

use serde_json::Value;

use crate::handlers::{actor, reply, App};
use crate::microsvc::{Context, HandlerError};
use crate::orders::PlaceOrder;

pub const COMMAND: &str = "order.place";

pub fn guard(ctx: &Context<App>) -> bool {
    ctx.has_fields(&["items"])
}

pub fn handle(ctx: &Context<App>) -> Result<Value, HandlerError> {
    let customer = actor(ctx)?;
    let request = ctx.input::<PlaceOrder>()?;
    let order = ctx.app().orders().place(&customer, request)?;
    reply(&order)
}
