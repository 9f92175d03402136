//! Handler: user.get

use serde::Deserialize;
use serde_json::Value;

use crate::error::MarketError;
use crate::handlers::{actor, reply, App};
use crate::microsvc::{Context, HandlerError};

pub const COMMAND: &str = "user.get";

#[derive(Deserialize)]
pub struct Input {
    pub id: String,
}

pub fn guard(ctx: &Context<App>) -> bool {
    ctx.has_fields(&["id"])
}

pub fn handle(ctx: &Context<App>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    let caller = actor(ctx)?;
    if !caller.can_act_for(&input.id) {
        return Err(MarketError::not_authorized("Not authorized").into());
    }
    reply(&ctx.app().accounts().get(&input.id)?.profile())
}
