//! Handler: user.block

use serde::Deserialize;
use serde_json::Value;

use crate::accounts::AccountStatus;
use crate::handlers::{actor, reply, App};
use crate::microsvc::{Context, HandlerError};

pub const COMMAND: &str = "user.block";

#[derive(Deserialize)]
pub struct Input {
    pub id: String,
}

pub fn guard(ctx: &Context<App>) -> bool {
    ctx.has_fields(&["id"])
}

pub fn handle(ctx: &Context<App>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    let admin = actor(ctx)?;
    let user = ctx
        .app()
        .accounts()
        .set_status(&admin, &input.id, AccountStatus::Blocked)?;
    reply(&user.profile())
}
