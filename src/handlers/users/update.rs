//! Handler: user.update

use serde::Deserialize;
use serde_json::Value;

use crate::accounts::ProfilePatch;
use crate::handlers::{actor, reply, signed_in, App};
use crate::microsvc::{Context, HandlerError};

pub const COMMAND: &str = "user.update";

#[derive(Deserialize)]
pub struct Input {
    pub id: String,
    #[serde(flatten)]
    pub patch: ProfilePatch,
}

pub fn guard(ctx: &Context<App>) -> bool {
    ctx.has_fields(&["id"])
}

pub fn handle(ctx: &Context<App>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    let caller = actor(ctx)?;
    let user = ctx
        .app()
        .accounts()
        .update_profile(&caller, &input.id, input.patch)?;
    // A fresh token only for the account's own holder.
    if caller.id == user.id {
        signed_in(ctx, &user)
    } else {
        reply(&user.profile())
    }
}
