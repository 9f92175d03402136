//! Handler: user.address_add

use serde::Deserialize;
use serde_json::Value;

use crate::accounts::Address;
use crate::handlers::{actor, reply, App};
use crate::microsvc::{Context, HandlerError};

pub const COMMAND: &str = "user.address_add";

/// `id` is the user; the address id is generated.
#[derive(Deserialize)]
pub struct Input {
    pub id: String,
    #[serde(flatten)]
    pub address: Address,
}

pub fn guard(ctx: &Context<App>) -> bool {
    ctx.has_fields(&["id", "street"])
}

pub fn handle(ctx: &Context<App>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    let caller = actor(ctx)?;
    let user = ctx
        .app()
        .accounts()
        .add_address(&caller, &input.id, input.address)?;
    reply(&user.addresses)
}
