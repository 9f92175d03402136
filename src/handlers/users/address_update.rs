//! Handler: user.address_update

use serde::Deserialize;
use serde_json::Value;

use crate::accounts::Address;
use crate::handlers::{actor, reply, App};
use crate::microsvc::{Context, HandlerError};

pub const COMMAND: &str = "user.address_update";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    pub id: String,
    pub address_id: String,
    #[serde(flatten)]
    pub address: Address,
}

pub fn guard(ctx: &Context<App>) -> bool {
    ctx.has_fields(&["id", "addressId"])
}

pub fn handle(ctx: &Context<App>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    let caller = actor(ctx)?;
    let user = ctx.app().accounts().update_address(
        &caller,
        &input.id,
        &input.address_id,
        input.address,
    )?;
    reply(&user.addresses)
}
