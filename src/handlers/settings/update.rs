//! Handler: settings.update

use serde_json::Value;

use crate::handlers::{actor, reply, App};
use crate::microsvc::{Context, HandlerError};
use crate::settings::SettingsPatch;

pub const COMMAND: &str = "settings.update";

pub fn guard(_ctx: &Context<App>) -> bool {
    true
}

pub fn handle(ctx: &Context<App>) -> Result<Value, HandlerError> {
    let admin = actor(ctx)?;
    let patch = ctx.input::<SettingsPatch>()?;
    reply(&ctx.app().settings().update(&admin, patch)?)
}
