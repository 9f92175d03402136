//! Handler: user.list

use serde_json::Value;

use crate::accounts::UserProfile;
use crate::handlers::{actor, reply, App};
use crate::microsvc::{Context, HandlerError};

pub const COMMAND: &str = "user.list";

pub fn guard(_ctx: &Context<App>) -> bool {
    true
}

pub fn handle(ctx: &Context<App>) -> Result<Value, HandlerError> {
    let admin = actor(ctx)?;
    let users = ctx.app().accounts().list(&admin)?;
    let profiles: Vec<UserProfile> = users.iter().map(UserProfile::from).collect();
    reply(&profiles)
}
