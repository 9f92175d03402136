//! Handler: product.review

use serde::Deserialize;
use serde_json::Value;

use crate::catalog::ReviewInput;
use crate::handlers::{actor, reply, App};
use crate::microsvc::{Context, HandlerError};

pub const COMMAND: &str = "product.review";

#[derive(Deserialize)]
pub struct Input {
    pub id: String,
    #[serde(flatten)]
    pub review: ReviewInput,
}

pub fn guard(ctx: &Context<App>) -> bool {
    ctx.has_fields(&["id", "rating", "comment"])
}

pub fn handle(ctx: &Context<App>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    let reviewer = actor(ctx)?;
    let product = ctx
        .app()
        .catalog()
        .submit_review(&reviewer, &input.id, input.review)?;
    reply(&product)
}
