//! Command handlers, one module per command.
//!
//! Every module follows the microsvc convention: `COMMAND`, `guard` and
//! `handle`. Callers sign in with a bearer token issued by `user.login`
//! (and the other commands that return `token`). The service checks the
//! token, and commands that need a caller load that account from the store,
//! so roles always come from the store.

pub mod orders;
pub mod products;
pub mod settings;
pub mod users;
pub mod vendors;

use serde::Serialize;
use serde_json::Value;

use crate::accounts::User;
use crate::error::MarketError;
use crate::microsvc::{Context, HandlerError, Service};
use crate::model::{InMemoryModelStore, ModelsExt};
use crate::storefront::Storefront;

/// The application state the handlers run against.
pub type App = Storefront<InMemoryModelStore>;

/// The account behind the request. Blocked accounts are refused outright.
pub fn actor(ctx: &Context<App>) -> Result<User, HandlerError> {
    let id = ctx.user_id()?;
    let user = ctx
        .app()
        .store()
        .models::<User>()
        .get(id)?
        .map(|v| v.data)
        .ok_or_else(|| HandlerError::Unauthenticated("Not authorized, user not found".into()))?;
    if user.is_blocked() {
        return Err(MarketError::AccountSuspended.into());
    }
    Ok(user)
}

pub(crate) fn reply<T: Serialize>(value: &T) -> Result<Value, HandlerError> {
    Ok(serde_json::to_value(value)?)
}

/// `user`'s profile with a fresh session token alongside.
pub(crate) fn signed_in(ctx: &Context<App>, user: &User) -> Result<Value, HandlerError> {
    let token = ctx.app().accounts().session_token(user)?;
    let mut body = reply(&user.profile())?;
    if let Value::Object(fields) = &mut body {
        fields.insert("token".into(), Value::String(token));
    }
    Ok(body)
}

/// A service with every storefront command registered.
pub fn service(app: App) -> Service<App> {
    crate::register_handlers!(
        Service::new(app)
            .authenticate_with(|app: &App, token: &str| app.accounts().session_user(token)),
        orders::place,
        orders::list,
        orders::get,
        orders::track,
        orders::update_status,
        orders::cancel,
        products::list,
        products::get,
        products::create,
        products::update,
        products::delete,
        products::review,
        vendors::list,
        vendors::get,
        vendors::create,
        vendors::update,
        vendors::delete,
        users::register,
        users::login,
        users::resend_verification,
        users::verify,
        users::forgot_password,
        users::reset_password,
        users::get,
        users::update,
        users::block,
        users::unblock,
        users::address_add,
        users::address_update,
        users::address_remove,
        users::list,
        settings::get,
        settings::update,
    )
}
