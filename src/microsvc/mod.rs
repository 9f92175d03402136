//! Named-command dispatch for the storefront.
//!
//! Every operation the storefront exposes is a command such as
//! `order.place` or `user.block`, registered on a [`Service`] together with
//! a guard over its raw input. A dispatch builds a [`Context`] from the JSON
//! input, the caller's [`Session`] and the shared application state, runs the
//! guard and then the handler. The optional `http` transport maps REST
//! routes onto the same dispatch.
//!
//! Handler modules under `crate::handlers` all have the same shape, which is
//! what [`register_handlers!`](crate::register_handlers) relies on:
//!
//! ```ignore
//! pub const COMMAND: &str = "order.track";
//!
//! pub fn guard(ctx: &Context<App>) -> bool {
//!     ctx.has_fields(&["id"])
//! }
//!
//! pub fn handle(ctx: &Context<App>) -> Result<Value, HandlerError> {
//!     let input = ctx.input::<Input>()?;
//!     reply(&ctx.app().orders().track(&input.id)?)
//! }
//! ```
//!
//! Dispatching without a transport:
//!
//! ```ignore
//! let service = freshfarm::handlers::service(Storefront::in_memory());
//! let tracking = service.dispatch("order.track", json!({ "id": order_id }), Session::new())?;
//! ```

mod context;
mod error;
mod service;
mod session;

pub use context::Context;
pub use error::HandlerError;
pub use service::Service;
pub use session::{Session, SESSION_PREFIX, USER_ID_VAR};

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{router, serve};

/// Chain `command_guarded` for each listed handler module, using the
/// module's `COMMAND`, `guard` and `handle`.
///
/// ```ignore
/// let service = freshfarm::register_handlers!(
///     Service::new(app),
///     handlers::orders::place,
///     handlers::orders::cancel,
/// );
/// ```
#[macro_export]
macro_rules! register_handlers {
    ($service:expr, $( $($seg:ident)::+ ),+ $(,)?) => {
        $service
        $(
            .command_guarded(
                $($seg)::+::COMMAND,
                $($seg)::+::guard,
                $($seg)::+::handle,
            )
        )+
    };
}
