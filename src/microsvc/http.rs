//! HTTP transport for microsvc - maps REST requests to command dispatch.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - Every entry of the REST table below, e.g. `POST /api/orders` runs
//!   `order.place`. The JSON body and the path parameters are merged into
//!   one input object; path parameters win.
//! - `POST /commands/:command` dispatches any registered command with the
//!   JSON body as input.
//! - `GET /health` returns `{ "ok": true, "commands": [...] }`.
//!
//! The `Authorization: Bearer` token and the gateway's `x-freshfarm-*`
//! headers become the [`Session`]; the service's authenticator turns the
//! token into the caller's id.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, on, post, MethodFilter, MethodRouter};
use axum::{Json, Router};
use serde_json::{json, Map, Value};
use tracing::{error, info};

use super::error::HandlerError;
use super::service::Service;
use super::session::Session;

#[derive(Clone, Copy, Debug)]
enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Verb {
    fn filter(self) -> MethodFilter {
        match self {
            Verb::Get => MethodFilter::GET,
            Verb::Post => MethodFilter::POST,
            Verb::Put => MethodFilter::PUT,
            Verb::Patch => MethodFilter::PATCH,
            Verb::Delete => MethodFilter::DELETE,
        }
    }
}

struct RestRoute {
    verb: Verb,
    path: &'static str,
    command: &'static str,
    /// Status on success.
    status: u16,
}

const fn ok(verb: Verb, path: &'static str, command: &'static str) -> RestRoute {
    RestRoute {
        verb,
        path,
        command,
        status: 200,
    }
}

const fn created(verb: Verb, path: &'static str, command: &'static str) -> RestRoute {
    RestRoute {
        verb,
        path,
        command,
        status: 201,
    }
}

const REST_ROUTES: &[RestRoute] = &[
    created(Verb::Post, "/api/orders", "order.place"),
    ok(Verb::Get, "/api/orders", "order.list"),
    ok(Verb::Get, "/api/orders/:id", "order.get"),
    ok(Verb::Get, "/api/orders/:id/track", "order.track"),
    ok(Verb::Patch, "/api/orders/:id/status", "order.update_status"),
    ok(Verb::Put, "/api/orders/:id/cancel", "order.cancel"),
    ok(Verb::Get, "/api/products", "product.list"),
    created(Verb::Post, "/api/products", "product.create"),
    ok(Verb::Get, "/api/products/:id", "product.get"),
    ok(Verb::Put, "/api/products/:id", "product.update"),
    ok(Verb::Delete, "/api/products/:id", "product.delete"),
    created(Verb::Post, "/api/products/:id/reviews", "product.review"),
    ok(Verb::Get, "/api/vendors", "vendor.list"),
    created(Verb::Post, "/api/vendors", "vendor.create"),
    ok(Verb::Get, "/api/vendors/:id", "vendor.get"),
    ok(Verb::Put, "/api/vendors/:id", "vendor.update"),
    ok(Verb::Delete, "/api/vendors/:id", "vendor.delete"),
    created(Verb::Post, "/api/users", "user.register"),
    ok(Verb::Get, "/api/users", "user.list"),
    ok(Verb::Post, "/api/users/login", "user.login"),
    ok(Verb::Post, "/api/users/resend-verification", "user.resend_verification"),
    ok(Verb::Put, "/api/users/verify/:token", "user.verify"),
    ok(Verb::Post, "/api/users/forgot-password", "user.forgot_password"),
    ok(Verb::Put, "/api/users/reset-password/:token", "user.reset_password"),
    ok(Verb::Get, "/api/users/:id", "user.get"),
    ok(Verb::Put, "/api/users/:id", "user.update"),
    ok(Verb::Put, "/api/users/:id/block", "user.block"),
    ok(Verb::Put, "/api/users/:id/unblock", "user.unblock"),
    created(Verb::Post, "/api/users/:id/addresses", "user.address_add"),
    ok(Verb::Put, "/api/users/:id/addresses/:addressId", "user.address_update"),
    ok(Verb::Delete, "/api/users/:id/addresses/:addressId", "user.address_remove"),
    ok(Verb::Get, "/api/settings", "settings.get"),
    ok(Verb::Put, "/api/settings", "settings.update"),
];

type Shared<A> = Arc<Service<A>>;

/// Build an axum `Router` that dispatches commands via the given service.
pub fn router<A: Send + Sync + 'static>(service: Arc<Service<A>>) -> Router {
    let mut by_path: BTreeMap<&'static str, MethodRouter<Shared<A>>> = BTreeMap::new();
    for route in REST_ROUTES {
        let endpoint = rest_endpoint::<A>(route.verb, route.command, route.status);
        let methods = match by_path.remove(route.path) {
            Some(existing) => existing.merge(endpoint),
            None => endpoint,
        };
        by_path.insert(route.path, methods);
    }

    let mut app = Router::new()
        .route("/health", get(health_handler::<A>))
        .route("/commands/:command", post(command_handler::<A>));
    for (path, methods) in by_path {
        app = app.route(path, methods);
    }
    app.with_state(service)
}

/// Serve the service over HTTP at the given address (e.g. `"0.0.0.0:3000"`)
/// until Ctrl-C.
pub async fn serve<A: Send + Sync + 'static>(
    service: Arc<Service<A>>,
    addr: &str,
) -> Result<(), std::io::Error> {
    let app = router(service);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

fn rest_endpoint<A: Send + Sync + 'static>(
    verb: Verb,
    command: &'static str,
    status: u16,
) -> MethodRouter<Shared<A>> {
    let handler = move |State(service): State<Shared<A>>,
                        params: Option<Path<HashMap<String, String>>>,
                        headers: HeaderMap,
                        body: Bytes| async move {
        let input = match merge_input(&body, params.map(|Path(p)| p).unwrap_or_default()) {
            Ok(input) => input,
            Err(err) => return error_response(&err),
        };
        run(service, command, input, session_from_headers(&headers), status).await
    };
    on(verb.filter(), handler)
}

/// `GET /health` - returns `{ "ok": true, "commands": [...] }`.
async fn health_handler<A: Send + Sync + 'static>(
    State(service): State<Shared<A>>,
) -> impl IntoResponse {
    Json(json!({ "ok": true, "commands": service.commands() }))
}

/// `POST /commands/:command` - dispatch with the JSON body as input.
async fn command_handler<A: Send + Sync + 'static>(
    State(service): State<Shared<A>>,
    Path(command): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match merge_input(&body, HashMap::new()) {
        Ok(input) => run(service, &command, input, session_from_headers(&headers), 200).await,
        Err(err) => error_response(&err),
    }
}

/// Handlers are synchronous and may hash passwords, so they run on the
/// blocking pool.
async fn run<A: Send + Sync + 'static>(
    service: Shared<A>,
    command: &str,
    input: Value,
    session: Session,
    status: u16,
) -> Response {
    let name = command.to_string();
    let outcome = tokio::task::spawn_blocking(move || service.dispatch(&name, input, session)).await;
    match outcome {
        Ok(Ok(value)) => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::OK);
            (status, Json(value)).into_response()
        }
        Ok(Err(err)) => error_response(&err),
        Err(join) => {
            error!(command, error = %join, "handler panicked");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal error" })),
            )
                .into_response()
        }
    }
}

fn error_response(err: &HandlerError) -> Response {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

/// Parse the body (empty means `{}`) and lay the path parameters over it.
fn merge_input(body: &[u8], params: HashMap<String, String>) -> Result<Value, HandlerError> {
    let mut object = if body.iter().all(u8::is_ascii_whitespace) {
        Map::new()
    } else {
        match serde_json::from_slice::<Value>(body)? {
            Value::Object(map) => map,
            other if params.is_empty() => return Ok(other),
            _ => {
                return Err(HandlerError::DecodeFailed(
                    "request body must be a JSON object".into(),
                ))
            }
        }
    };
    for (key, value) in params {
        object.insert(key, Value::String(value));
    }
    Ok(Value::Object(object))
}

/// The bearer token and gateway headers (`x-freshfarm-*`) become the
/// session; the rest are dropped.
fn session_from_headers(headers: &HeaderMap) -> Session {
    Session::from_headers(
        headers
            .iter()
            .filter_map(|(name, value)| Some((name.as_str(), value.to_str().ok()?))),
    )
}
