//! HTTP transport tests: the full command set behind axum, driven with
//! reqwest.

#![cfg(feature = "http")]

use std::sync::Arc;

use freshfarm::accounts::AccountPolicy;
use freshfarm::microsvc::{self, Service, USER_ID_VAR};
use freshfarm::{handlers, Storefront};
use serde_json::{json, Value};

struct Server {
    base: String,
    admin: Caller,
    client: reqwest::Client,
}

/// A signed-in account: its id and the bearer token it was issued.
struct Caller {
    id: String,
    token: String,
}

impl Caller {
    fn from_reply(body: &Value) -> Self {
        Caller {
            id: body["id"].as_str().unwrap().to_string(),
            token: body["token"].as_str().unwrap().to_string(),
        }
    }
}

/// Bind to port 0 with a bootstrapped admin and return the address.
async fn start_server() -> Server {
    let app = Storefront::in_memory().with_policy(AccountPolicy::for_tests());
    app.accounts()
        .bootstrap_admin("Ada Admin", "admin@freshfarm.test", "admin-pass")
        .unwrap();
    let service: Arc<Service<handlers::App>> = Arc::new(handlers::service(app));

    let router = microsvc::router(service);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    let client = reqwest::Client::new();
    let base = format!("http://{addr}");
    let admin = login(&client, &base, "admin@freshfarm.test", "admin-pass").await;
    Server { base, admin, client }
}

async fn login(client: &reqwest::Client, base: &str, email: &str, password: &str) -> Caller {
    let resp = client
        .post(format!("{base}/api/users/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    Caller::from_reply(&resp.json().await.unwrap())
}

impl Server {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn register(&self, email: &str) -> Caller {
        let resp = self
            .client
            .post(self.url("/api/users"))
            .json(&json!({ "name": "Chidi Okafor", "email": email, "password": "secret-pass" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
        Caller::from_reply(&resp.json().await.unwrap())
    }

    async fn create_product(&self, name: &str, stock: u32) -> String {
        let resp = self
            .client
            .post(self.url("/api/products"))
            .bearer_auth(&self.admin.token)
            .json(&json!({
                "name": name,
                "price": 2500,
                "unit": "per basket",
                "category": "Vegetables",
                "stock": stock,
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
        let body: Value = resp.json().await.unwrap();
        body["id"].as_str().unwrap().to_string()
    }

    async fn place(&self, token: &str, product_id: &str, quantity: u32) -> reqwest::Response {
        self.client
            .post(self.url("/api/orders"))
            .bearer_auth(token)
            .json(&json!({
                "items": [{ "productId": product_id, "quantity": quantity }],
                "paymentMethod": "Pay on Delivery",
                "shippingAddress": {
                    "label": "Home",
                    "street": "4 Allen Avenue",
                    "lga": "Ikeja",
                    "state": "Lagos",
                    "phone": "+2348011112222"
                }
            }))
            .send()
            .await
            .unwrap()
    }

    async fn stock(&self, product_id: &str) -> (u64, String) {
        let body: Value = self
            .client
            .get(self.url(&format!("/api/products/{product_id}")))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        (
            body["stock"].as_u64().unwrap(),
            body["status"].as_str().unwrap().to_string(),
        )
    }
}

#[tokio::test]
async fn health_lists_commands() {
    let server = start_server().await;
    let resp = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], true);
    let commands: Vec<&str> = body["commands"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(commands.contains(&"order.place"));
    assert!(commands.contains(&"settings.update"));
}

#[tokio::test]
async fn order_round_trip_over_rest() {
    let server = start_server().await;
    let customer = server.register("chidi@example.ng").await;
    let product = server.create_product("Ugu leaves", 6).await;

    let resp = server.place(&customer.token, &product, 2).await;
    assert_eq!(resp.status(), 201);
    let order: Value = resp.json().await.unwrap();
    let order_id = order["id"].as_str().unwrap().to_string();
    assert_eq!(order["status"], "Pending");
    assert_eq!(server.stock(&product).await, (4, "Low Stock".to_string()));

    let tracking: Value = server
        .client
        .get(server.url(&format!("/api/orders/{order_id}/track")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tracking["status"], "Pending");
    assert_eq!(tracking["items"], 1);

    let resp = server
        .client
        .put(server.url(&format!("/api/orders/{order_id}/cancel")))
        .bearer_auth(&customer.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(server.stock(&product).await, (6, "Active".to_string()));

    let resp = server
        .client
        .put(server.url(&format!("/api/orders/{order_id}/cancel")))
        .bearer_auth(&customer.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Cannot cancel order that is no longer pending" }));
}

#[tokio::test]
async fn status_updates_are_admin_only() {
    let server = start_server().await;
    let customer = server.register("chidi@example.ng").await;
    let product = server.create_product("Ugu leaves", 10).await;
    let order: Value = server.place(&customer.token, &product, 1).await.json().await.unwrap();
    let path = format!("/api/orders/{}/status", order["id"].as_str().unwrap());

    let resp = server
        .client
        .patch(server.url(&path))
        .bearer_auth(&customer.token)
        .json(&json!({ "status": "Confirmed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let resp = server
        .client
        .patch(server.url(&path))
        .bearer_auth(&server.admin.token)
        .json(&json!({ "status": "Confirmed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "Confirmed");

    let resp = server
        .client
        .patch(server.url(&path))
        .bearer_auth(&server.admin.token)
        .json(&json!({ "status": "Teleported" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn missing_identity_is_401() {
    let server = start_server().await;
    let product = server.create_product("Ugu leaves", 10).await;

    let resp = server
        .client
        .post(server.url("/api/orders"))
        .json(&json!({ "items": [{ "productId": product, "quantity": 1 }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());

    let resp = server.place("no-such-token", &product, 1).await;
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Not authorized, token failed");
}

#[tokio::test]
async fn user_id_header_is_not_an_identity() {
    let server = start_server().await;
    let customer = server.register("chidi@example.ng").await;

    let resp = server
        .client
        .get(server.url("/api/users"))
        .header(USER_ID_VAR, &server.admin.id)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    // A customer's token with the admin's id bolted on still acts as the customer.
    let resp = server
        .client
        .get(server.url("/api/users"))
        .bearer_auth(&customer.token)
        .header(USER_ID_VAR, &server.admin.id)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let resp = server
        .client
        .get(server.url("/api/users"))
        .bearer_auth(&server.admin.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn login_token_unlocks_own_profile() {
    let server = start_server().await;
    let registered = server.register("chidi@example.ng").await;
    let caller = login(&server.client, &server.base, "chidi@example.ng", "secret-pass").await;
    assert_eq!(caller.id, registered.id);

    let resp = server
        .client
        .get(server.url(&format!("/api/users/{}", caller.id)))
        .bearer_auth(&caller.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["email"], "chidi@example.ng");
    assert!(body.get("passwordHash").is_none());

    let mut forged = caller.token.clone();
    forged.push('x');
    let resp = server
        .client
        .get(server.url(&format!("/api/users/{}", caller.id)))
        .bearer_auth(forged)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn unknown_product_is_404_and_bad_json_400() {
    let server = start_server().await;
    let customer = server.register("chidi@example.ng").await;

    let resp = server.place(&customer.token, "ghost", 1).await;
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Product not found");

    let resp = server
        .client
        .post(server.url("/api/orders"))
        .bearer_auth(&customer.token)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn blocked_accounts_are_shut_out() {
    let server = start_server().await;
    let customer = server.register("chidi@example.ng").await;
    let product = server.create_product("Ugu leaves", 10).await;

    let resp = server
        .client
        .put(server.url(&format!("/api/users/{}/block", customer.id)))
        .bearer_auth(&server.admin.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = server
        .client
        .post(server.url("/api/users/login"))
        .json(&json!({ "email": "chidi@example.ng", "password": "secret-pass" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    let resp = server.place(&customer.token, &product, 1).await;
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn generic_command_endpoint() {
    let server = start_server().await;
    let resp = server
        .client
        .post(server.url("/commands/settings.get"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["shippingCost"], 1500);

    let resp = server
        .client
        .post(server.url("/commands/nope"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
