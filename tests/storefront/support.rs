//! Shared fixtures.

use std::sync::{Arc, Mutex};

use freshfarm::accounts::{AccountPolicy, Registration, User};
use freshfarm::catalog::{Product, ProductInput};
use freshfarm::orders::{AddressSnapshot, CartLine, PlaceOrder};
use freshfarm::{InMemoryModelStore, LogNotifier, ModelStore, Notification, Notifier, Storefront};
use serde_json::json;

pub type Outbox = Arc<Mutex<Vec<Notification>>>;

/// A storefront whose notifications land in a buffer.
pub fn shop() -> (Storefront, Outbox) {
    let outbox: Outbox = Arc::new(Mutex::new(Vec::new()));
    let app = Storefront::new(
        InMemoryModelStore::new(),
        Arc::new(LogNotifier::with_buffer(outbox.clone())),
    )
    .with_policy(AccountPolicy::for_tests());
    (app, outbox)
}

pub fn shop_with<S: ModelStore>(store: S, notifier: Arc<dyn Notifier>) -> Storefront<S> {
    Storefront::new(store, notifier).with_policy(AccountPolicy::for_tests())
}

pub fn admin<S: ModelStore>(app: &Storefront<S>) -> User {
    app.accounts()
        .bootstrap_admin("Ada Admin", "admin@freshfarm.test", "admin-pass")
        .unwrap()
}

pub fn customer<S: ModelStore>(app: &Storefront<S>, email: &str) -> User {
    app.accounts()
        .register(Registration {
            name: "Chidi Okafor".into(),
            email: email.into(),
            password: "secret-pass".into(),
        })
        .unwrap()
}

pub fn product<S: ModelStore>(
    app: &Storefront<S>,
    admin: &User,
    name: &str,
    price: u64,
    stock: u32,
) -> Product {
    let input: ProductInput = serde_json::from_value(json!({
        "name": name,
        "price": price,
        "unit": "per kg",
        "category": "Tubers",
        "image": "https://img.example/yam.jpg",
        "stock": stock,
    }))
    .unwrap();
    app.catalog().create(admin, input).unwrap()
}

pub fn stock_of<S: ModelStore>(app: &Storefront<S>, id: &str) -> u32 {
    app.catalog().get(id).unwrap().stock()
}

pub fn lagos() -> AddressSnapshot {
    AddressSnapshot {
        label: "Home".into(),
        street: "12 Admiralty Way".into(),
        landmark: None,
        city: Some("Lekki".into()),
        lga: "Eti-Osa".into(),
        state: "Lagos".into(),
        phone: "+2348012345678".into(),
        zip: None,
    }
}

pub fn cart(lines: &[(&str, u32)]) -> PlaceOrder {
    PlaceOrder {
        items: lines
            .iter()
            .map(|(id, quantity)| CartLine {
                product_id: id.to_string(),
                quantity: *quantity,
            })
            .collect(),
        payment_method: "Pay on Delivery".into(),
        shipping_address: Some(lagos()),
        address_id: None,
        customer_name: None,
    }
}

pub fn subjects(outbox: &Outbox) -> Vec<String> {
    outbox
        .lock()
        .unwrap()
        .iter()
        .map(|n| n.subject.clone())
        .collect()
}
