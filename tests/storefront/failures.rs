//! Behaviour when the store or the mail transport fails.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use freshfarm::accounts::{Registration, User};
use freshfarm::catalog::Product;
use freshfarm::model::{Document, Expect};
use freshfarm::notify::NotificationError;
use freshfarm::orders::{Order, OrderStatus};
use freshfarm::{InMemoryModelStore, MarketError, Model, ModelError, ModelStore, ModelsExt, Notification, Notifier};

use crate::support::{admin, cart, customer, product, shop_with, stock_of};

/// Delegates to an in-memory store but refuses updates to chosen products.
#[derive(Default)]
struct FlakyStore {
    inner: InMemoryModelStore,
    broken: Mutex<HashSet<String>>,
}

impl FlakyStore {
    fn break_product(&self, id: &str) {
        self.broken.lock().unwrap().insert(id.to_string());
    }

    fn repair(&self) {
        self.broken.lock().unwrap().clear();
    }
}

impl ModelStore for FlakyStore {
    fn load(&self, collection: &'static str, id: &str) -> Result<Option<Document>, ModelError> {
        self.inner.load(collection, id)
    }

    fn scan(&self, collection: &'static str) -> Result<Vec<(String, Document)>, ModelError> {
        self.inner.scan(collection)
    }

    fn write(
        &self,
        collection: &'static str,
        id: &str,
        body: Vec<u8>,
        expect: Expect,
    ) -> Result<u64, ModelError> {
        let refused = collection == Product::COLLECTION
            && matches!(expect, Expect::Version(_))
            && self.broken.lock().unwrap().contains(id);
        if refused {
            return Err(ModelError::Storage("disk full".into()));
        }
        self.inner.write(collection, id, body, expect)
    }

    fn remove(&self, collection: &'static str, id: &str) -> Result<bool, ModelError> {
        self.inner.remove(collection, id)
    }
}

struct SmtpDown;

impl Notifier for SmtpDown {
    fn send(&self, _notification: &Notification) -> Result<(), NotificationError> {
        Err(NotificationError::Unavailable("connection refused".into()))
    }
}

#[test]
fn failed_stock_write_is_compensated() {
    let app = shop_with(FlakyStore::default(), Arc::new(SmtpDown));
    let boss = admin(&app);
    let buyer = customer(&app, "chidi@example.ng");
    let yam = product(&app, &boss, "Yam", 2000, 10);
    let egg = product(&app, &boss, "Eggs", 3500, 8);
    app.store().break_product(&egg.id);

    let err = app
        .orders()
        .place(&buyer, cart(&[(&yam.id, 3), (&egg.id, 2)]))
        .unwrap_err();
    assert!(matches!(err, MarketError::Persistence(_)));

    assert_eq!(stock_of(&app, &yam.id), 10);
    assert_eq!(stock_of(&app, &egg.id), 8);

    let orders = app.store().models::<Order>().all().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, OrderStatus::Cancelled);
    assert!(orders[0]
        .cancellation_reason
        .as_deref()
        .unwrap()
        .starts_with("Stock could not be reserved"));
}

#[test]
fn failed_stock_return_reopens_the_order() {
    let app = shop_with(FlakyStore::default(), Arc::new(SmtpDown));
    let boss = admin(&app);
    let buyer = customer(&app, "chidi@example.ng");
    let yam = product(&app, &boss, "Yam", 2000, 10);
    let egg = product(&app, &boss, "Eggs", 3500, 8);
    let order = app
        .orders()
        .place(&buyer, cart(&[(&yam.id, 3), (&egg.id, 2)]))
        .unwrap();

    // Fails on the first line.
    app.store().break_product(&yam.id);
    let err = app.orders().cancel(&buyer, &order.id).unwrap_err();
    assert!(matches!(err, MarketError::Persistence(_)));
    assert_eq!(app.orders().get(&buyer, &order.id).unwrap().status, OrderStatus::Pending);
    assert_eq!(stock_of(&app, &yam.id), 7);
    assert_eq!(stock_of(&app, &egg.id), 6);

    // Fails on the second line after the first was returned.
    app.store().repair();
    app.store().break_product(&egg.id);
    assert!(app.orders().cancel(&buyer, &order.id).is_err());
    assert_eq!(app.orders().get(&buyer, &order.id).unwrap().status, OrderStatus::Pending);
    assert_eq!(stock_of(&app, &yam.id), 7);
    assert_eq!(stock_of(&app, &egg.id), 6);

    app.store().repair();
    let cancelled = app.orders().cancel(&buyer, &order.id).unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(stock_of(&app, &yam.id), 10);
    assert_eq!(stock_of(&app, &egg.id), 8);
}

#[test]
fn mail_outage_does_not_block_orders_or_signups() {
    let app = shop_with(InMemoryModelStore::new(), Arc::new(SmtpDown));
    let boss = admin(&app);
    let buyer = customer(&app, "chidi@example.ng");
    let yam = product(&app, &boss, "Yam", 2000, 10);

    let order = app.orders().place(&buyer, cart(&[(&yam.id, 1)])).unwrap();
    app.orders().update_status(&boss, &order.id, "Confirmed").unwrap();
    let shipped = app.orders().update_status(&boss, &order.id, "Shipped").unwrap();
    assert_eq!(shipped.status, OrderStatus::Shipped);
    assert_eq!(stock_of(&app, &yam.id), 9);
}

#[test]
fn mail_outage_surfaces_on_account_mail() {
    let app = shop_with(InMemoryModelStore::new(), Arc::new(SmtpDown));
    let user = app
        .accounts()
        .register(Registration {
            name: "Chidi".into(),
            email: "chidi@example.ng".into(),
            password: "secret-pass".into(),
        })
        .unwrap();

    let err = app.accounts().forgot_password("chidi@example.ng").unwrap_err();
    assert!(matches!(err, MarketError::Notification(_)));
    let stored: User = app.store().models::<User>().require(&user.id).unwrap().data;
    assert!(stored.reset_password_token.is_none());
    assert!(stored.reset_password_expire.is_none());

    assert!(matches!(
        app.accounts().resend_verification(&user.id),
        Err(MarketError::Notification(_))
    ));
}
