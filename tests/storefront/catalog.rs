//! Catalog, vendors and settings as seen from outside the crate.

use freshfarm::catalog::{ProductPatch, ProductStatus, ReviewInput};
use freshfarm::settings::SettingsPatch;
use freshfarm::vendors::{VendorInput, VendorPatch};
use freshfarm::MarketError;

use crate::support::{admin, cart, customer, product, shop};

fn review(rating: i64, comment: &str) -> ReviewInput {
    ReviewInput {
        user_name: None,
        rating,
        comment: comment.into(),
    }
}

#[test]
fn reviews_update_the_rating() {
    let (app, _) = shop();
    let boss = admin(&app);
    let buyer = customer(&app, "chidi@example.ng");
    let yam = product(&app, &boss, "Yam", 2000, 10);
    assert_eq!(yam.rating(), 0.0);

    app.catalog()
        .submit_review(&buyer, &yam.id, review(5, "Fresh and firm"))
        .unwrap();
    let rated = app
        .catalog()
        .submit_review(&buyer, &yam.id, review(2, "Second batch was soft"))
        .unwrap();

    assert_eq!(rated.review_count(), 2);
    assert_eq!(rated.rating(), 3.5);
    assert_eq!(rated.reviews()[0].user_name, "Chidi Okafor");

    let err = app
        .catalog()
        .submit_review(&buyer, &yam.id, review(6, "Too good"))
        .unwrap_err();
    assert_eq!(err.to_string(), "Rating must be between 1 and 5");
    assert!(matches!(
        app.catalog().submit_review(&buyer, "missing", review(4, "ok")),
        Err(MarketError::NotFound { .. })
    ));
}

fn set_stock(app: &freshfarm::Storefront, boss: &freshfarm::User, id: &str, stock: u32) -> ProductStatus {
    app.catalog()
        .update(
            boss,
            id,
            ProductPatch {
                stock: Some(stock),
                ..Default::default()
            },
        )
        .unwrap()
        .status()
}

#[test]
fn admin_status_choice_survives_restock() {
    let (app, _) = shop();
    let boss = admin(&app);
    let yam = product(&app, &boss, "Yam", 2000, 10);

    let drafted = app
        .catalog()
        .update(
            &boss,
            &yam.id,
            ProductPatch {
                status: Some(ProductStatus::Draft),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(drafted.status(), ProductStatus::Draft);

    assert_eq!(set_stock(&app, &boss, &yam.id, 2), ProductStatus::LowStock);
    assert_eq!(set_stock(&app, &boss, &yam.id, 40), ProductStatus::Draft);

    // Running dry and coming back relists the product.
    assert_eq!(set_stock(&app, &boss, &yam.id, 0), ProductStatus::OutOfStock);
    assert_eq!(set_stock(&app, &boss, &yam.id, 3), ProductStatus::LowStock);
    assert_eq!(set_stock(&app, &boss, &yam.id, 9), ProductStatus::Active);
}

#[test]
fn draft_product_stays_draft_through_order_and_cancel() {
    let (app, _) = shop();
    let boss = admin(&app);
    let buyer = customer(&app, "chidi@example.ng");
    let yam = product(&app, &boss, "Yam", 2000, 6);
    app.catalog()
        .update(
            &boss,
            &yam.id,
            ProductPatch {
                status: Some(ProductStatus::Draft),
                ..Default::default()
            },
        )
        .unwrap();

    let order = app.orders().place(&buyer, cart(&[(&yam.id, 3)])).unwrap();
    assert_eq!(app.catalog().get(&yam.id).unwrap().status(), ProductStatus::LowStock);

    app.orders().cancel(&buyer, &order.id).unwrap();
    let restored = app.catalog().get(&yam.id).unwrap();
    assert_eq!(restored.stock(), 6);
    assert_eq!(restored.status(), ProductStatus::Draft);
}

#[test]
fn deleted_products_cannot_be_ordered() {
    let (app, _) = shop();
    let boss = admin(&app);
    let buyer = customer(&app, "chidi@example.ng");
    let yam = product(&app, &boss, "Yam", 2000, 10);

    app.catalog().delete(&boss, &yam.id).unwrap();
    assert!(matches!(
        app.orders().place(&buyer, cart(&[(&yam.id, 1)])),
        Err(MarketError::NotFound { kind: "Product", .. })
    ));
    assert!(app.catalog().list().unwrap().is_empty());
}

#[test]
fn vendor_lifecycle() {
    let (app, _) = shop();
    let boss = admin(&app);
    let buyer = customer(&app, "chidi@example.ng");
    let input = VendorInput {
        name: "Oko Farms".into(),
        location: "Ikorodu, Lagos".into(),
        description: "Aquaponic vegetables".into(),
        image: "https://img.example/oko.jpg".into(),
        rating: 4.5,
        contact_email: None,
        contact_phone: None,
    };

    assert!(matches!(
        app.vendors().create(&buyer, input.clone()),
        Err(MarketError::NotAuthorized(_))
    ));
    let vendor = app.vendors().create(&boss, input).unwrap();

    let renamed = app
        .vendors()
        .update(
            &boss,
            &vendor.id,
            VendorPatch {
                name: Some("Oko Farms Ltd".into()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(renamed.name, "Oko Farms Ltd");
    assert_eq!(app.vendors().list().unwrap().len(), 1);

    app.vendors().delete(&boss, &vendor.id).unwrap();
    assert!(matches!(
        app.vendors().get(&vendor.id),
        Err(MarketError::NotFound { .. })
    ));
}

#[test]
fn settings_drive_order_charges() {
    let (app, _) = shop();
    let boss = admin(&app);
    let buyer = customer(&app, "chidi@example.ng");
    let yam = product(&app, &boss, "Yam", 2000, 10);

    assert!(matches!(
        app.settings().update(&buyer, SettingsPatch::default()),
        Err(MarketError::NotAuthorized(_))
    ));
    app.settings()
        .update(
            &boss,
            SettingsPatch {
                shipping_cost: Some(1000),
                tax_rate: Some(7.5),
                ..Default::default()
            },
        )
        .unwrap();

    let order = app.orders().place(&buyer, cart(&[(&yam.id, 2)])).unwrap();
    assert_eq!(order.subtotal, 4000);
    assert_eq!(order.shipping, 1000);
    assert_eq!(order.tax, 300);
    assert_eq!(order.total, 5300);
}
