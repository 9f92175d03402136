//! FreshFarm storefront core: catalog, stock, orders, accounts, vendors and
//! store settings, exposed as microsvc commands.

pub mod accounts;
pub mod catalog;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod microsvc;
pub mod model;
pub mod notify;
pub mod orders;
pub mod settings;
pub mod storefront;
pub mod vendors;

pub use accounts::{AccountPolicy, AccountService, Role, User};
pub use catalog::{CatalogService, Product, ProductStatus};
pub use error::MarketError;
pub use model::{InMemoryModelStore, Model, ModelError, ModelStore, ModelsExt};
pub use notify::{LogNotifier, Notification, Notifier};
pub use orders::{Order, OrderService, OrderStatus};
pub use storefront::Storefront;
