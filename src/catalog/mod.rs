//! Catalog - products, their stock-derived status and customer reviews.

mod product;
mod review;
mod service;
mod stock;

pub use product::{Category, Product, ProductInput, ProductPatch, ProductStatus};
pub use review::{Review, ReviewInput};
pub use service::CatalogService;
pub use stock::{derive_status, return_stock, take_stock, LOW_STOCK_THRESHOLD};
