//! Stock-derived status projection and the stock adjustments made by the
//! order flow.

use tracing::warn;

use super::product::{Product, ProductStatus};
use crate::model::{ModelError, ModelStore, ModelsExt};

/// Below this many units a product shows as `Low Stock`.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

/// Derive a product's display status from its listing and stock level.
///
/// Zero is always `Out of Stock` and anything under the threshold is
/// `Low Stock`. At or above the threshold the admin's `Active`/`Draft`
/// listing shows; a derived label passed as the listing resolves to
/// `Active`.
pub fn derive_status(listing: ProductStatus, stock: u32) -> ProductStatus {
    match stock {
        0 => ProductStatus::OutOfStock,
        s if s < LOW_STOCK_THRESHOLD => ProductStatus::LowStock,
        _ => match listing {
            ProductStatus::Active | ProductStatus::Draft => listing,
            ProductStatus::LowStock | ProductStatus::OutOfStock => ProductStatus::Active,
        },
    }
}

/// Take `quantity` units off a product's shelf, clamped at zero.
///
/// Returns `Ok(None)` when the product no longer exists. The write is a
/// compare-and-swap, so two concurrent orders never lose each other's
/// decrement; an order for more than what is left still goes through and
/// is logged.
pub fn take_stock<S: ModelStore>(
    store: &S,
    product_id: &str,
    quantity: u32,
) -> Result<Option<Product>, ModelError> {
    let changed = store.models::<Product>().modify(product_id, |product| {
        if quantity > product.stock() {
            warn!(
                product_id,
                requested = quantity,
                available = product.stock(),
                "stock oversold, clamping at zero"
            );
        }
        product.set_stock(product.stock().saturating_sub(quantity));
        Ok::<_, ModelError>(())
    })?;
    Ok(changed.map(|(product, _)| product))
}

/// Put `quantity` units back on a product's shelf.
///
/// Returns `Ok(None)` when the product no longer exists.
pub fn return_stock<S: ModelStore>(
    store: &S,
    product_id: &str,
    quantity: u32,
) -> Result<Option<Product>, ModelError> {
    let changed = store.models::<Product>().modify(product_id, |product| {
        product.set_stock(product.stock().saturating_add(quantity));
        Ok::<_, ModelError>(())
    })?;
    Ok(changed.map(|(product, _)| product))
}
