use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::product::{Product, ProductInput, ProductPatch};
use super::review::ReviewInput;
use crate::accounts::{require_admin, User};
use crate::error::MarketError;
use crate::model::{ModelStore, ModelsExt};

fn product_not_found(id: &str) -> MarketError {
    MarketError::not_found("Product", id)
}

pub struct CatalogService<'a, S> {
    store: &'a S,
}

impl<'a, S: ModelStore> CatalogService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Every product, alphabetically.
    pub fn list(&self) -> Result<Vec<Product>, MarketError> {
        let mut products = self.store.models::<Product>().all()?;
        products.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(products)
    }

    pub fn get(&self, id: &str) -> Result<Product, MarketError> {
        self.store
            .models::<Product>()
            .get(id)?
            .map(|v| v.data)
            .ok_or_else(|| product_not_found(id))
    }

    pub fn create(&self, actor: &User, input: ProductInput) -> Result<Product, MarketError> {
        require_admin(actor)?;
        if input.name.trim().is_empty() {
            return Err(MarketError::validation("Product name is required"));
        }
        let product = Product::new(Uuid::new_v4().to_string(), input);
        self.store.models::<Product>().insert(&product)?;
        info!(product_id = %product.id, status = %product.status(), "product created");
        Ok(product)
    }

    pub fn update(
        &self,
        actor: &User,
        id: &str,
        patch: ProductPatch,
    ) -> Result<Product, MarketError> {
        require_admin(actor)?;
        let (product, ()) = self
            .store
            .models::<Product>()
            .modify(id, |p| {
                p.apply(patch.clone());
                Ok::<_, MarketError>(())
            })?
            .ok_or_else(|| product_not_found(id))?;
        Ok(product)
    }

    /// Remove a product. Orders keep their own snapshot of it.
    pub fn delete(&self, actor: &User, id: &str) -> Result<(), MarketError> {
        require_admin(actor)?;
        if !self.store.models::<Product>().delete(id)? {
            return Err(product_not_found(id));
        }
        info!(product_id = id, "product deleted");
        Ok(())
    }

    /// Append a review and recompute the product's rating.
    pub fn submit_review(
        &self,
        reviewer: &User,
        product_id: &str,
        input: ReviewInput,
    ) -> Result<Product, MarketError> {
        let review = input.into_review(&reviewer.name, Utc::now().date_naive().to_string())?;
        let (product, ()) = self
            .store
            .models::<Product>()
            .modify(product_id, |p| {
                p.add_review(review.clone());
                Ok::<_, MarketError>(())
            })?
            .ok_or_else(|| product_not_found(product_id))?;
        Ok(product)
    }
}
