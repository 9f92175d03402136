use std::fmt;

use serde::{Deserialize, Serialize};

use super::review::Review;
use super::stock::derive_status;
use crate::model::Model;

/// Closed set of shelf categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Tubers,
    Fruits,
    Vegetables,
    #[serde(rename = "Meat & Poultry")]
    MeatAndPoultry,
    #[serde(rename = "Dairy & Eggs")]
    DairyAndEggs,
    #[serde(rename = "Grains & Legumes")]
    GrainsAndLegumes,
    #[serde(rename = "Herbs & Spices")]
    HerbsAndSpices,
    #[serde(rename = "Nuts & Seeds")]
    NutsAndSeeds,
    #[serde(rename = "Pantry/Cooking Essentials")]
    Pantry,
}

/// Display status of a product. `LowStock` and `OutOfStock` are derived
/// from stock; `Active` and `Draft` are the admin's listing choice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductStatus {
    #[default]
    Active,
    Draft,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProductStatus::Active => "Active",
            ProductStatus::Draft => "Draft",
            ProductStatus::LowStock => "Low Stock",
            ProductStatus::OutOfStock => "Out of Stock",
        };
        f.write_str(label)
    }
}

/// A product on the shelf.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Whole minor currency units.
    pub price: u64,
    pub unit: String,
    pub category: Category,
    pub image: String,
    pub description: String,
    stock: u32,
    status: ProductStatus,
    /// The admin's choice, `Active` or `Draft`. `status` shows it whenever
    /// stock is at or above the low-stock threshold.
    #[serde(default)]
    listing: ProductStatus,
    rating: f64,
    reviews: u32,
    #[serde(default)]
    reviews_list: Vec<Review>,
    #[serde(default)]
    pub is_seasonal: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
}

impl Model for Product {
    const COLLECTION: &'static str = "products";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Product {
    pub fn new(id: impl Into<String>, input: ProductInput) -> Self {
        let listing = listing_of(input.status.unwrap_or_default());
        Product {
            id: id.into(),
            name: input.name,
            price: input.price,
            unit: input.unit,
            category: input.category,
            image: input.image,
            description: input.description,
            stock: input.stock,
            status: derive_status(listing, input.stock),
            listing,
            rating: 0.0,
            reviews: 0,
            reviews_list: Vec::new(),
            is_seasonal: input.is_seasonal,
            vendor_id: input.vendor_id,
        }
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn status(&self) -> ProductStatus {
        self.status
    }

    pub fn listing(&self) -> ProductStatus {
        self.listing
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn review_count(&self) -> u32 {
        self.reviews
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews_list
    }

    /// Set the stock level and re-derive the status from it.
    ///
    /// Stock coming back from zero relists the product as `Active`.
    pub fn set_stock(&mut self, stock: u32) {
        if self.stock == 0 && stock > 0 {
            self.listing = ProductStatus::Active;
        }
        self.stock = stock;
        self.status = derive_status(self.listing, stock);
    }

    /// Admin status change. Only `Active` and `Draft` can be chosen, a
    /// derived label counts as `Active`. The stock projection is applied on
    /// top.
    pub fn set_listing_status(&mut self, status: ProductStatus) {
        self.listing = listing_of(status);
        self.status = derive_status(self.listing, self.stock);
    }

    /// Append a review and recompute the count and mean rating.
    pub fn add_review(&mut self, review: Review) {
        self.reviews_list.push(review);
        self.reviews = self.reviews_list.len() as u32;
        let sum: u32 = self.reviews_list.iter().map(|r| u32::from(r.rating)).sum();
        self.rating = f64::from(sum) / f64::from(self.reviews);
    }

    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(unit) = patch.unit {
            self.unit = unit;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(is_seasonal) = patch.is_seasonal {
            self.is_seasonal = is_seasonal;
        }
        if let Some(vendor_id) = patch.vendor_id {
            self.vendor_id = if vendor_id.is_empty() { None } else { Some(vendor_id) };
        }
        // Stock first, so an explicit listing in the same patch wins over
        // the relisting a restock from zero does.
        if let Some(stock) = patch.stock {
            self.set_stock(stock);
        }
        if let Some(status) = patch.status {
            self.set_listing_status(status);
        }
    }
}

fn listing_of(status: ProductStatus) -> ProductStatus {
    match status {
        ProductStatus::Draft => ProductStatus::Draft,
        _ => ProductStatus::Active,
    }
}

/// Fields for creating a product.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub price: u64,
    pub unit: String,
    pub category: Category,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub status: Option<ProductStatus>,
    #[serde(default)]
    pub is_seasonal: bool,
    #[serde(default)]
    pub vendor_id: Option<String>,
}

/// Partial admin edit. An empty `vendorId` clears the vendor.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<u64>,
    pub unit: Option<String>,
    pub category: Option<Category>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub stock: Option<u32>,
    pub status: Option<ProductStatus>,
    pub is_seasonal: Option<bool>,
    pub vendor_id: Option<String>,
}
