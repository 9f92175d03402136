use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::accounts::Address;
use crate::catalog::Product;
use crate::error::MarketError;
use crate::model::Model;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Forward moves one step at a time; only a pending order can be
    /// cancelled. Delivered and Cancelled are terminal.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Confirmed, Shipped)
                | (Shipped, Delivered)
                | (Pending, Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(OrderStatus::Pending),
            "Confirmed" => Ok(OrderStatus::Confirmed),
            "Shipped" => Ok(OrderStatus::Shipped),
            "Delivered" => Ok(OrderStatus::Delivered),
            "Cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(MarketError::validation(format!(
                "Unknown order status: {other}"
            ))),
        }
    }
}

/// A product as it was when the order was placed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: String,
    pub name: String,
    pub image: String,
    pub price: u64,
    pub unit: String,
    pub quantity: u32,
}

impl LineItem {
    pub fn snapshot(product: &Product, quantity: u32) -> Self {
        LineItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            image: product.image.clone(),
            price: product.price,
            unit: product.unit.clone(),
            quantity,
        }
    }

    /// Price times quantity, `None` if it does not fit.
    pub fn line_total(&self) -> Option<u64> {
        self.price.checked_mul(u64::from(self.quantity))
    }
}

/// Sum of the line totals.
pub fn subtotal(items: &[LineItem]) -> Result<u64, MarketError> {
    items
        .iter()
        .try_fold(0u64, |sum, item| item.line_total().and_then(|t| sum.checked_add(t)))
        .ok_or_else(|| MarketError::validation("Order total is too large"))
}

/// Where the order goes, copied out of the address book.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressSnapshot {
    pub label: String,
    pub street: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub lga: String,
    pub state: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
}

impl From<&Address> for AddressSnapshot {
    fn from(address: &Address) -> Self {
        AddressSnapshot {
            label: address.label.clone(),
            street: address.street.clone(),
            landmark: address.landmark.clone(),
            city: address.city.clone(),
            lga: address.lga.clone(),
            state: address.state.clone(),
            phone: address.phone.clone(),
            zip: address.zip.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub items: Vec<LineItem>,
    pub subtotal: u64,
    pub shipping: u64,
    pub tax: u64,
    pub total: u64,
    pub status: OrderStatus,
    pub payment_method: String,
    /// `YYYY-MM-DD`, for display.
    pub date: String,
    /// RFC 3339; orders list newest first by this.
    pub created_at: String,
    pub shipping_address: AddressSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
}

impl Model for Order {
    const COLLECTION: &'static str = "orders";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Order {
    pub fn tracking(&self) -> OrderTracking {
        OrderTracking {
            id: self.id.clone(),
            status: self.status,
            date: self.date.clone(),
            total: self.total,
            items: self.items.len(),
        }
    }
}

/// The public view of an order: no customer details, just the item count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTracking {
    pub id: String,
    pub status: OrderStatus,
    pub date: String,
    pub total: u64,
    pub items: usize,
}
