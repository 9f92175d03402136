//! Orders - placement, the status machine and cancellation.
//!
//! ```text
//! Pending --> Confirmed --> Shipped --> Delivered
//!    \
//!     +--> Cancelled   (stock goes back on the shelf)
//! ```

mod order;
mod service;

pub use order::{AddressSnapshot, LineItem, Order, OrderStatus, OrderTracking};
pub use service::{CartLine, OrderService, PlaceOrder};
