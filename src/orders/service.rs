use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::order::{subtotal, AddressSnapshot, LineItem, Order, OrderStatus, OrderTracking};
use crate::accounts::{require_admin, AccountPolicy, User};
use crate::catalog::{return_stock, take_stock, Product};
use crate::error::MarketError;
use crate::model::{ModelError, ModelStore, ModelsExt};
use crate::notify::{self, deliver, Notifier};
use crate::settings::SettingsService;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    pub quantity: u32,
}

/// A checkout request. The address is either given inline or picked from
/// the customer's address book by id.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrder {
    pub items: Vec<CartLine>,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub shipping_address: Option<AddressSnapshot>,
    #[serde(default)]
    pub address_id: Option<String>,
    /// Name to print on the order; defaults to the account name.
    #[serde(default)]
    pub customer_name: Option<String>,
}

fn order_not_found(id: &str) -> MarketError {
    MarketError::not_found("Order", id)
}

/// Placement, listing, tracking, status changes and cancellation.
pub struct OrderService<'a, S> {
    store: &'a S,
    notifier: &'a dyn Notifier,
    policy: &'a AccountPolicy,
}

impl<'a, S: ModelStore> OrderService<'a, S> {
    pub fn new(store: &'a S, notifier: &'a dyn Notifier, policy: &'a AccountPolicy) -> Self {
        Self {
            store,
            notifier,
            policy,
        }
    }

    /// Place an order for `customer`.
    ///
    /// Everything the order refers to is checked before the first write.
    /// The order is then stored as Pending and stock is taken line by line.
    /// If taking stock fails part way, what was taken is put back and the
    /// order is left Cancelled with a reason.
    pub fn place(&self, customer: &User, request: PlaceOrder) -> Result<Order, MarketError> {
        if request.items.is_empty() {
            return Err(MarketError::validation("No order items"));
        }
        if request.items.iter().any(|line| line.quantity == 0) {
            return Err(MarketError::validation("Quantity must be at least 1"));
        }
        let payment_method = request.payment_method.trim();
        if payment_method.is_empty() {
            return Err(MarketError::validation("Payment method is required"));
        }
        let shipping_address = self.resolve_address(customer, &request)?;

        let products = self.store.models::<Product>();
        let mut items = Vec::with_capacity(request.items.len());
        for line in &request.items {
            let product = products
                .get(&line.product_id)?
                .ok_or_else(|| MarketError::not_found("Product", &line.product_id))?;
            items.push(LineItem::snapshot(&product.data, line.quantity));
        }

        let settings = SettingsService::new(self.store).current()?;
        let charges = settings.quote(subtotal(&items)?)?;

        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4().to_string(),
            customer_id: customer.id.clone(),
            customer_name: request
                .customer_name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .unwrap_or(customer.name.as_str())
                .to_string(),
            customer_email: customer.email.clone(),
            items,
            subtotal: charges.subtotal,
            shipping: charges.shipping,
            tax: charges.tax,
            total: charges.total,
            status: OrderStatus::Pending,
            payment_method: payment_method.to_string(),
            date: now.date_naive().to_string(),
            created_at: now.to_rfc3339_opts(SecondsFormat::Micros, true),
            shipping_address,
            cancellation_reason: None,
        };
        self.store.models::<Order>().insert(&order)?;

        if let Err(err) = self.take_stock_for(&order) {
            return Err(self.abandon(&order, err));
        }

        info!(
            order_id = %order.id,
            customer_id = %order.customer_id,
            items = order.items.len(),
            total = order.total,
            "order placed"
        );
        deliver(
            self.notifier,
            &notify::order_confirmation(&order, &settings.site_name),
        );
        Ok(order)
    }

    fn resolve_address(
        &self,
        customer: &User,
        request: &PlaceOrder,
    ) -> Result<AddressSnapshot, MarketError> {
        if let Some(address) = &request.shipping_address {
            let required = [&address.street, &address.lga, &address.state, &address.phone];
            if required.iter().any(|v| v.trim().is_empty()) {
                return Err(MarketError::validation(
                    "Shipping address needs a street, LGA, state and phone",
                ));
            }
            return Ok(address.clone());
        }
        match &request.address_id {
            Some(id) => customer
                .address(id)
                .map(AddressSnapshot::from)
                .ok_or_else(|| MarketError::not_found("Address", id)),
            None => Err(MarketError::validation("Shipping address is required")),
        }
    }

    /// Take stock for every line, putting back what was already taken if a
    /// write fails.
    fn take_stock_for(&self, order: &Order) -> Result<(), ModelError> {
        for (taken, item) in order.items.iter().enumerate() {
            match take_stock(self.store, &item.product_id, item.quantity) {
                Ok(Some(_)) => {}
                Ok(None) => warn!(
                    order_id = %order.id,
                    product_id = %item.product_id,
                    "product vanished before stock was taken, skipping"
                ),
                Err(err) => {
                    for done in &order.items[..taken] {
                        if let Err(undo) = return_stock(self.store, &done.product_id, done.quantity) {
                            error!(
                                order_id = %order.id,
                                product_id = %done.product_id,
                                error = %undo,
                                "could not put stock back"
                            );
                        }
                    }
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    fn abandon(&self, order: &Order, cause: ModelError) -> MarketError {
        let reason = format!("Stock could not be reserved: {cause}");
        warn!(order_id = %order.id, error = %cause, "order abandoned");
        let marked = self.store.models::<Order>().modify(&order.id, |o| {
            o.status = OrderStatus::Cancelled;
            o.cancellation_reason = Some(reason.clone());
            Ok::<_, ModelError>(())
        });
        if let Err(err) = marked {
            error!(order_id = %order.id, error = %err, "could not mark abandoned order");
        }
        MarketError::Persistence(cause)
    }

    /// Admins see every order, customers their own. Newest first.
    pub fn list(&self, actor: &User) -> Result<Vec<Order>, MarketError> {
        let orders = self.store.models::<Order>();
        let mut found = if actor.is_admin() {
            orders.all()?
        } else {
            orders.find(&|o: &Order| o.customer_id == actor.id)?
        };
        found.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(found)
    }

    pub fn get(&self, actor: &User, id: &str) -> Result<Order, MarketError> {
        let order = self.load(id)?;
        if !actor.can_act_for(&order.customer_id) {
            return Err(MarketError::not_authorized("Not authorized"));
        }
        Ok(order)
    }

    /// Public tracking lookup.
    pub fn track(&self, id: &str) -> Result<OrderTracking, MarketError> {
        Ok(self.load(id)?.tracking())
    }

    /// Move an order along (admin). Re-applying the current status is a
    /// no-op; `Cancelled` goes through [`OrderService::cancel`].
    pub fn update_status(&self, actor: &User, id: &str, status: &str) -> Result<Order, MarketError> {
        require_admin(actor)?;
        let target: OrderStatus = status.parse()?;
        if target == OrderStatus::Cancelled {
            return self.cancel(actor, id);
        }

        let current = self.load(id)?;
        if current.status == target {
            return Ok(current);
        }

        let (order, from) = self
            .store
            .models::<Order>()
            .modify(id, |o| {
                let from = o.status;
                if !from.can_transition_to(target) {
                    return Err(MarketError::InvalidStateTransition { from, to: target });
                }
                o.status = target;
                Ok(from)
            })?
            .ok_or_else(|| order_not_found(id))?;
        info!(order_id = %order.id, from = %from, to = %target, "order status changed");

        if target == OrderStatus::Shipped {
            self.notify_shipped(&order);
        }
        Ok(order)
    }

    fn notify_shipped(&self, order: &Order) {
        let recipient = match self.store.models::<User>().get(&order.customer_id) {
            Ok(Some(user)) => Some(user.data),
            Ok(None) => None,
            Err(err) => {
                warn!(order_id = %order.id, error = %err, "could not load customer for shipment notice");
                None
            }
        };
        let (email, name) = match &recipient {
            Some(user) => (user.email.as_str(), user.name.as_str()),
            None => (order.customer_email.as_str(), order.customer_name.as_str()),
        };
        deliver(
            self.notifier,
            &notify::shipment_notice(order, email, name, &self.policy.public_url),
        );
    }

    /// Cancel a pending order and put its stock back.
    ///
    /// The order is claimed as Cancelled first so two cancels never both
    /// return stock. If returning stock fails the order goes back to
    /// Pending and the caller gets `Persistence`.
    pub fn cancel(&self, actor: &User, id: &str) -> Result<Order, MarketError> {
        let current = self.load(id)?;
        if !actor.can_act_for(&current.customer_id) {
            return Err(MarketError::not_authorized("Not authorized"));
        }
        if current.status != OrderStatus::Pending {
            return Err(MarketError::InvalidStateTransition {
                from: current.status,
                to: OrderStatus::Cancelled,
            });
        }

        let (order, ()) = self
            .store
            .models::<Order>()
            .modify(id, |o| {
                if o.status != OrderStatus::Pending {
                    return Err(MarketError::InvalidStateTransition {
                        from: o.status,
                        to: OrderStatus::Cancelled,
                    });
                }
                o.status = OrderStatus::Cancelled;
                Ok(())
            })?
            .ok_or_else(|| order_not_found(id))?;

        if let Err(err) = self.return_stock_for(&order) {
            self.reopen(&order);
            return Err(MarketError::Persistence(err));
        }
        info!(order_id = %order.id, by = %actor.id, "order cancelled");
        Ok(order)
    }

    /// Put back the stock of every line. If a write fails, what was already
    /// put back is taken again so the order can be reopened as it was.
    fn return_stock_for(&self, order: &Order) -> Result<(), ModelError> {
        for (returned, item) in order.items.iter().enumerate() {
            match return_stock(self.store, &item.product_id, item.quantity) {
                Ok(Some(_)) => {}
                Ok(None) => warn!(
                    order_id = %order.id,
                    product_id = %item.product_id,
                    "product no longer exists, stock not restored"
                ),
                Err(err) => {
                    for done in &order.items[..returned] {
                        if let Err(undo) = take_stock(self.store, &done.product_id, done.quantity) {
                            error!(
                                order_id = %order.id,
                                product_id = %done.product_id,
                                error = %undo,
                                "could not take returned stock again"
                            );
                        }
                    }
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Back out a cancellation whose stock could not be returned, leaving
    /// the order Pending so the cancel can be retried.
    fn reopen(&self, order: &Order) {
        warn!(order_id = %order.id, "cancellation rolled back");
        let reopened = self.store.models::<Order>().modify(&order.id, |o| {
            if o.status == OrderStatus::Cancelled {
                o.status = OrderStatus::Pending;
            }
            Ok::<_, ModelError>(())
        });
        if let Err(err) = reopened {
            error!(order_id = %order.id, error = %err, "could not reopen order");
        }
    }

    fn load(&self, id: &str) -> Result<Order, MarketError> {
        self.store
            .models::<Order>()
            .get(id)?
            .map(|v| v.data)
            .ok_or_else(|| order_not_found(id))
    }
}
