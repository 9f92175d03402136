//! Application state shared by every command.

use std::sync::Arc;

use crate::accounts::{AccountPolicy, AccountService};
use crate::catalog::CatalogService;
use crate::model::{InMemoryModelStore, ModelStore};
use crate::notify::{LogNotifier, Notifier};
use crate::orders::OrderService;
use crate::settings::SettingsService;
use crate::vendors::VendorService;

/// Owns the store, the notifier and the account policy, and hands out
/// short-lived service views over them.
pub struct Storefront<S = InMemoryModelStore> {
    store: S,
    notifier: Arc<dyn Notifier>,
    policy: AccountPolicy,
}

impl Storefront<InMemoryModelStore> {
    /// In-memory store, logging notifier, default policy.
    pub fn in_memory() -> Self {
        Storefront::new(InMemoryModelStore::new(), Arc::new(LogNotifier::new()))
    }
}

impl<S: ModelStore> Storefront<S> {
    pub fn new(store: S, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            policy: AccountPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: AccountPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> &AccountPolicy {
        &self.policy
    }

    pub fn orders(&self) -> OrderService<'_, S> {
        OrderService::new(&self.store, self.notifier.as_ref(), &self.policy)
    }

    pub fn catalog(&self) -> CatalogService<'_, S> {
        CatalogService::new(&self.store)
    }

    pub fn accounts(&self) -> AccountService<'_, S> {
        AccountService::new(&self.store, self.notifier.as_ref(), &self.policy)
    }

    pub fn vendors(&self) -> VendorService<'_, S> {
        VendorService::new(&self.store)
    }

    pub fn settings(&self) -> SettingsService<'_, S> {
        SettingsService::new(&self.store)
    }
}
