//! Store settings - the single record that prices shipping and tax.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::accounts::{require_admin, User};
use crate::error::MarketError;
use crate::model::{Model, ModelStore, ModelsExt};

/// Id of the one settings record.
pub const SETTINGS_ID: &str = "store";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSettings {
    pub shipping_cost: u64,
    pub free_shipping_threshold: u64,
    /// Percent of the subtotal.
    pub tax_rate: f64,
    pub site_name: String,
    pub support_email: String,
    pub contact_phone: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            shipping_cost: 1500,
            free_shipping_threshold: 50000,
            tax_rate: 0.0,
            site_name: "Farmers Market".to_string(),
            support_email: "support@farmersmarket.com".to_string(),
            contact_phone: "+234 800 000 0000".to_string(),
        }
    }
}

impl Model for StoreSettings {
    const COLLECTION: &'static str = "settings";

    /// There is only ever one record.
    fn id(&self) -> &str {
        SETTINGS_ID
    }
}

/// What a cart costs under the current settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Charges {
    pub subtotal: u64,
    pub shipping: u64,
    pub tax: u64,
    pub total: u64,
}

impl StoreSettings {
    /// Shipping is waived at or above the threshold; tax rounds to the
    /// nearest unit.
    pub fn quote(&self, subtotal: u64) -> Result<Charges, MarketError> {
        let shipping = if subtotal >= self.free_shipping_threshold {
            0
        } else {
            self.shipping_cost
        };
        let tax = (subtotal as f64 * self.tax_rate / 100.0).round() as u64;
        let total = subtotal
            .checked_add(shipping)
            .and_then(|t| t.checked_add(tax))
            .ok_or_else(|| MarketError::validation("Order total is too large"))?;
        Ok(Charges {
            subtotal,
            shipping,
            tax,
            total,
        })
    }

    pub fn apply(&mut self, patch: SettingsPatch) -> Result<(), MarketError> {
        if let Some(rate) = patch.tax_rate {
            if !rate.is_finite() || rate < 0.0 {
                return Err(MarketError::validation("Tax rate cannot be negative"));
            }
            self.tax_rate = rate;
        }
        if let Some(cost) = patch.shipping_cost {
            self.shipping_cost = cost;
        }
        if let Some(threshold) = patch.free_shipping_threshold {
            self.free_shipping_threshold = threshold;
        }
        if let Some(name) = patch.site_name {
            self.site_name = name;
        }
        if let Some(email) = patch.support_email {
            self.support_email = email;
        }
        if let Some(phone) = patch.contact_phone {
            self.contact_phone = phone;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub shipping_cost: Option<u64>,
    pub free_shipping_threshold: Option<u64>,
    pub tax_rate: Option<f64>,
    pub site_name: Option<String>,
    pub support_email: Option<String>,
    pub contact_phone: Option<String>,
}

pub struct SettingsService<'a, S> {
    store: &'a S,
}

impl<'a, S: ModelStore> SettingsService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// The persisted settings, or the defaults before anyone saved any.
    pub fn current(&self) -> Result<StoreSettings, MarketError> {
        Ok(self
            .store
            .models::<StoreSettings>()
            .get(SETTINGS_ID)?
            .map(|v| v.data)
            .unwrap_or_default())
    }

    pub fn update(&self, actor: &User, patch: SettingsPatch) -> Result<StoreSettings, MarketError> {
        require_admin(actor)?;
        let repo = self.store.models::<StoreSettings>();
        if repo.get(SETTINGS_ID)?.is_none() {
            let mut settings = StoreSettings::default();
            settings.apply(patch.clone())?;
            // Lost the race to create it: fall through and patch the winner.
            if repo.insert(&settings).is_ok() {
                info!("store settings created");
                return Ok(settings);
            }
        }
        let (settings, ()) = repo
            .modify(SETTINGS_ID, |s| s.apply(patch.clone()))?
            .ok_or_else(|| MarketError::not_found("Settings", SETTINGS_ID))?;
        info!("store settings updated");
        Ok(settings)
    }
}
