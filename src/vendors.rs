//! Vendors - the farms and sellers products are sourced from.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::accounts::{require_admin, User};
use crate::error::MarketError;
use crate::model::{Model, ModelStore, ModelsExt};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: String,
    pub name: String,
    pub location: String,
    pub description: String,
    pub image: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
}

impl Model for Vendor {
    const COLLECTION: &'static str = "vendors";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorInput {
    pub name: String,
    pub location: String,
    pub description: String,
    pub image: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorPatch {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub rating: Option<f64>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

fn check_rating(rating: f64) -> Result<(), MarketError> {
    if (0.0..=5.0).contains(&rating) {
        Ok(())
    } else {
        Err(MarketError::validation("Vendor rating must be between 0 and 5"))
    }
}

impl Vendor {
    pub fn new(id: impl Into<String>, input: VendorInput) -> Result<Self, MarketError> {
        let required = [
            ("name", &input.name),
            ("location", &input.location),
            ("description", &input.description),
            ("image", &input.image),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(MarketError::validation(format!("Vendor {field} is required")));
            }
        }
        check_rating(input.rating)?;
        Ok(Vendor {
            id: id.into(),
            name: input.name,
            location: input.location,
            description: input.description,
            image: input.image,
            rating: input.rating,
            contact_email: input.contact_email,
            contact_phone: input.contact_phone,
        })
    }

    pub fn apply(&mut self, patch: VendorPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if patch.contact_email.is_some() {
            self.contact_email = patch.contact_email;
        }
        if patch.contact_phone.is_some() {
            self.contact_phone = patch.contact_phone;
        }
    }
}

pub struct VendorService<'a, S> {
    store: &'a S,
}

impl<'a, S: ModelStore> VendorService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<Vendor>, MarketError> {
        let mut vendors = self.store.models::<Vendor>().all()?;
        vendors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(vendors)
    }

    pub fn get(&self, id: &str) -> Result<Vendor, MarketError> {
        self.store
            .models::<Vendor>()
            .get(id)?
            .map(|v| v.data)
            .ok_or_else(|| MarketError::not_found("Vendor", id))
    }

    pub fn create(&self, actor: &User, input: VendorInput) -> Result<Vendor, MarketError> {
        require_admin(actor)?;
        let vendor = Vendor::new(Uuid::new_v4().to_string(), input)?;
        self.store.models::<Vendor>().insert(&vendor)?;
        info!(vendor_id = %vendor.id, "vendor created");
        Ok(vendor)
    }

    pub fn update(&self, actor: &User, id: &str, patch: VendorPatch) -> Result<Vendor, MarketError> {
        require_admin(actor)?;
        if let Some(rating) = patch.rating {
            check_rating(rating)?;
        }
        let (vendor, ()) = self
            .store
            .models::<Vendor>()
            .modify(id, |v| {
                v.apply(patch.clone());
                Ok::<_, MarketError>(())
            })?
            .ok_or_else(|| MarketError::not_found("Vendor", id))?;
        Ok(vendor)
    }

    /// Remove a vendor. Products that referenced it keep the dangling id.
    pub fn delete(&self, actor: &User, id: &str) -> Result<(), MarketError> {
        require_admin(actor)?;
        if !self.store.models::<Vendor>().delete(id)? {
            return Err(MarketError::not_found("Vendor", id));
        }
        Ok(())
    }
}
