//! Supplier entity type - companies that supply catalog products

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::entity::{Entity, EntityKind};
use crate::core::error::Result;
use crate::entities::fields::{require_contact, require_name};

/// A Supplier snapshot
///
/// `product_ids` is read from the link store when the snapshot is taken; editing
/// it has no effect on the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    /// Unique identifier
    pub id: String,

    /// Company name
    pub name: String,

    /// Contact email address
    pub contact: String,

    /// Products this supplier provides
    #[serde(default)]
    pub product_ids: BTreeSet<String>,
}

impl Entity for Supplier {
    const KIND: EntityKind = EntityKind::Supplier;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.name
    }
}

/// Partial update for a supplier. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupplierUpdate {
    pub name: Option<String>,
    pub contact: Option<String>,
}

impl SupplierUpdate {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    /// True if no field is set
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.contact.is_none()
    }

    /// Validate every provided field, returning the normalized update
    pub fn validated(&self) -> Result<Self> {
        Ok(Self {
            name: self
                .name
                .as_deref()
                .map(|n| require_name(n, "supplier_name"))
                .transpose()?,
            contact: self.contact.as_deref().map(require_contact).transpose()?,
        })
    }
}
