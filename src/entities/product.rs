//! Product entity type - the items held in the catalog

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::entity::{Entity, EntityKind};
use crate::core::error::Result;
use crate::core::identity::require_valid_id;
use crate::entities::fields::{require_description, require_name, require_price, require_quantity};

/// A Product snapshot
///
/// Relation sets are computed from the link store when the snapshot is taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier
    pub id: String,

    /// Product name
    pub name: String,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Units in stock
    pub quantity: i64,

    /// Unit price
    pub price: f64,

    /// Suppliers of this product
    #[serde(default)]
    pub supplier_ids: BTreeSet<String>,

    /// Categories this product belongs to
    #[serde(default)]
    pub category_ids: BTreeSet<String>,

    /// Images of this product
    #[serde(default)]
    pub image_ids: BTreeSet<String>,
}

impl Entity for Product {
    const KIND: EntityKind = EntityKind::Product;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.name
    }
}

/// Input for creating a product, optionally linked to existing suppliers and categories
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub quantity: i64,
    pub price: f64,
    /// Caller-supplied id; generated when absent
    pub id: Option<String>,
    pub supplier_ids: Vec<String>,
    pub category_ids: Vec<String>,
}

impl NewProduct {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        quantity: i64,
        price: f64,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            quantity,
            price,
            id: None,
            supplier_ids: Vec::new(),
            category_ids: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_suppliers<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supplier_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_categories<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.category_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Validate every field and id, returning the normalized input
    pub fn validated(&self) -> Result<Self> {
        let supplier_ids = normalize_ids(&self.supplier_ids, "supplier_id")?;
        let category_ids = normalize_ids(&self.category_ids, "category_id")?;

        Ok(Self {
            name: require_name(&self.name, "product_name")?,
            description: require_description(&self.description, "product_description")?,
            quantity: require_quantity(self.quantity)?,
            price: require_price(self.price)?,
            id: self.id.clone(),
            supplier_ids,
            category_ids,
        })
    }
}

/// Check and lowercase a list of ids, dropping duplicates
fn normalize_ids(ids: &[String], label: &str) -> Result<Vec<String>> {
    let mut seen = BTreeSet::new();
    for id in ids {
        let id = id.trim();
        require_valid_id(id, label)?;
        seen.insert(id.to_lowercase());
    }
    Ok(seen.into_iter().collect())
}

/// Partial update for a product's scalar fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
}

impl ProductUpdate {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.quantity.is_none()
            && self.price.is_none()
    }

    /// Validate every provided field, returning the normalized update
    pub fn validated(&self) -> Result<Self> {
        Ok(Self {
            name: self
                .name
                .as_deref()
                .map(|n| require_name(n, "product_name"))
                .transpose()?,
            description: self
                .description
                .as_deref()
                .map(|d| require_description(d, "product_description"))
                .transpose()?,
            quantity: self.quantity.map(require_quantity).transpose()?,
            price: self.price.map(require_price).transpose()?,
        })
    }
}
