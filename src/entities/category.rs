//! Category entity type - groupings of products

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::entity::{Entity, EntityKind};
use crate::core::error::Result;
use crate::entities::fields::{require_description, require_name};

/// A Category snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Products in this category
    #[serde(default)]
    pub product_ids: BTreeSet<String>,
}

impl Entity for Category {
    const KIND: EntityKind = EntityKind::Category;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.name
    }
}

/// Partial update for a category
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CategoryUpdate {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }

    pub fn validated(&self) -> Result<Self> {
        Ok(Self {
            name: self
                .name
                .as_deref()
                .map(|n| require_name(n, "category_name"))
                .transpose()?,
            description: self
                .description
                .as_deref()
                .map(|d| require_description(d, "category_description"))
                .transpose()?,
        })
    }
}
