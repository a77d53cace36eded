//! Image entity type - pictures of a single product

use serde::{Deserialize, Serialize};

use crate::core::entity::{Entity, EntityKind};
use crate::core::error::Result;
use crate::core::identity::require_valid_id;
use crate::entities::fields::require_url;

/// An Image snapshot. Each image belongs to exactly one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    pub product_id: String,
    pub url: String,
}

impl Entity for Image {
    const KIND: EntityKind = EntityKind::Image;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.url
    }
}

/// Partial update for an image. Setting `product_id` moves the image to another product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageUpdate {
    pub url: Option<String>,
    pub product_id: Option<String>,
}

impl ImageUpdate {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.url.is_none() && self.product_id.is_none()
    }

    pub fn validated(&self) -> Result<Self> {
        let product_id = match self.product_id.as_deref() {
            Some(id) => {
                let id = id.trim();
                require_valid_id(id, "product_id")?;
                Some(id.to_lowercase())
            }
            None => None,
        };

        Ok(Self {
            url: self.url.as_deref().map(require_url).transpose()?,
            product_id,
        })
    }
}
