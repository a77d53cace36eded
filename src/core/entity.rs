//! Entity trait - common interface for all catalog entity types

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// The kinds of entity held by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Product,
    Supplier,
    Category,
    Image,
}

impl EntityKind {
    /// All entity kinds, in dependency order
    pub fn all() -> &'static [EntityKind] {
        &[
            EntityKind::Product,
            EntityKind::Supplier,
            EntityKind::Category,
            EntityKind::Image,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Product => "product",
            EntityKind::Supplier => "supplier",
            EntityKind::Category => "category",
            EntityKind::Image => "image",
        }
    }

    /// Table holding rows of this kind
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Product => "products",
            EntityKind::Supplier => "suppliers",
            EntityKind::Category => "categories",
            EntityKind::Image => "images",
        }
    }

    /// Field label used when reporting a malformed id of this kind
    pub fn id_label(&self) -> &'static str {
        match self {
            EntityKind::Product => "product_id",
            EntityKind::Supplier => "supplier_id",
            EntityKind::Category => "category_id",
            EntityKind::Image => "image_id",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "product" | "products" => Ok(EntityKind::Product),
            "supplier" | "suppliers" | "sup" => Ok(EntityKind::Supplier),
            "category" | "categories" | "cat" => Ok(EntityKind::Category),
            "image" | "images" | "img" => Ok(EntityKind::Image),
            _ => Err(format!("Unknown entity kind: {}", s)),
        }
    }
}

/// Common trait for all catalog entity snapshots
pub trait Entity: Serialize + DeserializeOwned + Clone {
    /// The entity kind
    const KIND: EntityKind;

    /// Get the entity's unique ID
    fn id(&self) -> &str;

    /// Get a human-readable label (name, or URL for images)
    fn title(&self) -> &str;
}
