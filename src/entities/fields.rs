//! Scalar field rules shared by the entity records

use crate::core::error::{CatalogError, Result};

/// Maximum length of a product, supplier or category name
pub const MAX_NAME_LEN: usize = 2000;

/// Maximum length of a product or category description
pub const MAX_DESCRIPTION_LEN: usize = 10_000;

/// Maximum length of a supplier contact address
pub const MAX_CONTACT_LEN: usize = 320;

/// Trimmed, non-empty, at most [`MAX_NAME_LEN`] characters
pub fn require_name(value: &str, field: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CatalogError::validation(field, "must not be empty"));
    }
    let len = value.chars().count();
    if len > MAX_NAME_LEN {
        return Err(CatalogError::validation(
            field,
            format!("is {} characters long (max {})", len, MAX_NAME_LEN),
        ));
    }
    Ok(value.to_string())
}

/// At most [`MAX_DESCRIPTION_LEN`] characters; may be empty
pub fn require_description(value: &str, field: &str) -> Result<String> {
    let len = value.chars().count();
    if len > MAX_DESCRIPTION_LEN {
        return Err(CatalogError::validation(
            field,
            format!("is {} characters long (max {})", len, MAX_DESCRIPTION_LEN),
        ));
    }
    Ok(value.to_string())
}

pub fn require_quantity(value: i64) -> Result<i64> {
    if value < 0 {
        return Err(CatalogError::validation(
            "product_quantity",
            format!("must be >= 0 (got {})", value),
        ));
    }
    Ok(value)
}

pub fn require_price(value: f64) -> Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CatalogError::validation(
            "product_price",
            format!("must be a positive number (got {})", value),
        ));
    }
    Ok(value)
}

/// Email shape plus the stored length limit
pub fn require_contact(value: &str) -> Result<String> {
    let value = value.trim();
    if value.chars().count() > MAX_CONTACT_LEN {
        return Err(CatalogError::validation(
            "supplier_contact",
            format!("must be at most {} characters", MAX_CONTACT_LEN),
        ));
    }
    crate::core::identity::require_valid_email(value)?;
    Ok(value.to_string())
}

pub fn require_url(value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CatalogError::validation("image_url", "must not be empty"));
    }
    Ok(value.to_string())
}
