//! Catalog operations - entity CRUD that keeps relationships consistent
//!
//! Every operation takes the store session explicitly. Reads take `&Connection`;
//! mutations take `&mut Connection` and run as one transaction that commits on
//! success and rolls back (on drop) on any error, so a failed call leaves the
//! store exactly as it found it.
//!
//! Inputs are validated before the transaction opens. Malformed ids are
//! `Validation` errors; well-formed ids that are absent are `NotFound`.
//!
//! These functions never print or log.

mod category;
mod image;
mod product;
mod supplier;

#[cfg(test)]
mod tests;

pub use category::{
    add_product_to_category, create_category, delete_category, list_categories, read_category,
    remove_product_from_category, update_category,
};
pub use image::{
    create_image, delete_image, images_of_product, list_images, read_image, update_image,
};
pub use product::{create_product, delete_product, list_products, read_product, update_product};
pub use supplier::{
    add_product_to_supplier, create_supplier, delete_supplier, list_suppliers,
    remove_product_from_supplier, read_supplier, update_supplier,
};

use rusqlite::Connection;

use crate::core::entity::EntityKind;
use crate::core::error::{CatalogError, Result};
use crate::core::identity::normalize_id;
use crate::core::links::entity_exists;

/// Check a caller-supplied id and normalize it for lookup
fn lookup_id(id: &str, kind: EntityKind) -> Result<String> {
    normalize_id(id, kind.id_label())
}

/// Fail if a new entity's id is already taken
fn ensure_id_free(conn: &Connection, kind: EntityKind, id: &str) -> Result<()> {
    if entity_exists(conn, kind, id)? {
        Err(CatalogError::validation(
            kind.id_label(),
            format!("'{}' is already in use", id),
        ))
    } else {
        Ok(())
    }
}
