//! Supplier operations

use std::collections::BTreeSet;

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{ensure_id_free, lookup_id};
use crate::core::entity::EntityKind;
use crate::core::error::{CatalogError, Result};
use crate::core::identity::resolve_new_id;
use crate::core::links::{self, links_of, remove_link_tx, require_exists};
use crate::entities::fields::{require_contact, require_name};
use crate::entities::{Supplier, SupplierUpdate};

const SELECT_SUPPLIER: &str = "SELECT id, name, contact_email FROM suppliers";

fn supplier_from_row(row: &Row<'_>) -> rusqlite::Result<Supplier> {
    Ok(Supplier {
        id: row.get(0)?,
        name: row.get(1)?,
        contact: row.get(2)?,
        product_ids: BTreeSet::new(),
    })
}

/// Create a supplier with no products and return its id
pub fn create_supplier(
    conn: &mut Connection,
    name: &str,
    contact: &str,
    id: Option<&str>,
) -> Result<String> {
    let name = require_name(name, "supplier_name")?;
    let contact = require_contact(contact)?;
    let id = resolve_new_id(id, "supplier_id")?;

    let tx = conn.transaction()?;
    ensure_id_free(&tx, EntityKind::Supplier, &id)?;
    tx.execute(
        "INSERT INTO suppliers (id, name, contact_email) VALUES (?1, ?2, ?3)",
        params![id, name, contact],
    )?;
    tx.commit()?;
    Ok(id)
}

/// Snapshot a supplier, with its product set read from the link store
pub fn read_supplier(conn: &Connection, id: &str) -> Result<Supplier> {
    let id = lookup_id(id, EntityKind::Supplier)?;
    let mut supplier = conn
        .query_row(
            &format!("{} WHERE id = ?1", SELECT_SUPPLIER),
            params![id],
            supplier_from_row,
        )
        .optional()?
        .ok_or_else(|| CatalogError::not_found(EntityKind::Supplier, &id))?;

    supplier.product_ids = links_of(
        conn,
        EntityKind::Supplier,
        &supplier.id,
        EntityKind::Product,
    )?;
    Ok(supplier)
}

/// All suppliers, ordered by name
pub fn list_suppliers(conn: &Connection) -> Result<Vec<Supplier>> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY name, id", SELECT_SUPPLIER))?;
    let rows = stmt.query_map([], supplier_from_row)?;

    let mut suppliers = Vec::new();
    for row in rows {
        let mut supplier = row?;
        supplier.product_ids = links_of(
            conn,
            EntityKind::Supplier,
            &supplier.id,
            EntityKind::Product,
        )?;
        suppliers.push(supplier);
    }
    Ok(suppliers)
}

/// Apply a partial update. Every provided field is validated before anything is written.
pub fn update_supplier(conn: &mut Connection, id: &str, update: &SupplierUpdate) -> Result<()> {
    let id = lookup_id(id, EntityKind::Supplier)?;
    let update = update.validated()?;

    let tx = conn.transaction()?;
    require_exists(&tx, EntityKind::Supplier, &id)?;

    if let Some(name) = &update.name {
        tx.execute(
            "UPDATE suppliers SET name = ?1 WHERE id = ?2",
            params![name, id],
        )?;
    }
    if let Some(contact) = &update.contact {
        tx.execute(
            "UPDATE suppliers SET contact_email = ?1 WHERE id = ?2",
            params![contact, id],
        )?;
    }

    tx.commit()?;
    Ok(())
}

/// Delete a supplier after removing it from every product's supplier set
pub fn delete_supplier(conn: &mut Connection, id: &str) -> Result<()> {
    let id = lookup_id(id, EntityKind::Supplier)?;

    let tx = conn.transaction()?;
    require_exists(&tx, EntityKind::Supplier, &id)?;

    for product_id in links_of(&tx, EntityKind::Supplier, &id, EntityKind::Product)? {
        remove_link_tx(
            &tx,
            EntityKind::Supplier,
            &id,
            EntityKind::Product,
            &product_id,
        )?;
    }
    tx.execute("DELETE FROM suppliers WHERE id = ?1", params![id])?;

    tx.commit()?;
    Ok(())
}

/// Link a product to a supplier. Linking an already-linked pair is a no-op.
pub fn add_product_to_supplier(
    conn: &mut Connection,
    supplier_id: &str,
    product_id: &str,
) -> Result<()> {
    let supplier_id = lookup_id(supplier_id, EntityKind::Supplier)?;
    let product_id = lookup_id(product_id, EntityKind::Product)?;
    links::add_link(
        conn,
        EntityKind::Supplier,
        &supplier_id,
        EntityKind::Product,
        &product_id,
    )
}

/// Unlink a product from a supplier. Unlinking an unlinked pair is a no-op.
pub fn remove_product_from_supplier(
    conn: &mut Connection,
    supplier_id: &str,
    product_id: &str,
) -> Result<()> {
    let supplier_id = lookup_id(supplier_id, EntityKind::Supplier)?;
    let product_id = lookup_id(product_id, EntityKind::Product)?;
    links::remove_link(
        conn,
        EntityKind::Supplier,
        &supplier_id,
        EntityKind::Product,
        &product_id,
    )
}
