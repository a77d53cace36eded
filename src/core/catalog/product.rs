//! Product operations, including the cascading delete

use std::collections::BTreeSet;

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{ensure_id_free, lookup_id};
use crate::core::entity::EntityKind;
use crate::core::error::{CatalogError, Result};
use crate::core::identity::resolve_new_id;
use crate::core::links::{add_link_tx, links_of, remove_link_tx, require_exists};
use crate::entities::{NewProduct, Product, ProductUpdate};

const SELECT_PRODUCT: &str = "SELECT id, name, description, quantity, price FROM products";

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        quantity: row.get(3)?,
        price: row.get(4)?,
        supplier_ids: BTreeSet::new(),
        category_ids: BTreeSet::new(),
        image_ids: BTreeSet::new(),
    })
}

/// Fill a product's relation sets from the link store
fn with_links(conn: &Connection, mut product: Product) -> Result<Product> {
    product.supplier_ids = links_of(conn, EntityKind::Product, &product.id, EntityKind::Supplier)?;
    product.category_ids = links_of(conn, EntityKind::Product, &product.id, EntityKind::Category)?;
    product.image_ids = links_of(conn, EntityKind::Product, &product.id, EntityKind::Image)?;
    Ok(product)
}

/// Create a product, linked to the given suppliers and categories, and return its id
///
/// The row and its initial links are written in one transaction; a missing
/// supplier or category aborts the whole creation.
pub fn create_product(conn: &mut Connection, input: &NewProduct) -> Result<String> {
    let input = input.validated()?;
    let id = resolve_new_id(input.id.as_deref(), "product_id")?;

    let tx = conn.transaction()?;
    ensure_id_free(&tx, EntityKind::Product, &id)?;
    tx.execute(
        "INSERT INTO products (id, name, description, quantity, price)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            id,
            input.name,
            input.description,
            input.quantity,
            input.price,
        ],
    )?;

    for supplier_id in &input.supplier_ids {
        add_link_tx(
            &tx,
            EntityKind::Product,
            &id,
            EntityKind::Supplier,
            supplier_id,
        )?;
    }
    for category_id in &input.category_ids {
        add_link_tx(
            &tx,
            EntityKind::Product,
            &id,
            EntityKind::Category,
            category_id,
        )?;
    }

    tx.commit()?;
    Ok(id)
}

/// Snapshot a product with its supplier, category and image sets
pub fn read_product(conn: &Connection, id: &str) -> Result<Product> {
    let id = lookup_id(id, EntityKind::Product)?;
    let product = conn
        .query_row(
            &format!("{} WHERE id = ?1", SELECT_PRODUCT),
            params![id],
            product_from_row,
        )
        .optional()?
        .ok_or_else(|| CatalogError::not_found(EntityKind::Product, &id))?;

    with_links(conn, product)
}

/// All products, ordered by name
pub fn list_products(conn: &Connection) -> Result<Vec<Product>> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY name, id", SELECT_PRODUCT))?;
    let rows = stmt.query_map([], product_from_row)?;

    let mut products = Vec::new();
    for row in rows {
        products.push(with_links(conn, row?)?);
    }
    Ok(products)
}

/// Apply a partial update to a product's scalar fields, all-or-nothing
pub fn update_product(conn: &mut Connection, id: &str, update: &ProductUpdate) -> Result<()> {
    let id = lookup_id(id, EntityKind::Product)?;
    let update = update.validated()?;

    let tx = conn.transaction()?;
    require_exists(&tx, EntityKind::Product, &id)?;

    if let Some(name) = &update.name {
        tx.execute(
            "UPDATE products SET name = ?1 WHERE id = ?2",
            params![name, id],
        )?;
    }
    if let Some(description) = &update.description {
        tx.execute(
            "UPDATE products SET description = ?1 WHERE id = ?2",
            params![description, id],
        )?;
    }
    if let Some(quantity) = update.quantity {
        tx.execute(
            "UPDATE products SET quantity = ?1 WHERE id = ?2",
            params![quantity, id],
        )?;
    }
    if let Some(price) = update.price {
        tx.execute(
            "UPDATE products SET price = ?1 WHERE id = ?2",
            params![price, id],
        )?;
    }

    tx.commit()?;
    Ok(())
}

/// Delete a product and everything that depends on it, atomically:
/// its supplier links, its category links (even when a category's set becomes
/// empty), and every image of the product.
pub fn delete_product(conn: &mut Connection, id: &str) -> Result<()> {
    let id = lookup_id(id, EntityKind::Product)?;

    let tx = conn.transaction()?;
    require_exists(&tx, EntityKind::Product, &id)?;

    for supplier_id in links_of(&tx, EntityKind::Product, &id, EntityKind::Supplier)? {
        remove_link_tx(
            &tx,
            EntityKind::Product,
            &id,
            EntityKind::Supplier,
            &supplier_id,
        )?;
    }
    for category_id in links_of(&tx, EntityKind::Product, &id, EntityKind::Category)? {
        remove_link_tx(
            &tx,
            EntityKind::Product,
            &id,
            EntityKind::Category,
            &category_id,
        )?;
    }
    tx.execute("DELETE FROM images WHERE product_id = ?1", params![id])?;
    tx.execute("DELETE FROM products WHERE id = ?1", params![id])?;

    tx.commit()?;
    Ok(())
}
