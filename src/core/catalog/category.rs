//! Category operations

use std::collections::BTreeSet;

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{ensure_id_free, lookup_id};
use crate::core::entity::EntityKind;
use crate::core::error::{CatalogError, Result};
use crate::core::identity::resolve_new_id;
use crate::core::links::{self, links_of, remove_link_tx, require_exists};
use crate::entities::fields::{require_description, require_name};
use crate::entities::{Category, CategoryUpdate};

const SELECT_CATEGORY: &str = "SELECT id, name, description FROM categories";

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        product_ids: BTreeSet::new(),
    })
}

pub fn create_category(
    conn: &mut Connection,
    name: &str,
    description: &str,
    id: Option<&str>,
) -> Result<String> {
    let name = require_name(name, "category_name")?;
    let description = require_description(description, "category_description")?;
    let id = resolve_new_id(id, "category_id")?;

    let tx = conn.transaction()?;
    ensure_id_free(&tx, EntityKind::Category, &id)?;
    tx.execute(
        "INSERT INTO categories (id, name, description) VALUES (?1, ?2, ?3)",
        params![id, name, description],
    )?;
    tx.commit()?;
    Ok(id)
}

pub fn read_category(conn: &Connection, id: &str) -> Result<Category> {
    let id = lookup_id(id, EntityKind::Category)?;
    let mut category = conn
        .query_row(
            &format!("{} WHERE id = ?1", SELECT_CATEGORY),
            params![id],
            category_from_row,
        )
        .optional()?
        .ok_or_else(|| CatalogError::not_found(EntityKind::Category, &id))?;

    category.product_ids = links_of(
        conn,
        EntityKind::Category,
        &category.id,
        EntityKind::Product,
    )?;
    Ok(category)
}

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY name, id", SELECT_CATEGORY))?;
    let rows = stmt.query_map([], category_from_row)?;

    let mut categories = Vec::new();
    for row in rows {
        let mut category = row?;
        category.product_ids = links_of(
            conn,
            EntityKind::Category,
            &category.id,
            EntityKind::Product,
        )?;
        categories.push(category);
    }
    Ok(categories)
}

pub fn update_category(conn: &mut Connection, id: &str, update: &CategoryUpdate) -> Result<()> {
    let id = lookup_id(id, EntityKind::Category)?;
    let update = update.validated()?;

    let tx = conn.transaction()?;
    require_exists(&tx, EntityKind::Category, &id)?;

    if let Some(name) = &update.name {
        tx.execute(
            "UPDATE categories SET name = ?1 WHERE id = ?2",
            params![name, id],
        )?;
    }
    if let Some(description) = &update.description {
        tx.execute(
            "UPDATE categories SET description = ?1 WHERE id = ?2",
            params![description, id],
        )?;
    }

    tx.commit()?;
    Ok(())
}

/// Delete a category after removing it from every product's category set
pub fn delete_category(conn: &mut Connection, id: &str) -> Result<()> {
    let id = lookup_id(id, EntityKind::Category)?;

    let tx = conn.transaction()?;
    require_exists(&tx, EntityKind::Category, &id)?;

    for product_id in links_of(&tx, EntityKind::Category, &id, EntityKind::Product)? {
        remove_link_tx(
            &tx,
            EntityKind::Category,
            &id,
            EntityKind::Product,
            &product_id,
        )?;
    }
    tx.execute("DELETE FROM categories WHERE id = ?1", params![id])?;

    tx.commit()?;
    Ok(())
}

pub fn add_product_to_category(
    conn: &mut Connection,
    category_id: &str,
    product_id: &str,
) -> Result<()> {
    let category_id = lookup_id(category_id, EntityKind::Category)?;
    let product_id = lookup_id(product_id, EntityKind::Product)?;
    links::add_link(
        conn,
        EntityKind::Category,
        &category_id,
        EntityKind::Product,
        &product_id,
    )
}

pub fn remove_product_from_category(
    conn: &mut Connection,
    category_id: &str,
    product_id: &str,
) -> Result<()> {
    let category_id = lookup_id(category_id, EntityKind::Category)?;
    let product_id = lookup_id(product_id, EntityKind::Product)?;
    links::remove_link(
        conn,
        EntityKind::Category,
        &category_id,
        EntityKind::Product,
        &product_id,
    )
}
