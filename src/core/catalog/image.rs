//! Image operations
//!
//! An image's product is a single column rather than a set, so moving an image
//! to another product replaces its link instead of adding one.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{ensure_id_free, lookup_id};
use crate::core::entity::EntityKind;
use crate::core::error::{CatalogError, Result};
use crate::core::identity::resolve_new_id;
use crate::core::links::{add_link_tx, require_exists};
use crate::entities::fields::require_url;
use crate::entities::{Image, ImageUpdate};

const SELECT_IMAGE: &str = "SELECT id, product_id, url FROM images";

fn image_from_row(row: &Row<'_>) -> rusqlite::Result<Image> {
    Ok(Image {
        id: row.get(0)?,
        product_id: row.get(1)?,
        url: row.get(2)?,
    })
}

fn query_images(conn: &Connection, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<Image>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(args, image_from_row)?;
    let mut images = Vec::new();
    for row in rows {
        images.push(row?);
    }
    Ok(images)
}

/// Attach a new image to an existing product and return its id
pub fn create_image(
    conn: &mut Connection,
    product_id: &str,
    url: &str,
    id: Option<&str>,
) -> Result<String> {
    let product_id = lookup_id(product_id, EntityKind::Product)?;
    let url = require_url(url)?;
    let id = resolve_new_id(id, "image_id")?;

    let tx = conn.transaction()?;
    require_exists(&tx, EntityKind::Product, &product_id)?;
    ensure_id_free(&tx, EntityKind::Image, &id)?;
    tx.execute(
        "INSERT INTO images (id, product_id, url) VALUES (?1, ?2, ?3)",
        params![id, product_id, url],
    )?;
    tx.commit()?;
    Ok(id)
}

pub fn read_image(conn: &Connection, id: &str) -> Result<Image> {
    let id = lookup_id(id, EntityKind::Image)?;
    conn.query_row(
        &format!("{} WHERE id = ?1", SELECT_IMAGE),
        params![id],
        image_from_row,
    )
    .optional()?
    .ok_or_else(|| CatalogError::not_found(EntityKind::Image, &id))
}

/// All images, grouped by product
pub fn list_images(conn: &Connection) -> Result<Vec<Image>> {
    query_images(
        conn,
        &format!("{} ORDER BY product_id, url, id", SELECT_IMAGE),
        &[],
    )
}

/// Images of one product
pub fn images_of_product(conn: &Connection, product_id: &str) -> Result<Vec<Image>> {
    let product_id = lookup_id(product_id, EntityKind::Product)?;
    require_exists(conn, EntityKind::Product, &product_id)?;
    query_images(
        conn,
        &format!("{} WHERE product_id = ?1 ORDER BY url, id", SELECT_IMAGE),
        &[&product_id],
    )
}

/// Change an image's URL and/or move it to another product, all-or-nothing
pub fn update_image(conn: &mut Connection, id: &str, update: &ImageUpdate) -> Result<()> {
    let id = lookup_id(id, EntityKind::Image)?;
    let update = update.validated()?;

    let tx = conn.transaction()?;
    require_exists(&tx, EntityKind::Image, &id)?;

    if let Some(product_id) = &update.product_id {
        add_link_tx(&tx, EntityKind::Image, &id, EntityKind::Product, product_id)?;
    }
    if let Some(url) = &update.url {
        tx.execute("UPDATE images SET url = ?1 WHERE id = ?2", params![url, id])?;
    }

    tx.commit()?;
    Ok(())
}

pub fn delete_image(conn: &mut Connection, id: &str) -> Result<()> {
    let id = lookup_id(id, EntityKind::Image)?;

    let tx = conn.transaction()?;
    require_exists(&tx, EntityKind::Image, &id)?;
    tx.execute("DELETE FROM images WHERE id = ?1", params![id])?;
    tx.commit()?;
    Ok(())
}
