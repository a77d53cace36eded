//! Link store - relationships between catalog entities
//!
//! Every relationship is a single row: a join-table row for Product↔Supplier and
//! Product↔Category, and the `product_id` column of an image for Product↔Image.
//! Both "directions" of a link are read from that one row, so the two sides can
//! never disagree.
//!
//! Argument order is symmetric: `(Supplier, s, Product, p)` and
//! `(Product, p, Supplier, s)` address the same link.

use std::collections::BTreeSet;

use rusqlite::{params, Connection, Transaction};

use crate::core::entity::EntityKind;
use crate::core::error::{CatalogError, Result};
use crate::core::identity::normalize_id;

/// A relationship between products and one other entity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    ProductSupplier,
    ProductCategory,
    /// Single-valued on the image side: each image has exactly one product
    ProductImage,
}

impl Relation {
    /// All relations
    pub fn all() -> &'static [Relation] {
        &[
            Relation::ProductSupplier,
            Relation::ProductCategory,
            Relation::ProductImage,
        ]
    }

    /// Find the relation connecting two entity kinds, in either order
    pub fn between(a: EntityKind, b: EntityKind) -> Option<Relation> {
        let other = match (a, b) {
            (EntityKind::Product, other) | (other, EntityKind::Product) => other,
            _ => return None,
        };
        match other {
            EntityKind::Supplier => Some(Relation::ProductSupplier),
            EntityKind::Category => Some(Relation::ProductCategory),
            EntityKind::Image => Some(Relation::ProductImage),
            EntityKind::Product => None,
        }
    }

    /// The non-product side of the relation
    pub fn other_kind(&self) -> EntityKind {
        match self {
            Relation::ProductSupplier => EntityKind::Supplier,
            Relation::ProductCategory => EntityKind::Category,
            Relation::ProductImage => EntityKind::Image,
        }
    }

    fn table(&self) -> &'static str {
        match self {
            Relation::ProductSupplier => "product_suppliers",
            Relation::ProductCategory => "product_categories",
            Relation::ProductImage => "images",
        }
    }

    fn other_column(&self) -> &'static str {
        match self {
            Relation::ProductSupplier => "supplier_id",
            Relation::ProductCategory => "category_id",
            Relation::ProductImage => "id",
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "product↔{}", self.other_kind())
    }
}

/// A link resolved to its relation and its normalized product/other ids
struct Endpoints {
    relation: Relation,
    product_id: String,
    other_id: String,
}

/// Resolve an unordered pair of entity references, checking and lowercasing both ids
fn resolve(a: EntityKind, a_id: &str, b: EntityKind, b_id: &str) -> Result<Endpoints> {
    let relation = Relation::between(a, b).ok_or_else(|| {
        CatalogError::validation("link", format!("no relationship between {} and {}", a, b))
    })?;

    let a_id = normalize_id(a_id, a.id_label())?;
    let b_id = normalize_id(b_id, b.id_label())?;

    let (product_id, other_id) = if a == EntityKind::Product {
        (a_id, b_id)
    } else {
        (b_id, a_id)
    };

    Ok(Endpoints {
        relation,
        product_id,
        other_id,
    })
}

/// Check whether a row with `id` exists in the table for `kind`
pub fn entity_exists(conn: &Connection, kind: EntityKind, id: &str) -> Result<bool> {
    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1)",
        kind.table()
    );
    Ok(conn.query_row(&sql, params![id], |row| row.get(0))?)
}

/// Fail with `NotFound` unless the entity exists
pub fn require_exists(conn: &Connection, kind: EntityKind, id: &str) -> Result<()> {
    if entity_exists(conn, kind, id)? {
        Ok(())
    } else {
        Err(CatalogError::not_found(kind, id))
    }
}

fn exists_row(conn: &Connection, ends: &Endpoints) -> Result<bool> {
    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE product_id = ?1 AND {} = ?2)",
        ends.relation.table(),
        ends.relation.other_column()
    );
    Ok(conn.query_row(&sql, params![ends.product_id, ends.other_id], |row| {
        row.get(0)
    })?)
}

/// Check whether entity `a` is linked to entity `b`
///
/// Ids must be well-formed; missing entities simply have no links.
pub fn link_exists(
    conn: &Connection,
    a: EntityKind,
    a_id: &str,
    b: EntityKind,
    b_id: &str,
) -> Result<bool> {
    let ends = resolve(a, a_id, b, b_id)?;
    exists_row(conn, &ends)
}

/// Link `a` and `b` inside an open transaction. Idempotent.
pub(crate) fn add_link_tx(
    tx: &Transaction<'_>,
    a: EntityKind,
    a_id: &str,
    b: EntityKind,
    b_id: &str,
) -> Result<()> {
    let ends = resolve(a, a_id, b, b_id)?;
    require_exists(tx, EntityKind::Product, &ends.product_id)?;
    require_exists(tx, ends.relation.other_kind(), &ends.other_id)?;

    if exists_row(tx, &ends)? {
        return Ok(());
    }

    match ends.relation {
        Relation::ProductImage => {
            // Reassign: an image belongs to exactly one product
            tx.execute(
                "UPDATE images SET product_id = ?1 WHERE id = ?2",
                params![ends.product_id, ends.other_id],
            )?;
        }
        relation => {
            let sql = format!(
                "INSERT INTO {} (product_id, {}) VALUES (?1, ?2)",
                relation.table(),
                relation.other_column()
            );
            tx.execute(&sql, params![ends.product_id, ends.other_id])?;
        }
    }

    Ok(())
}

/// Unlink `a` and `b` inside an open transaction. Removing a missing link is a no-op.
pub(crate) fn remove_link_tx(
    tx: &Transaction<'_>,
    a: EntityKind,
    a_id: &str,
    b: EntityKind,
    b_id: &str,
) -> Result<()> {
    let ends = resolve(a, a_id, b, b_id)?;
    require_exists(tx, EntityKind::Product, &ends.product_id)?;
    require_exists(tx, ends.relation.other_kind(), &ends.other_id)?;

    if !exists_row(tx, &ends)? {
        return Ok(());
    }

    if ends.relation == Relation::ProductImage {
        return Err(CatalogError::validation(
            "image_id",
            "an image must belong to exactly one product; reassign or delete it instead",
        ));
    }

    let sql = format!(
        "DELETE FROM {} WHERE product_id = ?1 AND {} = ?2",
        ends.relation.table(),
        ends.relation.other_column()
    );
    tx.execute(&sql, params![ends.product_id, ends.other_id])?;
    Ok(())
}

/// Link `a` and `b` in a single transaction. Idempotent.
///
/// Fails with `Validation` for malformed ids or unrelated kinds and with
/// `NotFound` if either entity is missing; nothing is written in either case.
pub fn add_link(
    conn: &mut Connection,
    a: EntityKind,
    a_id: &str,
    b: EntityKind,
    b_id: &str,
) -> Result<()> {
    let tx = conn.transaction()?;
    add_link_tx(&tx, a, a_id, b, b_id)?;
    tx.commit()?;
    Ok(())
}

/// Unlink `a` and `b` in a single transaction. Removing a missing link succeeds silently.
pub fn remove_link(
    conn: &mut Connection,
    a: EntityKind,
    a_id: &str,
    b: EntityKind,
    b_id: &str,
) -> Result<()> {
    let tx = conn.transaction()?;
    remove_link_tx(&tx, a, a_id, b, b_id)?;
    tx.commit()?;
    Ok(())
}

/// Ids of the `related` entities linked to entity `id` of `kind`
pub fn links_of(
    conn: &Connection,
    kind: EntityKind,
    id: &str,
    related: EntityKind,
) -> Result<BTreeSet<String>> {
    let relation = Relation::between(kind, related).ok_or_else(|| {
        CatalogError::validation(
            "link",
            format!("no relationship between {} and {}", kind, related),
        )
    })?;
    let id = normalize_id(id, kind.id_label())?;
    require_exists(conn, kind, &id)?;

    let (select, filter) = if kind == EntityKind::Product {
        (relation.other_column(), "product_id")
    } else {
        ("product_id", relation.other_column())
    };
    let sql = format!(
        "SELECT {} FROM {} WHERE {} = ?1",
        select,
        relation.table(),
        filter
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![id], |row| row.get::<_, String>(0))?;
    let mut ids = BTreeSet::new();
    for row in rows {
        ids.insert(row?);
    }
    Ok(ids)
}

// =========================================================================
// Integrity audit
// =========================================================================

/// A link row that references an entity which does not exist
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DanglingLink {
    pub relation: Relation,
    pub product_id: String,
    pub other_id: String,
    /// Which side of the link is missing
    pub missing: EntityKind,
}

/// Find link rows whose product or other entity is missing
///
/// Always empty for stores written through this crate with foreign keys on.
pub fn check_links(conn: &Connection) -> Result<Vec<DanglingLink>> {
    let mut dangling = Vec::new();

    for relation in Relation::all() {
        let table = relation.table();
        let other_col = relation.other_column();
        let other_kind = relation.other_kind();

        let mut checks = vec![(
            EntityKind::Product,
            format!(
                "SELECT product_id, {other_col} FROM {table}
                 WHERE product_id NOT IN (SELECT id FROM products)
                 ORDER BY product_id, {other_col}"
            ),
        )];
        if *relation != Relation::ProductImage {
            checks.push((
                other_kind,
                format!(
                    "SELECT product_id, {other_col} FROM {table}
                     WHERE {other_col} NOT IN (SELECT id FROM {other_table})
                     ORDER BY product_id, {other_col}",
                    other_table = other_kind.table()
                ),
            ));
        }

        for (missing, sql) in checks {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;
            for row in rows {
                let (product_id, other_id) = row?;
                dangling.push(DanglingLink {
                    relation: *relation,
                    product_id,
                    other_id,
                    missing,
                });
            }
        }
    }

    Ok(dangling)
}

/// Delete every dangling link row (and every image whose product is gone) in one
/// transaction. Returns the number of rows removed.
pub fn repair_links(conn: &mut Connection) -> Result<usize> {
    let tx = conn.transaction()?;
    let mut removed = 0;

    removed += tx.execute(
        "DELETE FROM product_suppliers
         WHERE product_id NOT IN (SELECT id FROM products)
            OR supplier_id NOT IN (SELECT id FROM suppliers)",
        [],
    )?;
    removed += tx.execute(
        "DELETE FROM product_categories
         WHERE product_id NOT IN (SELECT id FROM products)
            OR category_id NOT IN (SELECT id FROM categories)",
        [],
    )?;
    removed += tx.execute(
        "DELETE FROM images WHERE product_id NOT IN (SELECT id FROM products)",
        [],
    )?;

    tx.commit()?;
    Ok(removed)
}
