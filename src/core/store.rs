//! SQLite-backed catalog store
//!
//! Owns the single database session. Relationship sets live only in the join
//! tables (`product_suppliers`, `product_categories`) and in `images.product_id`;
//! no entity row carries a copy of its links.

use std::fs;
use std::path::Path;

use rusqlite::{params, Connection};

use crate::core::error::{CatalogError, Result};

/// Path value that opens a transient in-memory store
pub const IN_MEMORY: &str = ":memory:";

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS products (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL CHECK (length(name) BETWEEN 1 AND 2000),
    description TEXT NOT NULL DEFAULT '',
    quantity INTEGER NOT NULL CHECK (quantity >= 0),
    price REAL NOT NULL CHECK (price > 0)
);

CREATE TABLE IF NOT EXISTS suppliers (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL CHECK (length(name) BETWEEN 1 AND 2000),
    contact_email TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL CHECK (length(name) BETWEEN 1 AND 2000),
    description TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS images (
    id TEXT PRIMARY KEY,
    product_id TEXT NOT NULL,
    url TEXT NOT NULL,
    FOREIGN KEY (product_id) REFERENCES products(id) ON DELETE CASCADE
);
CREATE INDEX IF NOT EXISTS idx_images_product ON images(product_id);

CREATE TABLE IF NOT EXISTS product_suppliers (
    product_id TEXT NOT NULL,
    supplier_id TEXT NOT NULL,
    PRIMARY KEY (product_id, supplier_id),
    FOREIGN KEY (product_id) REFERENCES products(id) ON DELETE CASCADE,
    FOREIGN KEY (supplier_id) REFERENCES suppliers(id) ON DELETE CASCADE
);
CREATE INDEX IF NOT EXISTS idx_product_suppliers_supplier ON product_suppliers(supplier_id);

CREATE TABLE IF NOT EXISTS product_categories (
    product_id TEXT NOT NULL,
    category_id TEXT NOT NULL,
    PRIMARY KEY (product_id, category_id),
    FOREIGN KEY (product_id) REFERENCES products(id) ON DELETE CASCADE,
    FOREIGN KEY (category_id) REFERENCES categories(id) ON DELETE CASCADE
);
CREATE INDEX IF NOT EXISTS idx_product_categories_category ON product_categories(category_id);
"#;

/// Row counts per table
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct StoreStats {
    pub products: usize,
    pub suppliers: usize,
    pub categories: usize,
    pub images: usize,
    pub supplier_links: usize,
    pub category_links: usize,
}

/// The catalog store: one SQLite session, passed explicitly to every operation
#[derive(Debug)]
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) a store at `path`. The literal `:memory:` opens an in-memory store.
    pub fn open(path: &Path) -> Result<Self> {
        if path.as_os_str() == IN_MEMORY {
            return Self::open_in_memory();
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| CatalogError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let conn = Connection::open(path)?;

        // WAL keeps readers off the writer's lock
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        tracing::debug!(path = %path.display(), "opened catalog store");
        Self::from_connection(conn)
    }

    /// Open a transient store that lives as long as the returned value
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        tracing::debug!("opened in-memory catalog store");
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let mut store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create tables if missing and record the schema version
    fn init_schema(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(SCHEMA)?;

        let recorded: i64 =
            tx.query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))?;
        if recorded == 0 {
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![SCHEMA_VERSION],
            )?;
            tracing::info!(version = SCHEMA_VERSION, "initialized catalog schema");
        }

        tx.commit()?;
        Ok(())
    }

    /// Schema version recorded in the store
    pub fn schema_version(&self) -> Result<i32> {
        Ok(self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })?)
    }

    /// Borrow the session for reads
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Borrow the session for mutating operations
    pub fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Count rows in every catalog table
    pub fn statistics(&self) -> Result<StoreStats> {
        let count = |table: &str| -> Result<usize> {
            let n: i64 = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })?;
            Ok(n as usize)
        };

        Ok(StoreStats {
            products: count("products")?,
            suppliers: count("suppliers")?,
            categories: count("categories")?,
            images: count("images")?,
            supplier_links: count("product_suppliers")?,
            category_links: count("product_categories")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_store_creation() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
        assert_eq!(store.statistics().unwrap(), StoreStats::default());
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let store = Store::open_in_memory().unwrap();
        let enabled: i64 = store
            .conn()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_reopen_keeps_data_and_version() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("nested/catalog.db");

        {
            let store = Store::open(&path).unwrap();
            store
                .conn()
                .execute(
                    "INSERT INTO suppliers (id, name, contact_email) VALUES ('s', 'Acme', 'a@acme.com')",
                    [],
                )
                .unwrap();
        }

        let store = Store::open(&path).unwrap();
        assert_eq!(store.statistics().unwrap().suppliers, 1);
        let versions: i64 = store
            .conn()
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(versions, 1);
    }

    #[test]
    fn test_check_constraints() {
        let store = Store::open_in_memory().unwrap();
        let negative = store.conn().execute(
            "INSERT INTO products (id, name, quantity, price) VALUES ('p', 'Widget', -1, 1.0)",
            [],
        );
        assert!(negative.is_err());

        let free = store.conn().execute(
            "INSERT INTO products (id, name, quantity, price) VALUES ('p', 'Widget', 1, 0)",
            [],
        );
        assert!(free.is_err());
    }

    #[test]
    fn test_unreachable_directory_is_a_storage_error() {
        let tmp = tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let err = Store::open(&blocker.join("catalog.db")).unwrap_err();
        assert_eq!(err.kind(), crate::core::error::ErrorKind::Storage);
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn test_memory_path() {
        let store = Store::open(Path::new(IN_MEMORY)).unwrap();
        assert_eq!(store.statistics().unwrap().products, 0);
    }
}
