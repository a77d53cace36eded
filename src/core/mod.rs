//! Core module - store, link adapter and catalog operations

pub mod catalog;
pub mod config;
pub mod entity;
pub mod error;
pub mod identity;
pub mod links;
pub mod store;

pub use config::Config;
pub use entity::{Entity, EntityKind};
pub use error::{CatalogError, ErrorKind, Result};
pub use links::{
    add_link, check_links, link_exists, links_of, remove_link, repair_links, DanglingLink,
    Relation,
};
pub use store::{Store, StoreStats};
