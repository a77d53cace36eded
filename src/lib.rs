//! invcat: an inventory catalog of products, suppliers, categories and images
//!
//! Relationships live in SQLite join tables, and every catalog operation keeps
//! both sides of a relationship consistent inside a single transaction.

pub mod cli;
pub mod core;
pub mod entities;
