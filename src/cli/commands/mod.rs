//! CLI command implementations

pub mod cat;
pub mod img;
pub mod link;
pub mod product;
pub mod shell;
pub mod stats;
pub mod sup;
