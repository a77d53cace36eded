//! Entity type definitions

pub mod category;
pub mod fields;
pub mod image;
pub mod product;
pub mod supplier;

pub use category::{Category, CategoryUpdate};
pub use image::{Image, ImageUpdate};
pub use product::{NewProduct, Product, ProductUpdate};
pub use supplier::{Supplier, SupplierUpdate};
