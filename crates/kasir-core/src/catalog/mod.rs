//! Product catalog module.
//!
//! Schemas for products and categories as the API returns them, plus the
//! snapshot a cart line is built from.

mod category;
mod product;

pub use category::{Category, CategoryInput};
pub use product::{NewProduct, Product, ProductSnapshot, ProductUpdate, StockAdjustment};
