//! Cart module.
//!
//! One line-item container with two use modes: selling products and
//! restocking them.

mod cart;

pub use cart::{Cart, CartLine, CartMode, Restock, RestockCart, Sale, SaleCart, MAX_QUANTITY_PER_LINE};
