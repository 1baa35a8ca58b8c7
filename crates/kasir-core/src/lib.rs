//! Domain types and logic for the kasir point-of-sale client.
//!
//! This crate has no I/O. It provides:
//!
//! - **Catalog**: products and categories as the API lists them
//! - **Cart**: one line-item container used for sales and restocks
//! - **Checkout**: cash reconciliation and submission payloads
//! - **Receipt** and **Report**: invoice rendering and report schemas
//!
//! # Example
//!
//! ```rust
//! use kasir_core::prelude::*;
//!
//! let coffee = ProductSnapshot::new("A", Money::idr(10000), 5);
//!
//! let mut cart = SaleCart::new();
//! cart.add(&coffee);
//! cart.add(&coffee);
//!
//! let rec = reconcile(&cart, "25000").unwrap();
//! assert_eq!(rec.change.display(), "Rp5.000");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod de;
pub mod receipt;
pub mod report;

pub use error::{PosError, StockShortfall};
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{PosError, StockShortfall};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        Category, CategoryInput, NewProduct, Product, ProductSnapshot, ProductUpdate,
        StockAdjustment,
    };

    // Cart
    pub use crate::cart::{Cart, CartLine, Restock, RestockCart, Sale, SaleCart};

    // Checkout
    pub use crate::checkout::{
        reconcile, restock_payload, CheckoutResult, Reconciliation, RestockPayload,
        TransactionPayload,
    };

    // Receipts and reports
    pub use crate::receipt::{Invoice, InvoiceItem, Receipt};
    pub use crate::report::{PurchaseReport, ReportPeriod, SalesOverview, SalesReport};
}
