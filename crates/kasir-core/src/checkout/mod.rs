//! Checkout module.
//!
//! Validates tendered cash against a sale cart and builds the payloads the
//! transaction and restock endpoints accept.

mod payload;
mod reconcile;

pub use payload::{
    PayloadItem, RestockItem, RestockPayload, TransactionPayload, TransactionRequest,
};
pub use reconcile::{reconcile, reconcile_amount, restock_payload, CheckoutResult, Reconciliation};
