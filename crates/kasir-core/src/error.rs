//! Domain error types.

use crate::ids::ProductId;
use thiserror::Error;

/// One cart line whose requested quantity is above the stock snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockShortfall {
    pub product_id: ProductId,
    pub name: String,
    pub requested: i64,
    pub available: i64,
}

/// Errors raised by the cart and checkout logic.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PosError {
    /// One or more lines ask for more than the available stock.
    #[error("quantity exceeds available stock for {}", describe_shortfalls(.shortfalls))]
    StockExceeded { shortfalls: Vec<StockShortfall> },

    /// Cash input did not parse, or does not cover the total.
    #[error("invalid or insufficient payment: {reason}")]
    InsufficientOrInvalidPayment { reason: String },

    /// Checkout or restock attempted with no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// Quantity outside the accepted range.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Currency mismatch.
    #[error("currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("arithmetic overflow in money calculation")]
    Overflow,
}

impl PosError {
    /// Product ids named by a `StockExceeded` error.
    pub fn offending_products(&self) -> Vec<&ProductId> {
        match self {
            PosError::StockExceeded { shortfalls } => {
                shortfalls.iter().map(|s| &s.product_id).collect()
            }
            _ => Vec::new(),
        }
    }

    pub(crate) fn payment(reason: impl Into<String>) -> Self {
        PosError::InsufficientOrInvalidPayment {
            reason: reason.into(),
        }
    }
}

fn describe_shortfalls(shortfalls: &[StockShortfall]) -> String {
    shortfalls
        .iter()
        .map(|s| format!("{} (requested {}, available {})", s.name, s.requested, s.available))
        .collect::<Vec<_>>()
        .join(", ")
}
