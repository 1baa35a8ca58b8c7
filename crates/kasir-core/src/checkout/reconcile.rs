//! Payment reconciliation.

use crate::cart::{RestockCart, SaleCart};
use crate::checkout::{PayloadItem, RestockItem, RestockPayload, TransactionPayload};
use crate::error::PosError;
use crate::ids::TransactionRef;
use crate::money::Money;

/// A validated payment, before submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub cash: Money,
    pub total: Money,
    /// `cash - total`; never negative.
    pub change: Money,
    pub payload: TransactionPayload,
}

impl Reconciliation {
    /// Attach the reference the collaborator assigned to the sale.
    pub fn complete(self, transaction: TransactionRef) -> CheckoutResult {
        CheckoutResult {
            cash: self.cash,
            total: self.total,
            change: self.change,
            transaction,
        }
    }
}

/// A sale the server accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutResult {
    pub cash: Money,
    pub total: Money,
    pub change: Money,
    pub transaction: TransactionRef,
}

/// Validate the cash typed by the cashier against the cart total.
///
/// Checks run in order: the cart has lines, the input is a finite
/// non-negative number, the amount covers the total. The cart is not
/// touched either way.
pub fn reconcile(cart: &SaleCart, cash_input: &str) -> Result<Reconciliation, PosError> {
    if cart.is_empty() {
        return Err(PosError::EmptyCart);
    }
    let cash = parse_cash(cash_input, cart)?;
    reconcile_amount(cart, cash)
}

/// Reconcile an amount that is already a `Money` value.
pub fn reconcile_amount(cart: &SaleCart, cash: Money) -> Result<Reconciliation, PosError> {
    if cart.is_empty() {
        return Err(PosError::EmptyCart);
    }
    if cash.currency != cart.currency() {
        return Err(PosError::CurrencyMismatch {
            expected: cart.currency().code().to_string(),
            got: cash.currency.code().to_string(),
        });
    }
    if cash.is_negative() {
        return Err(PosError::payment("cash cannot be negative"));
    }

    let total = cart.total()?;
    if cash.amount_minor < total.amount_minor {
        return Err(PosError::payment(format!(
            "cash {} is less than total {}",
            cash.display(),
            total.display()
        )));
    }
    let change = cash.try_subtract(&total).ok_or(PosError::Overflow)?;

    let items = cart
        .lines()
        .iter()
        .map(|line| PayloadItem {
            product_reference: line.reference().clone(),
            quantity: line.quantity(),
        })
        .collect();

    Ok(Reconciliation {
        cash,
        total,
        change,
        payload: TransactionPayload { cash, items },
    })
}

/// Build the stock-addition payload for a restock cart.
pub fn restock_payload(cart: &RestockCart) -> Result<RestockPayload, PosError> {
    if cart.is_empty() {
        return Err(PosError::EmptyCart);
    }
    let products = cart
        .lines()
        .iter()
        .map(|line| RestockItem {
            uuid: line.product_id().clone(),
            barcode: line.barcode().unwrap_or_default().to_string(),
            quantity_stok: line.quantity(),
        })
        .collect();
    Ok(RestockPayload { products })
}

fn parse_cash(input: &str, cart: &SaleCart) -> Result<Money, PosError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PosError::payment("cash amount is required"));
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| PosError::payment(format!("'{}' is not a number", trimmed)))?;
    if !value.is_finite() {
        return Err(PosError::payment("cash must be a finite amount"));
    }
    if value < 0.0 {
        return Err(PosError::payment("cash cannot be negative"));
    }
    let cash = Money::from_decimal(value, cart.currency())
        .ok_or_else(|| PosError::payment("cash amount is out of range"))?;
    // Never credit more than was typed: a fraction of the smallest unit is dropped.
    if cash.to_decimal() > value {
        return Ok(Money::new(cash.amount_minor - 1, cash.currency));
    }
    Ok(cash)
}
