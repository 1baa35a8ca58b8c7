//! Cart and line types.

use crate::catalog::ProductSnapshot;
use crate::error::{PosError, StockShortfall};
use crate::ids::{ProductId, ProductRef};
use crate::money::{Currency, Money};
use std::fmt;
use std::marker::PhantomData;

/// Maximum quantity allowed per line.
pub const MAX_QUANTITY_PER_LINE: i64 = 9999;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Sale {}
    impl Sealed for super::Restock {}
}

/// How a cart's lines are interpreted.
pub trait CartMode: sealed::Sealed + fmt::Debug + Clone + Copy + Default + PartialEq {
    /// Short name used in logs and output.
    const NAME: &'static str;
}

/// Lines are purchases; the total is money.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sale;

/// Lines are units to add to inventory; the total is a unit count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Restock;

impl CartMode for Sale {
    const NAME: &'static str = "sale";
}

impl CartMode for Restock {
    const NAME: &'static str = "restock";
}

/// Cart of products being sold.
pub type SaleCart = Cart<Sale>;

/// Cart of products being restocked.
pub type RestockCart = Cart<Restock>;

/// Working set of selected products, one line per product.
///
/// Lines keep insertion order. The cart belongs to whoever created it and
/// is dropped or cleared once the collaborator accepts the submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart<M: CartMode = Sale> {
    lines: Vec<CartLine>,
    currency: Currency,
    mode: PhantomData<M>,
}

impl<M: CartMode> Cart<M> {
    /// Create an empty rupiah cart.
    pub fn new() -> Self {
        Self::with_currency(Currency::IDR)
    }

    /// Create an empty cart in the given currency.
    pub fn with_currency(currency: Currency) -> Self {
        Self {
            lines: Vec::new(),
            currency,
            mode: PhantomData,
        }
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart has its quantity incremented; otherwise
    /// a new line with quantity 1 is appended. Never fails: at
    /// `MAX_QUANTITY_PER_LINE` the increment saturates. The snapshot's price
    /// currency is not checked here; a mismatch surfaces from `total()`. Use
    /// `add_quantity` to reject it up front.
    pub fn add(&mut self, product: &ProductSnapshot) {
        if let Some(line) = self.line_mut(&product.product_id) {
            line.quantity = line.quantity.saturating_add(1).min(MAX_QUANTITY_PER_LINE);
            return;
        }
        self.lines.push(CartLine::from_snapshot(product));
    }

    /// Add `quantity` units of a product in one step.
    ///
    /// Fails with `InvalidQuantity` when `quantity` is below 1 or the line
    /// would exceed `MAX_QUANTITY_PER_LINE`, and with `CurrencyMismatch` when
    /// the price is in another currency. The cart is unchanged on error.
    pub fn add_quantity(&mut self, product: &ProductSnapshot, quantity: i64) -> Result<(), PosError> {
        if product.unit_price.currency != self.currency {
            return Err(PosError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: product.unit_price.currency.code().to_string(),
            });
        }
        let current = self.line(&product.product_id).map_or(0, |l| l.quantity);
        let requested = current.saturating_add(quantity);
        if quantity < 1 || requested > MAX_QUANTITY_PER_LINE {
            return Err(PosError::InvalidQuantity(requested));
        }
        match self.line_mut(&product.product_id) {
            Some(line) => line.quantity = requested,
            None => {
                let mut line = CartLine::from_snapshot(product);
                line.quantity = requested;
                self.lines.push(line);
            }
        }
        Ok(())
    }

    /// Remove a product's line. Returns whether a line was removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let len_before = self.lines.len();
        self.lines.retain(|l| &l.product_id != product_id);
        self.lines.len() < len_before
    }

    /// Adjust a line's quantity by `delta`, clamped to `1..=MAX_QUANTITY_PER_LINE`.
    ///
    /// Returns false if the product is not in the cart.
    pub fn set_quantity(&mut self, product_id: &ProductId, delta: i64) -> bool {
        match self.line_mut(product_id) {
            Some(line) => {
                line.quantity = line
                    .quantity
                    .saturating_add(delta)
                    .clamp(1, MAX_QUANTITY_PER_LINE);
                true
            }
            None => false,
        }
    }

    /// Set a line's quantity to a typed value, with the same clamp as `set_quantity`.
    pub fn set_exact_quantity(&mut self, product_id: &ProductId, quantity: i64) -> bool {
        let current = match self.line(product_id) {
            Some(line) => line.quantity,
            None => return false,
        };
        self.set_quantity(product_id, quantity.saturating_sub(current))
    }

    /// Check every line against its stock snapshot.
    ///
    /// Fails with `StockExceeded` listing every line whose quantity is above
    /// the available stock. This is a fast local check; the server decides.
    pub fn validate_against_stock(&self) -> Result<(), PosError> {
        let shortfalls: Vec<StockShortfall> = self
            .lines
            .iter()
            .filter(|l| l.exceeds_stock())
            .map(|l| StockShortfall {
                product_id: l.product_id.clone(),
                name: l.name.clone(),
                requested: l.quantity,
                available: l.available_stock,
            })
            .collect();

        if shortfalls.is_empty() {
            Ok(())
        } else {
            Err(PosError::StockExceeded { shortfalls })
        }
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Get a line by product id.
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.product_id == product_id)
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| &l.product_id == product_id)
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    pub fn unit_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Cart currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Mode name ("sale" or "restock").
    pub fn mode_name(&self) -> &'static str {
        M::NAME
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Cart<Sale> {
    /// Sum of `unit_price × quantity` over all lines.
    pub fn total(&self) -> Result<Money, PosError> {
        self.lines
            .iter()
            .try_fold(Money::zero(self.currency), |acc, line| {
                let subtotal = line.subtotal()?;
                acc.try_add(&subtotal).ok_or_else(|| {
                    if subtotal.currency != self.currency {
                        PosError::CurrencyMismatch {
                            expected: self.currency.code().to_string(),
                            got: subtotal.currency.code().to_string(),
                        }
                    } else {
                        PosError::Overflow
                    }
                })
            })
    }
}

impl Cart<Restock> {
    /// Number of units that will be added to inventory.
    pub fn total(&self) -> i64 {
        self.unit_count()
    }
}

impl<M: CartMode> Default for Cart<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// One product entry in a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    product_id: ProductId,
    reference: ProductRef,
    name: String,
    barcode: Option<String>,
    unit_price: Money,
    quantity: i64,
    available_stock: i64,
}

impl CartLine {
    fn from_snapshot(product: &ProductSnapshot) -> Self {
        Self {
            product_id: product.product_id.clone(),
            reference: product.reference.clone(),
            name: product.name.clone(),
            barcode: product.barcode.clone(),
            unit_price: product.unit_price,
            quantity: 1,
            available_stock: product.available_stock.max(0),
        }
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn reference(&self) -> &ProductRef {
        &self.reference
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn barcode(&self) -> Option<&str> {
        self.barcode.as_deref()
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Always at least 1.
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn available_stock(&self) -> i64 {
        self.available_stock
    }

    /// `unit_price × quantity`.
    pub fn subtotal(&self) -> Result<Money, PosError> {
        self.unit_price
            .try_multiply(self.quantity)
            .ok_or(PosError::Overflow)
    }

    pub fn exceeds_stock(&self) -> bool {
        self.quantity > self.available_stock
    }
}
