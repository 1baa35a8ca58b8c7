//! Product types.

use crate::de;
use crate::ids::{ProductId, ProductRef};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A product as listed by `GET /api/products`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Numeric row id; sale payloads reference products by it.
    pub id: i64,
    /// Product uuid, used in every other product endpoint.
    pub uuid: ProductId,
    /// Display name.
    pub name: String,
    /// Barcode, if one was registered.
    #[serde(default)]
    pub barcode: Option<String>,
    /// Price charged at the till.
    #[serde(default, deserialize_with = "de::idr")]
    pub selling_price: Money,
    /// Price paid to the supplier.
    #[serde(default, deserialize_with = "de::idr")]
    pub purchase_price: Money,
    /// Units currently in stock.
    #[serde(default, deserialize_with = "de::int")]
    pub stock: i64,
    /// Category row id, when the listing includes it.
    #[serde(default)]
    pub category_id: Option<i64>,
}

impl Product {
    /// Margin per unit at current prices.
    pub fn unit_margin(&self) -> Option<Money> {
        self.selling_price.try_subtract(&self.purchase_price)
    }

    /// Snapshot used when the product is added to a cart.
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            product_id: self.uuid.clone(),
            reference: ProductRef::Numeric(self.id),
            name: self.name.clone(),
            barcode: self.barcode.clone(),
            unit_price: self.selling_price,
            available_stock: self.stock.max(0),
        }
    }
}

/// The product data a cart line is created from.
///
/// Stock is a snapshot taken when the listing was fetched and is never
/// refreshed while the cart lives.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSnapshot {
    pub product_id: ProductId,
    pub reference: ProductRef,
    pub name: String,
    pub barcode: Option<String>,
    pub unit_price: Money,
    pub available_stock: i64,
}

impl ProductSnapshot {
    /// Snapshot whose payload reference is the product id itself.
    pub fn new(product_id: impl Into<ProductId>, unit_price: Money, available_stock: i64) -> Self {
        let product_id = product_id.into();
        Self {
            reference: ProductRef::from(&product_id),
            name: product_id.as_str().to_string(),
            product_id,
            barcode: None,
            unit_price,
            available_stock,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_barcode(mut self, barcode: impl Into<String>) -> Self {
        self.barcode = Some(barcode.into());
        self
    }
}

/// Direction of a stock correction in a product update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StockAdjustment {
    #[default]
    Add,
    Reduce,
}

impl StockAdjustment {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockAdjustment::Add => "add",
            StockAdjustment::Reduce => "reduce",
        }
    }
}

impl FromStr for StockAdjustment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "add" => Ok(StockAdjustment::Add),
            "reduce" => Ok(StockAdjustment::Reduce),
            other => Err(format!("unknown stock adjustment '{}': expected add or reduce", other)),
        }
    }
}

/// Body of `PUT /api/products/{uuid}`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductUpdate {
    pub name: String,
    pub barcode: String,
    pub add_or_reduce_stock: StockAdjustment,
    pub quantity_stok: i64,
    pub selling_price: i64,
    pub purchase_price: i64,
}

impl ProductUpdate {
    /// Start an update that keeps the product's current values.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            barcode: product.barcode.clone().unwrap_or_default(),
            add_or_reduce_stock: StockAdjustment::Add,
            quantity_stok: 0,
            selling_price: product.selling_price.amount_minor,
            purchase_price: product.purchase_price.amount_minor,
        }
    }
}

/// Fields of the multipart `POST /api/products` form.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub stock: i64,
    pub selling_price: i64,
    pub purchase_price: i64,
    pub category_id: String,
    pub barcode: String,
    pub store_id: String,
}

impl NewProduct {
    /// Text fields in form order.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("stock", self.stock.to_string()),
            ("selling_price", self.selling_price.to_string()),
            ("purchase_price", self.purchase_price.to_string()),
            ("category_id", self.category_id.clone()),
            ("barcode", self.barcode.clone()),
            ("store_id", self.store_id.clone()),
        ]
    }
}
