//! Submission payloads handed to the API.

use crate::ids::{ProductId, ProductRef};
use crate::money::Money;
use serde::{Serialize, Serializer};

/// A sale, ready for `POST /api/transaction`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionPayload {
    #[serde(serialize_with = "amount_as_number")]
    pub cash: Money,
    pub items: Vec<PayloadItem>,
}

/// One sold product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayloadItem {
    #[serde(rename = "id_product")]
    pub product_reference: ProductRef,
    pub quantity: i64,
}

impl TransactionPayload {
    /// Request body; the endpoint expects the payload under `transaction`.
    pub fn to_request(&self) -> TransactionRequest<'_> {
        TransactionRequest { transaction: self }
    }
}

/// Wire wrapper for [`TransactionPayload`].
#[derive(Debug, Serialize)]
pub struct TransactionRequest<'a> {
    pub transaction: &'a TransactionPayload,
}

/// A stock addition, ready for `POST /api/products/purchase/existing`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestockPayload {
    pub products: Vec<RestockItem>,
}

/// One restocked product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestockItem {
    pub uuid: ProductId,
    pub barcode: String,
    pub quantity_stok: i64,
}

/// Money as a bare JSON number: an integer for currencies without minor
/// units, a decimal otherwise.
fn amount_as_number<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
    if money.currency.decimal_places() == 0 {
        serializer.serialize_i64(money.amount_minor)
    } else {
        serializer.serialize_f64(money.to_decimal())
    }
}
