//! Sale and restock submission.
//!
//! Local checks run first and nothing is sent when they fail. The cart is
//! cleared only after the collaborator accepts the submission, so a failed
//! attempt can be retried as-is.

use crate::client::ApiClient;
use crate::error::{CheckoutError, ClientError};
use async_trait::async_trait;
use kasir_core::cart::{RestockCart, SaleCart};
use kasir_core::checkout::{reconcile, restock_payload, CheckoutResult, RestockPayload, TransactionPayload};
use kasir_core::ids::TransactionRef;
use tracing::{info, warn};

/// Accepts sale payloads.
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    async fn submit_transaction(&self, payload: &TransactionPayload) -> Result<TransactionRef, ClientError>;
}

/// Accepts stock additions.
#[async_trait]
pub trait RestockSubmitter: Send + Sync {
    async fn submit_restock(&self, payload: &RestockPayload) -> Result<String, ClientError>;
}

#[async_trait]
impl TransactionSubmitter for ApiClient {
    async fn submit_transaction(&self, payload: &TransactionPayload) -> Result<TransactionRef, ClientError> {
        ApiClient::submit_transaction(self, payload).await
    }
}

#[async_trait]
impl RestockSubmitter for ApiClient {
    async fn submit_restock(&self, payload: &RestockPayload) -> Result<String, ClientError> {
        ApiClient::submit_restock(self, payload).await
    }
}

/// Validate stock, reconcile the cash, submit, and clear the cart on success.
#[tracing::instrument(skip(submitter, cart), fields(lines = cart.len()))]
pub async fn checkout<S>(
    submitter: &S,
    cart: &mut SaleCart,
    cash_input: &str,
) -> Result<CheckoutResult, CheckoutError>
where
    S: TransactionSubmitter + ?Sized,
{
    cart.validate_against_stock()?;
    let reconciliation = reconcile(cart, cash_input)?;

    let reference = submitter
        .submit_transaction(&reconciliation.payload)
        .await
        .map_err(|e| {
            warn!(error = %e, "transaction submission failed");
            CheckoutError::submission(e)
        })?;

    info!(transaction = %reference, total = %reconciliation.total, "sale recorded");
    cart.clear();
    Ok(reconciliation.complete(reference))
}

/// Submit a restock cart and clear it on success. Returns the server message.
#[tracing::instrument(skip(submitter, cart), fields(lines = cart.len(), units = cart.total()))]
pub async fn restock<S>(submitter: &S, cart: &mut RestockCart) -> Result<String, CheckoutError>
where
    S: RestockSubmitter + ?Sized,
{
    let payload = restock_payload(cart)?;
    let message = submitter.submit_restock(&payload).await.map_err(|e| {
        warn!(error = %e, "restock submission failed");
        CheckoutError::submission(e)
    })?;

    info!(products = payload.products.len(), "restock recorded");
    cart.clear();
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kasir_core::catalog::ProductSnapshot;
    use kasir_core::ids::ProductId;
    use kasir_core::money::Money;
    use kasir_core::PosError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeApi {
        fail_with: Option<String>,
        sales: Mutex<Vec<TransactionPayload>>,
        restocks: Mutex<Vec<RestockPayload>>,
    }

    impl FakeApi {
        fn failing(message: &str) -> Self {
            Self {
                fail_with: Some(message.to_string()),
                ..Default::default()
            }
        }

        fn error(&self) -> Option<ClientError> {
            self.fail_with.as_ref().map(|m| ClientError::Api {
                status: 422,
                message: m.clone(),
            })
        }
    }

    #[async_trait]
    impl TransactionSubmitter for FakeApi {
        async fn submit_transaction(&self, payload: &TransactionPayload) -> Result<TransactionRef, ClientError> {
            if let Some(err) = self.error() {
                return Err(err);
            }
            self.sales.lock().unwrap().push(payload.clone());
            Ok(TransactionRef::new("TRX-1"))
        }
    }

    #[async_trait]
    impl RestockSubmitter for FakeApi {
        async fn submit_restock(&self, payload: &RestockPayload) -> Result<String, ClientError> {
            if let Some(err) = self.error() {
                return Err(err);
            }
            self.restocks.lock().unwrap().push(payload.clone());
            Ok("Stok berhasil ditambahkan".to_string())
        }
    }

    fn cart(quantity: i64) -> SaleCart {
        let mut cart = SaleCart::new();
        let a = ProductSnapshot::new("A", Money::idr(10000), 5);
        for _ in 0..quantity {
            cart.add(&a);
        }
        cart
    }

    #[tokio::test]
    async fn test_checkout_success_clears_cart() {
        let api = FakeApi::default();
        let mut cart = cart(2);

        let result = checkout(&api, &mut cart, "25000").await.unwrap();

        assert_eq!(result.change, Money::idr(5000));
        assert_eq!(result.transaction.as_str(), "TRX-1");
        assert!(cart.is_empty());
        assert_eq!(api.sales.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_checkout_stock_exceeded_sends_nothing() {
        let api = FakeApi::default();
        let mut cart = cart(6);

        let err = checkout(&api, &mut cart, "100000").await.unwrap_err();

        match err.as_rejection() {
            Some(PosError::StockExceeded { shortfalls }) => {
                assert_eq!(shortfalls[0].product_id, ProductId::new("A"));
                assert_eq!(shortfalls[0].requested, 6);
                assert_eq!(shortfalls[0].available, 5);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(cart.len(), 1);
        assert!(api.sales.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_insufficient_cash_sends_nothing() {
        let api = FakeApi::default();
        let mut cart = cart(2);

        let err = checkout(&api, &mut cart, "15000").await.unwrap_err();

        assert!(matches!(
            err.as_rejection(),
            Some(PosError::InsufficientOrInvalidPayment { .. })
        ));
        assert_eq!(cart.unit_count(), 2);
        assert!(api.sales.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_failure_keeps_cart() {
        let api = FakeApi::failing("Stok produk tidak mencukupi");
        let mut cart = cart(2);
        let before = cart.clone();

        let err = checkout(&api, &mut cart, "25000").await.unwrap_err();

        match err {
            CheckoutError::SubmissionFailed { message, .. } => {
                assert_eq!(message, "Stok produk tidak mencukupi")
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(cart, before);
    }

    #[tokio::test]
    async fn test_checkout_empty_cart() {
        let api = FakeApi::default();
        let err = checkout(&api, &mut SaleCart::new(), "1000").await.unwrap_err();
        assert_eq!(err.as_rejection(), Some(&PosError::EmptyCart));
    }

    #[tokio::test]
    async fn test_restock_success_and_failure() {
        let mut cart = RestockCart::new();
        cart.add(&ProductSnapshot::new("A", Money::idr(0), 0));
        cart.set_exact_quantity(&ProductId::new("A"), 10);

        let failing = FakeApi::failing("nope");
        assert!(restock(&failing, &mut cart).await.is_err());
        assert_eq!(cart.total(), 10);

        let api = FakeApi::default();
        let message = restock(&api, &mut cart).await.unwrap();
        assert_eq!(message, "Stok berhasil ditambahkan");
        assert!(cart.is_empty());
        assert_eq!(api.restocks.lock().unwrap()[0].products[0].quantity_stok, 10);
    }
}
