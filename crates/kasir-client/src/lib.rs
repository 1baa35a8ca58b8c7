//! Async client for the kasir POS API.
//!
//! Wraps the REST endpoints in typed calls, validates every response at the
//! boundary, and drives checkout and restock submissions. Also contains the
//! receipt printer transport.
//!
//! # Example
//!
//! ```rust,no_run
//! use kasir_client::{checkout, ApiClient, ClientConfig};
//! use kasir_core::cart::SaleCart;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = ApiClient::new(ClientConfig::new("https://pos.example.com"))?;
//! client.login("kasir@example.com", "secret").await?;
//!
//! let products = client.list_products().await?;
//! let mut cart = SaleCart::new();
//! cart.add(&products[0].snapshot());
//!
//! let result = checkout(&client, &mut cart, "50000").await?;
//! println!("change: {}, no: {}", result.change, result.transaction);
//! # Ok(())
//! # }
//! ```

mod auth;
mod catalog;
mod checkout;
mod client;
mod config;
mod error;
mod response;
mod sales;
mod session;

pub mod printer;

pub use auth::Registration;
pub use catalog::ProductImage;
pub use checkout::{checkout, restock, RestockSubmitter, TransactionSubmitter};
pub use client::ApiClient;
pub use config::{ClientConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};
pub use error::{CheckoutError, ClientError, PrinterError, Result};
pub use response::Response;
pub use session::{Session, User};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::printer::{print_receipt, DeviceTransport, PrintOptions, PrinterTransport};
    pub use crate::{ApiClient, CheckoutError, ClientConfig, ClientError, Session};
}
