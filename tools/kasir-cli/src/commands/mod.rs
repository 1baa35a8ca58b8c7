//! CLI command implementations.

pub mod auth;
pub mod categories;
pub mod config;
pub mod invoice;
pub mod products;
pub mod report;
pub mod restock;
pub mod sell;

use std::str::FromStr;

use anyhow::{bail, Context as _, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use kasir_client::printer::{print_receipt, DeviceTransport};
use kasir_core::cart::{Cart, CartMode, MAX_QUANTITY_PER_LINE};
use kasir_core::catalog::Product;
use kasir_core::receipt::Invoice;
use kasir_core::report::ReportPeriod;
use thiserror::Error;

use crate::context::Context;

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// Account email (prompted when omitted).
    #[arg(short, long)]
    pub email: Option<String>,

    /// Password (prompted when omitted).
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Arguments for the whoami command.
#[derive(Args)]
pub struct WhoamiArgs {
    /// Ask the server whether the session is still valid.
    #[arg(long)]
    pub check: bool,
}

/// Arguments for the register command.
#[derive(Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub address: Option<String>,
}

/// Arguments for the password command.
#[derive(Args)]
pub struct PasswordArgs {
    #[command(subcommand)]
    pub command: PasswordCommand,
}

#[derive(Subcommand)]
pub enum PasswordCommand {
    /// Email a reset token.
    Forgot {
        email: String,
    },
    /// Check a reset token.
    Verify {
        email: String,
        token: String,
    },
    /// Set a new password using a reset token.
    Reset {
        email: String,
        token: String,
    },
}

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: Option<ProductsCommand>,
}

#[derive(Subcommand)]
pub enum ProductsCommand {
    /// List products.
    List {
        /// Only products whose name contains this text.
        #[arg(short, long)]
        search: Option<String>,

        /// Only products with at most this many units in stock.
        #[arg(long)]
        low_stock: Option<i64>,
    },
    /// Show one product.
    Show {
        /// Product uuid or barcode.
        product: String,
    },
    /// Create a product.
    Add {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "0")]
        stock: i64,

        #[arg(long)]
        selling_price: i64,

        #[arg(long)]
        purchase_price: i64,

        /// Category uuid, id or name.
        #[arg(long)]
        category: String,

        #[arg(long, default_value = "")]
        barcode: String,

        /// Store id (defaults to the logged-in user's store).
        #[arg(long)]
        store_id: Option<String>,

        /// Image file to upload.
        #[arg(long)]
        image: Option<String>,
    },
    /// Update a product's details or correct its stock.
    Update {
        /// Product uuid or barcode.
        product: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        barcode: Option<String>,

        #[arg(long)]
        selling_price: Option<i64>,

        #[arg(long)]
        purchase_price: Option<i64>,

        /// Units to add to stock.
        #[arg(long, conflicts_with = "reduce_stock")]
        add_stock: Option<i64>,

        /// Units to remove from stock.
        #[arg(long)]
        reduce_stock: Option<i64>,
    },
    /// Delete a product.
    Delete {
        /// Product uuid or barcode.
        product: String,

        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
    /// Download a product image.
    Image {
        /// Product uuid or barcode.
        product: String,

        /// Output file path.
        #[arg(short, long)]
        output: String,
    },
    /// Replace a product image.
    SetImage {
        /// Product uuid or barcode.
        product: String,

        /// Image file to upload.
        image: String,
    },
}

/// Arguments for the categories command.
#[derive(Args)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    pub command: Option<CategoriesCommand>,
}

#[derive(Subcommand)]
pub enum CategoriesCommand {
    /// List categories.
    List,
    /// Create a category.
    Add {
        name: String,
    },
    /// Rename a category.
    Rename {
        /// Category uuid, id or name.
        category: String,
        name: String,
    },
    /// Delete a category.
    Delete {
        /// Category uuid, id or name.
        category: String,

        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the sell command.
#[derive(Args)]
pub struct SellArgs {
    /// Product uuid or barcode, optionally with a quantity: `uuid:3`.
    #[arg(short, long = "item", required = true)]
    pub items: Vec<ItemSpec>,

    /// Cash tendered (prompted when omitted).
    #[arg(long)]
    pub cash: Option<String>,

    /// Print the receipt after the sale.
    #[arg(long)]
    pub print: bool,
}

/// Arguments for the restock command.
#[derive(Args)]
pub struct RestockArgs {
    /// Product uuid or barcode with the units to add: `uuid:24`.
    #[arg(short, long = "item", required = true)]
    pub items: Vec<ItemSpec>,

    /// Skip confirmation.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the invoice command.
#[derive(Args)]
pub struct InvoiceArgs {
    /// Transaction number.
    pub no_transaction: String,

    /// Send to the configured printer instead of the terminal.
    #[arg(long)]
    pub print: bool,
}

/// Arguments for the report command.
#[derive(Args)]
pub struct ReportArgs {
    #[command(subcommand)]
    pub command: ReportCommand,
}

#[derive(Subcommand)]
pub enum ReportCommand {
    /// Sales totals, rows and income chart.
    Sales {
        /// daily, monthly or yearly.
        #[arg(short, long, default_value = "daily")]
        period: ReportPeriod,

        /// Reference date, YYYY-MM-DD (default: today).
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Stock purchase totals and rows.
    Purchases {
        /// daily, monthly or yearly.
        #[arg(short, long, default_value = "daily")]
        period: ReportPeriod,

        /// Reference date, YYYY-MM-DD (default: today).
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// API base URL to write.
        #[arg(long, default_value = "http://localhost:8000")]
        base_url: String,

        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}

/// `key[:quantity]` from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub key: String,
    pub quantity: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ItemSpecError {
    #[error("item is empty")]
    Empty,
    #[error("invalid quantity '{0}': expected a whole number from 1 to {max}", max = MAX_QUANTITY_PER_LINE)]
    Quantity(String),
}

impl FromStr for ItemSpec {
    type Err = ItemSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (key, quantity) = match s.rsplit_once(':') {
            Some((key, qty)) => {
                let quantity = qty
                    .trim()
                    .parse::<i64>()
                    .ok()
                    .filter(|q| (1..=MAX_QUANTITY_PER_LINE).contains(q))
                    .ok_or_else(|| ItemSpecError::Quantity(qty.to_string()))?;
                (key.trim(), quantity)
            }
            None => (s, 1),
        };
        if key.is_empty() {
            return Err(ItemSpecError::Empty);
        }
        Ok(Self {
            key: key.to_string(),
            quantity,
        })
    }
}

/// Look a product up by uuid or barcode.
pub fn find_product<'a>(products: &'a [Product], key: &str) -> Option<&'a Product> {
    products
        .iter()
        .find(|p| p.uuid.as_str() == key || p.barcode.as_deref() == Some(key))
}

/// Add each item to the cart. Repeated items merge into one line.
pub fn fill_cart<M: CartMode>(cart: &mut Cart<M>, products: &[Product], items: &[ItemSpec]) -> Result<()> {
    for item in items {
        let product = match find_product(products, &item.key) {
            Some(product) => product,
            None => bail!("No product with uuid or barcode '{}'", item.key),
        };
        cart.add_quantity(&product.snapshot(), item.quantity)
            .with_context(|| format!("Cannot add {} x '{}'", item.quantity, item.key))?;
    }
    Ok(())
}

/// Today's date, for report defaults.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Render an invoice and send it to the configured printer.
pub async fn print_invoice(invoice: &Invoice, ctx: &Context) -> Result<()> {
    let device = match &ctx.config.printer.device {
        Some(device) => device.clone(),
        None => bail!("No printer configured. Set [printer] device in kasir.toml."),
    };
    let bytes = invoice
        .receipt()
        .to_bytes(&ctx.config.store.name, ctx.config.store.receipt_width);

    let spinner = ctx.output.spinner(&format!("Printing to {}...", device.display()));
    let mut transport = DeviceTransport::new(device);
    let result = print_receipt(&mut transport, &bytes, &ctx.config.printer.options).await;
    spinner.finish_and_clear();

    result.context("Printing failed")?;
    ctx.output.success("Receipt printed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kasir_core::cart::{RestockCart, SaleCart};
    use kasir_core::ids::ProductId;

    fn products() -> Vec<Product> {
        serde_json::from_value(serde_json::json!([
            {"id": 1, "uuid": "p-kopi", "name": "Kopi", "barcode": "111", "selling_price": 10000, "stock": 5},
            {"id": 2, "uuid": "p-teh", "name": "Teh", "selling_price": 5000, "stock": 9}
        ]))
        .unwrap()
    }

    #[test]
    fn test_item_spec_parsing() {
        assert_eq!(
            "p-kopi".parse::<ItemSpec>(),
            Ok(ItemSpec { key: "p-kopi".into(), quantity: 1 })
        );
        assert_eq!("111:3".parse::<ItemSpec>().map(|i| i.quantity), Ok(3));
        assert!(matches!("p:0".parse::<ItemSpec>(), Err(ItemSpecError::Quantity(_))));
        assert!(matches!("p:x".parse::<ItemSpec>(), Err(ItemSpecError::Quantity(_))));
        assert_eq!(":2".parse::<ItemSpec>(), Err(ItemSpecError::Empty));
    }

    #[test]
    fn test_fill_cart_merges_repeated_items() {
        let items: Vec<ItemSpec> = ["p-kopi:2", "p-teh", "111"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let mut cart = SaleCart::new();
        fill_cart(&mut cart, &products(), &items).unwrap();

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.line(&ProductId::new("p-kopi")).unwrap().quantity(), 3);
        assert_eq!(cart.total().unwrap().amount_minor, 35000);
    }

    #[test]
    fn test_item_spec_rejects_quantity_above_line_limit() {
        assert_eq!("p:9999".parse::<ItemSpec>().map(|i| i.quantity), Ok(9999));
        assert!(matches!("p:10000".parse::<ItemSpec>(), Err(ItemSpecError::Quantity(_))));
        let huge = format!("p:{}", i64::MAX);
        assert!(matches!(huge.parse::<ItemSpec>(), Err(ItemSpecError::Quantity(_))));
    }

    #[test]
    fn test_fill_cart_large_quantity_is_one_step() {
        let items = vec![ItemSpec { key: "p-teh".into(), quantity: i64::MAX }];
        let mut cart = RestockCart::new();
        assert!(fill_cart(&mut cart, &products(), &items).is_err());
        assert!(cart.is_empty());

        let items = vec![ItemSpec { key: "p-teh".into(), quantity: MAX_QUANTITY_PER_LINE }];
        fill_cart(&mut cart, &products(), &items).unwrap();
        assert_eq!(cart.total(), MAX_QUANTITY_PER_LINE);
    }

    #[test]
    fn test_fill_cart_rejects_merged_overflow() {
        let items: Vec<ItemSpec> = ["p-teh:9000", "p-teh:1000"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let mut cart = RestockCart::new();
        assert!(fill_cart(&mut cart, &products(), &items).is_err());
        assert_eq!(cart.total(), 9000);
    }

    #[test]
    fn test_fill_cart_unknown_product() {
        let items = vec!["nope".parse().unwrap()];
        let mut cart = SaleCart::new();
        assert!(fill_cart(&mut cart, &products(), &items).is_err());
    }
}
