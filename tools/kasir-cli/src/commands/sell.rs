//! Sale command.

use anyhow::{Context as _, Result};
use dialoguer::Input;
use kasir_client::{checkout, CheckoutError};
use kasir_core::cart::SaleCart;
use kasir_core::PosError;
use serde::Serialize;

use super::{fill_cart, print_invoice, SellArgs};
use crate::context::Context;
use crate::output::money;

const TABLE: [usize; 4] = [28, 5, 14, 14];

#[derive(Serialize)]
struct SaleSummary {
    no_transaction: String,
    total: i64,
    cash: i64,
    change: i64,
}

/// Run the sell command.
pub async fn run(args: SellArgs, ctx: &Context) -> Result<()> {
    let client = ctx.authed_client()?;

    let spinner = ctx.output.spinner("Fetching products...");
    let result = client.list_products().await;
    spinner.finish_and_clear();
    let products = result.context("Failed to list products")?;

    let mut cart = SaleCart::new();
    fill_cart(&mut cart, &products, &args.items)?;
    show_cart(&cart, ctx)?;

    let cash = match args.cash {
        Some(cash) => cash,
        None if ctx.output.is_json() => anyhow::bail!("--cash is required in --json mode"),
        None => Input::<String>::new()
            .with_prompt("Cash")
            .interact_text()
            .context("Failed to read cash amount")?,
    };

    let spinner = ctx.output.spinner("Submitting sale...");
    let result = checkout(&client, &mut cart, &cash).await;
    spinner.finish_and_clear();

    let sale = match result {
        Ok(sale) => sale,
        Err(CheckoutError::Rejected(PosError::StockExceeded { shortfalls })) => {
            for s in &shortfalls {
                ctx.output.warn(&format!(
                    "{}: {} requested, {} in stock",
                    s.name, s.requested, s.available
                ));
            }
            anyhow::bail!("Not enough stock for {} product(s)", shortfalls.len());
        }
        Err(e) => return Err(e).context("Sale not recorded"),
    };

    if ctx.output.is_json() {
        ctx.output.json(&SaleSummary {
            no_transaction: sale.transaction.to_string(),
            total: sale.total.amount_minor,
            cash: sale.cash.amount_minor,
            change: sale.change.amount_minor,
        });
    } else {
        ctx.output.success(&format!("Sale recorded: {}", sale.transaction));
        ctx.output.kv("total", &money(&sale.total));
        ctx.output.kv("cash", &money(&sale.cash));
        ctx.output.kv("change", &money(&sale.change));
    }

    if args.print {
        let invoice = client
            .invoice(&sale.transaction)
            .await
            .context("Failed to fetch invoice")?;
        print_invoice(&invoice, ctx).await?;
    }
    Ok(())
}

fn show_cart(cart: &SaleCart, ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        return Ok(());
    }
    ctx.output.header("Cart");
    ctx.output.table_row(&["ITEM", "QTY", "PRICE", "SUBTOTAL"], &TABLE, &[1, 2, 3]);
    ctx.output.table_rule(&TABLE);
    for line in cart.lines() {
        let qty = line.quantity().to_string();
        let price = money(&line.unit_price());
        let subtotal = money(&line.subtotal()?);
        ctx.output
            .table_row(&[line.name(), &qty, &price, &subtotal], &TABLE, &[1, 2, 3]);
        if line.exceeds_stock() {
            ctx.output.warn(&format!(
                "{} has only {} in stock",
                line.name(),
                line.available_stock()
            ));
        }
    }
    ctx.output.table_rule(&TABLE);
    let total = money(&cart.total()?);
    ctx.output.table_row(&["TOTAL", "", "", &total], &TABLE, &[1, 2, 3]);
    Ok(())
}
