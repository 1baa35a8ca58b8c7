//! Restock command.

use anyhow::{Context as _, Result};
use kasir_client::restock;
use kasir_core::cart::RestockCart;

use super::products::confirm;
use super::{fill_cart, RestockArgs};
use crate::context::Context;

const TABLE: [usize; 3] = [28, 10, 10];

/// Run the restock command.
pub async fn run(args: RestockArgs, ctx: &Context) -> Result<()> {
    let client = ctx.authed_client()?;

    let spinner = ctx.output.spinner("Fetching products...");
    let result = client.list_products().await;
    spinner.finish_and_clear();
    let products = result.context("Failed to list products")?;

    let mut cart = RestockCart::new();
    fill_cart(&mut cart, &products, &args.items)?;

    if !ctx.output.is_json() {
        ctx.output.header("Restock");
        ctx.output.table_row(&["ITEM", "IN STOCK", "ADD"], &TABLE, &[1, 2]);
        ctx.output.table_rule(&TABLE);
        for line in cart.lines() {
            let stock = line.available_stock().to_string();
            let qty = line.quantity().to_string();
            ctx.output.table_row(&[line.name(), &stock, &qty], &TABLE, &[1, 2]);
        }
        ctx.output.kv("units", &cart.total().to_string());
    }

    if !args.yes && !confirm(ctx, "Submit restock?")? {
        ctx.output.info("Cancelled");
        return Ok(());
    }

    let units = cart.total();
    let spinner = ctx.output.spinner("Submitting restock...");
    let result = restock(&client, &mut cart).await;
    spinner.finish_and_clear();
    let message = result.context("Restock not recorded")?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "units": units, "message": message }));
        return Ok(());
    }
    ctx.output.success(&format!("Added {} unit(s)", units));
    if !message.is_empty() {
        ctx.output.info(&message);
    }
    Ok(())
}
