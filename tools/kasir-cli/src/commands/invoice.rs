//! Invoice command.

use anyhow::{Context as _, Result};
use kasir_core::ids::TransactionRef;

use super::{print_invoice, InvoiceArgs};
use crate::context::Context;

/// Run the invoice command.
pub async fn run(args: InvoiceArgs, ctx: &Context) -> Result<()> {
    let client = ctx.authed_client()?;
    let no = TransactionRef::new(args.no_transaction.trim());

    let spinner = ctx.output.spinner("Fetching invoice...");
    let result = client.invoice(&no).await;
    spinner.finish_and_clear();
    let invoice = result.with_context(|| format!("Failed to fetch invoice {}", no))?;

    if args.print {
        return print_invoice(&invoice, ctx).await;
    }

    if ctx.output.is_json() {
        ctx.output.json(&invoice);
        return Ok(());
    }
    let text = invoice
        .receipt()
        .render(&ctx.config.store.name, ctx.config.store.receipt_width);
    ctx.output.raw(&text);
    Ok(())
}
