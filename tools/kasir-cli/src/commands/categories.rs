//! Category commands.

use anyhow::{Context as _, Result};
use kasir_client::ApiClient;
use kasir_core::catalog::CategoryInput;

use super::products::{confirm, resolve_category};
use super::{CategoriesArgs, CategoriesCommand};
use crate::context::Context;
use crate::output::{money, stock_badge};

const TABLE: [usize; 4] = [6, 28, 16, 8];

/// Run the categories command.
pub async fn run(args: CategoriesArgs, ctx: &Context) -> Result<()> {
    let client = ctx.authed_client()?;
    match args.command {
        Some(CategoriesCommand::List) | None => list_categories(&client, ctx).await,
        Some(CategoriesCommand::Add { name }) => {
            let input = validated_input(&name)?;
            client
                .create_category(&input)
                .await
                .context("Failed to create category")?;
            ctx.output.success(&format!("Created category {}", input.name));
            Ok(())
        }
        Some(CategoriesCommand::Rename { category, name }) => {
            let input = validated_input(&name)?;
            let categories = client.list_categories().await.context("Failed to list categories")?;
            let existing = resolve_category(&categories, &category)?;
            client
                .update_category(&existing.uuid, &input)
                .await
                .context("Failed to rename category")?;
            ctx.output
                .success(&format!("Renamed {} to {}", existing.name, input.name));
            Ok(())
        }
        Some(CategoriesCommand::Delete { category, yes }) => {
            let categories = client.list_categories().await.context("Failed to list categories")?;
            let existing = resolve_category(&categories, &category)?;
            if existing.has_stock() {
                ctx.output.warn(&format!(
                    "{} still has {} unit(s) in stock",
                    existing.name, existing.remaining_stock
                ));
            }
            if !yes && !confirm(ctx, &format!("Delete category '{}'?", existing.name))? {
                ctx.output.info("Cancelled");
                return Ok(());
            }
            client
                .delete_category(&existing.uuid)
                .await
                .context("Failed to delete category")?;
            ctx.output.success(&format!("Deleted category {}", existing.name));
            Ok(())
        }
    }
}

async fn list_categories(client: &ApiClient, ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Fetching categories...");
    let result = client.list_categories().await;
    spinner.finish_and_clear();
    let categories = result.context("Failed to list categories")?;

    if ctx.output.is_json() {
        ctx.output.json(&categories);
        return Ok(());
    }
    if categories.is_empty() {
        ctx.output.info("No categories yet.");
        return Ok(());
    }

    ctx.output.header("Categories");
    ctx.output.table_row(&["ID", "NAME", "CAPITAL", "STOCK"], &TABLE, &[2, 3]);
    ctx.output.table_rule(&TABLE);
    for c in &categories {
        let id = c.id.to_string();
        let capital = money(&c.capital);
        let stock = stock_badge(c.remaining_stock);
        ctx.output
            .table_row(&[&id, &c.name, &capital, &stock], &TABLE, &[2, 3]);
    }
    Ok(())
}

fn validated_input(name: &str) -> Result<CategoryInput> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Category name cannot be empty");
    }
    Ok(CategoryInput::new(name))
}
