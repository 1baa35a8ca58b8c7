//! Product catalog commands.

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use kasir_client::{ApiClient, ProductImage};
use kasir_core::catalog::{Category, NewProduct, Product, ProductUpdate, StockAdjustment};
use kasir_core::money::Money;

use super::{find_product, ProductsArgs, ProductsCommand};
use crate::context::Context;
use crate::output::{money, stock_badge};

const TABLE: [usize; 5] = [36, 28, 14, 14, 6];

/// Run the products command.
pub async fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let client = ctx.authed_client()?;
    match args.command {
        Some(ProductsCommand::List { search, low_stock }) => {
            list_products(&client, search.as_deref(), low_stock, ctx).await
        }
        None => list_products(&client, None, None, ctx).await,
        Some(ProductsCommand::Show { product }) => show_product(&client, &product, ctx).await,
        Some(ProductsCommand::Add {
            name,
            stock,
            selling_price,
            purchase_price,
            category,
            barcode,
            store_id,
            image,
        }) => {
            let store_id = match store_id {
                Some(id) => id,
                None => match client.session().and_then(|s| s.user.store_id) {
                    Some(id) => id.to_string(),
                    None => bail!("--store-id is required: the logged-in user has no store"),
                },
            };
            let categories = client.list_categories().await.context("Failed to list categories")?;
            let category = resolve_category(&categories, &category)?;
            let product = NewProduct {
                name,
                stock,
                selling_price,
                purchase_price,
                category_id: category.id.to_string(),
                barcode,
                store_id,
            };
            add_product(&client, &product, image.as_deref(), ctx).await
        }
        Some(ProductsCommand::Update {
            product,
            name,
            barcode,
            selling_price,
            purchase_price,
            add_stock,
            reduce_stock,
        }) => {
            let existing = fetch_product(&client, &product).await?;
            let mut update = ProductUpdate::from_product(&existing);
            if let Some(name) = name {
                update.name = name;
            }
            if let Some(barcode) = barcode {
                update.barcode = barcode;
            }
            if let Some(price) = selling_price {
                update.selling_price = price;
            }
            if let Some(price) = purchase_price {
                update.purchase_price = price;
            }
            match (add_stock, reduce_stock) {
                (Some(units), _) => {
                    update.add_or_reduce_stock = StockAdjustment::Add;
                    update.quantity_stok = units;
                }
                (None, Some(units)) => {
                    update.add_or_reduce_stock = StockAdjustment::Reduce;
                    update.quantity_stok = units;
                }
                (None, None) => {}
            }
            if update.quantity_stok < 0 || update.selling_price < 0 || update.purchase_price < 0 {
                bail!("Prices and stock corrections cannot be negative");
            }

            let spinner = ctx.output.spinner("Updating product...");
            let result = client.update_product(&existing.uuid, &update).await;
            spinner.finish_and_clear();
            result.context("Failed to update product")?;
            ctx.output.success(&format!("Updated {}", update.name));
            Ok(())
        }
        Some(ProductsCommand::Delete { product, yes }) => {
            let existing = fetch_product(&client, &product).await?;
            if !yes && !confirm(ctx, &format!("Delete product '{}'?", existing.name))? {
                ctx.output.info("Cancelled");
                return Ok(());
            }
            client
                .delete_product(&existing.uuid)
                .await
                .context("Failed to delete product")?;
            ctx.output.success(&format!("Deleted {}", existing.name));
            Ok(())
        }
        Some(ProductsCommand::Image { product, output }) => {
            let existing = fetch_product(&client, &product).await?;
            let bytes = client
                .product_image(&existing.uuid)
                .await
                .context("Failed to download image")?;
            let path = ctx.resolve_path(&output);
            tokio::fs::write(&path, &bytes)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            ctx.output.success(&format!("Saved {} bytes to {}", bytes.len(), path.display()));
            Ok(())
        }
        Some(ProductsCommand::SetImage { product, image }) => {
            let existing = fetch_product(&client, &product).await?;
            let image = ProductImage::from_path(ctx.resolve_path(&image)).await?;
            let spinner = ctx.output.spinner("Uploading image...");
            let result = client.update_product_image(&existing.uuid, image).await;
            spinner.finish_and_clear();
            result.context("Failed to upload image")?;
            ctx.output.success(&format!("Image updated for {}", existing.name));
            Ok(())
        }
    }
}

async fn list_products(
    client: &ApiClient,
    search: Option<&str>,
    low_stock: Option<i64>,
    ctx: &Context,
) -> Result<()> {
    let spinner = ctx.output.spinner("Fetching products...");
    let result = client.list_products().await;
    spinner.finish_and_clear();
    let mut products = result.context("Failed to list products")?;

    if let Some(search) = search {
        let needle = search.to_lowercase();
        products.retain(|p| p.name.to_lowercase().contains(&needle));
    }
    if let Some(limit) = low_stock {
        products.retain(|p| p.stock <= limit);
    }

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    if products.is_empty() {
        ctx.output.info("No products found.");
        return Ok(());
    }

    ctx.output.header("Products");
    ctx.output
        .table_row(&["UUID", "NAME", "BARCODE", "PRICE", "STOCK"], &TABLE, &[3, 4]);
    ctx.output.table_rule(&TABLE);
    for p in &products {
        let price = money(&p.selling_price);
        let stock = stock_badge(p.stock);
        ctx.output.table_row(
            &[p.uuid.as_str(), &p.name, p.barcode.as_deref().unwrap_or("-"), &price, &stock],
            &TABLE,
            &[3, 4],
        );
    }
    ctx.output.info("");
    ctx.output.info(&format!("Total: {} product(s)", products.len()));
    Ok(())
}

async fn show_product(client: &ApiClient, key: &str, ctx: &Context) -> Result<()> {
    let product = fetch_product(client, key).await?;

    if ctx.output.is_json() {
        ctx.output.json(&product);
        return Ok(());
    }

    ctx.output.header(&product.name);
    ctx.output.kv("uuid", product.uuid.as_str());
    ctx.output.kv("id", &product.id.to_string());
    ctx.output.kv("barcode", product.barcode.as_deref().unwrap_or("-"));
    ctx.output.kv("selling price", &money(&product.selling_price));
    ctx.output.kv("purchase price", &money(&product.purchase_price));
    if let Some(margin) = product.unit_margin() {
        ctx.output.kv("margin", &money(&margin));
    }
    ctx.output.kv("stock", &stock_badge(product.stock));
    Ok(())
}

async fn add_product(
    client: &ApiClient,
    product: &NewProduct,
    image: Option<&str>,
    ctx: &Context,
) -> Result<()> {
    if product.selling_price < 0 || product.purchase_price < 0 || product.stock < 0 {
        bail!("Prices and stock cannot be negative");
    }
    if product.selling_price < product.purchase_price {
        ctx.output.warn(&format!(
            "Selling price {} is below purchase price {}",
            money(&Money::idr(product.selling_price)),
            money(&Money::idr(product.purchase_price))
        ));
    }

    let image = match image {
        Some(path) => Some(ProductImage::from_path(ctx.resolve_path(path)).await?),
        None => None,
    };

    let spinner = ctx.output.spinner("Creating product...");
    let result = client.create_product(product, image).await;
    spinner.finish_and_clear();
    result.context("Failed to create product")?;
    ctx.output.success(&format!("Created {}", product.name));
    Ok(())
}

/// Fetch the listing and pick one product by uuid or barcode.
async fn fetch_product(client: &ApiClient, key: &str) -> Result<Product> {
    let products = client.list_products().await.context("Failed to list products")?;
    match find_product(&products, key) {
        Some(product) => Ok(product.clone()),
        None => bail!("No product with uuid or barcode '{}'", key),
    }
}

/// Match a category by uuid, numeric id or case-insensitive name.
pub fn resolve_category<'a>(categories: &'a [Category], key: &str) -> Result<&'a Category> {
    let by_id = key.parse::<i64>().ok();
    categories
        .iter()
        .find(|c| c.uuid.as_str() == key || Some(c.id) == by_id)
        .or_else(|| categories.iter().find(|c| c.name.eq_ignore_ascii_case(key)))
        .with_context(|| format!("No category matching '{}'", key))
}

pub fn confirm(ctx: &Context, prompt: &str) -> Result<bool> {
    if ctx.output.is_json() {
        bail!("Confirmation required; pass --yes in --json mode");
    }
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}
