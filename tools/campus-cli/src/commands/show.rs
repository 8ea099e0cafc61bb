//! Product detail.

use anyhow::Result;
use campus_commerce::account::{AccountGateway, UserProfile};
use campus_commerce::catalog::Product;
use campus_commerce::ProductId;

use super::ShowArgs;
use crate::context::Context;

/// Run the show command.
pub async fn run(args: ShowArgs, ctx: &Context) -> Result<()> {
    let currency = ctx.currency()?;
    let source = ctx.product_source(args.catalog.as_deref())?;

    let spinner = ctx.output.spinner("Loading product...");
    let product = source.get_product(&ProductId::new(args.id)).await;
    spinner.finish_and_clear();
    let product = product?;

    let seller = match args.catalog {
        Some(_) => None,
        None => lookup_seller(&product, ctx).await,
    };

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "product": product,
            "seller": seller,
        }));
        return Ok(());
    }

    ctx.output.header(&product.title);
    ctx.output.kv("ID", product.id.as_str());
    ctx.output.kv("Price", &product.price.display(currency));
    if !product.category.is_empty() {
        ctx.output.kv("Category", &product.category);
    }
    match (&seller, &product.seller_id) {
        (Some(profile), _) => ctx.output.kv("Seller", &profile.contact_line()),
        (None, Some(id)) => ctx.output.kv("Seller", id.as_str()),
        (None, None) => {}
    }
    if let Some(listed_at) = product.listed_at {
        ctx.output
            .kv("Posted on", &listed_at.format("%d %b %Y").to_string());
    }
    if !product.description.is_empty() {
        ctx.output.info("");
        ctx.output.info(&product.description);
    }
    if !product.images.is_empty() {
        ctx.output.info("");
        ctx.output.info("Images:");
        for url in &product.images {
            ctx.output.list_item(url);
        }
    }

    let in_cart = ctx
        .open_cart()?
        .store()
        .line(&product.id)
        .map(|line| line.quantity());
    if let Some(quantity) = in_cart {
        ctx.output.info("");
        ctx.output.info(&format!("{quantity} in your cart"));
    }

    Ok(())
}

/// Fetch the seller's profile. A failed lookup leaves the bare id on screen.
async fn lookup_seller(product: &Product, ctx: &Context) -> Option<UserProfile> {
    let seller_id = product.seller_id.as_ref()?;
    let api = match ctx.api() {
        Ok(api) => api,
        Err(e) => {
            ctx.output.debug(&format!("No backend for seller lookup: {e:#}"));
            return None;
        }
    };

    match api.user_profile(seller_id).await {
        Ok(profile) => Some(profile),
        Err(e) => {
            ctx.output.warn(&e.to_string());
            None
        }
    }
}
