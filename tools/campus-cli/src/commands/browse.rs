//! List products.

use anyhow::Result;

use super::{print_products, BrowseArgs};
use crate::context::Context;

/// Run the browse command.
pub async fn run(args: BrowseArgs, ctx: &Context) -> Result<()> {
    let currency = ctx.currency()?;
    let source = ctx.product_source(args.filter.catalog.as_deref())?;
    let query = args.filter.query(args.search.as_deref());

    ctx.output.header("Listings");
    if let Some(text) = query.search_text() {
        ctx.output.kv("Search", text);
    }
    ctx.output
        .kv("Category", query.category.as_deref().unwrap_or("All"));
    ctx.output.kv("Sort", query.sort.display_name());

    let spinner = ctx.output.spinner("Fetching listings...");
    let products = source.list_products(&query).await;
    spinner.finish_and_clear();

    print_products(ctx, &products?, currency);
    Ok(())
}
