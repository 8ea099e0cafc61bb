//! Interactive search: each line typed on stdin is a new search text.
//!
//! Lines restart the debounce timer; only the text that stays put for the
//! quiet period is searched. End of input flushes a pending search.

use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use campus_commerce::search::{Debouncer, ProductQuery, ProductSource};
use campus_commerce::Currency;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use super::{print_products, WatchArgs};
use crate::context::Context;

/// Run the watch command.
pub async fn run(args: WatchArgs, ctx: &Context) -> Result<()> {
    let currency = ctx.currency()?;
    let source = ctx.product_source(args.filter.catalog.as_deref())?;
    let delay = args
        .debounce_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| ctx.config.debounce());

    ctx.output.info(&format!(
        "Type to search ({}ms debounce). Ctrl-D to stop.",
        delay.as_millis()
    ));

    // The initial, unfiltered listing fires right away.
    search(ctx, source.as_ref(), &args.filter.query(None), currency).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut debouncer = Debouncer::new(delay);

    loop {
        let deadline = debouncer.deadline();
        tokio::select! {
            line = lines.next_line() => {
                match line.context("Failed to read stdin")? {
                    Some(text) => {
                        debug!(text = %text, "search input");
                        debouncer.push(args.filter.query(Some(&text)), Instant::now());
                    }
                    None => {
                        if let Some(query) = debouncer.flush() {
                            search(ctx, source.as_ref(), &query, currency).await;
                        }
                        return Ok(());
                    }
                }
            }
            _ = sleep_until(deadline) => {
                if let Some(query) = debouncer.poll(Instant::now()) {
                    search(ctx, source.as_ref(), &query, currency).await;
                }
            }
        }
    }
}

/// Sleep until `deadline`, or forever when nothing is pending.
async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

/// Fetch and print; failures are reported and the loop keeps going.
async fn search(ctx: &Context, source: &dyn ProductSource, query: &ProductQuery, currency: Currency) {
    let label = query.search_text().unwrap_or("everything");
    let spinner = ctx.output.spinner(&format!("Searching {label}..."));
    let result = source.list_products(query).await;
    spinner.finish_and_clear();

    match result {
        Ok(products) => {
            ctx.output.header(&format!("Results for {label}"));
            print_products(ctx, &products, currency);
        }
        Err(e) => ctx.output.error(&format!("Search failed: {e}")),
    }
}
