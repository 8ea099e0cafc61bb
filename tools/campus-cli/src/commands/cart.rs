//! Cart management commands.

use anyhow::{Context as _, Result};
use campus_commerce::notify::NullSink;
use campus_commerce::persist::{JsonFileBackend, PersistentCart};
use campus_commerce::{Currency, ProductId};
use dialoguer::Confirm;

use super::{CartArgs, CartCommand};
use crate::context::{Cart, Context};

const CART_WIDTHS: [usize; 5] = [26, 32, 12, 5, 12];

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let mut cart = ctx.open_cart()?;
    let currency = ctx.currency()?;

    match args.command.unwrap_or(CartCommand::List) {
        CartCommand::List => {}
        CartCommand::Add { id, catalog } => {
            let source = ctx.product_source(catalog.as_deref())?;
            let spinner = ctx.output.spinner("Loading product...");
            let product = source.get_product(&ProductId::new(id)).await;
            spinner.finish_and_clear();
            cart.add_to_cart(&product?)?;
        }
        CartCommand::Remove { id } => {
            if !cart.remove_from_cart(&ProductId::new(id.as_str()))? {
                ctx.output.warn(&format!("{id} is not in the cart"));
            }
        }
        CartCommand::Inc { id } => {
            if cart.increase_quantity(&ProductId::new(id.as_str()))?.is_none() {
                ctx.output.warn(&format!("{id} is not in the cart"));
            }
        }
        CartCommand::Dec { id } => match cart.decrease_quantity(&ProductId::new(id.as_str()))? {
            Some(0) => ctx.output.info(&format!("{id} removed from cart")),
            Some(_) => {}
            None => ctx.output.warn(&format!("{id} is not in the cart")),
        },
        CartCommand::Merge { file } => {
            let (other, _) = PersistentCart::open(NullSink, JsonFileBackend::new(&file))
                .with_context(|| format!("Failed to read cart: {}", file.display()))?
                .into_parts();
            if other.is_empty() {
                ctx.output.info(&format!("Nothing to merge from {}", file.display()));
            } else {
                let items = other.item_count();
                cart.merge(other)?;
                ctx.output
                    .success(&format!("Merged {items} item(s) from {}", file.display()));
            }
        }
        CartCommand::Clear { yes } => {
            if cart.store().is_empty() {
                ctx.output.info("Cart is already empty");
                return Ok(());
            }
            if !yes && !ctx.output.is_json() {
                let confirmed = Confirm::new()
                    .with_prompt("Remove everything from the cart?")
                    .default(false)
                    .interact()?;
                if !confirmed {
                    ctx.output.warn("Cart left unchanged");
                    return Ok(());
                }
            }
            cart.clear()?;
            ctx.output.success("Cart cleared");
        }
    }

    print_cart(ctx, &cart, currency);
    Ok(())
}

/// Print cart lines with subtotals, count and total.
pub(crate) fn print_cart(ctx: &Context, cart: &Cart, currency: Currency) {
    let summary = cart.store().summary();

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "lines": summary.lines.iter().map(|line| serde_json::json!({
                "productId": line.product_id,
                "title": line.title,
                "unitPrice": line.unit_price.to_decimal(currency),
                "quantity": line.quantity,
                "subtotal": line.subtotal.to_decimal(currency),
            })).collect::<Vec<_>>(),
            "itemCount": summary.item_count,
            "total": summary.total.to_decimal(currency),
            "currency": currency.code(),
        }));
        return;
    }

    let badge = summary.badge();
    if badge.is_empty() {
        ctx.output.header("Cart");
    } else {
        ctx.output.header(&format!("Cart ({badge})"));
    }
    if summary.is_empty() {
        ctx.output.info("Your cart is empty.");
        return;
    }

    ctx.output
        .table_row(&["ID", "TITLE", "PRICE", "QTY", "SUBTOTAL"], &CART_WIDTHS);
    for line in &summary.lines {
        let unit = line.unit_price.display(currency);
        let quantity = line.quantity.to_string();
        let subtotal = line.subtotal.display(currency);
        ctx.output.table_row(
            &[line.product_id.as_str(), &line.title, &unit, &quantity, &subtotal],
            &CART_WIDTHS,
        );
    }
    ctx.output.info("");
    ctx.output.kv("Items", &summary.item_count.to_string());
    ctx.output.kv("Total", &summary.total_display(currency));
}
