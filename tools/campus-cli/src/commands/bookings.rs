//! List the signed-in user's bookings.

use anyhow::{bail, Result};
use campus_commerce::checkout::BookingGateway;

use super::BookingsArgs;
use crate::context::Context;
use crate::output::status_badge;

/// Run the bookings command.
pub async fn run(args: BookingsArgs, ctx: &Context) -> Result<()> {
    let currency = ctx.currency()?;
    let Some(token) = ctx.token() else {
        bail!("You must be logged in to view your bookings. Set api.token or CAMPUS_TOKEN.");
    };
    let api = ctx.api()?;

    let spinner = ctx.output.spinner("Fetching bookings...");
    let bookings = api.my_bookings(&token).await;
    spinner.finish_and_clear();
    let mut bookings = bookings?;

    // Newest first; undated bookings last.
    bookings.sort_by(|a, b| b.booked_at.cmp(&a.booked_at));
    if let Some(limit) = args.limit {
        bookings.truncate(limit);
    }

    if ctx.output.is_json() {
        ctx.output.json(&bookings);
        return Ok(());
    }

    ctx.output.header("My Bookings");
    if bookings.is_empty() {
        ctx.output.info("You have no bookings yet.");
        return Ok(());
    }

    for booking in &bookings {
        ctx.output.info("");
        ctx.output.kv("Booking ID", booking.id.as_str());
        if let Some(date) = booking.booked_at {
            ctx.output.kv("Date", &date.format("%d %b %Y").to_string());
        }
        ctx.output.kv("Status", &status_badge(&booking.status));
        for line in &booking.lines {
            let title = if line.title.is_empty() {
                line.product_id.as_str()
            } else {
                &line.title
            };
            ctx.output.list_item(&format!(
                "{title} x{} @ {}",
                line.quantity,
                line.price.display(currency)
            ));
        }
        ctx.output.kv("Total", &booking.total_price.display(currency));
    }

    Ok(())
}
