//! Submit the cart as a booking.

use anyhow::{bail, Context as _, Result};
use campus_commerce::CommerceError;
use dialoguer::Confirm;

use super::cart::print_cart;
use super::CheckoutArgs;
use crate::context::Context;

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let currency = ctx.currency()?;
    let mut cart = ctx.open_cart()?;

    if cart.store().is_empty() {
        ctx.output.info("Your cart is empty. Add something with `campus cart add <id>`.");
        return Ok(());
    }

    print_cart(ctx, &cart, currency);

    if !args.yes && !ctx.output.is_json() {
        ctx.output.info("");
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Place booking for {}?",
                cart.store().total_price().display(currency)
            ))
            .default(true)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Checkout cancelled");
            return Ok(());
        }
    }

    let api = ctx.api()?;
    let token = ctx.token();

    let spinner = ctx.output.spinner("Placing booking...");
    let result = cart.place_booking(&api, token.as_ref()).await;
    spinner.finish_and_clear();

    match result {
        Ok(confirmation) => {
            if ctx.output.is_json() {
                ctx.output.json(&confirmation);
            } else if let Some(id) = &confirmation.booking_id {
                ctx.output.kv("Booking ID", id.as_str());
            }
            Ok(())
        }
        Err(CommerceError::NotAuthenticated) => {
            bail!("No token configured. Set api.token in campus.toml or CAMPUS_TOKEN.")
        }
        Err(e @ CommerceError::Storage(_)) => {
            Err(e).context("Booking placed, but the emptied cart could not be saved")
        }
        Err(_) => bail!("Checkout failed; your cart was kept for retry"),
    }
}
