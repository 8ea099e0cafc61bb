//! Create a marketplace account.

use anyhow::Result;
use campus_commerce::account::{AccountGateway, NewAccount};

use super::{read_password, value_or_prompt, SignupArgs};
use crate::context::Context;

const SIGNED_UP: &str = "Sign-up successful! You can now log in.";

/// Run the signup command.
pub async fn run(args: SignupArgs, ctx: &Context) -> Result<()> {
    let name = value_or_prompt(args.name, "Full name")?;
    let email = value_or_prompt(args.email, "Email")?;
    let password = read_password(args.password_stdin, true).await?;
    let account = NewAccount::new(name, email, password);

    let api = ctx.api()?;
    let spinner = ctx.output.spinner("Creating account...");
    let message = api.signup(&account).await;
    spinner.finish_and_clear();
    let message = message?;

    if let Some(message) = &message {
        ctx.output.debug(&format!("Backend said: {message}"));
    }

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "name": account.name,
            "email": account.credentials.email,
            "message": message,
        }));
        return Ok(());
    }

    ctx.output.success(SIGNED_UP);
    ctx.output.info(&format!(
        "Next: campus login --email {}",
        account.credentials.email
    ));

    Ok(())
}
