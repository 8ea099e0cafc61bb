//! Sign in and obtain a bearer token.

use std::path::PathBuf;

use anyhow::Result;
use campus_commerce::account::{AccountGateway, Credentials};
use campus_commerce::checkout::AuthToken;

use super::{read_password, value_or_prompt, LoginArgs};
use crate::config::CampusConfig;
use crate::context::Context;

/// Run the login command.
pub async fn run(args: LoginArgs, ctx: &Context) -> Result<()> {
    let email = value_or_prompt(args.email, "Email")?;
    let password = read_password(args.password_stdin, false).await?;
    let credentials = Credentials::new(email, password);

    let api = ctx.api()?;
    let spinner = ctx.output.spinner("Signing in...");
    let session = api.login(&credentials).await;
    spinner.finish_and_clear();
    let session = session?;

    if args.save {
        let path = save_token(ctx, &session.token)?;
        if ctx.output.is_json() {
            ctx.output.json(&serde_json::json!({
                "user": session.user,
                "saved_to": path.display().to_string(),
            }));
        } else {
            ctx.output
                .success(&format!("Signed in as {}", session.user.contact_line()));
            ctx.output
                .info(&format!("Token saved to {}", path.display()));
        }
        return Ok(());
    }

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "user": session.user,
            "token": session.token.expose(),
        }));
        return Ok(());
    }

    ctx.output
        .success(&format!("Signed in as {}", session.user.contact_line()));
    ctx.output.kv("Token", session.token.expose());
    ctx.output
        .info("Run with --save to store it, or export it as CAMPUS_TOKEN.");

    Ok(())
}

/// Store `token` as `api.token`, creating the config file when there is none.
fn save_token(ctx: &Context, token: &AuthToken) -> Result<PathBuf> {
    let path = ctx
        .config_path
        .clone()
        .unwrap_or_else(|| ctx.default_config_path());

    // Edit the file as stored, without environment overrides.
    let mut config = if path.exists() {
        CampusConfig::load(&path)?
    } else {
        let mut fresh = CampusConfig::default();
        fresh.api.base_url = ctx.config.api.base_url.clone();
        fresh
    };
    config.api.token = Some(token.expose().to_string());
    config.save(&path)?;

    ctx.output
        .debug(&format!("Wrote api.token to {}", path.display()));
    Ok(path)
}
