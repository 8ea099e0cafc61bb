//! CLI command implementations.

pub mod bookings;
pub mod browse;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod login;
pub mod show;
pub mod signup;
pub mod watch;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use campus_commerce::catalog::Product;
use campus_commerce::search::{ProductQuery, SortOption};
use campus_commerce::Currency;
use clap::{Args, Subcommand};
use dialoguer::{Input, Password};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::context::Context;
use crate::output::truncate;

fn parse_sort(value: &str) -> Result<SortOption, String> {
    SortOption::from_str(value)
        .ok_or_else(|| {
            format!("expected listed, newest, price-asc, price-desc or title-asc, got '{value}'")
        })
}

/// Filters shared by `browse` and `watch`.
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Category ("All" for every category).
    #[arg(long)]
    pub category: Option<String>,

    /// Sort order: listed, newest, price-asc, price-desc, title-asc.
    #[arg(short, long, default_value = "listed", value_parser = parse_sort)]
    pub sort: SortOption,

    /// Read listings from a JSON file instead of the backend.
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

impl FilterArgs {
    pub fn query(&self, search: Option<&str>) -> ProductQuery {
        let mut query = ProductQuery::new().with_sort(self.sort);
        if let Some(search) = search {
            query = query.with_search(search);
        }
        if let Some(category) = &self.category {
            query = query.with_category(category);
        }
        query
    }
}

/// Arguments for the browse command.
#[derive(Args, Debug)]
pub struct BrowseArgs {
    /// Free-text search over titles and descriptions.
    #[arg(short = 'q', long)]
    pub search: Option<String>,

    #[command(flatten)]
    pub filter: FilterArgs,
}

/// Arguments for the watch command.
#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Quiet period in milliseconds (defaults to search.debounce_ms).
    #[arg(long)]
    pub debounce_ms: Option<u64>,
}

/// Arguments for the show command.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Product ID.
    pub id: String,

    /// Read listings from a JSON file instead of the backend.
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

/// Arguments for the cart command.
#[derive(Args, Debug)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CartCommand {
    /// List cart contents (default).
    List,
    /// Add one unit of a product.
    Add {
        /// Product ID.
        id: String,
        /// Read listings from a JSON file instead of the backend.
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Remove a product entirely.
    Remove {
        /// Product ID.
        id: String,
    },
    /// Increase a product's quantity by one.
    Inc {
        /// Product ID.
        id: String,
    },
    /// Decrease a product's quantity by one, removing it at zero.
    Dec {
        /// Product ID.
        id: String,
    },
    /// Fold another saved cart file into this one.
    Merge {
        /// Cart file to read.
        file: PathBuf,
    },
    /// Empty the cart.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the checkout command.
#[derive(Args, Debug)]
pub struct CheckoutArgs {
    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the bookings command.
#[derive(Args, Debug)]
pub struct BookingsArgs {
    /// Show only the last N bookings.
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the login command.
#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email (prompted for when omitted).
    #[arg(long)]
    pub email: Option<String>,

    /// Read the password from the first line of stdin.
    #[arg(long)]
    pub password_stdin: bool,

    /// Write the token to the config file instead of printing it.
    #[arg(long)]
    pub save: bool,
}

/// Arguments for the signup command.
#[derive(Args, Debug)]
pub struct SignupArgs {
    /// Full name (prompted for when omitted).
    #[arg(long)]
    pub name: Option<String>,

    /// Account email (prompted for when omitted).
    #[arg(long)]
    pub email: Option<String>,

    /// Read the password from the first line of stdin.
    #[arg(long)]
    pub password_stdin: bool,
}

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a config value.
    Get {
        /// Config key (dot-separated).
        key: String,
    },
    /// Set a config value.
    Set {
        /// Config key (dot-separated).
        key: String,
        /// Value to set.
        value: String,
    },
    /// Initialize a new config file.
    Init {
        /// Backend base URL to write.
        #[arg(long, default_value = "http://localhost:5000")]
        base_url: String,
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}

/// Use `given`, or ask for it on the terminal.
pub(crate) fn value_or_prompt(given: Option<String>, prompt: &str) -> Result<String> {
    match given {
        Some(value) => Ok(value),
        None => Ok(Input::<String>::new().with_prompt(prompt).interact_text()?),
    }
}

/// Read a password from stdin or a hidden prompt.
pub(crate) async fn read_password(from_stdin: bool, confirm: bool) -> Result<String> {
    if from_stdin {
        let mut line = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await
            .context("Failed to read password from stdin")?;
        return Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string());
    }

    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Repeat password", "Passwords do not match");
    }
    Ok(prompt.interact()?)
}

const LISTING_WIDTHS: [usize; 4] = [26, 32, 14, 12];

/// Print listings as a table, or as JSON in `--json` mode.
pub(crate) fn print_products(ctx: &Context, products: &[Product], currency: Currency) {
    if ctx.output.is_json() {
        ctx.output.json(&products);
        return;
    }
    if products.is_empty() {
        ctx.output.info("No products found.");
        return;
    }

    ctx.output
        .table_row(&["ID", "TITLE", "CATEGORY", "PRICE"], &LISTING_WIDTHS);
    for product in products {
        let title = truncate(&product.title, LISTING_WIDTHS[1]);
        let price = product.price.display(currency);
        ctx.output.table_row(
            &[product.id.as_str(), &title, &product.category, &price],
            &LISTING_WIDTHS,
        );
    }
    ctx.output.info(&format!("{} listing(s)", products.len()));
}
