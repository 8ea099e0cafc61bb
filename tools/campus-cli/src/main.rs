//! Campus CLI - a terminal storefront for the campus marketplace.
//!
//! Commands:
//! - `campus browse` - List and filter products
//! - `campus watch` - Search as you type, debounced
//! - `campus show` - Product detail
//! - `campus cart` - Manage the saved cart
//! - `campus checkout` - Book everything in the cart
//! - `campus bookings` - List your bookings
//! - `campus login` - Sign in and get a token
//! - `campus signup` - Create an account
//! - `campus config` - Manage configuration

mod commands;
mod config;
mod context;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    BookingsArgs, BrowseArgs, CartArgs, CheckoutArgs, ConfigArgs, LoginArgs, ShowArgs,
    SignupArgs, WatchArgs,
};

/// Campus CLI - browse, cart and book marketplace listings
#[derive(Parser)]
#[command(name = "campus")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products, optionally filtered
    Browse(BrowseArgs),

    /// Search interactively, one line of input per search
    Watch(WatchArgs),

    /// Show a single product
    Show(ShowArgs),

    /// Manage the cart
    Cart(CartArgs),

    /// Book everything in the cart
    Checkout(CheckoutArgs),

    /// List your bookings
    Bookings(BookingsArgs),

    /// Sign in and get a bearer token
    Login(LoginArgs),

    /// Create an account
    Signup(SignupArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);

    let ctx = match context::Context::load(cli.config.as_deref(), output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    logging::init(&ctx.config.logging, cli.verbose)?;

    let result = match cli.command {
        Commands::Browse(args) => commands::browse::run(args, &ctx).await,
        Commands::Watch(args) => commands::watch::run(args, &ctx).await,
        Commands::Show(args) => commands::show::run(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Bookings(args) => commands::bookings::run(args, &ctx).await,
        Commands::Login(args) => commands::login::run(args, &ctx).await,
        Commands::Signup(args) => commands::signup::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
