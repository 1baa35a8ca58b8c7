//! Kasir CLI - point of sale terminal for the kasir backend.
//!
//! Commands:
//! - `kasir login` / `logout` / `whoami` - Manage the session
//! - `kasir products` / `categories` - Manage the catalog
//! - `kasir sell` - Ring up a sale
//! - `kasir restock` - Record incoming stock
//! - `kasir invoice` - Show or print a receipt
//! - `kasir report` - Sales and purchase reports
//! - `kasir config` - Manage configuration

mod commands;
mod config;
mod context;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    CategoriesArgs, ConfigArgs, InvoiceArgs, LoginArgs, PasswordArgs, ProductsArgs, RegisterArgs,
    ReportArgs, RestockArgs, SellArgs, WhoamiArgs,
};

/// Kasir CLI - Sell, restock and report from the terminal
#[derive(Parser)]
#[command(name = "kasir")]
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
    /// Log in and store the session
    Login(LoginArgs),

    /// End the current session
    Logout,

    /// Show the logged in user
    Whoami(WhoamiArgs),

    /// Create a new account
    Register(RegisterArgs),

    /// Reset a forgotten password
    Password(PasswordArgs),

    /// Manage products
    Products(ProductsArgs),

    /// Manage categories
    Categories(CategoriesArgs),

    /// Ring up a sale
    Sell(SellArgs),

    /// Record incoming stock
    Restock(RestockArgs),

    /// Show or print a transaction receipt
    Invoice(InvoiceArgs),

    /// Sales and purchase reports
    Report(ReportArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose);

    let output = output::Output::new(cli.verbose, cli.json);
    let ctx = context::Context::load(cli.config.as_deref(), output)?;

    let result = match cli.command {
        Commands::Login(args) => commands::auth::login(args, &ctx).await,
        Commands::Logout => commands::auth::logout(&ctx).await,
        Commands::Whoami(args) => commands::auth::whoami(args, &ctx).await,
        Commands::Register(args) => commands::auth::register(args, &ctx).await,
        Commands::Password(args) => commands::auth::password(args, &ctx).await,
        Commands::Products(args) => commands::products::run(args, &ctx).await,
        Commands::Categories(args) => commands::categories::run(args, &ctx).await,
        Commands::Sell(args) => commands::sell::run(args, &ctx).await,
        Commands::Restock(args) => commands::restock::run(args, &ctx).await,
        Commands::Invoice(args) => commands::invoice::run(args, &ctx).await,
        Commands::Report(args) => commands::report::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        if ctx.forget_rejected_session(&e) {
            ctx.output.warn("Session expired; run `kasir login` again");
        }
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
