mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ecovolt_lib::{Catalog, CatalogConfig};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "ecovolt")]
#[command(about = "Browse the EcoVolt solar equipment catalog")]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products, optionally filtered, searched and sorted
    Products(commands::products::ProductsArgs),
    /// Look up a single product
    Product(commands::product::ProductArgs),
    /// List catalog categories and their brands
    Categories(commands::categories::CategoriesArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ecovolt=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Products(args) => {
            let catalog = Catalog::new(CatalogConfig::from_env());
            commands::products::run(args, &catalog, cli.output).await?
        }
        Commands::Product(args) => {
            let catalog = Catalog::new(CatalogConfig::from_env());
            commands::product::run(args, &catalog, cli.output).await?
        }
        Commands::Categories(args) => commands::categories::run(args, cli.output)?,
    }

    Ok(())
}
