use anyhow::{bail, Result};
use clap::Args;
use ecovolt_lib::Catalog;

use crate::output::{print_json, print_products, OutputFormat};

#[derive(Args)]
pub struct ProductArgs {
    /// Product identifier
    #[arg(long)]
    pub id: String,
}

pub async fn run(args: &ProductArgs, catalog: &Catalog, format: OutputFormat) -> Result<()> {
    let Some(product) = catalog.get_product_by_id(&args.id).await? else {
        bail!("product lookup for {} was cancelled", args.id);
    };

    match format {
        OutputFormat::Json => print_json(&product),
        _ => print_products(std::slice::from_ref(&product), format)?,
    }

    Ok(())
}
