use anyhow::Result;
use clap::Args;
use ecovolt_lib::types::Category;
use ecovolt_lib::validation;

use crate::output::{print_categories, OutputFormat};

#[derive(Args)]
pub struct CategoriesArgs {
    /// List brand slugs instead of brand counts
    #[arg(long)]
    pub brands: bool,

    /// Show a single category
    #[arg(long)]
    pub category: Option<String>,
}

pub fn run(args: &CategoriesArgs, format: OutputFormat) -> Result<()> {
    let categories = match args.category.as_deref() {
        Some(key) => vec![validation::validate_category(key)?],
        None => Category::ALL.to_vec(),
    };
    print_categories(&categories, args.brands, format)
}
