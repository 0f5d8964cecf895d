use anyhow::Result;
use clap::Args;
use ecovolt_lib::validation;
use ecovolt_lib::{Catalog, FetchOutcome, LoadOptions, SortOrder};

use crate::output::{print_products, OutputFormat};

#[derive(Args)]
pub struct ProductsArgs {
    /// Category key (e.g. solar-panels, inverters). See `ecovolt categories`
    #[arg(long)]
    pub category: Option<String>,

    /// Brand slug within the category (e.g. deye, trina-solar)
    #[arg(long, requires = "category")]
    pub subcategory: Option<String>,

    /// Search term, scoped to the category when one is given
    #[arg(long)]
    pub search: Option<String>,

    /// Sort field: name, price, created-at
    #[arg(long, default_value = "name")]
    pub sort_by: String,

    /// Sort descending instead of ascending
    #[arg(long)]
    pub desc: bool,

    /// Page to start from
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Results per page (1-50)
    #[arg(long)]
    pub limit: Option<u32>,

    /// Keep loading more until this many pages are shown
    #[arg(long, default_value = "1")]
    pub pages: u32,
}

pub async fn run(args: &ProductsArgs, catalog: &Catalog, format: OutputFormat) -> Result<()> {
    let sort_by = validation::validate_sort_by(&args.sort_by)?;
    let sort_order = if args.desc {
        SortOrder::Desc
    } else {
        SortOrder::Asc
    };

    // Sort and search ride along with the first load: one request per view.
    let mut options = LoadOptions::page(args.page).with_sort(sort_by, sort_order);
    if let Some(limit) = args.limit {
        options = options.with_limit(validation::validate_limit(limit)?);
    }
    if let Some(ref term) = args.search {
        options = options.with_search(term);
    }

    match args.category.as_deref() {
        Some(key) => {
            let category = validation::validate_category(key)?;
            if let Some(ref sub) = args.subcategory {
                options = options.with_subcategory(sub);
            }
            catalog.load_products_by_category(category, options).await?;
        }
        None => {
            catalog.load_all_products(options).await?;
        }
    }

    let first_page = catalog.current_page();
    while catalog.current_page() - first_page + 1 < args.pages {
        match catalog.load_more().await? {
            FetchOutcome::Skipped | FetchOutcome::Superseded => break,
            FetchOutcome::Fetched(_) | FetchOutcome::Cached(_) => {}
        }
    }

    if let Some(showing) = catalog.showing_text() {
        eprintln!(
            "Showing {} (page {}/{})",
            showing,
            catalog.current_page(),
            catalog.total_pages()
        );
    }

    print_products(&catalog.products(), format)
}
