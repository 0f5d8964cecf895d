use anyhow::Result;
use ecovolt_lib::types::{Brand, Category, Product};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

#[derive(Tabled, Serialize)]
struct ProductRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Brand")]
    #[serde(rename = "Brand")]
    brand: String,
    #[tabled(rename = "Price")]
    #[serde(rename = "Price")]
    price: String,
    #[tabled(rename = "Image")]
    #[serde(rename = "Image")]
    image: String,
}

#[derive(Tabled, Serialize)]
struct CategoryRow {
    #[tabled(rename = "Key")]
    #[serde(rename = "Key")]
    key: String,
    #[tabled(rename = "Title")]
    #[serde(rename = "Title")]
    title: String,
    #[tabled(rename = "Brands")]
    #[serde(rename = "Brands")]
    brands: String,
}

#[derive(Serialize)]
struct CategoryEntry {
    key: &'static str,
    title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    brands: Option<&'static [Brand]>,
}

// -- Row builders --

fn build_product_rows(products: &[Product]) -> Vec<ProductRow> {
    products
        .iter()
        .map(|p| ProductRow {
            id: p.id().unwrap_or_default(),
            name: p.name().unwrap_or("(unnamed)").to_string(),
            brand: p.brand().unwrap_or_default().to_string(),
            price: p.price().map(format_price).unwrap_or_default(),
            image: p.image_url().unwrap_or_default().to_string(),
        })
        .collect()
}

fn build_category_rows(categories: &[Category], with_brands: bool) -> Vec<CategoryRow> {
    categories
        .iter()
        .map(|c| CategoryRow {
            key: c.key().to_string(),
            title: c.title().to_string(),
            brands: if with_brands {
                c.brands()
                    .iter()
                    .map(|b| b.slug)
                    .collect::<Vec<_>>()
                    .join(", ")
            } else {
                c.brands().len().to_string()
            },
        })
        .collect()
}

// -- Printers --

pub fn print_products(products: &[Product], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&products),
        _ => print_rows(build_product_rows(products), format)?,
    }
    Ok(())
}

pub fn print_categories(
    categories: &[Category],
    with_brands: bool,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let entries: Vec<CategoryEntry> = categories
                .iter()
                .map(|c| CategoryEntry {
                    key: c.key(),
                    title: c.title(),
                    brands: with_brands.then(|| c.brands()),
                })
                .collect();
            print_json(&entries);
        }
        _ => print_rows(build_category_rows(categories, with_brands), format)?,
    }
    Ok(())
}

fn print_rows<T: Tabled + Serialize>(rows: Vec<T>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        OutputFormat::Markdown => {
            let mut table = Table::new(rows);
            table.with(Style::markdown());
            println!("{}", table);
        }
        OutputFormat::Table | OutputFormat::Json => println!("{}", Table::new(rows)),
    }
    Ok(())
}

pub fn print_json<T: Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

/// Formats a price in hryvnias grouped by spaces, e.g. `41 250 ₴`.
fn format_price(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let whole = rounded.trunc() as i64;
    let digits = whole.abs().to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    if whole < 0 {
        grouped.insert(0, '-');
    }
    let cents = ((rounded - rounded.trunc()).abs() * 100.0).round() as i64;
    if cents == 0 {
        format!("{} ₴", grouped)
    } else {
        format!("{}.{:02} ₴", grouped, cents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_products_fixture() -> Vec<Product> {
        let json_str = include_str!("../../ecovolt_api/tests/fixtures/products.json");
        let resp: serde_json::Value = serde_json::from_str(json_str).unwrap();
        serde_json::from_value(resp["products"].clone()).unwrap()
    }

    // -- format_price tests --

    #[test]
    fn test_format_price_grouping() {
        assert_eq!(format_price(41250.0), "41 250 ₴");
        assert_eq!(format_price(1_234_567.0), "1 234 567 ₴");
    }

    #[test]
    fn test_format_price_small_and_fractional() {
        assert_eq!(format_price(950.0), "950 ₴");
        assert_eq!(format_price(36700.5), "36 700.50 ₴");
        assert_eq!(format_price(0.0), "0 ₴");
    }

    // -- Row builder tests --

    #[test]
    fn test_build_product_rows_mapping() {
        let products = load_products_fixture();
        let rows = build_product_rows(&products);
        assert_eq!(rows.len(), 3);

        let row = &rows[0];
        assert_eq!(row.id, "66a1f0c2e4b0a1a2b3c4d501");
        assert_eq!(row.name, "Deye SUN-6K-SG03LP1-EU");
        assert_eq!(row.brand, "Deye");
        assert_eq!(row.price, "41 250 ₴");
        assert_eq!(row.image, "https://cdn.ecovolt.example/inverters/deye-6k.webp");

        // String price with spaces and the imageUrl alias.
        assert_eq!(rows[1].price, "38 900 ₴");
        assert_eq!(rows[2].image, "https://cdn.ecovolt.example/inverters/sofar-6000.webp");
    }

    #[test]
    fn test_build_product_rows_sparse_record() {
        let products: Vec<Product> = serde_json::from_value(serde_json::json!([{}])).unwrap();
        let rows = build_product_rows(&products);
        assert_eq!(rows[0].name, "(unnamed)");
        assert_eq!(rows[0].price, "");
        assert_eq!(rows[0].brand, "");
    }

    #[test]
    fn test_build_category_rows() {
        let rows = build_category_rows(&Category::ALL, false);
        assert_eq!(rows.len(), 14);
        assert_eq!(rows[0].key, "solar-panels");
        assert_eq!(rows[0].brands, "18");

        let rows = build_category_rows(&[Category::Inverters], true);
        assert!(rows[0].brands.contains("deye"));
        let rows = build_category_rows(&[Category::Boilers], true);
        assert_eq!(rows[0].brands, "");
    }

    // -- CSV output tests --

    fn csv_from_rows<T: Serialize>(rows: &[T]) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for row in rows {
            wtr.serialize(row).unwrap();
        }
        wtr.flush().unwrap();
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_csv_products_headers() {
        let rows = build_product_rows(&load_products_fixture());
        let csv = csv_from_rows(&rows);
        let header = csv.lines().next().unwrap();
        assert_eq!(header, "ID,Name,Brand,Price,Image");
    }

    #[test]
    fn test_csv_categories_headers() {
        let rows = build_category_rows(&Category::ALL, false);
        let csv = csv_from_rows(&rows);
        assert_eq!(csv.lines().next().unwrap(), "Key,Title,Brands");
        assert_eq!(csv.lines().count(), 15);
    }
}
