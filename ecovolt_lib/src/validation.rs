use ecovolt_api::types::Category;
use ecovolt_api::{ProductSortBy, SortOrder};

use crate::error::CatalogError;

pub const MAX_SEARCH_LENGTH: usize = 100;
pub const MAX_SUBCATEGORY_LENGTH: usize = 64;
pub const MAX_PRODUCT_ID_LENGTH: usize = 64;
/// Largest page size the backend accepts.
pub const MAX_LIMIT: u32 = 50;

/// Turn ASCII whitespace controls (tab, newline, carriage return, form feed)
/// into spaces, strip the remaining control characters, trim, and enforce a
/// byte-length limit. An empty result is allowed.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, CatalogError> {
    if input.len() > max_len {
        return Err(CatalogError::InvalidInput(format!(
            "input exceeds maximum length of {} bytes",
            max_len
        )));
    }
    Ok(input
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_whitespace() => Some(' '),
            c if c.is_ascii_control() => None,
            c => Some(c),
        })
        .collect::<String>()
        .trim()
        .to_string())
}

/// Validate a search term. An empty term is valid and means "no search".
pub fn validate_search(input: &str) -> Result<String, CatalogError> {
    sanitize_text(input, MAX_SEARCH_LENGTH)
}

/// Validate a category key against the fixed catalog.
pub fn validate_category(input: &str) -> Result<Category, CatalogError> {
    let key = input.trim().to_lowercase();
    key.parse::<Category>().map_err(|_| {
        let valid = Category::ALL
            .iter()
            .map(|c| c.key())
            .collect::<Vec<_>>()
            .join(", ");
        tracing::warn!("Rejected category '{}' (valid: {})", input, valid);
        CatalogError::UnknownCategory(input.to_string())
    })
}

/// Validate a brand slug: lowercase ASCII letters, digits and dashes.
pub fn validate_subcategory(input: &str) -> Result<String, CatalogError> {
    let slug = input.trim().trim_matches('/').to_lowercase();
    if slug.is_empty() || slug.len() > MAX_SUBCATEGORY_LENGTH {
        return Err(CatalogError::InvalidInput(format!(
            "subcategory must be 1-{} characters",
            MAX_SUBCATEGORY_LENGTH
        )));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(CatalogError::InvalidInput(format!(
            "invalid subcategory '{}'. Use a brand slug such as 'trina-solar'",
            input
        )));
    }
    Ok(slug)
}

/// Validate a page size: 1..=50.
pub fn validate_limit(limit: u32) -> Result<u32, CatalogError> {
    if limit == 0 || limit > MAX_LIMIT {
        return Err(CatalogError::InvalidInput(format!(
            "limit must be between 1 and {}, got {}",
            MAX_LIMIT, limit
        )));
    }
    Ok(limit)
}

/// Validate a page number: 1-indexed.
pub fn validate_page(page: u32) -> Result<u32, CatalogError> {
    if page == 0 {
        return Err(CatalogError::InvalidInput(
            "page numbers start at 1".to_string(),
        ));
    }
    Ok(page)
}

/// Validate a product identifier before it becomes a path segment.
pub fn validate_product_id(input: &str) -> Result<String, CatalogError> {
    let id = input.trim();
    if id.is_empty() || id.len() > MAX_PRODUCT_ID_LENGTH {
        return Err(CatalogError::InvalidInput(format!(
            "product id must be 1-{} characters",
            MAX_PRODUCT_ID_LENGTH
        )));
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(CatalogError::InvalidInput(format!(
            "invalid product id '{}'",
            input
        )));
    }
    Ok(id.to_string())
}

/// Validate a sort field, accepting the CLI spelling `created-at` as well as the wire name.
pub fn validate_sort_by(input: &str) -> Result<ProductSortBy, CatalogError> {
    match input.trim().to_lowercase().as_str() {
        "name" => Ok(ProductSortBy::Name),
        "price" => Ok(ProductSortBy::Price),
        "created-at" | "createdat" | "newest" => Ok(ProductSortBy::CreatedAt),
        _ => Err(CatalogError::InvalidInput(format!(
            "unknown sort field '{}'. Valid: name, price, created-at",
            input
        ))),
    }
}

/// Validate a sort order: asc or desc.
pub fn validate_sort_order(input: &str) -> Result<SortOrder, CatalogError> {
    input.trim().to_lowercase().parse().map_err(|_| {
        CatalogError::InvalidInput(format!(
            "unknown sort order '{}'. Valid: asc, desc",
            input
        ))
    })
}
