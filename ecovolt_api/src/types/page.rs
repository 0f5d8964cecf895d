//! Paginated list envelopes and their normalized form.
//!
//! The backend has shipped several spellings of its pagination block over
//! time (`hasMore` vs `has_more`, `page` vs `currentPage`). Everything is
//! funneled through [`ProductListEnvelope::into_page`] so the rest of the
//! workspace only ever sees one [`ProductPage`] shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::Product;
use crate::Error;

/// Fallback message when the backend reports failure without saying why.
pub const GENERIC_SERVER_ERROR: &str = "Server error. Please try again later.";

/// Pagination metadata for one page of results.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    /// Whether a further page exists. This alone decides if "load more" is offered.
    pub has_more: bool,
    /// Human-readable range such as `"9-16 of 40"`.
    pub showing: String,
}

/// One page of products in canonical form.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub pagination: PageInfo,
    /// The backend answered from its own cache. Informational only.
    #[serde(default)]
    pub from_cache: bool,
}

/// Pagination block exactly as the backend may send it.
///
/// Older deployments use snake_case and some send both spellings at once,
/// so every spelling gets its own field. The accessors prefer camelCase.
#[derive(Deserialize, Default, Debug)]
pub struct RawPagination {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default, rename = "currentPage")]
    pub current_page_camel: Option<u32>,
    #[serde(default, rename = "current_page")]
    pub current_page_snake: Option<u32>,
    #[serde(default, rename = "totalPages")]
    pub total_pages_camel: Option<u32>,
    #[serde(default, rename = "total_pages")]
    pub total_pages_snake: Option<u32>,
    #[serde(default, rename = "totalItems")]
    pub total_items_camel: Option<u64>,
    #[serde(default, rename = "total_items")]
    pub total_items_snake: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default, rename = "hasMore")]
    pub has_more_camel: Option<bool>,
    #[serde(default, rename = "has_more")]
    pub has_more_snake: Option<bool>,
    #[serde(default)]
    pub showing: Option<String>,
}

impl RawPagination {
    pub fn page(&self) -> Option<u32> {
        self.page
            .or(self.current_page_camel)
            .or(self.current_page_snake)
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages_camel.or(self.total_pages_snake)
    }

    pub fn total_items(&self) -> Option<u64> {
        self.total_items_camel
            .or(self.total_items_snake)
            .or(self.total)
    }

    pub fn has_more(&self) -> Option<bool> {
        self.has_more_camel.or(self.has_more_snake)
    }
}

/// Body of `GET /api/products[/category/...]`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProductListEnvelope {
    #[serde(default)]
    pub success: Option<Value>,
    #[serde(default)]
    pub products: Option<Value>,
    #[serde(default)]
    pub pagination: Option<RawPagination>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub from_cache: Option<bool>,
}

/// Body of `GET /api/products/{id}`.
#[derive(Deserialize, Debug)]
pub struct ProductEnvelope {
    #[serde(default)]
    pub success: Option<Value>,
    #[serde(default)]
    pub product: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of an error response, when the backend bothered to send JSON.
#[derive(Deserialize, Debug)]
pub struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ProductListEnvelope {
    /// Validates the envelope and converts it to a [`ProductPage`].
    ///
    /// `requested_page` and `limit` fill in whatever the pagination block leaves out.
    pub fn into_page(self, requested_page: u32, limit: u32) -> Result<ProductPage, Error> {
        if !is_truthy(self.success.as_ref()) {
            return Err(Error::Server {
                message: self
                    .error
                    .unwrap_or_else(|| GENERIC_SERVER_ERROR.to_string()),
            });
        }
        let items = match self.products {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(Error::Server {
                    message: "response is missing a products array".to_string(),
                })
            }
        };
        let items: Vec<Product> =
            serde_json::from_value(Value::Array(items)).map_err(|e| Error::Server {
                message: format!("malformed product record: {}", e),
            })?;
        let pagination = normalize_pagination(
            self.pagination.unwrap_or_default(),
            requested_page,
            limit,
            items.len(),
        );
        Ok(ProductPage {
            items,
            pagination,
            from_cache: self.from_cache.unwrap_or(false),
        })
    }
}

impl ProductEnvelope {
    pub fn into_product(self) -> Result<Product, Error> {
        if !is_truthy(self.success.as_ref()) {
            return Err(Error::Server {
                message: self
                    .error
                    .unwrap_or_else(|| "Failed to fetch product".to_string()),
            });
        }
        match self.product {
            Some(value @ Value::Object(_)) => {
                serde_json::from_value(value).map_err(|e| Error::Server {
                    message: format!("malformed product record: {}", e),
                })
            }
            _ => Err(Error::Server {
                message: "response is missing a product object".to_string(),
            }),
        }
    }
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.error.or(self.message).filter(|m| !m.trim().is_empty())
    }
}

fn normalize_pagination(
    raw: RawPagination,
    requested_page: u32,
    limit: u32,
    item_count: usize,
) -> PageInfo {
    let current_page = raw.page().unwrap_or(requested_page).max(1);
    let limit = u64::from(limit.max(1));
    let offset = u64::from(current_page - 1) * limit;
    let count = item_count as u64;
    let total_items = raw.total_items().unwrap_or(offset + count);
    let total_pages = raw.total_pages().unwrap_or_else(|| {
        let pages = total_items.div_ceil(limit);
        u32::try_from(pages).unwrap_or(u32::MAX).max(current_page)
    });
    let has_more = raw.has_more().unwrap_or(current_page < total_pages);
    let showing = raw
        .showing
        .unwrap_or_else(|| showing_range(offset, count, total_items));
    PageInfo {
        current_page,
        total_pages,
        total_items,
        has_more,
        showing,
    }
}

fn showing_range(offset: u64, count: u64, total: u64) -> String {
    if count == 0 {
        format!("0 of {}", total)
    } else {
        format!("{}-{} of {}", offset + 1, offset + count, total)
    }
}

/// JavaScript-style truthiness of the `success` flag.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
        Some(Value::Null) | None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: Value) -> ProductListEnvelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn camel_case_pagination() {
        let page = envelope(json!({
            "success": true,
            "products": [{"name": "a"}, {"name": "b"}],
            "pagination": {"page": 2, "totalPages": 5, "totalItems": 40, "hasMore": true, "showing": "9-16 of 40"}
        }))
        .into_page(2, 8)
        .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(
            page.pagination,
            PageInfo {
                current_page: 2,
                total_pages: 5,
                total_items: 40,
                has_more: true,
                showing: "9-16 of 40".to_string(),
            }
        );
        assert!(!page.from_cache);
    }

    #[test]
    fn snake_case_has_more_is_accepted() {
        let page = envelope(json!({
            "success": true,
            "products": [],
            "pagination": {"current_page": 1, "total_pages": 1, "total_items": 0, "has_more": false},
            "fromCache": true
        }))
        .into_page(1, 8)
        .unwrap();
        assert!(!page.pagination.has_more);
        assert_eq!(page.pagination.showing, "0 of 0");
        assert!(page.from_cache);
    }

    #[test]
    fn both_spellings_in_one_block() {
        let page = envelope(json!({
            "success": true,
            "products": [{"name": "a"}],
            "pagination": {
                "page": 2,
                "currentPage": 2,
                "current_page": 2,
                "totalPages": 3,
                "total_pages": 3,
                "totalItems": 17,
                "total_items": 17,
                "total": 17,
                "hasMore": true,
                "has_more": false
            }
        }))
        .into_page(2, 8)
        .unwrap();
        assert_eq!(page.pagination.current_page, 2);
        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(page.pagination.total_items, 17);
        // camelCase wins when the spellings disagree.
        assert!(page.pagination.has_more);
    }

    #[test]
    fn missing_fields_are_derived() {
        let page = envelope(json!({
            "success": true,
            "products": [{}, {}, {}],
            "pagination": {"totalItems": 19}
        }))
        .into_page(2, 8)
        .unwrap();
        assert_eq!(page.pagination.current_page, 2);
        assert_eq!(page.pagination.total_pages, 3);
        assert!(page.pagination.has_more);
        assert_eq!(page.pagination.showing, "9-11 of 19");
    }

    #[test]
    fn missing_pagination_means_no_more_pages() {
        let page = envelope(json!({"success": true, "products": [{}, {}]}))
            .into_page(1, 8)
            .unwrap();
        assert_eq!(page.pagination.total_items, 2);
        assert_eq!(page.pagination.total_pages, 1);
        assert!(!page.pagination.has_more);
    }

    #[test]
    fn success_false_uses_backend_message() {
        let err = envelope(json!({"success": false, "error": "Category not found"}))
            .into_page(1, 8)
            .unwrap_err();
        match err {
            Error::Server { message } => assert_eq!(message, "Category not found"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn products_must_be_an_array() {
        let err = envelope(json!({"success": true, "products": {"name": "x"}}))
            .into_page(1, 8)
            .unwrap_err();
        assert!(matches!(err, Error::Server { .. }));

        let err = envelope(json!({"success": true}))
            .into_page(1, 8)
            .unwrap_err();
        assert!(matches!(err, Error::Server { .. }));
    }

    #[test]
    fn truthiness() {
        assert!(is_truthy(Some(&json!(true))));
        assert!(is_truthy(Some(&json!(1))));
        assert!(is_truthy(Some(&json!("ok"))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(!is_truthy(Some(&Value::Null)));
        assert!(!is_truthy(None));
    }

    #[test]
    fn product_envelope() {
        let env: ProductEnvelope =
            serde_json::from_value(json!({"success": true, "product": {"_id": "a1", "name": "Panel"}}))
                .unwrap();
        let product = env.into_product().unwrap();
        assert_eq!(product.name(), Some("Panel"));

        let env: ProductEnvelope =
            serde_json::from_value(json!({"success": true, "product": null})).unwrap();
        assert!(env.into_product().is_err());
    }
}
