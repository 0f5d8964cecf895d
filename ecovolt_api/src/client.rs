//! HTTP client for the EcoVolt product API.

use std::future::Future;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{
    query::{ProductQuery, Query},
    types::{ErrorBody, Product, ProductEnvelope, ProductListEnvelope, ProductPage},
    Error,
};

/// Base URL of the hosted backend.
pub const PRODUCTION_BASE_URL: &str = "https://ecovolt-back.onrender.com/api/products";
/// Base URL of a backend started locally for development.
pub const LOCAL_BASE_URL: &str = "http://localhost:5000/api/products";

/// HTTP client for the EcoVolt product API.
///
/// Every call takes a [`CancellationToken`]. When the token fires before the
/// response is complete the call returns [`Error::Cancelled`] and whatever the
/// server eventually sends is dropped. No timeout is set beyond the transport's own.
pub struct Client {
    /// Base URL for the API, including the `/api/products` prefix.
    base_api_url: String,
    http: reqwest::Client,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a new client pointing at the production backend.
    pub fn new() -> Self {
        Self::with_base_url(PRODUCTION_BASE_URL)
    }

    /// Creates a new client with a custom base URL. Used for local backends and wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_api_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_api_url
    }

    fn get_url(&self, segments: &[&str], query: Option<&impl Query>) -> Result<Url, Error> {
        let mut url = Url::parse(&self.base_api_url).map_err(|e| {
            tracing::error!("Invalid base URL {}: {}", self.base_api_url, e);
            Error::InvalidUrl(format!("{}: {}", self.base_api_url, e))
        })?;
        if !segments.is_empty() {
            url.path_segments_mut()
                .map_err(|_| Error::InvalidUrl(self.base_api_url.clone()))?
                .pop_if_empty()
                .extend(segments);
        }
        Ok(match query {
            Some(query) => query.add_to_url(&url),
            None => url,
        })
    }

    async fn get<T>(&self, url: Url) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        tracing::debug!("GET {}", url);
        let resp = self
            .http
            .get(url)
            .header("accept", "application/json, text/plain, */*")
            .header("content-type", "application/json")
            .header("cache-control", "no-cache")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get resource: {}", e);
                Error::Network(e)
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::Network(e)
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                message: http_error_message(status, &body),
            });
        }

        serde_json::from_str::<T>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
            Error::Server {
                message: format!("malformed response: {}", e),
            }
        })
    }

    /// Fetches one page of products for the given query.
    ///
    /// The path depends on the query's category and subcategory; everything
    /// else travels as query parameters.
    pub async fn get_products(
        &self,
        query: &ProductQuery,
        cancel: &CancellationToken,
    ) -> Result<ProductPage, Error> {
        let url = self.get_url(&query.path_segments(), Some(query))?;
        let page = query.page();
        let limit = query.limit();
        with_cancellation(cancel, async move {
            let envelope = self.get::<ProductListEnvelope>(url).await?;
            envelope.into_page(page, limit).inspect_err(|e| {
                tracing::error!("Product list rejected: {}", e);
            })
        })
        .await
    }

    /// Fetches a single product by its identifier.
    pub async fn get_product(
        &self,
        product_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Product, Error> {
        let url = self.get_url(&[product_id], None::<&ProductQuery>)?;
        with_cancellation(cancel, async move {
            let envelope = self.get::<ProductEnvelope>(url).await?;
            envelope.into_product().inspect_err(|e| {
                tracing::error!("Product lookup rejected: {}", e);
            })
        })
        .await
    }
}

async fn with_cancellation<T>(
    cancel: &CancellationToken,
    request: impl Future<Output = Result<T, Error>>,
) -> Result<T, Error> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::debug!("Request superseded before completion");
            Err(Error::Cancelled)
        }
        result = request => result,
    }
}

fn http_error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| {
            format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown status")
            )
        })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
