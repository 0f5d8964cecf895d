//! Fetch orchestrator: the catalog page's operations over one API client,
//! one response cache and one in-flight request.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use ecovolt_api::types::{Category, Product, ProductPage};
use ecovolt_api::{CancellationToken, Client, ProductQuery, ProductSortBy, SortOrder};

use crate::cache::ResponseCache;
use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::state::FetchState;
use crate::validation;

/// Per-call knobs for the list operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadOptions {
    /// Page to load. Defaults to 1. Ignored by search, sort and reset, which always start at 1.
    pub page: Option<u32>,
    /// Page size. Sticks for later loads of the same view. Defaults to the configured limit.
    pub limit: Option<u32>,
    /// Brand slug, only meaningful for category loads.
    pub subcategory: Option<String>,
    /// Append to the shown products instead of replacing them.
    pub append: bool,
    /// Allow a fresh cache entry to answer instead of the network.
    pub use_cache: bool,
    /// Sort to set before a load builds its query.
    pub sort: Option<(ProductSortBy, SortOrder)>,
    /// Search term to set before a load builds its query. Empty clears the search.
    pub search: Option<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            page: None,
            limit: None,
            subcategory: None,
            append: false,
            use_cache: true,
            sort: None,
            search: None,
        }
    }
}

impl LoadOptions {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_subcategory(mut self, subcategory: &str) -> Self {
        self.subcategory = Some(subcategory.to_string());
        self
    }

    pub fn appending(mut self) -> Self {
        self.append = true;
        self
    }

    pub fn bypass_cache(mut self) -> Self {
        self.use_cache = false;
        self
    }

    /// Loads with this sort in one request instead of loading and then sorting.
    pub fn with_sort(mut self, sort_by: ProductSortBy, sort_order: SortOrder) -> Self {
        self.sort = Some((sort_by, sort_order));
        self
    }

    /// Loads with this search term in one request instead of loading and then searching.
    pub fn with_search(mut self, term: &str) -> Self {
        self.search = Some(term.to_string());
        self
    }
}

/// What a list operation ended up doing.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchOutcome {
    /// The page came from the backend and was applied.
    Fetched(ProductPage),
    /// A fresh cache entry answered; no request was made.
    Cached(ProductPage),
    /// Preconditions were not met (load-more while busy or on the last page,
    /// retry with no failed request).
    Skipped,
    /// A newer operation took over before this one finished. Nothing was applied.
    Superseded,
}

impl FetchOutcome {
    pub fn page(&self) -> Option<&ProductPage> {
        match self {
            FetchOutcome::Fetched(page) | FetchOutcome::Cached(page) => Some(page),
            FetchOutcome::Skipped | FetchOutcome::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, FetchOutcome::Superseded)
    }
}

/// Snapshot of the response cache, for debugging output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheInfo {
    pub size: usize,
    pub keys: Vec<String>,
    pub ttl: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FetchMode {
    append: bool,
    use_cache: bool,
}

impl FetchMode {
    const REPLACE: FetchMode = FetchMode {
        append: false,
        use_cache: true,
    };
}

#[derive(Clone, Debug)]
struct LastRequest {
    query: ProductQuery,
    mode: FetchMode,
    /// Set when the request surfaced an error; only failed requests are replayed.
    failed: bool,
}

struct Inner {
    state: FetchState,
    /// Token of the request currently allowed to apply its result.
    cancel: CancellationToken,
    /// Bumped on every dispatch; a result applies only if its generation is still current.
    generation: u64,
    last_request: Option<LastRequest>,
}

/// Product catalog for one mounted storefront page.
///
/// Owns its API client, its response cache and the token of the single
/// request it allows in flight. Starting any operation cancels the previous
/// request, and a cancelled request never touches the state. Operations take
/// `&self`, so several may be interleaved on one task; only the last one
/// dispatched applies its result.
///
/// Dropping the catalog cancels whatever request is still outstanding.
pub struct Catalog {
    client: Client,
    cache: ResponseCache,
    inner: Mutex<Inner>,
}

impl Catalog {
    /// Creates a catalog from configuration.
    pub fn new(config: CatalogConfig) -> Self {
        Self::with_client(Client::with_base_url(&config.base_url), &config)
    }

    /// Creates a catalog with default settings against a custom base URL. Used for testing.
    pub fn with_base_url(base_url: &str) -> Self {
        Self::new(CatalogConfig {
            base_url: base_url.to_string(),
            ..CatalogConfig::default()
        })
    }

    pub fn with_client(client: Client, config: &CatalogConfig) -> Self {
        Self {
            client,
            cache: ResponseCache::new(config.cache_ttl),
            inner: Mutex::new(Inner {
                state: FetchState::new(config.page_limit),
                cancel: CancellationToken::new(),
                generation: 0,
                last_request: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Loads a page of all products. Clears the category filter; search and
    /// sort carry over unless `options` sets them.
    pub async fn load_all_products(
        &self,
        options: LoadOptions,
    ) -> Result<FetchOutcome, CatalogError> {
        let page = validation::validate_page(options.page.unwrap_or(1))?;
        let limit = options.limit.map(validation::validate_limit).transpose()?;
        let search = options
            .search
            .as_deref()
            .map(validation::validate_search)
            .transpose()?;
        let sort = options.sort;
        let mode = FetchMode {
            append: options.append,
            use_cache: options.use_cache,
        };
        self.fetch(mode, move |state| {
            state.preset(sort, search.as_deref());
            Some(state.view_all(page, limit))
        })
        .await
    }

    /// Loads a page of one category, optionally narrowed to a brand via `options.subcategory`.
    pub async fn load_products_by_category(
        &self,
        category: Category,
        options: LoadOptions,
    ) -> Result<FetchOutcome, CatalogError> {
        let page = validation::validate_page(options.page.unwrap_or(1))?;
        let limit = options.limit.map(validation::validate_limit).transpose()?;
        let subcategory = options
            .subcategory
            .as_deref()
            .map(validation::validate_subcategory)
            .transpose()?;
        let search = options
            .search
            .as_deref()
            .map(validation::validate_search)
            .transpose()?;
        let sort = options.sort;
        let mode = FetchMode {
            append: options.append,
            use_cache: options.use_cache,
        };
        self.fetch(mode, move |state| {
            state.preset(sort, search.as_deref());
            Some(state.switch_category(category, subcategory, page, limit))
        })
        .await
    }

    /// Appends the next page of the current view.
    ///
    /// Does nothing while another load is in flight or when the backend
    /// reported no further pages. Requests are never queued.
    pub async fn load_more(&self) -> Result<FetchOutcome, CatalogError> {
        let mode = FetchMode {
            append: true,
            use_cache: true,
        };
        self.fetch(mode, |state| {
            if state.is_busy() {
                tracing::debug!("load_more ignored: a load is already in flight");
                return None;
            }
            let next = state.next_page_query();
            if next.is_none() {
                tracing::debug!("load_more ignored: no further pages");
            }
            next
        })
        .await
    }

    /// Searches within the active category, or globally without one. An empty
    /// term reloads the plain view. Always starts at page 1.
    pub async fn search_products(
        &self,
        term: &str,
        options: LoadOptions,
    ) -> Result<FetchOutcome, CatalogError> {
        let term = validation::validate_search(term)?;
        let limit = options.limit.map(validation::validate_limit).transpose()?;
        let mode = FetchMode {
            append: false,
            use_cache: options.use_cache,
        };
        self.fetch(mode, move |state| Some(state.set_search(&term, limit)))
            .await
    }

    /// Changes the sort and reloads page 1, keeping filter and search.
    pub async fn sort_products(
        &self,
        sort_by: ProductSortBy,
        sort_order: SortOrder,
        options: LoadOptions,
    ) -> Result<FetchOutcome, CatalogError> {
        let limit = options.limit.map(validation::validate_limit).transpose()?;
        let mode = FetchMode {
            append: false,
            use_cache: options.use_cache,
        };
        self.fetch(mode, move |state| {
            Some(state.set_sort(sort_by, sort_order, limit))
        })
        .await
    }

    /// Clears filter, search and sort, then reloads page 1 of all products.
    pub async fn reset_filter(&self) -> Result<FetchOutcome, CatalogError> {
        self.fetch(FetchMode::REPLACE, |state| Some(state.reset()))
            .await
    }

    /// Drops every cached page and reloads page 1 of the current view from the backend.
    pub async fn refresh_data(&self) -> Result<FetchOutcome, CatalogError> {
        self.cache.clear();
        tracing::debug!("Response cache cleared");
        let mode = FetchMode {
            append: false,
            use_cache: false,
        };
        self.fetch(mode, |state| Some(state.view_query(1))).await
    }

    /// Re-issues the last list request as it was sent (same query, same append
    /// mode), but only when that request failed. Otherwise there is nothing to
    /// retry and the call is skipped, so a successful load-more is never appended twice.
    pub async fn retry(&self) -> Result<FetchOutcome, CatalogError> {
        let last = self
            .lock()
            .last_request
            .clone()
            .filter(|last| last.failed);
        let Some(last) = last else {
            tracing::debug!("retry ignored: the last list request did not fail");
            return Ok(FetchOutcome::Skipped);
        };
        tracing::debug!("Retrying {}", last.query);
        self.fetch(last.mode, move |_| Some(last.query)).await
    }

    /// Fetches one product. The product list and pagination are left alone,
    /// but the call still takes over the single in-flight slot.
    ///
    /// Returns `Ok(None)` when a newer operation superseded the lookup.
    pub async fn get_product_by_id(&self, product_id: &str) -> Result<Option<Product>, CatalogError> {
        let product_id = validation::validate_product_id(product_id)?;
        let (token, generation) = {
            let mut inner = self.lock();
            let token = self.supersede(&mut inner);
            inner.state.error = None;
            inner.state.loading = true;
            inner.state.loading_more = false;
            (token, inner.generation)
        };

        let result = self.client.get_product(&product_id, &token).await;

        let mut inner = self.lock();
        if inner.generation != generation {
            return Ok(None);
        }
        match result {
            Ok(product) => {
                inner.state.loading = false;
                Ok(Some(product))
            }
            Err(e) if e.is_cancelled() => Ok(None),
            Err(e) => {
                let err = CatalogError::from(e);
                tracing::warn!("Product {} lookup failed: {}", product_id, err);
                inner.state.loading = false;
                inner.state.error = Some(err.user_message());
                Err(err)
            }
        }
    }

    /// Cancels the current request and hands out the token for the next one.
    fn supersede(&self, inner: &mut Inner) -> CancellationToken {
        inner.cancel.cancel();
        inner.generation += 1;
        inner.cancel = CancellationToken::new();
        inner.cancel.clone()
    }

    async fn fetch<F>(&self, mode: FetchMode, transition: F) -> Result<FetchOutcome, CatalogError>
    where
        F: FnOnce(&mut FetchState) -> Option<ProductQuery>,
    {
        let (query, signature, token, generation) = {
            let mut inner = self.lock();
            let Some(query) = transition(&mut inner.state) else {
                return Ok(FetchOutcome::Skipped);
            };
            let signature = cache_key(&query);
            let token = self.supersede(&mut inner);
            inner.last_request = Some(LastRequest {
                query: query.clone(),
                mode,
                failed: false,
            });

            if mode.use_cache {
                if let Some(page) = self.cache.get_fresh(&signature) {
                    tracing::debug!("Cache hit for {}", signature);
                    inner.state.apply_page(&page, query.page(), mode.append);
                    return Ok(FetchOutcome::Cached(page));
                }
            }

            inner.state.begin(mode.append);
            (query, signature, token, inner.generation)
        };

        let result = self.client.get_products(&query, &token).await;

        let mut inner = self.lock();
        if inner.generation != generation {
            tracing::debug!("Discarding superseded result for {}", signature);
            return Ok(FetchOutcome::Superseded);
        }
        match result {
            Ok(page) => {
                self.cache.put(signature, page.clone());
                inner.state.apply_page(&page, query.page(), mode.append);
                Ok(FetchOutcome::Fetched(page))
            }
            Err(e) if e.is_cancelled() => Ok(FetchOutcome::Superseded),
            Err(e) => {
                let err = CatalogError::from(e);
                tracing::warn!("Loading {} failed: {}", signature, err);
                inner.state.apply_failure(err.user_message(), mode.append);
                if let Some(last) = inner.last_request.as_mut() {
                    last.failed = true;
                }
                Err(err)
            }
        }
    }

    /// A copy of the whole view state.
    pub fn state(&self) -> FetchState {
        self.lock().state.clone()
    }

    pub fn products(&self) -> Vec<Product> {
        self.lock().state.products.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().state.error.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().state.is_empty()
    }

    pub fn can_load_more(&self) -> bool {
        self.lock().state.can_load_more()
    }

    pub fn showing_text(&self) -> Option<String> {
        self.lock().state.showing_text().map(str::to_string)
    }

    pub fn total_pages(&self) -> u32 {
        self.lock().state.total_pages()
    }

    pub fn total_items(&self) -> u64 {
        self.lock().state.total_items()
    }

    pub fn current_page(&self) -> u32 {
        self.lock().state.current_page
    }

    pub fn cache_info(&self) -> CacheInfo {
        CacheInfo {
            size: self.cache.len(),
            keys: self.cache.keys(),
            ttl: self.cache.ttl(),
        }
    }
}

impl Drop for Catalog {
    fn drop(&mut self) {
        let inner = match self.inner.get_mut() {
            Ok(inner) => inner,
            Err(poisoned) => poisoned.into_inner(),
        };
        inner.cancel.cancel();
    }
}

fn cache_key(query: &ProductQuery) -> String {
    format!("products:{}", query)
}
