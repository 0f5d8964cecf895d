//! View state of a catalog page and the transitions that turn it into requests.
//!
//! Every transition updates the view fields (filter, search, sort, limit) and
//! returns the single [`ProductQuery`] that realizes the new view. Applying
//! results is separate: [`FetchState::apply_page`] and
//! [`FetchState::apply_failure`] run only for the request that is still current.

use std::collections::BTreeMap;

use ecovolt_api::types::{Category, PageInfo, Product, ProductPage};
use ecovolt_api::{ProductQuery, ProductSortBy, Query, SortOrder};

use crate::config::DEFAULT_PAGE_LIMIT;

/// The category (and optional brand) that scopes loads and searches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveFilter {
    pub category: Category,
    pub subcategory: Option<String>,
}

impl ActiveFilter {
    fn page_key(&self) -> String {
        format!(
            "{}-{}",
            self.category.key(),
            self.subcategory.as_deref().unwrap_or("all")
        )
    }
}

/// Everything a product grid renders from.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchState {
    /// Accumulated products of the current view.
    pub products: Vec<Product>,
    /// A replacing load (page 1, new view) is in flight.
    pub loading: bool,
    /// An appending load (next page) is in flight.
    pub loading_more: bool,
    /// User-facing message of the last failure; cleared when a new fetch starts.
    pub error: Option<String>,
    pub pagination: Option<PageInfo>,
    pub active_filter: Option<ActiveFilter>,
    /// Page of the last applied result.
    pub current_page: u32,
    /// Last requested page per `"{category}-{subcategory|all}"`.
    pub category_pages: BTreeMap<String, u32>,
    pub search_query: String,
    pub sort_by: ProductSortBy,
    pub sort_order: SortOrder,
    /// Page size used for the current view; load-more keeps it.
    pub limit: u32,
}

impl Default for FetchState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_LIMIT)
    }
}

impl FetchState {
    pub fn new(limit: u32) -> Self {
        Self {
            products: Vec::new(),
            loading: false,
            loading_more: false,
            error: None,
            pagination: None,
            active_filter: None,
            current_page: 1,
            category_pages: BTreeMap::new(),
            search_query: String::new(),
            sort_by: ProductSortBy::Name,
            sort_order: SortOrder::Asc,
            limit: limit.max(1),
        }
    }

    /// The query for the current view at `page`.
    pub fn view_query(&self, page: u32) -> ProductQuery {
        let mut query = ProductQuery::default()
            .with_page(page)
            .with_limit(self.limit)
            .with_sort_by(self.sort_by)
            .with_sort_order(self.sort_order)
            .with_search(&self.search_query);
        if let Some(filter) = &self.active_filter {
            query = query.with_category(filter.category);
            if let Some(sub) = &filter.subcategory {
                query = query.with_subcategory(sub);
            }
        }
        query
    }

    /// Sets sort and search without building a query, so the next transition
    /// carries them. `None` leaves a field as it is.
    pub fn preset(&mut self, sort: Option<(ProductSortBy, SortOrder)>, search: Option<&str>) {
        if let Some((sort_by, sort_order)) = sort {
            self.sort_by = sort_by;
            self.sort_order = sort_order;
        }
        if let Some(term) = search {
            self.search_query = term.trim().to_string();
        }
    }

    /// Unfiltered products. Search and sort carry over.
    pub fn view_all(&mut self, page: u32, limit: Option<u32>) -> ProductQuery {
        self.set_limit(limit);
        self.active_filter = None;
        self.view_query(page)
    }

    /// Products of one category (optionally one brand). Search and sort carry over.
    pub fn switch_category(
        &mut self,
        category: Category,
        subcategory: Option<String>,
        page: u32,
        limit: Option<u32>,
    ) -> ProductQuery {
        self.set_limit(limit);
        let filter = ActiveFilter {
            category,
            subcategory,
        };
        self.category_pages.insert(filter.page_key(), page.max(1));
        self.active_filter = Some(filter);
        self.view_query(page)
    }

    /// Scoped search when a filter is active, global otherwise. An empty term
    /// falls back to the plain category or all-products view. Always page 1.
    pub fn set_search(&mut self, term: &str, limit: Option<u32>) -> ProductQuery {
        self.set_limit(limit);
        self.search_query = term.trim().to_string();
        self.view_query(1)
    }

    /// New sort, page 1, filter and search preserved.
    pub fn set_sort(
        &mut self,
        sort_by: ProductSortBy,
        sort_order: SortOrder,
        limit: Option<u32>,
    ) -> ProductQuery {
        self.set_limit(limit);
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self.view_query(1)
    }

    /// Back to defaults: no filter, no search, `name`/`asc`, page 1.
    pub fn reset(&mut self) -> ProductQuery {
        self.active_filter = None;
        self.search_query.clear();
        self.sort_by = ProductSortBy::Name;
        self.sort_order = SortOrder::Asc;
        self.current_page = 1;
        self.view_query(1)
    }

    /// Query for the page after the current one, if the backend reported more
    /// and the page number still fits.
    pub fn next_page_query(&self) -> Option<ProductQuery> {
        if !self.can_load_more() {
            return None;
        }
        let next = self.current_page.checked_add(1)?;
        Some(self.view_query(next))
    }

    /// Marks a fetch as started.
    pub fn begin(&mut self, append: bool) {
        self.error = None;
        self.loading = !append;
        self.loading_more = append;
    }

    /// Applies a fetched or cached page.
    pub fn apply_page(&mut self, page: &ProductPage, requested_page: u32, append: bool) {
        if append {
            self.products.extend(page.items.iter().cloned());
        } else {
            self.products = page.items.clone();
        }
        self.pagination = Some(page.pagination.clone());
        self.current_page = requested_page;
        self.loading = false;
        self.loading_more = false;
        self.error = None;
    }

    /// Records a surfaced failure. A failed replacing load empties the grid;
    /// a failed append keeps what is already shown.
    pub fn apply_failure(&mut self, message: String, append: bool) {
        if !append {
            self.products.clear();
            self.pagination = None;
        }
        self.loading = false;
        self.loading_more = false;
        self.error = Some(message);
    }

    pub fn is_busy(&self) -> bool {
        self.loading || self.loading_more
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && !self.loading
    }

    pub fn can_load_more(&self) -> bool {
        self.pagination.as_ref().is_some_and(|p| p.has_more)
    }

    pub fn showing_text(&self) -> Option<&str> {
        self.pagination.as_ref().map(|p| p.showing.as_str())
    }

    pub fn total_pages(&self) -> u32 {
        self.pagination.as_ref().map_or(0, |p| p.total_pages)
    }

    pub fn total_items(&self) -> u64 {
        self.pagination.as_ref().map_or(0, |p| p.total_items)
    }

    fn set_limit(&mut self, limit: Option<u32>) {
        if let Some(limit) = limit {
            self.limit = limit.max(1);
        }
    }
}
