//! Shared query infrastructure: the [`Query`] trait, [`QueryCommon`] fields, and [`SortOrder`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

/// Page size the storefront uses unless told otherwise.
pub const DEFAULT_LIMIT: u32 = 8;

/// Trait implemented by query builders. Provides URL serialization and
/// shared builder methods for pagination and sort order.
pub trait Query {
    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url;

    /// Returns a mutable reference to the common query fields.
    fn get_common(&mut self) -> &mut QueryCommon;

    /// Sets the page number (1-indexed). Zero is bumped to 1.
    fn with_page(mut self, page: u32) -> Self
    where
        Self: Sized,
    {
        self.get_common().page = page.max(1);
        self
    }

    /// Sets the number of results per page. Zero is bumped to 1.
    fn with_limit(mut self, limit: u32) -> Self
    where
        Self: Sized,
    {
        self.get_common().limit = limit.max(1);
        self
    }

    /// Sets the sort order (ascending or descending).
    fn with_sort_order(mut self, sort_order: SortOrder) -> Self
    where
        Self: Sized,
    {
        self.get_common().sort_order = sort_order;
        self
    }
}

/// Sort order for API results.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending order. This is the default.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SortOrder::Asc => "asc",
                SortOrder::Desc => "desc",
            }
        )
    }
}

impl FromStr for SortOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(()),
        }
    }
}

/// Fields shared by all queries: pagination and sort order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct QueryCommon {
    /// Page number (1-indexed). Defaults to 1.
    pub page: u32,
    /// Results per page. Defaults to [`DEFAULT_LIMIT`].
    pub limit: u32,
    /// Sort order. Defaults to ascending.
    pub sort_order: SortOrder,
}

impl Default for QueryCommon {
    fn default() -> QueryCommon {
        QueryCommon {
            page: 1,
            limit: DEFAULT_LIMIT,
            sort_order: SortOrder::Asc,
        }
    }
}

impl QueryCommon {
    /// Appends the pagination parameters to the URL.
    pub fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("page", &self.page.to_string())
            .append_pair("limit", &self.limit.to_string());
        url
    }
}
