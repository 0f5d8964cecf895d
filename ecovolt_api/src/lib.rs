mod client;
mod errors;
mod query;
pub mod types;
pub use self::client::{Client, LOCAL_BASE_URL, PRODUCTION_BASE_URL};
pub use self::errors::Error;
pub use self::query::{
    ProductQuery, ProductSortBy, Query, QueryCommon, QueryParseError, SortOrder, DEFAULT_LIMIT,
};
pub use tokio_util::sync::CancellationToken;
