mod common;
pub use self::common::{Query, QueryCommon, SortOrder, DEFAULT_LIMIT};

mod product;
pub use self::product::{ProductQuery, ProductSortBy, QueryParseError};
