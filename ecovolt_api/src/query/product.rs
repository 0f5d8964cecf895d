use std::str::FromStr;

use url::{form_urlencoded, Url};

use crate::types::Category;

use super::{
    common::{QueryCommon, SortOrder},
    Query,
};

/// Errors from parsing a rendered [`ProductQuery`] back.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum QueryParseError {
    #[error("unrecognized query path '{0}'")]
    Path(String),
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
    #[error("invalid value '{value}' for {field}")]
    InvalidValue { field: &'static str, value: String },
}

/// A request for one page of products: what to show, in which order, and which page.
///
/// The [`Display`](std::fmt::Display) form is the canonical signature of the
/// query (`/category/inverters?page=1&limit=8&sortBy=name&sortOrder=asc`) and
/// [`FromStr`] parses it back.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ProductQuery {
    pub common: QueryCommon,
    pub category: Option<Category>,
    /// Brand slug under the category. Ignored when `category` is `None`.
    pub subcategory: Option<String>,
    pub search: Option<String>,
    pub sort_by: ProductSortBy,
}

impl Query for ProductQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = self.common.add_to_url(url);
        url.query_pairs_mut()
            .append_pair("sortBy", &self.sort_by.to_string())
            .append_pair("sortOrder", &self.common.sort_order.to_string());
        if let Some(search) = &self.search {
            url.query_pairs_mut().append_pair("search", search);
        }
        url
    }
}

impl ProductQuery {
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_subcategory(mut self, subcategory: &str) -> Self {
        let subcategory = subcategory.trim();
        self.subcategory = (!subcategory.is_empty()).then(|| subcategory.to_string());
        self
    }

    /// Sets the search term. A blank term clears the search.
    pub fn with_search(mut self, search: &str) -> Self {
        let search = search.trim();
        self.search = (!search.is_empty()).then(|| search.to_string());
        self
    }

    pub fn with_sort_by(mut self, sort_by: ProductSortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    pub fn page(&self) -> u32 {
        self.common.page
    }

    pub fn limit(&self) -> u32 {
        self.common.limit
    }

    /// Path segments below the API base: none, `category/{key}` or `category/{key}/{sub}`.
    pub fn path_segments(&self) -> Vec<&str> {
        let mut segments = Vec::new();
        if let Some(category) = &self.category {
            segments.push("category");
            segments.push(category.key());
            if let Some(sub) = &self.subcategory {
                segments.push(sub.as_str());
            }
        }
        segments
    }
}

impl std::fmt::Display for ProductQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = self
            .path_segments()
            .iter()
            .map(|s| form_urlencoded::byte_serialize(s.as_bytes()).collect::<String>())
            .collect::<Vec<_>>()
            .join("/");
        let mut params = form_urlencoded::Serializer::new(String::new());
        params
            .append_pair("page", &self.common.page.to_string())
            .append_pair("limit", &self.common.limit.to_string())
            .append_pair("sortBy", &self.sort_by.to_string())
            .append_pair("sortOrder", &self.common.sort_order.to_string());
        if let Some(search) = &self.search {
            params.append_pair("search", search);
        }
        write!(f, "/{}?{}", path, params.finish())
    }
}

impl FromStr for ProductQuery {
    type Err = QueryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, params) = s.split_once('?').unwrap_or((s, ""));
        let segments: Vec<String> = path
            .split('/')
            .filter(|seg| !seg.is_empty())
            .map(decode_segment)
            .collect();

        let mut query = ProductQuery::default();
        match segments.as_slice() {
            [] => {}
            [prefix, category, rest @ ..] if prefix == "category" && rest.len() <= 1 => {
                query.category = Some(
                    category
                        .parse()
                        .map_err(|_| QueryParseError::UnknownCategory(category.clone()))?,
                );
                if let Some(sub) = rest.first() {
                    query = query.with_subcategory(sub);
                }
            }
            _ => return Err(QueryParseError::Path(path.to_string())),
        }

        for (key, value) in form_urlencoded::parse(params.as_bytes()) {
            match key.as_ref() {
                "page" => query.common.page = parse_positive("page", &value)?,
                "limit" => query.common.limit = parse_positive("limit", &value)?,
                "sortBy" => {
                    query.sort_by = value.parse().map_err(|_| invalid("sortBy", &value))?;
                }
                "sortOrder" => {
                    query.common.sort_order =
                        value.parse().map_err(|_| invalid("sortOrder", &value))?;
                }
                "search" => query = query.with_search(&value),
                _ => {}
            }
        }
        Ok(query)
    }
}

fn decode_segment(segment: &str) -> String {
    form_urlencoded::parse(segment.as_bytes())
        .next()
        .map(|(decoded, _)| decoded.into_owned())
        .unwrap_or_default()
}

fn parse_positive(field: &'static str, value: &str) -> Result<u32, QueryParseError> {
    match value.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(invalid(field, value)),
    }
}

fn invalid(field: &'static str, value: &str) -> QueryParseError {
    QueryParseError::InvalidValue {
        field,
        value: value.to_string(),
    }
}

/// Field the backend sorts products by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ProductSortBy {
    #[default]
    Name,
    Price,
    CreatedAt,
}

impl std::fmt::Display for ProductSortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ProductSortBy::Name => "name",
                ProductSortBy::Price => "price",
                ProductSortBy::CreatedAt => "createdAt",
            }
        )?;
        Ok(())
    }
}

impl FromStr for ProductSortBy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(ProductSortBy::Name),
            "price" => Ok(ProductSortBy::Price),
            "createdAt" => Ok(ProductSortBy::CreatedAt),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use crate::{
        query::{ProductQuery, ProductSortBy, Query, SortOrder},
        types::Category,
    };

    #[test]
    fn test_product_query_url() {
        let url = Url::parse("https://example.com").unwrap();

        insta::assert_snapshot!(
            ProductQuery::default().add_to_url(&url).to_string(),
            @"https://example.com/?page=1&limit=8&sortBy=name&sortOrder=asc"
        );

        insta::assert_snapshot!(
            ProductQuery::default()
                .with_category(Category::Inverters)
                .with_subcategory("deye")
                .with_search("hybrid 5kw")
                .with_page(3)
                .with_limit(12)
                .with_sort_by(ProductSortBy::Price)
                .with_sort_order(SortOrder::Desc)
                .add_to_url(&url)
                .to_string(),
            @"https://example.com/?page=3&limit=12&sortBy=price&sortOrder=desc&search=hybrid+5kw"
        );
    }

    #[test]
    fn test_product_query_signature() {
        insta::assert_snapshot!(
            ProductQuery::default().to_string(),
            @"/?page=1&limit=8&sortBy=name&sortOrder=asc"
        );
        insta::assert_snapshot!(
            ProductQuery::default()
                .with_category(Category::SolarPanels)
                .with_subcategory("trina-solar")
                .with_sort_by(ProductSortBy::CreatedAt)
                .to_string(),
            @"/category/solar-panels/trina-solar?page=1&limit=8&sortBy=createdAt&sortOrder=asc"
        );
    }

    #[test]
    fn blank_search_and_subcategory_are_dropped() {
        let query = ProductQuery::default()
            .with_search("   ")
            .with_subcategory("");
        assert_eq!(query.search, None);
        assert_eq!(query.subcategory, None);
    }

    #[test]
    fn zero_page_and_limit_are_bumped() {
        let query = ProductQuery::default().with_page(0).with_limit(0);
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), 1);
    }

    #[test]
    fn subcategory_without_category_has_no_path() {
        let mut query = ProductQuery::default();
        query.subcategory = Some("deye".to_string());
        assert!(query.path_segments().is_empty());
    }
}
