//! Search endpoints for accounts, products and categories.

use std::fmt;
use std::str::FromStr;

use paydesk_types::{AccountRow, CategoryRow, ProductRow};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Method;
use tracing::debug;

use crate::{ApiError, PaydeskClient, decode_json, ensure_success};

/// Characters `encodeURIComponent` leaves untouched, besides alphanumerics.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// The searchable collections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchKind {
    Accounts,
    Products,
    Categories,
}

impl SearchKind {
    pub const ALL: [SearchKind; 3] = [SearchKind::Accounts, SearchKind::Products, SearchKind::Categories];

    pub fn as_str(self) -> &'static str {
        match self {
            SearchKind::Accounts => "accounts",
            SearchKind::Products => "products",
            SearchKind::Categories => "categories",
        }
    }

    /// Endpoint path for a query.
    pub fn path(self, query: &str) -> String {
        format!("/api/v1/{}?search={}", self.as_str(), encode_search_query(query))
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown search kind '{s}' (expected accounts, products or categories)"))
    }
}

/// Typed rows returned by a search.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchResults {
    Accounts(Vec<AccountRow>),
    Products(Vec<ProductRow>),
    Categories(Vec<CategoryRow>),
}

impl SearchResults {
    pub fn len(&self) -> usize {
        match self {
            SearchResults::Accounts(rows) => rows.len(),
            SearchResults::Products(rows) => rows.len(),
            SearchResults::Categories(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Encode a search query the way the web frontend does: percent-encode as a
/// URI component, then turn the first encoded space into `+`.
pub fn encode_search_query(query: &str) -> String {
    utf8_percent_encode(query, COMPONENT)
        .to_string()
        .replacen("%20", "+", 1)
}

impl PaydeskClient {
    /// Run a search against one collection.
    pub async fn search(&self, kind: SearchKind, query: &str) -> Result<SearchResults, ApiError> {
        let path = kind.path(query);
        debug!(target: "paydesk_search", kind = %kind, query, "searching");
        let response = ensure_success(self.request(Method::GET, &path).send().await?).await?;
        let results = match kind {
            SearchKind::Accounts => SearchResults::Accounts(decode_json(response).await?),
            SearchKind::Products => SearchResults::Products(decode_json(response).await?),
            SearchKind::Categories => SearchResults::Categories(decode_json(response).await?),
        };
        debug!(target: "paydesk_search", kind = %kind, rows = results.len(), "search finished");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_like_uri_component() {
        assert_eq!(encode_search_query("mate"), "mate");
        assert_eq!(encode_search_query("a&b=c"), "a%26b%3Dc");
        assert_eq!(encode_search_query("it's (ok)!"), "it's+(ok)!");
        assert_eq!(encode_search_query("Café"), "Caf%C3%A9");
    }

    #[test]
    fn only_first_space_becomes_plus() {
        assert_eq!(encode_search_query("club mate cola"), "club+mate%20cola");
    }

    #[test]
    fn paths_per_kind() {
        assert_eq!(SearchKind::Products.path("club mate"), "/api/v1/products?search=club+mate");
        assert_eq!(SearchKind::Accounts.path(""), "/api/v1/accounts?search=");
    }

    #[test]
    fn parses_kind_names() {
        assert_eq!("Products".parse::<SearchKind>(), Ok(SearchKind::Products));
        assert_eq!("categories".parse::<SearchKind>(), Ok(SearchKind::Categories));
        assert!("transactions".parse::<SearchKind>().is_err());
    }
}
