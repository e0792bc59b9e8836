//! Paging state for paginated `select` queries.

use serde::Serialize;
use serde_json::{Map, Value};

/// Default page size for select queries.
pub const DEFAULT_PAGE_SIZE: u64 = 1000;

/// The `pagingSpec` of a select query.
///
/// The first page starts with empty identifiers. Each response carries new
/// identifiers which [`PagingSpec::next_page`] turns into the spec for the
/// following request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagingSpec {
    pub paging_identifiers: Map<String, Value>,
    pub threshold: u64,
    pub from_next: bool,
}

impl PagingSpec {
    pub fn first_page(threshold: u64) -> Self {
        Self {
            paging_identifiers: Map::new(),
            threshold,
            from_next: true,
        }
    }

    pub fn next_page(&self, paging_identifiers: Map<String, Value>) -> Self {
        Self {
            paging_identifiers,
            threshold: self.threshold,
            from_next: self.from_next,
        }
    }
}

impl Default for PagingSpec {
    fn default() -> Self {
        Self::first_page(DEFAULT_PAGE_SIZE)
    }
}
