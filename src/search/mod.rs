//! Place-search capability consumed by the aggregator.

mod foursquare;

pub use foursquare::FoursquareClient;

use async_trait::async_trait;

use crate::error::SearchError;
use crate::models::{PlaceQuery, RawPlace, SortOrder};

/// Search places of one category near a location.
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    /// Run one category search, returning at most `limit` results in
    /// upstream order.
    async fn search(
        &self,
        query: &PlaceQuery,
        limit: usize,
        sort: SortOrder,
    ) -> Result<Vec<RawPlace>, SearchError>;
}
