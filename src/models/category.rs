//! Place categories and the query/result shapes exchanged with the search API.

use serde::{Deserialize, Serialize};

/// Category of place requested from the search API.
///
/// Declaration order is the query order: the first three are always
/// queried, the rest only as fallbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryId {
    /// Arts & entertainment
    Attraction,
    /// Food
    Restaurant,
    Landmark,
    PerformingArts,
    Cemetery,
    /// College & university
    College,
}

impl CategoryId {
    /// Categories queried for every city, in order.
    pub const PRIMARY: [CategoryId; 3] = [
        CategoryId::Attraction,
        CategoryId::Restaurant,
        CategoryId::Landmark,
    ];

    /// Categories queried only while the output is below budget, in order.
    pub const FALLBACK: [CategoryId; 3] = [
        CategoryId::PerformingArts,
        CategoryId::Cemetery,
        CategoryId::College,
    ];

    /// Every category in query order.
    pub const ALL: [CategoryId; 6] = [
        CategoryId::Attraction,
        CategoryId::Restaurant,
        CategoryId::Landmark,
        CategoryId::PerformingArts,
        CategoryId::Cemetery,
        CategoryId::College,
    ];

    /// Foursquare taxonomy ID for this category
    pub fn foursquare_id(self) -> &'static str {
        match self {
            CategoryId::Attraction => "4d4b7104d754a06370d81259",
            CategoryId::Restaurant => "4d4b7105d754a06374d81259",
            CategoryId::Landmark => "4d4b7105d754a06377d81259",
            CategoryId::PerformingArts => "4bf58dd8d48988d1f2931735",
            CategoryId::Cemetery => "4bf58dd8d48988d15c941735",
            CategoryId::College => "4d4b7105d754a06372d81259",
        }
    }

    /// Whether names in this category get the definite-article treatment.
    /// Restaurants keep their names verbatim.
    pub fn takes_article(self) -> bool {
        !matches!(self, CategoryId::Restaurant)
    }

    /// Plural label used in per-city summaries
    pub fn label(self) -> &'static str {
        match self {
            CategoryId::Attraction => "attractions",
            CategoryId::Restaurant => "restaurants",
            CategoryId::Landmark => "landmarks",
            CategoryId::PerformingArts => "performing_arts",
            CategoryId::Cemetery => "cemeteries",
            CategoryId::College => "colleges",
        }
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Upstream result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Most popular first
    #[default]
    Popularity,
    /// Nearest to the `near` centre first
    Distance,
}

impl SortOrder {
    pub fn as_param(self) -> &'static str {
        match self {
            SortOrder::Popularity => "POPULARITY",
            SortOrder::Distance => "DISTANCE",
        }
    }
}

/// One category search for one city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceQuery {
    pub city: String,
    pub region: String,
    pub category: CategoryId,
}

impl PlaceQuery {
    pub fn new(city: &str, region: &str, category: CategoryId) -> Self {
        Self {
            city: city.to_string(),
            region: region.to_string(),
            category,
        }
    }

    /// Free-text location sent as the `near` parameter: "<city>, <region>"
    pub fn near(&self) -> String {
        format!("{}, {}", self.city, self.region)
    }
}

/// Minimal projection of a search result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPlace {
    #[serde(default)]
    pub name: String,
}

impl RawPlace {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order() {
        let mut chained = CategoryId::PRIMARY.to_vec();
        chained.extend_from_slice(&CategoryId::FALLBACK);
        assert_eq!(chained, CategoryId::ALL.to_vec());
    }

    #[test]
    fn test_only_restaurants_skip_article() {
        let skipping: Vec<_> = CategoryId::ALL
            .iter()
            .filter(|c| !c.takes_article())
            .collect();
        assert_eq!(skipping, vec![&CategoryId::Restaurant]);
    }

    #[test]
    fn test_near_string() {
        let query = PlaceQuery::new("Dalhart", "TX", CategoryId::Landmark);
        assert_eq!(query.near(), "Dalhart, TX");
    }

    #[test]
    fn test_raw_place_missing_name() {
        let place: RawPlace = serde_json::from_str(r#"{"fsq_id": "abc"}"#).unwrap();
        assert!(place.name.is_empty());
    }
}
