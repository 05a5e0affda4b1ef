//! POI aggregation for a single city.
//!
//! Primary categories are always queried and fully consumed. Fallback
//! categories are queried one at a time, in fixed order, only while the
//! output is below budget, and stop contributing as soon as it is reached.

use std::fmt;

use hashbrown::HashSet;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::{CategoryId, CityPoiRecord, PlaceQuery, SortOrder};
use crate::naming::{add_article, clean_name};
use crate::search::PlaceSearch;

/// Limits applied while assembling a city's POI list.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Output cap, enforced from the fallback stage onward
    pub budget: usize,
    /// Names accepted per category search
    pub per_category: usize,
    /// Result count requested from upstream
    pub upstream_limit: usize,
    /// Names shorter than this (in chars, after cleaning) are dropped
    pub min_name_len: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            budget: 6,
            per_category: 2,
            upstream_limit: 10,
            min_name_len: 3,
        }
    }
}

/// How many names each category contributed, in query order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTally {
    counts: Vec<(CategoryId, usize)>,
}

impl CategoryTally {
    fn record(&mut self, category: CategoryId) {
        match self.counts.iter_mut().find(|(c, _)| *c == category) {
            Some((_, n)) => *n += 1,
            None => self.counts.push((category, 1)),
        }
    }

    pub fn get(&self, category: CategoryId) -> usize {
        self.counts
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

impl fmt::Display for CategoryTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .counts
            .iter()
            .map(|(category, n)| format!("{} {}", n, category))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Result of aggregating one city.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub places: Vec<String>,
    pub tally: CategoryTally,
}

impl Aggregation {
    /// A city with no places yields no record
    pub fn into_record(self, city_key: &str) -> Option<CityPoiRecord> {
        if self.places.is_empty() {
            None
        } else {
            Some(CityPoiRecord::new(city_key, self.places))
        }
    }
}

/// Case-insensitive accumulator of accepted names.
#[derive(Default)]
struct Accumulator {
    seen: HashSet<String>,
    names: Vec<String>,
}

impl Accumulator {
    /// Append unless an equal name (ignoring case) is already present
    fn offer(&mut self, name: String) -> bool {
        if self.seen.insert(name.to_lowercase()) {
            self.names.push(name);
            true
        } else {
            false
        }
    }

    fn len(&self) -> usize {
        self.names.len()
    }
}

pub struct Aggregator<'a, S: PlaceSearch + ?Sized> {
    search: &'a S,
    config: AggregatorConfig,
}

impl<'a, S: PlaceSearch + ?Sized> Aggregator<'a, S> {
    pub fn new(search: &'a S, config: AggregatorConfig) -> Self {
        Self { search, config }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Fetch up to `per_category` distinct names for one category.
    ///
    /// Search failures are logged and yield an empty list.
    pub async fn fetch_category(
        &self,
        city: &str,
        region: &str,
        category: CategoryId,
    ) -> Vec<String> {
        let query = PlaceQuery::new(city, region, category);
        let results = match self
            .search
            .search(&query, self.config.upstream_limit, SortOrder::Popularity)
            .await
        {
            Ok(results) => results,
            Err(e) => {
                warn!("Error getting {} for {}, {}: {}", category, city, region, e);
                return Vec::new();
            }
        };

        let mut accepted = Accumulator::default();
        for place in results {
            if accepted.len() >= self.config.per_category {
                break;
            }
            let name = clean_name(&place.name);
            if name.chars().count() < self.config.min_name_len {
                continue;
            }
            let name = if category.takes_article() {
                add_article(&name).into_owned()
            } else {
                name
            };
            accepted.offer(name);
        }

        debug!("{} for {}, {}: {:?}", category, city, region, accepted.names);
        accepted.names
    }

    /// Assemble the POI list for one city.
    pub async fn aggregate(&self, city: &str, region: &str) -> Aggregation {
        let mut output = Accumulator::default();
        let mut tally = CategoryTally::default();

        for category in CategoryId::PRIMARY {
            for name in self.fetch_category(city, region, category).await {
                if output.offer(name) {
                    tally.record(category);
                }
            }
        }

        for category in CategoryId::FALLBACK {
            if output.len() >= self.config.budget {
                break;
            }
            for name in self.fetch_category(city, region, category).await {
                if output.len() >= self.config.budget {
                    break;
                }
                if output.offer(name) {
                    tally.record(category);
                }
            }
        }

        Aggregation {
            places: output.names,
            tally,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::testing::FakeSearch;

    fn assert_distinct(places: &[String]) {
        let lowered: HashSet<String> = places.iter().map(|p| p.to_lowercase()).collect();
        assert_eq!(lowered.len(), places.len(), "duplicates in {:?}", places);
    }

    #[tokio::test]
    async fn test_fetch_category_filters_and_normalizes() {
        let search = FakeSearch::default().with(
            CategoryId::Landmark,
            &["", "  ", "Al", "City Museum", "the city museum", "Town Square", "Third"],
        );
        let aggregator = Aggregator::new(&search, AggregatorConfig::default());

        let names = aggregator
            .fetch_category("Dalhart", "TX", CategoryId::Landmark)
            .await;
        assert_eq!(names, vec!["the City Museum", "Town Square"]);
        assert_eq!(*search.calls.lock().unwrap(), vec![(CategoryId::Landmark, 10)]);
    }

    #[tokio::test]
    async fn test_restaurants_not_normalized() {
        let search = FakeSearch::default().with(
            CategoryId::Restaurant,
            &["Riverside Park", "Joe's Diner"],
        );
        let aggregator = Aggregator::new(&search, AggregatorConfig::default());

        let names = aggregator
            .fetch_category("Austin", "TX", CategoryId::Restaurant)
            .await;
        assert_eq!(names, vec!["Riverside Park", "Joe's Diner"]);
    }

    #[tokio::test]
    async fn test_trimmed_names_kept() {
        let search = FakeSearch::default().with(CategoryId::Attraction, &["  Zoo  ", " ab "]);
        let aggregator = Aggregator::new(&search, AggregatorConfig::default());

        let names = aggregator
            .fetch_category("Austin", "TX", CategoryId::Attraction)
            .await;
        assert_eq!(names, vec!["the Zoo"]);
    }

    #[tokio::test]
    async fn test_search_failure_is_empty() {
        let search = FakeSearch::default().failing(CategoryId::Attraction);
        let aggregator = Aggregator::new(&search, AggregatorConfig::default());

        let names = aggregator
            .fetch_category("Austin", "TX", CategoryId::Attraction)
            .await;
        assert!(names.is_empty());
    }

    #[tokio::test]
    async fn test_primary_full_skips_fallback() {
        let search = FakeSearch::default()
            .with(CategoryId::Attraction, &["City Museum", "Art Gallery"])
            .with(CategoryId::Restaurant, &["Joe's Diner", "Taco Hut"])
            .with(CategoryId::Landmark, &["Clock Tower", "Old Mill"])
            .with(CategoryId::PerformingArts, &["Opera House"]);
        let aggregator = Aggregator::new(&search, AggregatorConfig::default());

        let result = aggregator.aggregate("Dalhart", "TX").await;
        assert_eq!(
            result.places,
            vec![
                "the City Museum",
                "the Art Gallery",
                "Joe's Diner",
                "Taco Hut",
                "Clock Tower",
                "Old Mill"
            ]
        );
        assert_eq!(search.queried(), CategoryId::PRIMARY.to_vec());
    }

    #[tokio::test]
    async fn test_fallback_respects_budget() {
        let search = FakeSearch::default()
            .with(CategoryId::Attraction, &["One Place", "Two Place"])
            .with(CategoryId::Restaurant, &["Three Place", "Four Place"])
            .with(
                CategoryId::PerformingArts,
                &["Five Hall", "Six Hall", "Seven Hall", "Eight Hall", "Nine Hall"],
            )
            .with(CategoryId::Cemetery, &["Evergreen Cemetery"]);
        let config = AggregatorConfig {
            per_category: 5,
            ..AggregatorConfig::default()
        };
        let aggregator = Aggregator::new(&search, config);

        let result = aggregator.aggregate("Dalhart", "TX").await;
        assert_eq!(result.places.len(), 6);
        assert_eq!(&result.places[4..], &["Five Hall", "Six Hall"]);
        assert_eq!(result.tally.get(CategoryId::PerformingArts), 2);
        assert_eq!(
            search.queried(),
            vec![
                CategoryId::Attraction,
                CategoryId::Restaurant,
                CategoryId::Landmark,
                CategoryId::PerformingArts,
            ]
        );
    }

    #[tokio::test]
    async fn test_fallback_chain_order() {
        let search = FakeSearch::default()
            .with(CategoryId::Attraction, &["Art Walk"])
            .with(CategoryId::Cemetery, &["Evergreen Cemetery", "Rose Hill"])
            .with(CategoryId::College, &["State College", "Tech Institute", "Extra U"]);
        let aggregator = Aggregator::new(&search, AggregatorConfig::default());

        let result = aggregator.aggregate("Dalhart", "TX").await;
        assert_eq!(
            result.places,
            vec![
                "Art Walk",
                "Evergreen Cemetery",
                "Rose Hill",
                "State College",
                "Tech Institute"
            ]
        );
        assert_eq!(search.queried(), CategoryId::ALL.to_vec());
        assert_eq!(
            result.tally.to_string(),
            "1 attractions, 2 cemeteries, 2 colleges"
        );
    }

    #[tokio::test]
    async fn test_cross_category_dedup_ignores_case() {
        let search = FakeSearch::default()
            .with(CategoryId::Attraction, &["City Museum"])
            .with(CategoryId::Restaurant, &["THE CITY MUSEUM"])
            .with(CategoryId::Landmark, &["the city museum", "Clock Tower"])
            .with(CategoryId::PerformingArts, &["Clock Tower", "Civic Theater"]);
        let aggregator = Aggregator::new(&search, AggregatorConfig::default());

        let result = aggregator.aggregate("Dalhart", "TX").await;
        assert_eq!(
            result.places,
            vec!["the City Museum", "Clock Tower", "the Civic Theater"]
        );
        assert_eq!(result.tally.get(CategoryId::Restaurant), 0);
    }

    #[tokio::test]
    async fn test_failed_category_does_not_stop_chain() {
        let search = FakeSearch::default()
            .failing(CategoryId::Attraction)
            .failing(CategoryId::PerformingArts)
            .with(CategoryId::Restaurant, &["Joe's Diner"])
            .with(CategoryId::Cemetery, &["Evergreen Cemetery"]);
        let aggregator = Aggregator::new(&search, AggregatorConfig::default());

        let result = aggregator.aggregate("Dalhart", "TX").await;
        assert_eq!(result.places, vec!["Joe's Diner", "Evergreen Cemetery"]);
        assert_eq!(search.queried().len(), 6);
    }

    #[tokio::test]
    async fn test_empty_city_has_no_record() {
        let search = FakeSearch::default();
        let aggregator = Aggregator::new(&search, AggregatorConfig::default());

        let result = aggregator.aggregate("Nowhere", "TX").await;
        assert_eq!(search.queried(), CategoryId::ALL.to_vec());
        assert!(result.into_record("Nowhere").is_none());
    }

    #[tokio::test]
    async fn test_primary_stage_is_uncapped() {
        let search = FakeSearch::default()
            .with(CategoryId::Attraction, &["A one", "A two", "A three"])
            .with(CategoryId::Restaurant, &["R one", "R two", "R three"])
            .with(CategoryId::Landmark, &["L one", "L two", "L three"]);
        let config = AggregatorConfig {
            per_category: 3,
            ..AggregatorConfig::default()
        };
        let aggregator = Aggregator::new(&search, config);

        let result = aggregator.aggregate("Dalhart", "TX").await;
        assert_eq!(result.places.len(), 9);
        assert_eq!(search.queried(), CategoryId::PRIMARY.to_vec());
    }

    #[tokio::test]
    async fn test_budget_and_uniqueness_hold() {
        let pool: [&'static str; 8] = [
            "Alpha Park", "alpha park", "Beta Hall", "Gamma Zoo", "Delta Church",
            "Epsilon", "Zeta Library", "Eta Garden",
        ];
        for primary_len in 0..=2 {
            for fallback_len in 0..=pool.len() {
                let search = FakeSearch::default()
                    .with(CategoryId::Attraction, &pool[..primary_len])
                    .with(CategoryId::Landmark, &pool[primary_len..primary_len * 2])
                    .with(CategoryId::PerformingArts, &pool[..fallback_len])
                    .with(CategoryId::Cemetery, &pool[fallback_len / 2..])
                    .with(CategoryId::College, &pool);
                let config = AggregatorConfig {
                    per_category: 4,
                    ..AggregatorConfig::default()
                };
                let aggregator = Aggregator::new(&search, config);

                let result = aggregator.aggregate("Dalhart", "TX").await;
                assert!(result.places.len() <= 6);
                assert_distinct(&result.places);
            }
        }
    }

    #[tokio::test]
    async fn test_into_record() {
        let search = FakeSearch::default().with(CategoryId::Landmark, &["Clock Tower"]);
        let aggregator = Aggregator::new(&search, AggregatorConfig::default());

        let record = aggregator
            .aggregate("Dalhart", "TX")
            .await
            .into_record("Dalhart")
            .unwrap();
        assert_eq!(record.city_key, "Dalhart");
        assert_eq!(record.to_line(), "Dalhart: \"Clock Tower\"");
    }

    #[tokio::test]
    async fn test_awkward_names_survive_line_format() {
        use crate::models::PoiAssociation;

        let search = FakeSearch::default()
            .with(CategoryId::Restaurant, &["Bar | Grill", "Zilker\tCafe"])
            .with(CategoryId::Landmark, &["Two\nLines Park", "|\n|"]);
        let aggregator = Aggregator::new(&search, AggregatorConfig::default());

        let mut text = String::new();
        for city in ["A", "B", "C"] {
            let record = aggregator
                .aggregate(city, "TX")
                .await
                .into_record(city)
                .unwrap();
            text.push_str(&record.to_line());
            text.push('\n');
        }

        let assoc = PoiAssociation::parse(&text);
        let keys: Vec<_> = assoc.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["A", "B", "C"]);

        let record = CityPoiRecord::parse_line(text.lines().nth(1).unwrap()).unwrap();
        assert_eq!(
            record.places,
            vec!["Bar / Grill", "Zilker Cafe", "the Two Lines Park", "/ /"]
        );
    }
}
