//! Per-city POI records and the ordered city → POI association.

use serde::{Deserialize, Serialize};

/// Separator between place names inside a POI string
pub const PLACE_SEPARATOR: &str = " | ";

/// Separator between the city key and the quoted POI string
const KEY_SEPARATOR: &str = ": \"";

/// Points of interest selected for one city.
///
/// Built once by the aggregator and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityPoiRecord {
    pub city_key: String,
    pub places: Vec<String>,
}

impl CityPoiRecord {
    pub fn new(city_key: impl Into<String>, places: Vec<String>) -> Self {
        Self {
            city_key: city_key.into(),
            places,
        }
    }

    /// Places joined into the single string stored on a target record
    pub fn poi_string(&self) -> String {
        self.places.join(PLACE_SEPARATOR)
    }

    /// Render as one line of the intermediate file: `City: "a | b | c"`
    pub fn to_line(&self) -> String {
        format!("{}{}{}\"", self.city_key, KEY_SEPARATOR, self.poi_string())
    }

    /// Parse one line of the intermediate file.
    ///
    /// Returns `None` for lines without the `: "` separator or without the
    /// closing quote.
    pub fn parse_line(line: &str) -> Option<Self> {
        let (key, poi) = split_line(line)?;
        let places = if poi.is_empty() {
            Vec::new()
        } else {
            poi.split(PLACE_SEPARATOR).map(str::to_string).collect()
        };
        Some(Self::new(key, places))
    }
}

fn split_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    let (key, rest) = line.split_once(KEY_SEPARATOR)?;
    let poi = rest.strip_suffix('"')?;
    Some((key, poi))
}

/// One entry of the association: a city key and its joined POI string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoiEntry {
    pub key: String,
    pub poi: String,
}

/// Ordered sequence of city → POI string pairs.
///
/// Insertion order is the pairing order used by the aligner, so this is a
/// sequence rather than a map. Duplicate keys are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoiAssociation {
    entries: Vec<PoiEntry>,
}

impl PoiAssociation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, poi: impl Into<String>) {
        self.entries.push(PoiEntry {
            key: key.into(),
            poi: poi.into(),
        });
    }

    /// Parse the intermediate text format, skipping malformed lines
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .filter_map(split_line)
            .map(|(key, poi)| PoiEntry {
                key: key.to_string(),
                poi: poi.to_string(),
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[PoiEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PoiEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<&[CityPoiRecord]> for PoiAssociation {
    fn from(records: &[CityPoiRecord]) -> Self {
        let mut assoc = Self::new();
        for record in records {
            assoc.push(record.city_key.clone(), record.poi_string());
        }
        assoc
    }
}

impl<'a> IntoIterator for &'a PoiAssociation {
    type Item = &'a PoiEntry;
    type IntoIter = std::slice::Iter<'a, PoiEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
