//! Core data models for the POI enrichment pipeline.

pub mod category;
pub mod poi;

pub use category::{CategoryId, PlaceQuery, RawPlace, SortOrder};
pub use poi::{CityPoiRecord, PoiAssociation, PoiEntry, PLACE_SEPARATOR};
