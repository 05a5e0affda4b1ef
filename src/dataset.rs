//! Target dataset: a GeoJSON-style feature collection whose features carry
//! `properties.name` and a `properties.POI` string.

use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::error::DatasetError;

/// A record the aligner can pair with and overwrite.
pub trait TargetRecord {
    /// Stable identifying key
    fn key(&self) -> &str;
    fn poi(&self) -> Option<&str>;
    fn set_poi(&mut self, poi: &str);
}

/// A feature object: `{"properties": {"name": ..., "POI": ...}, ...}`
impl TargetRecord for Value {
    fn key(&self) -> &str {
        self.pointer("/properties/name")
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    fn poi(&self) -> Option<&str> {
        self.pointer("/properties/POI").and_then(Value::as_str)
    }

    fn set_poi(&mut self, poi: &str) {
        if let Some(props) = self.get_mut("properties").and_then(Value::as_object_mut) {
            props.insert("POI".to_string(), Value::String(poi.to_string()));
        }
    }
}

/// Whole dataset document, kept as parsed JSON so unknown fields and key
/// order survive a rewrite.
#[derive(Debug, Clone)]
pub struct GeoDataset {
    document: Value,
}

impl GeoDataset {
    pub fn from_value(document: Value) -> Result<Self, DatasetError> {
        let features = document
            .get("features")
            .and_then(Value::as_array)
            .ok_or(DatasetError::MissingFeatures)?;
        if let Some(i) = features
            .iter()
            .position(|f| f.pointer("/properties/name").and_then(Value::as_str).is_none())
        {
            return Err(DatasetError::MissingName(i));
        }
        Ok(Self { document })
    }

    pub fn from_json(text: &str) -> Result<Self, DatasetError> {
        Self::from_value(serde_json::from_str(text)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let dataset = Self::from_json(&fs::read_to_string(path)?)?;
        info!(
            "Loaded {} features from {}",
            dataset.features().len(),
            path.display()
        );
        Ok(dataset)
    }

    pub fn features(&self) -> &[Value] {
        self.document
            .get("features")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn features_mut(&mut self) -> &mut [Value] {
        match self
            .document
            .get_mut("features")
            .and_then(Value::as_array_mut)
        {
            Some(features) => features.as_mut_slice(),
            None => &mut [],
        }
    }

    /// Compact JSON with non-ASCII text left unescaped
    pub fn to_json(&self) -> Result<String, DatasetError> {
        Ok(serde_json::to_string(&self.document)?)
    }

    /// Rewrite the whole document to `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), DatasetError> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, &self.document)?;
        writer.flush()?;
        info!("Saved dataset to {}", path.display());
        Ok(())
    }
}
