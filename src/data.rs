//! Dataset loading
//!
//! Reads the two bundled JSON files:
//! - base: the OpenPlaques export (numeric ids, inscriptions, photos)
//! - enrichment: hand-curated Plaque-shaped records keyed by `id` / `plaqueId`
//!
//! A file that is missing, unreadable, not JSON, or not a top-level array is
//! `DataUnavailable`. Individual records that do not decode are skipped.

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use crate::error::PlaqueError;
use crate::model::Plaque;
use crate::utils::lenient;

/// One photo attached to a base plaque
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BasePhoto {
    #[serde(default)]
    pub shot_name: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

impl BasePhoto {
    pub fn url(&self) -> Option<&str> {
        self.thumbnail_url.as_deref().filter(|u| !u.trim().is_empty())
    }
}

/// One record of the open-data export
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BasePlaque {
    #[serde(deserialize_with = "lenient::string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub inscription: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub photos: Option<Vec<BasePhoto>>,
}

impl BasePlaque {
    pub fn photos(&self) -> &[BasePhoto] {
        self.photos.as_deref().unwrap_or(&[])
    }
}

/// Enrichment records with an id / plaqueId lookup table
///
/// Lookups return the earliest record in file order that matches on either
/// field.
#[derive(Debug, Default)]
pub struct EnrichmentIndex {
    records: Vec<Plaque>,
    by_id: FxHashMap<String, usize>,
}

impl EnrichmentIndex {
    pub fn new(records: Vec<Plaque>) -> Self {
        let mut by_id = FxHashMap::default();
        for (idx, record) in records.iter().enumerate() {
            if !record.id.is_empty() {
                by_id.entry(record.id.clone()).or_insert(idx);
            }
            if let Some(ref plaque_id) = record.plaque_id {
                by_id.entry(plaque_id.clone()).or_insert(idx);
            }
        }
        EnrichmentIndex { records, by_id }
    }

    pub fn get(&self, id: &str) -> Option<&Plaque> {
        self.by_id.get(id).map(|&idx| &self.records[idx])
    }

    pub fn records(&self) -> &[Plaque] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub fn load_base_plaques(path: &Path) -> Result<Vec<BasePlaque>, PlaqueError> {
    read_records(path)
}

pub fn load_enrichments(path: &Path) -> Result<EnrichmentIndex, PlaqueError> {
    let index = EnrichmentIndex::new(read_records(path)?);
    tracing::debug!("Indexed {} enrichment records", index.len());
    Ok(index)
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, PlaqueError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| PlaqueError::unavailable(path, format!("read failed: {}", e)))?;

    let items = match serde_json::from_str::<Value>(&contents) {
        Ok(Value::Array(items)) => items,
        Ok(_) => return Err(PlaqueError::unavailable(path, "expected a top-level JSON array")),
        Err(e) => return Err(PlaqueError::unavailable(path, format!("invalid JSON: {}", e))),
    };

    let total = items.len();
    let mut records = Vec::with_capacity(total);
    for (idx, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<T>(item) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!("Skipping record {} in {}: {}", idx, path.display(), e),
        }
    }

    tracing::debug!("Loaded {}/{} records from {}", records.len(), total, path.display());
    Ok(records)
}
