//! Plaque Data Resolver
//!
//! The one place that turns the two JSON files into Plaque records. Pages, the
//! JSON endpoint and the listing all go through here, so filtering and merge
//! rules cannot drift apart between call sites.
//!
//! Two source modes:
//! - `Merged`: base export joined with enrichment, enrichment fields on top
//! - `EnrichedOnly`: curated records returned exactly as stored
//!
//! The infallible entry points (`find_by_id`, `list_all`) log data failures and
//! degrade to "not found" / empty. The `try_` variants surface them.

use std::path::Path;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::cache::DatasetCache;
use crate::config::{ResolverConfig, SourceMode, MAX_LISTING_LIMIT};
use crate::data::{self, BasePlaque, EnrichmentIndex};
use crate::error::PlaqueError;
use crate::model::Plaque;
use crate::photos::PhotoFallback;

/// Arguments to `list_all`; `None` means "use the configured default"
#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    pub limit: Option<usize>,
    pub region_filter: Option<bool>,
}

/// Build the merged record for one base plaque
///
/// Base-derived fields first (subtitle is the inscription, else the address;
/// photos come from the label heuristic), then every field the enrichment
/// record defines on top.
pub fn merge_plaque(base: &BasePlaque, enrichment: Option<&Plaque>) -> Plaque {
    let photos = PhotoFallback::from_photos(base.photos());
    let non_empty = |s: &Option<String>| s.clone().filter(|v| !v.is_empty());

    let mut plaque = Plaque {
        id: base.id.clone(),
        title: base.title.clone(),
        subtitle: non_empty(&base.inscription).or_else(|| non_empty(&base.address)),
        latitude: base.latitude,
        longitude: base.longitude,
        url: base.uri.clone(),
        address_only: base.address.clone(),
        inscription_only: base.inscription.clone(),
        plaque_image_url: photos.plaque_image_url,
        site_image_url: photos.site_image_url,
        ..Default::default()
    };

    if let Some(enrichment) = enrichment {
        plaque.overlay(enrichment);
    }
    plaque
}

pub struct PlaqueResolver {
    config: ResolverConfig,
    base_cache: Option<DatasetCache<Vec<BasePlaque>>>,
    enrichment_cache: Option<DatasetCache<EnrichmentIndex>>,
}

impl PlaqueResolver {
    pub fn new(config: ResolverConfig) -> Self {
        let (base_cache, enrichment_cache) = if config.cache_datasets {
            (Some(DatasetCache::new(4)), Some(DatasetCache::new(4)))
        } else {
            (None, None)
        };

        PlaqueResolver {
            config,
            base_cache,
            enrichment_cache,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    // ========== Lookup ==========

    /// Single plaque by identifier; data failures are logged and read as absent
    pub fn find_by_id(&self, id: &str) -> Option<Plaque> {
        match self.try_find_by_id(id) {
            Ok(plaque) => plaque,
            Err(e) => {
                tracing::error!("Plaque lookup for {} failed: {}", id, e);
                None
            }
        }
    }

    pub fn try_find_by_id(&self, id: &str) -> Result<Option<Plaque>, PlaqueError> {
        let plaque = match self.config.source_mode {
            SourceMode::EnrichedOnly => self.find_enriched(id)?,
            SourceMode::Merged => self.find_merged(id)?,
        };

        if plaque.is_none() {
            tracing::debug!("Plaque {} not found ({:?})", id, self.config.source_mode);
        }
        Ok(plaque)
    }

    /// Like `try_find_by_id`, with absence as `PlaqueError::NotFound`
    pub fn get(&self, id: &str) -> Result<Plaque, PlaqueError> {
        self.try_find_by_id(id)?
            .ok_or_else(|| PlaqueError::NotFound(id.to_string()))
    }

    fn find_enriched(&self, id: &str) -> Result<Option<Plaque>, PlaqueError> {
        let enrichments = self.enrichments()?;
        Ok(enrichments
            .get(id)
            .filter(|p| !self.config.region_filter_on_lookup || self.in_region(p.latitude, p.longitude))
            .cloned())
    }

    fn find_merged(&self, id: &str) -> Result<Option<Plaque>, PlaqueError> {
        let base_plaques = self.base_plaques()?;
        let base = match base_plaques.iter().find(|b| b.id == id) {
            Some(base) => base,
            None => return Ok(None),
        };

        if self.config.region_filter_on_lookup && !self.in_region(base.latitude, base.longitude) {
            tracing::debug!("Plaque {} is outside the configured region", id);
            return Ok(None);
        }

        let enrichments = self.enrichments()?;
        Ok(Some(merge_plaque(base, enrichments.get(&base.id))))
    }

    // ========== Listing ==========

    /// Plaques in file order, at most `MAX_LISTING_LIMIT`; failures yield an empty list
    pub fn list_all(&self, options: ListOptions) -> Vec<Plaque> {
        self.try_list_all(options).unwrap_or_else(|e| {
            tracing::error!("Plaque listing failed: {}", e);
            Vec::new()
        })
    }

    pub fn try_list_all(&self, options: ListOptions) -> Result<Vec<Plaque>, PlaqueError> {
        let limit = options
            .limit
            .unwrap_or(self.config.listing_limit)
            .min(MAX_LISTING_LIMIT);
        let filter = options
            .region_filter
            .unwrap_or(self.config.region_filter_on_listing);

        // A repeated id lists once, as its first record (the one lookup returns)
        let mut seen = FxHashSet::default();

        let plaques: Vec<Plaque> = match self.config.source_mode {
            SourceMode::EnrichedOnly => self
                .enrichments()?
                .records()
                .iter()
                .filter(|p| p.id.is_empty() || seen.insert(p.id.clone()))
                .filter(|p| !filter || self.in_region(p.latitude, p.longitude))
                .take(limit)
                .cloned()
                .collect(),
            SourceMode::Merged => {
                let base_plaques = self.base_plaques()?;
                let enrichments = self.enrichments()?;
                base_plaques
                    .iter()
                    .filter(|b| seen.insert(b.id.clone()))
                    .filter(|b| !filter || self.in_region(b.latitude, b.longitude))
                    .take(limit)
                    .map(|b| merge_plaque(b, enrichments.get(&b.id)))
                    .collect()
            }
        };

        tracing::debug!(
            "Listed {} plaques (limit {}, region filter {})",
            plaques.len(),
            limit,
            filter
        );
        Ok(plaques)
    }

    // ========== Data access ==========

    fn in_region(&self, latitude: Option<f64>, longitude: Option<f64>) -> bool {
        self.config.region.contains_opt(latitude, longitude)
    }

    fn base_plaques(&self) -> Result<Arc<Vec<BasePlaque>>, PlaqueError> {
        load_through(
            self.base_cache.as_ref(),
            &self.config.base_path(),
            data::load_base_plaques,
        )
    }

    fn enrichments(&self) -> Result<Arc<EnrichmentIndex>, PlaqueError> {
        load_through(
            self.enrichment_cache.as_ref(),
            &self.config.enriched_path(),
            data::load_enrichments,
        )
    }
}

fn load_through<T, F>(
    cache: Option<&DatasetCache<T>>,
    path: &Path,
    load: F,
) -> Result<Arc<T>, PlaqueError>
where
    T: Send + Sync + 'static,
    F: FnOnce(&Path) -> Result<T, PlaqueError>,
{
    match cache {
        Some(cache) => cache.get_or_load(path, load),
        None => load(path).map(Arc::new),
    }
}
