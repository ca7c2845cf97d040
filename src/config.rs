//! Configuration from environment variables
//!
//! Read once at startup. Values that fail to parse fall back to their defaults
//! with a warning rather than stopping the server.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use crate::geo::{BoundingBox, CENTRAL_LONDON};

/// Hard ceiling on listing size, whatever the caller asks for
pub const MAX_LISTING_LIMIT: usize = 100;

pub const DEFAULT_DATA_DIR: &str = "public/data";
pub const DEFAULT_BASE_FILE: &str = "openplaques_uk.json";
pub const DEFAULT_ENRICHED_FILE: &str = "plaques.json";
pub const DEFAULT_SITE_URL: &str = "https://legacyrun.vercel.app";
pub const APP_STORE_URL: &str = "https://apps.apple.com/us/app/explore-london-legacy/id6754275366";
pub const SUPPORT_EMAIL: &str = "contact@dy-lan.com";

/// Where plaque records come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceMode {
    /// Curated enrichment file only, records returned as stored
    EnrichedOnly,
    /// Base export joined with the enrichment file
    #[default]
    Merged,
}

impl FromStr for SourceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "merged" | "merge" => Ok(SourceMode::Merged),
            "enriched" | "enriched-only" | "enriched_only" => Ok(SourceMode::EnrichedOnly),
            other => Err(format!("unknown source mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub data_dir: PathBuf,
    pub base_file: String,
    pub enriched_file: String,
    pub source_mode: SourceMode,
    pub region: BoundingBox,
    pub region_filter_on_lookup: bool,
    pub region_filter_on_listing: bool,
    pub listing_limit: usize,
    pub cache_datasets: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            base_file: DEFAULT_BASE_FILE.to_string(),
            enriched_file: DEFAULT_ENRICHED_FILE.to_string(),
            source_mode: SourceMode::Merged,
            region: CENTRAL_LONDON,
            region_filter_on_lookup: true,
            region_filter_on_listing: false,
            listing_limit: MAX_LISTING_LIMIT,
            cache_datasets: false,
        }
    }
}

impl ResolverConfig {
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        ResolverConfig {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    /// Single-file lookup over the curated records, no region filter
    pub fn enriched_only(data_dir: impl Into<PathBuf>) -> Self {
        ResolverConfig {
            source_mode: SourceMode::EnrichedOnly,
            region_filter_on_lookup: false,
            ..Self::with_data_dir(data_dir)
        }
    }

    pub fn base_path(&self) -> PathBuf {
        self.data_dir.join(&self.base_file)
    }

    pub fn enriched_path(&self) -> PathBuf {
        self.data_dir.join(&self.enriched_file)
    }

    pub fn from_env() -> Self {
        Self::from_vars(&EnvVars::process())
    }

    fn from_vars<F: Fn(&str) -> Option<String>>(vars: &EnvVars<F>) -> Self {
        let defaults = ResolverConfig::default();
        let source_mode = vars.parsed("SOURCE_MODE", defaults.source_mode);
        // The enriched-only lookup is unfiltered unless asked otherwise
        let lookup_default = match source_mode {
            SourceMode::EnrichedOnly => false,
            SourceMode::Merged => defaults.region_filter_on_lookup,
        };

        ResolverConfig {
            data_dir: vars
                .string("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            base_file: vars.string("BASE_DATA_FILE").unwrap_or(defaults.base_file),
            enriched_file: vars.string("ENRICHED_DATA_FILE").unwrap_or(defaults.enriched_file),
            source_mode,
            region: defaults.region,
            region_filter_on_lookup: vars.bool("LOOKUP_REGION_FILTER", lookup_default),
            region_filter_on_listing: vars.bool("LISTING_REGION_FILTER", defaults.region_filter_on_listing),
            listing_limit: vars.parsed("LISTING_LIMIT", defaults.listing_limit).min(MAX_LISTING_LIMIT),
            cache_datasets: vars.bool("CACHE_DATASETS", defaults.cache_datasets),
        }
    }
}

/// Everything the server binary needs
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub host: IpAddr,
    pub port: u16,
    pub site_url: String,
    pub resolver: ResolverConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            site_url: DEFAULT_SITE_URL.to_string(),
            resolver: ResolverConfig::default(),
        }
    }
}

impl SiteConfig {
    pub fn from_env() -> Self {
        Self::from_vars(&EnvVars::process())
    }

    fn from_vars<F: Fn(&str) -> Option<String>>(vars: &EnvVars<F>) -> Self {
        let defaults = SiteConfig::default();
        SiteConfig {
            host: vars.parsed("HOST", defaults.host),
            port: vars.parsed("PORT", defaults.port),
            site_url: vars
                .string("SITE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.site_url),
            resolver: ResolverConfig::from_vars(vars),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Variable source: the process environment, or a fixed table in tests
struct EnvVars<F> {
    lookup: F,
}

fn process_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

impl EnvVars<fn(&str) -> Option<String>> {
    fn process() -> Self {
        EnvVars { lookup: process_var }
    }
}

impl<F: Fn(&str) -> Option<String>> EnvVars<F> {
    /// Blank values count as unset
    fn string(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    fn parsed<T>(&self, key: &str, default: T) -> T
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.string(key) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
                tracing::warn!("Ignoring {}={:?}: {}", key, raw, e);
                default
            }),
            None => default,
        }
    }

    fn bool(&self, key: &str, default: bool) -> bool {
        match self.string(key) {
            Some(raw) => parse_bool(&raw).unwrap_or_else(|| {
                tracing::warn!("Ignoring {}={:?}: expected true/false", key, raw);
                default
            }),
            None => default,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
