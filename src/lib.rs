//! Legacy companion site
//!
//! Marketing and deep-link site for the Legacy iOS app (London Blue Plaques).
//!
//! - `resolver`: loads the bundled JSON datasets and produces Plaque records
//! - `data` / `model`: on-disk record shapes and the merged Plaque
//! - `photos` / `geo`: photo fallback heuristic and the Central London filter
//! - `server` / `web`: axum router, JSON endpoints and askama pages
//!
//! Run with: cargo run --bin site_server

pub mod cache;
pub mod config;
pub mod data;
pub mod error;
pub mod geo;
pub mod model;
pub mod photos;
pub mod resolver;
pub mod utils;

#[cfg(feature = "server")]
pub mod server;
#[cfg(feature = "server")]
pub mod web;

// Re-export commonly used types
pub use config::{ResolverConfig, SiteConfig, SourceMode, MAX_LISTING_LIMIT};
pub use error::PlaqueError;
pub use geo::{BoundingBox, CENTRAL_LONDON};
pub use model::Plaque;
pub use resolver::{merge_plaque, ListOptions, PlaqueResolver};
pub use utils::{format_name, truncate_with_ellipsis};

#[cfg(feature = "server")]
pub use server::{create_router, AppState};
