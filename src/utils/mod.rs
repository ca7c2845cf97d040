//! Utility modules shared by the resolver and the page layer
//!
//! - Lenient: serde decoders for loosely typed JSON fields
//! - Names: "Last, First" display formatting and lifespans
//! - Text: character-safe previews

pub mod lenient;
pub mod names;
pub mod text;

// Re-export commonly used helpers
pub use names::{format_name, lifespan};
pub use text::truncate_with_ellipsis;
