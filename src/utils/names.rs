//! Display name helpers
//!
//! The base dataset stores most people as "Last, First". Cards and detail pages
//! show them the natural way round.

/// Format a plaque title for display
///
/// Returns: "First Last" for "Last, First", the input unchanged when it has no
/// comma, or "Unknown" when there is no name at all.
pub fn format_name(name: Option<&str>) -> String {
    let name = match name {
        Some(n) if !n.is_empty() => n,
        _ => return "Unknown".to_string(),
    };

    match name.split_once(',') {
        Some((last, first)) => format!("{} {}", first.trim(), last.trim()),
        None => name.to_string(),
    }
}

/// "1874-1965" when both years are known, nothing otherwise
pub fn lifespan(birth_year: Option<i32>, death_year: Option<i32>) -> Option<String> {
    match (birth_year, death_year) {
        (Some(birth), Some(death)) => Some(format!("{}-{}", birth, death)),
        _ => None,
    }
}
