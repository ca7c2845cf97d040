//! Photo fallback heuristic
//!
//! OpenPlaques photos carry a free-text `shot_name` such as "plaque_close_up" or
//! "front_establish". Substring matching on that label is a best guess at what
//! the photo shows; it is only used when the enrichment data has no photo.

use crate::data::BasePhoto;

const PLAQUE_TERMS: &[&str] = &["plaque", "close"];
const SITE_TERMS: &[&str] = &["establish", "building", "long"];

fn label_matches(label: &str, terms: &[&str]) -> bool {
    let label = label.to_lowercase();
    terms.iter().any(|term| label.contains(term))
}

fn first_matching(photos: &[(&str, &str)], terms: &[&str]) -> Option<String> {
    photos
        .iter()
        .find(|(label, _)| label_matches(label, terms))
        .map(|(_, url)| url.to_string())
}

/// Base-derived photo URLs used when enrichment has none
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoFallback {
    pub plaque_image_url: Option<String>,
    pub site_image_url: Option<String>,
}

impl PhotoFallback {
    /// Pick the plaque and site photos from a base record's photo list
    ///
    /// - plaque: first photo whose label mentions a plaque term
    /// - site: first photo whose label mentions a site term, else the first photo
    ///
    /// Photos without a URL are skipped entirely.
    pub fn from_photos(photos: &[BasePhoto]) -> Self {
        let usable: Vec<(&str, &str)> = photos
            .iter()
            .filter_map(|p| {
                let url = p.url()?;
                Some((p.shot_name.as_deref().unwrap_or(""), url))
            })
            .collect();

        let plaque_image_url = first_matching(&usable, PLAQUE_TERMS);
        let site_image_url = first_matching(&usable, SITE_TERMS)
            .or_else(|| usable.first().map(|(_, url)| url.to_string()));

        PhotoFallback {
            plaque_image_url,
            site_image_url,
        }
    }
}
