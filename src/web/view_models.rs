//! View models for the HTML pages
//!
//! Templates never see a raw Plaque: names are formatted, long narrative text is
//! cut down and fact lists are shortened here, so the rules are testable without
//! rendering anything.

use crate::config::APP_STORE_URL;
use crate::model::Plaque;
use crate::utils::{format_name, lifespan, truncate_with_ellipsis};

pub const LOCATION_STORY_PREVIEW_CHARS: usize = 300;
pub const BIOGRAPHY_PREVIEW_CHARS: usize = 400;
pub const FACTS_PREVIEW_COUNT: usize = 3;

const OG_DESCRIPTION_CHARS: usize = 200;
const DEFAULT_DESCRIPTION: &str = "Discover this London Blue Plaque with the Legacy app";

pub const SITE_NAME: &str = "Legacy";

fn plaque_href(id: &str) -> String {
    format!("/plaque/{}", urlencoding::encode(id))
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

/// Typed year, else a numeric string the record kept raw under `key`
fn year_of(plaque: &Plaque, typed: Option<i32>, key: &str) -> Option<i32> {
    typed.or_else(|| plaque.extra.get(key)?.as_str()?.trim().parse().ok())
}

fn plaque_lifespan(plaque: &Plaque) -> Option<String> {
    lifespan(
        year_of(plaque, plaque.birth_year, "birthYear"),
        year_of(plaque, plaque.death_year, "deathYear"),
    )
}

// ============================================================================
// Shared layout
// ============================================================================

/// Open Graph tags for link unfurling
#[derive(Debug, Clone)]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    pub url: String,
    pub image: Option<String>,
    pub site_name: &'static str,
}

/// Everything base.html needs
#[derive(Debug, Clone)]
pub struct Layout {
    pub title: String,
    pub description: String,
    pub app_store_url: &'static str,
    pub year: i32,
    pub og: Option<OpenGraph>,
}

impl Layout {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        use chrono::Datelike;

        Layout {
            title: title.into(),
            description: description.into(),
            app_store_url: APP_STORE_URL,
            year: chrono::Utc::now().year(),
            og: None,
        }
    }

    pub fn with_open_graph(mut self, og: OpenGraph) -> Self {
        self.og = Some(og);
        self
    }
}

// ============================================================================
// Listing card
// ============================================================================

#[derive(Debug, Clone)]
pub struct PlaqueCard {
    pub id: String,
    pub href: String,
    pub display_name: String,
    pub profession: Option<String>,
    pub lifespan: Option<String>,
    pub address: Option<String>,
    /// Portrait preferred, plaque photo otherwise
    pub image_url: Option<String>,
}

impl From<&Plaque> for PlaqueCard {
    fn from(plaque: &Plaque) -> Self {
        PlaqueCard {
            id: plaque.id.clone(),
            href: plaque_href(&plaque.id),
            display_name: format_name(plaque.title.as_deref()),
            profession: non_empty(&plaque.profession),
            lifespan: plaque_lifespan(plaque),
            address: non_empty(&plaque.address_only),
            image_url: non_empty(&plaque.portrait_image_url)
                .or_else(|| non_empty(&plaque.plaque_image_url)),
        }
    }
}

// ============================================================================
// Detail page
// ============================================================================

#[derive(Debug, Clone)]
pub struct RelatedLink {
    pub id: String,
    pub href: String,
}

#[derive(Debug, Clone)]
pub struct PlaqueDetail {
    pub id: String,
    pub display_name: String,
    pub subtitle: Option<String>,
    pub profession: Option<String>,
    pub lifespan: Option<String>,
    pub year: Option<String>,
    pub address: Option<String>,
    pub inscription: Option<String>,
    pub coordinates: Option<String>,
    pub location_story: Option<String>,
    pub biography: Option<String>,
    pub key_facts: Vec<String>,
    pub fun_facts: Vec<String>,
    pub plaque_image_url: Option<String>,
    pub site_image_url: Option<String>,
    pub portrait_image_url: Option<String>,
    pub source_url: Option<String>,
    pub related: Vec<RelatedLink>,
}

fn first_facts(facts: &Option<Vec<String>>) -> Vec<String> {
    facts
        .as_deref()
        .unwrap_or(&[])
        .iter()
        .take(FACTS_PREVIEW_COUNT)
        .cloned()
        .collect()
}

impl From<&Plaque> for PlaqueDetail {
    fn from(plaque: &Plaque) -> Self {
        let coordinates = match (plaque.latitude, plaque.longitude) {
            (Some(lat), Some(lon)) => Some(format!("{:.4}, {:.4}", lat, lon)),
            _ => None,
        };

        PlaqueDetail {
            id: plaque.id.clone(),
            display_name: format_name(plaque.title.as_deref()),
            subtitle: non_empty(&plaque.subtitle),
            profession: non_empty(&plaque.profession),
            lifespan: plaque_lifespan(plaque),
            year: non_empty(&plaque.year),
            address: non_empty(&plaque.address_only),
            inscription: non_empty(&plaque.inscription_only),
            coordinates,
            location_story: non_empty(&plaque.location_story)
                .map(|s| truncate_with_ellipsis(&s, LOCATION_STORY_PREVIEW_CHARS)),
            biography: non_empty(&plaque.biography)
                .map(|s| truncate_with_ellipsis(&s, BIOGRAPHY_PREVIEW_CHARS)),
            key_facts: first_facts(&plaque.key_facts),
            fun_facts: first_facts(&plaque.fun_facts),
            plaque_image_url: non_empty(&plaque.plaque_image_url),
            site_image_url: non_empty(&plaque.site_image_url),
            portrait_image_url: non_empty(&plaque.portrait_image_url),
            source_url: non_empty(&plaque.url),
            related: plaque
                .related_plaque_ids
                .as_deref()
                .unwrap_or(&[])
                .iter()
                .filter(|id| !id.is_empty() && **id != plaque.id)
                .map(|id| RelatedLink {
                    id: id.clone(),
                    href: plaque_href(id),
                })
                .collect(),
        }
    }
}

impl PlaqueDetail {
    pub fn open_graph(&self, site_url: &str) -> OpenGraph {
        let description = self
            .biography
            .as_deref()
            .or(self.subtitle.as_deref())
            .map(|text| truncate_with_ellipsis(text, OG_DESCRIPTION_CHARS))
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

        OpenGraph {
            title: format!("{} - {}", self.display_name, SITE_NAME),
            description,
            url: format!("{}{}", site_url.trim_end_matches('/'), plaque_href(&self.id)),
            image: self
                .portrait_image_url
                .clone()
                .or_else(|| self.plaque_image_url.clone())
                .or_else(|| self.site_image_url.clone()),
            site_name: SITE_NAME,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plaque() -> Plaque {
        Plaque {
            id: "101".to_string(),
            title: Some("Churchill, Winston".to_string()),
            subtitle: Some("Sir Winston Churchill lived here".to_string()),
            latitude: Some(51.50153),
            longitude: Some(-0.17834),
            profession: Some("Prime Minister".to_string()),
            birth_year: Some(1874),
            death_year: Some(1965),
            plaque_image_url: Some("https://img/plaque.jpg".to_string()),
            key_facts: Some((1..=5).map(|i| format!("Key fact {}", i)).collect()),
            fun_facts: Some(vec!["Only fun fact".to_string()]),
            related_plaque_ids: Some(vec!["102".to_string(), "101".to_string()]),
            ..Default::default()
        }
    }

    #[test]
    fn test_card() {
        let card = PlaqueCard::from(&plaque());
        assert_eq!(card.display_name, "Winston Churchill");
        assert_eq!(card.href, "/plaque/101");
        assert_eq!(card.lifespan.as_deref(), Some("1874-1965"));
        assert_eq!(card.image_url.as_deref(), Some("https://img/plaque.jpg"));
    }

    #[test]
    fn test_lifespan_reads_quoted_years() {
        let mut record = plaque();
        record.birth_year = None;
        record.extra.insert("birthYear".to_string(), serde_json::json!(" 1874 "));
        assert_eq!(PlaqueCard::from(&record).lifespan.as_deref(), Some("1874-1965"));

        record.extra.insert("birthYear".to_string(), serde_json::json!("c. 1874"));
        assert_eq!(PlaqueDetail::from(&record).lifespan, None);
    }

    #[test]
    fn test_card_prefers_portrait() {
        let mut record = plaque();
        record.portrait_image_url = Some("https://img/portrait.jpg".to_string());
        assert_eq!(
            PlaqueCard::from(&record).image_url.as_deref(),
            Some("https://img/portrait.jpg")
        );
    }

    #[test]
    fn test_detail_truncates_narrative() {
        let mut record = plaque();
        record.location_story = Some("s".repeat(350));
        record.biography = Some("b".repeat(450));

        let detail = PlaqueDetail::from(&record);
        assert_eq!(detail.location_story, Some(format!("{}...", "s".repeat(300))));
        assert_eq!(detail.biography, Some(format!("{}...", "b".repeat(400))));
    }

    #[test]
    fn test_detail_short_narrative_unchanged() {
        let mut record = plaque();
        record.location_story = Some("s".repeat(200));
        record.biography = Some("b".repeat(400));

        let detail = PlaqueDetail::from(&record);
        assert_eq!(detail.location_story, Some("s".repeat(200)));
        assert_eq!(detail.biography, Some("b".repeat(400)));
    }

    #[test]
    fn test_detail_limits_facts() {
        let detail = PlaqueDetail::from(&plaque());
        assert_eq!(detail.key_facts, vec!["Key fact 1", "Key fact 2", "Key fact 3"]);
        assert_eq!(detail.fun_facts, vec!["Only fun fact"]);
    }

    #[test]
    fn test_detail_misc_fields() {
        let detail = PlaqueDetail::from(&plaque());
        assert_eq!(detail.coordinates.as_deref(), Some("51.5015, -0.1783"));
        let related: Vec<&str> = detail.related.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(related, vec!["102"]);
    }

    #[test]
    fn test_open_graph() {
        let detail = PlaqueDetail::from(&plaque());
        let og = detail.open_graph("https://legacyrun.vercel.app/");
        assert_eq!(og.title, "Winston Churchill - Legacy");
        assert_eq!(og.description, "Sir Winston Churchill lived here");
        assert_eq!(og.url, "https://legacyrun.vercel.app/plaque/101");
        assert_eq!(og.image.as_deref(), Some("https://img/plaque.jpg"));
    }

    #[test]
    fn test_href_is_encoded() {
        assert_eq!(plaque_href("a b/c"), "/plaque/a%20b%2Fc");
    }
}
