//! Plaque record shared by the resolver, the JSON API and the pages
//!
//! The same shape is used for enrichment records on disk and for merged records
//! handed to callers, so unknown enrichment fields are kept in `extra` and written
//! back out untouched.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::utils::lenient;

/// Calls `$callback!` with every modelled field and its wire name (`id` aside)
macro_rules! modelled_fields {
    ($callback:ident) => {
        $callback!(
            plaque_id => "plaqueId",
            title => "title",
            subtitle => "subtitle",
            latitude => "latitude",
            longitude => "longitude",
            url => "url",
            year => "year",
            inscription_only => "inscriptionOnly",
            address_only => "addressOnly",
            profession => "profession",
            plaque_image_url => "plaqueImageURL",
            site_image_url => "siteImageURL",
            portrait_image_url => "portraitImageURL",
            biography => "biography",
            location_story => "locationStory",
            key_facts => "keyFacts",
            fun_facts => "funFacts",
            related_plaque_ids => "relatedPlaqueIds",
            birth_year => "birthYear",
            death_year => "deathYear",
        )
    };
}

/// A plaque as served to clients.
///
/// Decoding never fails on a field's contents: a value that does not fit its
/// field (a quoted year, a single string where a list belongs) stays in `extra`
/// under its original key and is written back out as it was.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plaque {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plaque_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inscription_only: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_only: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,

    #[serde(rename = "plaqueImageURL", skip_serializing_if = "Option::is_none")]
    pub plaque_image_url: Option<String>,
    #[serde(rename = "siteImageURL", skip_serializing_if = "Option::is_none")]
    pub site_image_url: Option<String>,
    #[serde(rename = "portraitImageURL", skip_serializing_if = "Option::is_none")]
    pub portrait_image_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_story: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_facts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fun_facts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_plaque_ids: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub death_year: Option<i32>,

    /// Enrichment fields this struct does not model, or whose values do not fit
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<'de> Deserialize<'de> for Plaque {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;
        let mut plaque = Plaque {
            id: lenient::identifier(fields.remove("id")),
            ..Default::default()
        };

        macro_rules! decode {
            ($($field:ident => $key:literal),* $(,)?) => {
                $( plaque.$field = lenient::take_typed(&mut fields, $key); )*
            };
        }
        modelled_fields!(decode);

        plaque.extra = fields;
        Ok(plaque)
    }
}

impl Plaque {
    /// Copy every field `enrichment` defines on top of this record.
    ///
    /// `id` is left alone: the merged record keeps the identifier it was looked
    /// up by. Null values count as undefined. A value kept raw in the
    /// enrichment's `extra` replaces the typed field of the same name.
    pub fn overlay(&mut self, enrichment: &Plaque) {
        macro_rules! take {
            ($($field:ident => $key:literal),* $(,)?) => {
                $(
                    if let Some(ref v) = enrichment.$field {
                        self.$field = Some(v.clone());
                    } else if enrichment.extra.get($key).is_some_and(|v| !v.is_null()) {
                        self.$field = None;
                    }
                )*
            };
        }
        modelled_fields!(take);

        for (key, value) in &enrichment.extra {
            if !value.is_null() {
                self.extra.insert(key.clone(), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_field_names() {
        let plaque = Plaque {
            id: "7".to_string(),
            plaque_image_url: Some("https://img/p.jpg".to_string()),
            key_facts: Some(vec!["fact".to_string()]),
            birth_year: Some(1815),
            ..Default::default()
        };
        let value = serde_json::to_value(&plaque).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "7",
                "plaqueImageURL": "https://img/p.jpg",
                "keyFacts": ["fact"],
                "birthYear": 1815
            })
        );
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let plaque: Plaque = serde_json::from_value(json!({
            "id": 12,
            "plaqueId": "12",
            "era": "Victorian",
            "rating": 4
        }))
        .unwrap();
        assert_eq!(plaque.id, "12");
        assert_eq!(plaque.extra.get("era"), Some(&json!("Victorian")));

        let back = serde_json::to_value(&plaque).unwrap();
        assert_eq!(back["rating"], json!(4));
        assert_eq!(back["plaqueId"], json!("12"));
    }

    #[test]
    fn test_every_modelled_key_round_trips() {
        let record = json!({
            "id": "101",
            "plaqueId": "101",
            "title": "Churchill, Winston",
            "subtitle": "Lived here",
            "latitude": 51.5,
            "longitude": -0.17,
            "url": "https://openplaques.org/plaques/101",
            "year": "1985",
            "inscriptionOnly": "Sir Winston Churchill",
            "addressOnly": "28 Hyde Park Gate",
            "profession": "Prime Minister",
            "plaqueImageURL": "https://img/p.jpg",
            "siteImageURL": "https://img/s.jpg",
            "portraitImageURL": "https://img/c.jpg",
            "biography": "Statesman.",
            "locationStory": "Bought in 1945.",
            "keyFacts": ["one"],
            "funFacts": ["two"],
            "relatedPlaqueIds": ["105"],
            "birthYear": 1874,
            "deathYear": 1965
        });
        let plaque: Plaque = serde_json::from_value(record.clone()).unwrap();
        assert!(plaque.extra.is_empty());
        assert_eq!(serde_json::to_value(&plaque).unwrap(), record);
    }

    #[test]
    fn test_mistyped_values_are_kept_raw() {
        let record = json!({
            "id": null,
            "plaqueId": "102",
            "title": 42,
            "birthYear": "1874",
            "keyFacts": "one fact",
            "latitude": "51.5",
            "profession": "Envoy"
        });
        let plaque: Plaque = serde_json::from_value(record).unwrap();

        assert_eq!(plaque.id, "");
        assert_eq!(plaque.plaque_id.as_deref(), Some("102"));
        assert_eq!(plaque.profession.as_deref(), Some("Envoy"));
        assert_eq!(plaque.title, None);
        assert_eq!(plaque.birth_year, None);
        assert_eq!(plaque.key_facts, None);
        assert_eq!(plaque.latitude, None);

        let back = serde_json::to_value(&plaque).unwrap();
        assert_eq!(back["title"], json!(42));
        assert_eq!(back["birthYear"], json!("1874"));
        assert_eq!(back["keyFacts"], json!("one fact"));
        assert_eq!(back["latitude"], json!("51.5"));
    }

    #[test]
    fn test_overlay_raw_value_replaces_typed_field() {
        let mut base = Plaque {
            id: "105".to_string(),
            title: Some("Dickens, Charles".to_string()),
            ..Default::default()
        };
        let enrichment: Plaque =
            serde_json::from_value(json!({"id": "105", "title": 42, "profession": "Novelist"})).unwrap();

        base.overlay(&enrichment);

        assert_eq!(base.title, None);
        assert_eq!(base.profession.as_deref(), Some("Novelist"));
        let merged = serde_json::to_string(&base).unwrap();
        assert_eq!(merged.matches("\"title\"").count(), 1);
        assert_eq!(serde_json::to_value(&base).unwrap()["title"], json!(42));
    }

    #[test]
    fn test_overlay_enrichment_wins() {
        let mut base = Plaque {
            id: "101".to_string(),
            title: Some("Churchill, Winston".to_string()),
            plaque_image_url: Some("https://base/plaque.jpg".to_string()),
            site_image_url: Some("https://base/site.jpg".to_string()),
            ..Default::default()
        };
        let enrichment: Plaque = serde_json::from_value(json!({
            "id": "other",
            "title": "Churchill, Sir Winston",
            "plaqueImageURL": "https://enriched/plaque.jpg",
            "siteImageURL": null,
            "profession": "Prime Minister",
            "custom": {"a": 1},
            "blank": null
        }))
        .unwrap();

        base.overlay(&enrichment);

        assert_eq!(base.id, "101");
        assert_eq!(base.title.as_deref(), Some("Churchill, Sir Winston"));
        assert_eq!(base.plaque_image_url.as_deref(), Some("https://enriched/plaque.jpg"));
        // Null enrichment values keep the base-derived fallback
        assert_eq!(base.site_image_url.as_deref(), Some("https://base/site.jpg"));
        assert_eq!(base.profession.as_deref(), Some("Prime Minister"));
        assert_eq!(base.extra.get("custom"), Some(&json!({"a": 1})));
        assert!(!base.extra.contains_key("blank"));
    }
}
