//! Geographic filtering
//!
//! The app only covers central London, so region-filtered views drop anything
//! outside a fixed latitude/longitude box.

/// Inclusive latitude/longitude rectangle in WGS84 degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

pub const CENTRAL_LONDON: BoundingBox = BoundingBox {
    min_latitude: 51.48,
    max_latitude: 51.54,
    min_longitude: -0.18,
    max_longitude: -0.08,
};

impl BoundingBox {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&latitude)
            && (self.min_longitude..=self.max_longitude).contains(&longitude)
    }

    /// Missing coordinates never pass the filter
    pub fn contains_opt(&self, latitude: Option<f64>, longitude: Option<f64>) -> bool {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => self.contains(lat, lon),
            _ => false,
        }
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        CENTRAL_LONDON
    }
}
