//! Coordinate value types used by sites, checkpoints and GPS pings.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct GeoPoint {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
}

/// A position on a site's floor-plan image, in percent of width and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ImagePosition {
    #[validate(range(min = 0.0, max = 100.0))]
    pub x_percent: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub y_percent: f64,
}

/// Split an optional pair into nullable columns.
pub fn geo_columns(point: Option<GeoPoint>) -> (Option<f64>, Option<f64>) {
    point.map_or((None, None), |p| (Some(p.lat), Some(p.lng)))
}

/// Rebuild an optional pair from nullable columns; both halves must be set.
pub fn geo_from_columns(lat: Option<f64>, lng: Option<f64>) -> Option<GeoPoint> {
    Some(GeoPoint { lat: lat?, lng: lng? })
}

/// Rebuild an optional image position from nullable columns.
pub fn position_from_columns(x: Option<f64>, y: Option<f64>) -> Option<ImagePosition> {
    Some(ImagePosition {
        x_percent: x?,
        y_percent: y?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_latitude() {
        let p = GeoPoint { lat: 91.0, lng: 0.0 };
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_position_over_hundred_percent() {
        let p = ImagePosition {
            x_percent: 50.0,
            y_percent: 100.5,
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn half_filled_columns_yield_none() {
        assert_eq!(geo_from_columns(Some(41.3), None), None);
        assert_eq!(
            geo_from_columns(Some(41.3), Some(69.2)),
            Some(GeoPoint { lat: 41.3, lng: 69.2 })
        );
    }

    #[test]
    fn position_deserializes_from_camel_case() {
        let p: ImagePosition =
            serde_json::from_str(r#"{"xPercent": 12.5, "yPercent": 80}"#).unwrap();
        assert_eq!(p.x_percent, 12.5);
        assert_eq!(p.y_percent, 80.0);
    }
}
