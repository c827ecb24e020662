//! GPS trail models.

use patrol_core::geo::GeoPoint;
use patrol_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `gps_logs` table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct GpsLog {
    pub id: DbId,
    pub guard_id: DbId,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: Timestamp,
}

impl GpsLog {
    pub fn location(&self) -> GeoPoint {
        GeoPoint {
            lat: self.latitude,
            lng: self.longitude,
        }
    }

    pub fn to_response(&self) -> GpsLogResponse {
        GpsLogResponse {
            id: self.id,
            guard_id: self.guard_id,
            location: self.location(),
            created_at: self.created_at,
        }
    }
}

/// API and live-feed representation with a nested `location`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GpsLogResponse {
    pub id: DbId,
    pub guard_id: DbId,
    pub location: GeoPoint,
    pub created_at: Timestamp,
}

/// DTO for appending a GPS ping.
#[derive(Debug, Clone)]
pub struct NewGpsLog {
    pub guard_id: DbId,
    pub location: GeoPoint,
    pub created_at: Timestamp,
}
