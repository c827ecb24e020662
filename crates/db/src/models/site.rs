//! Site ("object") entity model and DTOs.

use patrol_core::geo::{geo_from_columns, GeoPoint};
use patrol_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A patrolled site from the `sites` table.
#[derive(Debug, Clone, FromRow)]
pub struct Site {
    pub id: DbId,
    pub organization_id: DbId,
    pub name: String,
    pub image_url: Option<String>,
    pub center_lat: Option<f64>,
    pub center_lng: Option<f64>,
    pub zoom: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Site {
    pub fn to_response(&self) -> SiteResponse {
        SiteResponse {
            id: self.id,
            organization_id: self.organization_id,
            name: self.name.clone(),
            image_url: self.image_url.clone(),
            center: geo_from_columns(self.center_lat, self.center_lng),
            zoom: self.zoom,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// API representation with the map center as a nested pair.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteResponse {
    pub id: DbId,
    pub organization_id: DbId,
    pub name: String,
    pub image_url: Option<String>,
    pub center: Option<GeoPoint>,
    pub zoom: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new site.
#[derive(Debug, Deserialize)]
pub struct CreateSite {
    pub organization_id: DbId,
    pub name: String,
    pub image_url: Option<String>,
    pub center_lat: Option<f64>,
    pub center_lng: Option<f64>,
    pub zoom: Option<f64>,
}

/// DTO for updating a site. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSite {
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub center_lat: Option<f64>,
    pub center_lng: Option<f64>,
    pub zoom: Option<f64>,
}
