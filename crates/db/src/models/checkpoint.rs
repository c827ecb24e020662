//! Checkpoint entity model and DTOs.

use patrol_core::error::CoreError;
use patrol_core::geo::{geo_from_columns, position_from_columns, GeoPoint, ImagePosition};
use patrol_core::timeliness::Thresholds;
use patrol_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A patrol checkpoint from the `checkpoints` table.
#[derive(Debug, Clone, FromRow)]
pub struct Checkpoint {
    pub id: DbId,
    pub site_id: DbId,
    pub name: String,
    pub card_number: String,
    pub normal_minutes: i32,
    pub pass_minutes: i32,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Checkpoint {
    pub fn thresholds(&self) -> Result<Thresholds, CoreError> {
        Thresholds::new(self.normal_minutes, self.pass_minutes)
    }

    pub fn to_response(&self) -> CheckpointResponse {
        CheckpointResponse {
            id: self.id,
            site_id: self.site_id,
            name: self.name.clone(),
            card_number: self.card_number.clone(),
            normal_time: self.normal_minutes,
            pass_time: self.pass_minutes,
            position: position_from_columns(self.position_x, self.position_y),
            location: geo_from_columns(self.latitude, self.longitude),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// API representation. Thresholds are in minutes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointResponse {
    pub id: DbId,
    pub site_id: DbId,
    pub name: String,
    pub card_number: String,
    pub normal_time: i32,
    pub pass_time: i32,
    pub position: Option<ImagePosition>,
    pub location: Option<GeoPoint>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A checkpoint together with the organization that owns its site.
#[derive(Debug, Clone, FromRow)]
pub struct ScopedCheckpoint {
    #[sqlx(flatten)]
    pub checkpoint: Checkpoint,
    pub organization_id: DbId,
}

/// DTO for creating a checkpoint.
#[derive(Debug, Deserialize)]
pub struct CreateCheckpoint {
    pub site_id: DbId,
    pub name: String,
    pub card_number: String,
    pub normal_minutes: i32,
    pub pass_minutes: i32,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// DTO for updating a checkpoint. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCheckpoint {
    pub site_id: Option<DbId>,
    pub name: Option<String>,
    pub card_number: Option<String>,
    pub normal_minutes: Option<i32>,
    pub pass_minutes: Option<i32>,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
