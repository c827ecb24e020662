//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod checkpoint_repo;
pub mod gps_log_repo;
pub mod monitoring_log_repo;
pub mod organization_repo;
pub mod site_repo;
pub mod user_repo;

pub use checkpoint_repo::CheckpointRepo;
pub use gps_log_repo::GpsLogRepo;
pub use monitoring_log_repo::MonitoringLogRepo;
pub use organization_repo::OrganizationRepo;
pub use site_repo::SiteRepo;
pub use user_repo::UserRepo;
