//! Row models and DTOs, one module per table.

pub mod checkpoint;
pub mod gps_log;
pub mod monitoring_log;
pub mod organization;
pub mod site;
pub mod user;
