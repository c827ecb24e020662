//! Check-in processing and missed-patrol detection.
//!
//! - [`CheckInProcessor`] -- classifies and records a guard's check-in.
//! - [`Sweeper`] -- periodically escalates silent checkpoints.
//! - [`GpsRecorder`] -- records GPS pings.
//!
//! All three talk to persistence through [`MonitoringStore`] and to live
//! dashboards through [`patrol_events::LivePublisher`].

pub mod checkin;
pub mod error;
pub mod gps;
pub mod store;
pub mod sweeper;

pub use checkin::{CheckInOutcome, CheckInProcessor};
pub use error::MonitorError;
pub use gps::GpsRecorder;
pub use store::{MonitoringStore, PgMonitoringStore};
pub use sweeper::{SweepReport, Sweeper};
