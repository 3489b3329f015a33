pub mod desk;
pub mod policy;
pub mod preferences;
pub mod snapshot;
pub mod space;
pub mod telemetry;
