use thiserror::Error;

use crate::sensor::Thresholds;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DatabaseError {
    #[error("database is busy")]
    Busy,
    #[error("record not found")]
    NotFound,
    #[error("conflicting record")]
    Conflict,
    #[error("{0}")]
    Other(String),
}

/// Holds the one active pair of thresholds.
///
/// Implementations store whatever they are given; ordering of `cold` and
/// `hot` is checked by the service before it gets here.
pub trait ThresholdStore {
    fn get_thresholds(&self) -> Result<Thresholds, DatabaseError>;
    fn set_thresholds(&self, thresholds: &Thresholds) -> Result<(), DatabaseError>;
}

/// Append-only log of temperature readings.
pub trait ReadingStore {
    fn append_reading(&self, temperature: f64) -> Result<(), DatabaseError>;
    /// Up to `count` most recent readings, oldest first.
    fn last_readings(&self, count: usize) -> Result<Vec<f64>, DatabaseError>;
    fn count_readings(&self) -> Result<usize, DatabaseError>;
}

/// Everything the HTTP layer needs from a backing store.
pub trait SensorDatabase: ThresholdStore + ReadingStore + Send + Sync + 'static {}

impl<T: ThresholdStore + ReadingStore + Send + Sync + 'static> SensorDatabase for T {}
