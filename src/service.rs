use log::{debug, info, warn};
use thiserror::Error;

use crate::{
    captor::TemperatureSource,
    database::{DatabaseError, ReadingStore, ThresholdStore},
    sensor::{SensorStatus, Thresholds, HISTORY_LENGTH},
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidThreshold(String),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Reads the captor, records every reading and classifies against the
/// thresholds currently stored. Holds no state of its own.
pub struct SensorService<C, D> {
    captor: C,
    db: D,
}

impl<C: TemperatureSource, D: ThresholdStore + ReadingStore> SensorService<C, D> {
    pub fn new(captor: C, db: D) -> Self {
        SensorService { captor, db }
    }

    pub fn database(&self) -> &D {
        &self.db
    }

    /// Takes a reading, stores it, and returns its status.
    pub fn get_status(&self) -> Result<SensorStatus, ServiceError> {
        let temperature = self.captor.read();
        self.db.append_reading(temperature)?;

        let thresholds = self.db.get_thresholds()?;
        let status = thresholds.classify(temperature);
        debug!("Temperature: {}C, status {}", temperature, status);
        Ok(status)
    }

    /// Statuses of the last [`HISTORY_LENGTH`] readings, oldest first,
    /// classified against the current thresholds.
    pub fn get_history(&self) -> Result<Vec<SensorStatus>, ServiceError> {
        let readings = self.db.last_readings(HISTORY_LENGTH)?;
        if readings.is_empty() {
            return Ok(Vec::new());
        }

        let thresholds = self.db.get_thresholds()?;
        Ok(readings
            .into_iter()
            .map(|reading| thresholds.classify(reading))
            .collect())
    }

    pub fn get_thresholds(&self) -> Result<Thresholds, ServiceError> {
        Ok(self.db.get_thresholds()?)
    }

    /// Replaces the thresholds; nothing is written unless `cold < hot`.
    pub fn set_thresholds(&self, thresholds: Thresholds) -> Result<(), ServiceError> {
        if let Err(msg) = thresholds.validate() {
            warn!("Rejected thresholds: {}", msg);
            return Err(ServiceError::InvalidThreshold(msg));
        }

        self.db.set_thresholds(&thresholds)?;
        info!("Thresholds set to cold={} hot={}", thresholds.cold, thresholds.hot);
        Ok(())
    }
}
