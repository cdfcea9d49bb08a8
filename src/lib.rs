pub mod api;
pub mod captor;
pub mod config;
pub mod database;
pub mod schema;
pub mod sensor;
pub mod service;
pub mod sqlite_database;

pub use captor::{FixedCaptor, RandomCaptor, TemperatureSource};
pub use database::{DatabaseError, ReadingStore, SensorDatabase, ThresholdStore};
pub use sensor::{SensorStatus, Thresholds, HISTORY_LENGTH};
pub use service::{SensorService, ServiceError};
pub use sqlite_database::SqliteDatabase;
