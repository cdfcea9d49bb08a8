use std::time::{Duration, Instant};

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use log::{debug, info};

use crate::{
    database::{DatabaseError, ReadingStore, ThresholdStore},
    schema,
    sensor::Thresholds,
};

type DbPool = r2d2::Pool<r2d2::ConnectionManager<SqliteConnection>>;
type DbConnection = r2d2::PooledConnection<r2d2::ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations/");

#[derive(Debug)]
struct BusyTimeout;

impl r2d2::CustomizeConnection<SqliteConnection, r2d2::Error> for BusyTimeout {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute("PRAGMA busy_timeout = 5000;")
            .map_err(r2d2::Error::QueryError)
    }
}

#[derive(Clone)]
pub struct SqliteDatabase {
    pool: DbPool,
}

impl SqliteDatabase {
    /// Opens (creating if needed) the database at `path` and brings its
    /// schema up to date.
    pub fn open(path: &str, pool_size: u32) -> Result<Self, DatabaseError> {
        let db_manager = r2d2::ConnectionManager::<SqliteConnection>::new(path);
        let db_pool = r2d2::Pool::builder()
            .max_size(pool_size.max(1))
            .connection_timeout(Duration::from_secs(10))
            .connection_customizer(Box::new(BusyTimeout))
            .build(db_manager)
            .map_err(|err| DatabaseError::Other(format!("Could not create database pool: {}", err)))?;

        info!("Database {} connected", path);
        {
            let mut migration_connection = db_pool.get().map_err(|_| DatabaseError::Busy)?;
            let applied = migration_connection
                .run_pending_migrations(MIGRATIONS)
                .map_err(|err| DatabaseError::Other(format!("Migration failed: {}", err)))?;
            for version in applied {
                info!("Applied migration {}", version);
            }
        }

        Ok(SqliteDatabase { pool: db_pool })
    }

    fn connection_or_busy(&self) -> Result<DbConnection, DatabaseError> {
        self.pool.get().map_err(|_| DatabaseError::Busy)
    }

    fn to_thresholds(dto: schema::ThresholdsDTO) -> Thresholds {
        Thresholds {
            cold: dto.cold,
            hot: dto.hot,
        }
    }

    fn sql_error_to_db_error(err: diesel::result::Error) -> DatabaseError {
        match err {
            diesel::result::Error::NotFound => DatabaseError::NotFound,
            diesel::result::Error::AlreadyInTransaction => DatabaseError::Busy,
            diesel::result::Error::DatabaseError(diesel::result::DatabaseErrorKind::UniqueViolation, _) => {
                DatabaseError::Conflict
            }
            diesel::result::Error::DatabaseError(_, _) => {
                let lowercase_err = err.to_string().to_lowercase();
                if lowercase_err.contains("database is locked") {
                    DatabaseError::Busy
                } else {
                    DatabaseError::Other(format!("{:?}", err))
                }
            }
            err => DatabaseError::Other(err.to_string()),
        }
    }
}

impl ThresholdStore for SqliteDatabase {
    fn get_thresholds(&self) -> Result<Thresholds, DatabaseError> {
        let mut conn = self.connection_or_busy()?;
        schema::thresholds::table
            .filter(schema::thresholds::id.eq(schema::THRESHOLDS_ROW))
            .first::<schema::ThresholdsDTO>(&mut conn)
            .map(Self::to_thresholds)
            .map_err(Self::sql_error_to_db_error)
    }

    fn set_thresholds(&self, thresholds: &Thresholds) -> Result<(), DatabaseError> {
        let mut conn = self.connection_or_busy()?;
        diesel::replace_into(schema::thresholds::table)
            .values(schema::ThresholdsDTO {
                id: schema::THRESHOLDS_ROW,
                cold: thresholds.cold,
                hot: thresholds.hot,
            })
            .execute(&mut conn)
            .map_err(Self::sql_error_to_db_error)
            .map(|_| ())
    }
}

impl ReadingStore for SqliteDatabase {
    fn append_reading(&self, temperature: f64) -> Result<(), DatabaseError> {
        let mut conn = self.connection_or_busy()?;
        diesel::insert_into(schema::temperatures::table)
            .values(schema::AddTemperatureDTO { temperature })
            .execute(&mut conn)
            .map_err(Self::sql_error_to_db_error)
            .map(|inserts| debug_assert_eq!(inserts, 1))
    }

    fn last_readings(&self, count: usize) -> Result<Vec<f64>, DatabaseError> {
        let before_db = Instant::now();
        let limit = i64::try_from(count).unwrap_or(i64::MAX);

        let mut conn = self.connection_or_busy()?;
        let mut readings = schema::temperatures::table
            .order_by(schema::temperatures::id.desc())
            .limit(limit)
            .load::<schema::TemperatureDTO>(&mut conn)
            .map_err(Self::sql_error_to_db_error)?;
        readings.reverse();

        debug!(
            "Getting {} readings took {}ms",
            readings.len(),
            before_db.elapsed().as_millis()
        );

        Ok(readings.into_iter().map(|dto| dto.temperature).collect())
    }

    fn count_readings(&self) -> Result<usize, DatabaseError> {
        let mut conn = self.connection_or_busy()?;
        schema::temperatures::table
            .count()
            .get_result::<i64>(&mut conn)
            .map(|count| count as usize)
            .map_err(Self::sql_error_to_db_error)
    }
}
