//! Postgres storage collaborator for coal-pile monitoring data.
//!
//! All five tables are append-only: rows are created at ingestion or direct
//! submission and never updated or deleted here.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use coalwatch_parser::CanonicalRecords;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A stockpile state report as submitted by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct NewStockpile {
    pub warehouse: i64,
    pub pile_id: String,
    pub coal_grade: String,
    pub current_temp: f64,
    pub pile_age_days: i64,
}

/// A persisted stockpile report, with its server-assigned id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct CurrentStockpile {
    pub id: i64,
    pub warehouse: i64,
    pub pile_id: String,
    pub coal_grade: String,
    pub current_temp: f64,
    pub pile_age_days: i64,
    pub reported_at: DateTime<Utc>,
}

/// One temperature reading of a pile, as read back for queries.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PileTemperature {
    pub coal_grade: String,
    pub max_temp: f64,
    pub measurement_date: NaiveDateTime,
    pub shift: i64,
}

/// One fire event of a pile, as read back for queries.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PileFireEvent {
    pub coal_grade: String,
    pub fire_start: NaiveDateTime,
    pub pile_formed_at: Option<NaiveDateTime>,
}

/// Weather aggregated over one calendar day.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DailyWeather {
    pub day: NaiveDate,
    pub avg_temp: Option<f64>,
    pub avg_humidity: Option<f64>,
    pub total_precipitation: Option<f64>,
    pub avg_wind_speed: Option<f64>,
}

#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
    ) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the five tables if they do not exist. Runs at process
    /// bootstrap; there is no migration tooling beyond this.
    pub async fn bootstrap(&self) -> Result<(), RepositoryError> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS current_stockpile (
                id BIGSERIAL PRIMARY KEY,
                warehouse BIGINT NOT NULL,
                pile_id TEXT NOT NULL,
                coal_grade TEXT NOT NULL,
                current_temp DOUBLE PRECISION NOT NULL,
                pile_age_days BIGINT NOT NULL,
                reported_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS actual_fire (
                id BIGSERIAL PRIMARY KEY,
                warehouse BIGINT NOT NULL,
                pile_id TEXT NOT NULL,
                fire_date DATE NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS temperature (
                id BIGSERIAL PRIMARY KEY,
                warehouse BIGINT NOT NULL,
                pile_id TEXT NOT NULL,
                coal_grade TEXT NOT NULL,
                max_temp DOUBLE PRECISION NOT NULL,
                measurement_date TIMESTAMP NOT NULL,
                shift BIGINT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS fire_event (
                id BIGSERIAL PRIMARY KEY,
                warehouse BIGINT NOT NULL,
                pile_id TEXT NOT NULL,
                coal_grade TEXT NOT NULL,
                fire_start TIMESTAMP NOT NULL,
                pile_formed_at TIMESTAMP
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS weather (
                id BIGSERIAL PRIMARY KEY,
                datetime TIMESTAMP NOT NULL,
                temp DOUBLE PRECISION NOT NULL,
                pressure DOUBLE PRECISION,
                humidity BIGINT NOT NULL,
                precipitation DOUBLE PRECISION,
                wind_dir TEXT,
                wind_speed DOUBLE PRECISION,
                cloudcover TEXT,
                visibility TEXT,
                weather_code TEXT
            )
            "#,
        ];

        for statement in statements {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn insert_stockpile(
        &self,
        stockpile: &NewStockpile,
    ) -> Result<CurrentStockpile, RepositoryError> {
        let row = sqlx::query_as::<_, CurrentStockpile>(
            r#"
            INSERT INTO current_stockpile (
                warehouse, pile_id, coal_grade, current_temp, pile_age_days
            ) VALUES ($1, $2, $3, $4, $5)
            RETURNING id, warehouse, pile_id, coal_grade, current_temp,
                      pile_age_days, reported_at
            "#,
        )
        .bind(stockpile.warehouse)
        .bind(&stockpile.pile_id)
        .bind(&stockpile.coal_grade)
        .bind(stockpile.current_temp)
        .bind(stockpile.pile_age_days)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn fetch_stockpile(
        &self,
        id: i64,
    ) -> Result<Option<CurrentStockpile>, RepositoryError> {
        let row = sqlx::query_as::<_, CurrentStockpile>(
            r#"
            SELECT id, warehouse, pile_id, coal_grade, current_temp,
                   pile_age_days, reported_at
            FROM current_stockpile
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn insert_actual_fire(
        &self,
        warehouse: i64,
        pile_id: &str,
        fire_date: NaiveDate,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO actual_fire (warehouse, pile_id, fire_date) VALUES ($1, $2, $3)",
        )
        .bind(warehouse)
        .bind(pile_id)
        .bind(fire_date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Persists one upload's accepted records as a single transaction: all
    /// rows commit together, or the whole batch fails on a storage error.
    pub async fn insert_records(
        &self,
        records: &CanonicalRecords,
    ) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0u64;

        match records {
            CanonicalRecords::Temperature(readings) => {
                for reading in readings {
                    sqlx::query(
                        r#"
                        INSERT INTO temperature (
                            warehouse, pile_id, coal_grade, max_temp,
                            measurement_date, shift
                        ) VALUES ($1, $2, $3, $4, $5, $6)
                        "#,
                    )
                    .bind(reading.warehouse)
                    .bind(&reading.pile_id)
                    .bind(&reading.coal_grade)
                    .bind(reading.max_temp)
                    .bind(reading.measurement_date)
                    .bind(reading.shift)
                    .execute(&mut *tx)
                    .await?;
                    inserted += 1;
                }
            }
            CanonicalRecords::FireEvents(events) => {
                for event in events {
                    sqlx::query(
                        r#"
                        INSERT INTO fire_event (
                            warehouse, pile_id, coal_grade, fire_start, pile_formed_at
                        ) VALUES ($1, $2, $3, $4, $5)
                        "#,
                    )
                    .bind(event.warehouse)
                    .bind(&event.pile_id)
                    .bind(&event.coal_grade)
                    .bind(event.fire_start)
                    .bind(event.pile_formed_at)
                    .execute(&mut *tx)
                    .await?;
                    inserted += 1;
                }
            }
            CanonicalRecords::Weather(observations) => {
                for observation in observations {
                    sqlx::query(
                        r#"
                        INSERT INTO weather (
                            datetime, temp, pressure, humidity, precipitation,
                            wind_dir, wind_speed, cloudcover, visibility, weather_code
                        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                        "#,
                    )
                    .bind(observation.datetime)
                    .bind(observation.temp)
                    .bind(observation.pressure)
                    .bind(observation.humidity)
                    .bind(observation.precipitation)
                    .bind(&observation.wind_dir)
                    .bind(observation.wind_speed)
                    .bind(&observation.cloudcover)
                    .bind(&observation.visibility)
                    .bind(&observation.weather_code)
                    .execute(&mut *tx)
                    .await?;
                    inserted += 1;
                }
            }
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Daily weather aggregates over an inclusive calendar-date range.
    pub async fn daily_weather(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyWeather>, RepositoryError> {
        let rows = sqlx::query_as::<_, DailyWeather>(
            r#"
            SELECT
                datetime::date AS day,
                AVG(temp) AS avg_temp,
                AVG(humidity)::double precision AS avg_humidity,
                SUM(precipitation) AS total_precipitation,
                AVG(wind_speed) AS avg_wind_speed
            FROM weather
            WHERE datetime::date BETWEEN $1 AND $2
            GROUP BY datetime::date
            ORDER BY day
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn pile_temperatures(
        &self,
        warehouse: i64,
        pile_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PileTemperature>, RepositoryError> {
        let rows = sqlx::query_as::<_, PileTemperature>(
            r#"
            SELECT coal_grade, max_temp, measurement_date, shift
            FROM temperature
            WHERE warehouse = $1
              AND pile_id = $2
              AND measurement_date::date BETWEEN $3 AND $4
            ORDER BY measurement_date
            "#,
        )
        .bind(warehouse)
        .bind(pile_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn pile_fire_events(
        &self,
        warehouse: i64,
        pile_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PileFireEvent>, RepositoryError> {
        let rows = sqlx::query_as::<_, PileFireEvent>(
            r#"
            SELECT coal_grade, fire_start, pile_formed_at
            FROM fire_event
            WHERE warehouse = $1
              AND pile_id = $2
              AND fire_start::date BETWEEN $3 AND $4
            ORDER BY fire_start
            "#,
        )
        .bind(warehouse)
        .bind(pile_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
