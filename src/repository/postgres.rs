use super::errors::RepositoryError;
use super::ObservationRepository;
use crate::model::WeatherData;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use sql_query_builder as sql;
use sqlx::PgPool;

pub const WEATHER_DATA_TABLE: &str = "weather_data";

const OBSERVATION_COLUMNS: &str = r#"id, location, temperature, humidity, "timestamp""#;

static INSERT_SQL: Lazy<String> = Lazy::new(|| {
    sql::Insert::new()
        .insert_into(&format!(
            r#"{WEATHER_DATA_TABLE} (location, temperature, humidity, "timestamp")"#
        ))
        .values("($1, $2, $3, $4)")
        .returning("id")
        .as_string()
});

static UPDATE_SQL: Lazy<String> = Lazy::new(|| {
    sql::Update::new()
        .update(WEATHER_DATA_TABLE)
        .set(r#"location = $2, temperature = $3, humidity = $4, "timestamp" = $5"#)
        .where_clause("id = $1")
        .returning("id")
        .as_string()
});

static FIND_BY_LOCATION_SQL: Lazy<String> = Lazy::new(|| {
    sql::Select::new()
        .select(OBSERVATION_COLUMNS)
        .from(WEATHER_DATA_TABLE)
        .where_clause("location = $1")
        .order_by(r#""timestamp" DESC NULLS LAST, id DESC"#)
        .limit("1")
        .as_string()
});

static FIND_ALL_SQL: Lazy<String> = Lazy::new(|| {
    sql::Select::new()
        .select(OBSERVATION_COLUMNS)
        .from(WEATHER_DATA_TABLE)
        .order_by("id")
        .as_string()
});

static DELETE_SQL: Lazy<String> = Lazy::new(|| {
    sql::Delete::new().delete_from(WEATHER_DATA_TABLE).where_clause("id = $1").as_string()
});

// one pooled connection per statement, released on return
#[derive(Debug, Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ObservationRepository for PostgresRepository {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn save(&self, observation: &WeatherData) -> Result<WeatherData, RepositoryError> {
        let saved_id: i64 = match observation.id {
            None => {
                sqlx::query_scalar(&INSERT_SQL)
                    .bind(&observation.location)
                    .bind(observation.temperature)
                    .bind(observation.humidity)
                    .bind(observation.timestamp)
                    .fetch_one(&self.pool)
                    .await?
            },
            Some(id) => {
                sqlx::query_scalar(&UPDATE_SQL)
                    .bind(id)
                    .bind(&observation.location)
                    .bind(observation.temperature)
                    .bind(observation.humidity)
                    .bind(observation.timestamp)
                    .fetch_optional(&self.pool)
                    .await?
                    .ok_or(RepositoryError::NotFound(id))?
            },
        };

        Ok(WeatherData { id: Some(saved_id), ..observation.clone() })
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn find_by_location(
        &self, location: &str,
    ) -> Result<Option<WeatherData>, RepositoryError> {
        let found = sqlx::query_as(&FIND_BY_LOCATION_SQL)
            .bind(location)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn find_all(&self) -> Result<Vec<WeatherData>, RepositoryError> {
        let all = sqlx::query_as(&FIND_ALL_SQL).fetch_all(&self.pool).await?;
        Ok(all)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn delete(&self, observation: &WeatherData) -> Result<(), RepositoryError> {
        let id = observation.id.ok_or(RepositoryError::MissingId("delete"))?;
        let outcome = sqlx::query(&DELETE_SQL).bind(id).execute(&self.pool).await?;
        if outcome.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id));
        }

        Ok(())
    }
}
