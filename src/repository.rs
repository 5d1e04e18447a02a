mod errors;
mod memory;
mod postgres;

pub use errors::RepositoryError;
pub use memory::InMemoryRepository;
pub use postgres::PostgresRepository;

use crate::model::WeatherData;
use crate::settings::DatabaseSettings;
use async_trait::async_trait;
use sqlx::PgPool;

/// Persistence contract for weather observations.
#[async_trait]
pub trait ObservationRepository: Send + Sync {
    /// Insert without an id, replace under one. Returns the stored form, id
    /// populated; an id no row carries is [`RepositoryError::NotFound`].
    async fn save(&self, observation: &WeatherData) -> Result<WeatherData, RepositoryError>;

    /// The stored observation matching the location exactly; among several,
    /// the most recent timestamp wins, null timestamps last, then highest id.
    async fn find_by_location(&self, location: &str)
        -> Result<Option<WeatherData>, RepositoryError>;

    async fn find_all(&self) -> Result<Vec<WeatherData>, RepositoryError>;

    /// Remove the row under the observation's id; an absent or unknown id is
    /// an error.
    async fn delete(&self, observation: &WeatherData) -> Result<(), RepositoryError>;
}

#[derive(Debug, Clone)]
pub enum WeatherRepository {
    Postgres(PostgresRepository),
    InMemory(InMemoryRepository),
}

impl WeatherRepository {
    pub fn postgres(pool: PgPool) -> Self {
        Self::Postgres(PostgresRepository::new(pool))
    }

    pub fn in_memory() -> Self {
        Self::InMemory(InMemoryRepository::default())
    }
}

#[async_trait]
impl ObservationRepository for WeatherRepository {
    async fn save(&self, observation: &WeatherData) -> Result<WeatherData, RepositoryError> {
        match self {
            Self::Postgres(repository) => repository.save(observation).await,
            Self::InMemory(repository) => repository.save(observation).await,
        }
    }

    async fn find_by_location(
        &self, location: &str,
    ) -> Result<Option<WeatherData>, RepositoryError> {
        match self {
            Self::Postgres(repository) => repository.find_by_location(location).await,
            Self::InMemory(repository) => repository.find_by_location(location).await,
        }
    }

    async fn find_all(&self) -> Result<Vec<WeatherData>, RepositoryError> {
        match self {
            Self::Postgres(repository) => repository.find_all().await,
            Self::InMemory(repository) => repository.find_all().await,
        }
    }

    async fn delete(&self, observation: &WeatherData) -> Result<(), RepositoryError> {
        match self {
            Self::Postgres(repository) => repository.delete(observation).await,
            Self::InMemory(repository) => repository.delete(observation).await,
        }
    }
}

#[tracing::instrument(level = "info", skip(settings))]
pub async fn run_database_migrations(settings: &DatabaseSettings) -> Result<(), RepositoryError> {
    let pool = settings.pg_pool_options().connect_lazy_with(settings.pg_connect_options_with_db());
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("database migrations applied");
    Ok(())
}
