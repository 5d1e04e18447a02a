use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("failed database operation: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("no weather data found for id {0}")]
    NotFound(i64),

    #[error("weather data has no id to {0} by")]
    MissingId(&'static str),

    #[error("failed applying database migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}
