use crate::repository::RepositoryError;
use crate::xml::XmlCodecError;
use thiserror::Error;

// the client-facing variants carry the exact response body text
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Location parameter is missing")]
    MissingLocationParam,

    #[error("No weather data found for the specified location")]
    UnknownLocation,

    #[error("Invalid weather data format: Missing location")]
    MissingLocation,

    #[error("WeatherData ID must not be null for update")]
    MissingIdForUpdate,

    #[error("WeatherData ID must not be null for deletion")]
    MissingIdForDeletion,

    #[error("Invalid weather data format")]
    MalformedPayload(#[source] XmlCodecError),

    #[error("failed to render weather data response: {0}")]
    Render(#[from] XmlCodecError),

    #[error("{0}")]
    Repository(#[from] RepositoryError),

    #[error("{0}")]
    IO(#[from] std::io::Error),

    #[error("HTTP engine error: {0}")]
    HttpEngine(#[from] hyper::Error),

    #[error("failed joining with thread: {0}")]
    Join(#[from] tokio::task::JoinError),
}
