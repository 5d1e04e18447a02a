#![forbid(unsafe_code)]
#![warn(clippy::cargo, clippy::suspicious, rust_2018_idioms)]
#![allow(clippy::multiple_crate_versions)]

mod model;
mod repository;
mod server;
mod settings;
pub mod tracing;
mod xml;

pub use model::WeatherData;
pub use repository::{
    run_database_migrations, InMemoryRepository, ObservationRepository, PostgresRepository,
    RepositoryError, WeatherRepository,
};
pub use server::Server;
pub use settings::{CliOptions, Environment, Settings};
pub use crate::xml::{from_xml, to_xml, XmlCodecError};
