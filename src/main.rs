use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = weather_service::tracing::get_tracing_subscriber("info");
    weather_service::tracing::init_subscriber(subscriber);

    let options = parse_options();
    let settings = load_settings(&options)?;

    if options.migrate {
        weather_service::run_database_migrations(&settings.database).await?;
    }

    let server = weather_service::Server::build(&settings).await?;
    server.run_until_stopped().await.map_err(|err| err.into())
}

fn parse_options() -> weather_service::CliOptions {
    let options = weather_service::CliOptions::parse();
    if options.secrets.is_none() {
        tracing::warn!("No secrets configuration provided. Passwords (e.g., for the database) should be confined in a secret configuration and sourced in a secure manner.");
    }

    options
}

fn load_settings(
    options: &weather_service::CliOptions,
) -> anyhow::Result<weather_service::Settings> {
    let app_environment = std::env::var(weather_service::CliOptions::env_app_environment()).ok();
    if app_environment.is_none() && options.environment.is_none() {
        tracing::info!("No environment configuration override provided.");
    }

    weather_service::Settings::load(options).map_err(|err| err.into())
}
