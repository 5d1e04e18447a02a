use super::errors::ApiError;
use super::result::HttpResult;
use super::state::AppState;
use crate::model::WeatherData;
use crate::repository::{ObservationRepository, WeatherRepository};
use crate::xml;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{routing, Router};
use serde::Deserialize;
use utoipa::{IntoParams, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(serve_location_weather, create_weather, update_weather, delete_weather),
    components(schemas(WeatherData)),
    tags((name = "weather", description = "Weather observation records")),
)]
pub struct WeatherApiDoc;

pub fn api() -> Router<AppState> {
    Router::new().route(
        "/",
        routing::get(serve_location_weather)
            .post(create_weather)
            .put(update_weather)
            .delete(delete_weather),
    )
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LocationQuery {
    /// Location whose latest observation to serve.
    location: Option<String>,
}

#[utoipa::path(
    get,
    path = "/",
    context_path = "/api/v1/weather",
    tag = "weather",
    params(LocationQuery),
    responses(
        (status = 200, description = "Latest observation for the location, as XML", body = WeatherData),
        (status = 400, description = "Location parameter is missing"),
        (status = 404, description = "No observation recorded for the location"),
        (status = 500, description = "Lookup or rendering failed"),
    ),
)]
#[axum::debug_handler]
#[tracing::instrument(level = "debug", skip(repository))]
async fn serve_location_weather(
    State(repository): State<WeatherRepository>, Query(query): Query<LocationQuery>,
) -> HttpResult {
    let location = query
        .location
        .filter(|location| !location.is_empty())
        .ok_or(ApiError::MissingLocationParam)?;

    let data = repository
        .find_by_location(&location)
        .await?
        .ok_or(ApiError::UnknownLocation)?;
    let body = xml::to_xml(&data)?;

    Ok(([(header::CONTENT_TYPE, "application/xml")], body).into_response())
}

#[utoipa::path(
    post,
    path = "/",
    context_path = "/api/v1/weather",
    tag = "weather",
    request_body(content = String, description = "weatherData XML document, no id expected",
        content_type = "application/xml"),
    responses(
        (status = 201, description = "Observation recorded"),
        (status = 400, description = "Payload is not a usable weatherData document"),
        (status = 500, description = "Save failed"),
    ),
)]
#[axum::debug_handler]
#[tracing::instrument(level = "debug", skip(repository, body))]
async fn create_weather(State(repository): State<WeatherRepository>, body: String) -> HttpResult {
    let data = xml::from_xml(&body).map_err(ApiError::MalformedPayload)?;
    if data.location.is_empty() {
        return Err(ApiError::MissingLocation);
    }

    let saved = repository.save(&data).await?;
    tracing::info!(location = %saved.location, id = ?saved.id, "weather observation recorded");

    Ok((StatusCode::CREATED, "Weather data saved successfully.").into_response())
}

#[utoipa::path(
    put,
    path = "/",
    context_path = "/api/v1/weather",
    tag = "weather",
    request_body(content = String, description = "weatherData XML document carrying the id to replace",
        content_type = "application/xml"),
    responses(
        (status = 204, description = "Observation replaced"),
        (status = 400, description = "Payload unusable or missing its id"),
        (status = 404, description = "No observation stored under the id"),
        (status = 500, description = "Save failed"),
    ),
)]
#[axum::debug_handler]
#[tracing::instrument(level = "debug", skip(repository, body))]
async fn update_weather(State(repository): State<WeatherRepository>, body: String) -> HttpResult {
    let data = xml::from_xml(&body).map_err(ApiError::MalformedPayload)?;
    if data.id.is_none() {
        return Err(ApiError::MissingIdForUpdate);
    }

    let saved = repository.save(&data).await?;
    tracing::info!(location = %saved.location, id = ?saved.id, "weather observation replaced");

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    delete,
    path = "/",
    context_path = "/api/v1/weather",
    tag = "weather",
    request_body(content = String, description = "weatherData XML document carrying the id to remove",
        content_type = "application/xml"),
    responses(
        (status = 204, description = "Observation removed"),
        (status = 400, description = "Payload unusable or missing its id"),
        (status = 404, description = "No observation stored under the id"),
        (status = 500, description = "Delete failed"),
    ),
)]
#[axum::debug_handler]
#[tracing::instrument(level = "debug", skip(repository, body))]
async fn delete_weather(State(repository): State<WeatherRepository>, body: String) -> HttpResult {
    let data = xml::from_xml(&body).map_err(ApiError::MalformedPayload)?;
    if data.id.is_none() {
        return Err(ApiError::MissingIdForDeletion);
    }

    repository.delete(&data).await?;
    tracing::info!(id = ?data.id, "weather observation removed");

    Ok(StatusCode::NO_CONTENT.into_response())
}
