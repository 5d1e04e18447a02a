use super::state::AppState;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{routing, Router};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(serve_health), tags((name = "health", description = "Service liveness probe")))]
pub struct HealthApiDoc;

pub fn api() -> Router<AppState> {
    Router::new().route("/", routing::get(serve_health))
}

#[utoipa::path(
    get,
    path = "/",
    context_path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is live"),
    ),
)]
#[axum::debug_handler]
async fn serve_health() -> impl IntoResponse {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::WeatherRepository;
    use axum::body::Body;
    use axum::http::Request;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_probe_responds_ok() {
        let app = Router::new()
            .nest("/health", api())
            .with_state(AppState { repository: WeatherRepository::in_memory() });

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
