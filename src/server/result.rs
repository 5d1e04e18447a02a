use super::errors::ApiError;
use crate::repository::RepositoryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub type HttpResult = Result<Response, ApiError>;

// served for any failure the client cannot repair
const INTERNAL_ERROR_BODY: &str = "An error occurred while processing the request";

// client input 400 with the variant's message, misses 404, the rest 500
// without leaking the underlying error
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::MissingLocationParam
            | Self::MissingLocation
            | Self::MissingIdForUpdate
            | Self::MissingIdForDeletion
            | Self::MalformedPayload(_) => (StatusCode::BAD_REQUEST, self.to_string()),

            Self::UnknownLocation => (StatusCode::NOT_FOUND, self.to_string()),
            Self::Repository(RepositoryError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, self.to_string())
            },

            Self::Repository(_)
            | Self::Render(_)
            | Self::IO(_)
            | Self::HttpEngine(_)
            | Self::Join(_) => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY.to_string()),
        };

        if status.is_server_error() {
            tracing::error!(error = ?self, %status, "HTTP handler failed");
        } else {
            tracing::warn!(error = ?self, %status, "weather request rejected");
        }

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::XmlCodecError;
    use pretty_assertions::assert_eq;

    fn status_of(error: ApiError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn client_input_failures_map_to_bad_request() {
        assert_eq!(status_of(ApiError::MissingLocationParam), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ApiError::MissingLocation), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ApiError::MissingIdForUpdate), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ApiError::MissingIdForDeletion), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(ApiError::MalformedPayload(XmlCodecError::UnexpectedRoot(
                "forecast".to_string()
            ))),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn lookup_misses_map_to_not_found() {
        assert_eq!(status_of(ApiError::UnknownLocation), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(ApiError::Repository(RepositoryError::NotFound(7))),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn storage_failures_map_to_internal_error_with_a_fixed_body() {
        let error = ApiError::Repository(RepositoryError::Sql(sqlx::Error::PoolClosed));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        assert_eq!(body, INTERNAL_ERROR_BODY);
    }

    #[test]
    fn malformed_payload_keeps_the_parse_detail_out_of_the_body() {
        let error = ApiError::MalformedPayload(XmlCodecError::UnexpectedRoot("junk".to_string()));
        assert_eq!(error.to_string(), "Invalid weather data format");
    }
}
