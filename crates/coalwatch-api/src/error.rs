use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use coalwatch_parser::ParserError;
use coalwatch_repository::RepositoryError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

impl From<ParserError> for ApiError {
    // Every parser error is structural: wrong name, wrong shape, empty file.
    fn from(err: ParserError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Storage(err) => {
                tracing::error!("storage failure: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "storage failure" })),
                )
                    .into_response()
            }
        }
    }
}
