pub mod generate;
pub mod recipes;

use axum::http::StatusCode;

use crate::search::RecipeError;

/// Map a core error onto an HTTP status and message.
pub fn error_response(err: RecipeError) -> (StatusCode, String) {
    match err {
        RecipeError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        RecipeError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
        RecipeError::Store(e) => {
            tracing::error!("Store error: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Store error: {e}"))
        }
    }
}
