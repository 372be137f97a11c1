//! The page shown for unknown routes and missing resources.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::html::error_view;

pub struct NotFoundPage;

impl IntoResponse for NotFoundPage {
    fn into_response(self) -> Response {
        (
            StatusCode::NOT_FOUND,
            error_view(
                "Not Found",
                "404",
                "Page not found.",
                "Sorry, we can't find that page. You'll find lots to explore on the home page.",
            ),
        )
            .into_response()
    }
}

/// Fallback handler for routes that do not exist.
pub async fn get_404_not_found() -> Response {
    NotFoundPage.into_response()
}
