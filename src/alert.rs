//! Alert messages shown at the bottom of the page after a HTMX request.
//!
//! Forms target `#alert-container` with `hx-target-error`, so error alerts
//! replace the container's contents.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// A dismissible message for the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// An error message and an explanation of how to fix it.
    Error { message: String, details: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let Alert::Error { message, details } = self;
        let container_style = "text-red-800 border-red-300 bg-red-50 dark:bg-gray-800 \
            dark:text-red-400 dark:border-red-800";

        // Template adapted from https://flowbite.com/docs/components/alerts/
        html! {
            div
                id="alert"
                role="alert"
                class={ "flex items-start p-4 mb-4 border rounded-lg " (container_style) }
            {
                div class="ms-3 text-sm font-medium"
                {
                    p class="font-semibold" { (message) }

                    p { (details) }
                }

                button
                    type="button"
                    class="ms-auto -mx-1.5 -my-1.5 rounded-lg p-1.5 inline-flex items-center justify-center h-8 w-8"
                    onclick="this.closest('#alert').remove()"
                    aria-label="Close"
                {
                    "✕"
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}
