//! Alert messages shown to the user after an action succeeds or fails.
//!
//! HTMX endpoints return an alert as a fragment which is swapped into the
//! `#alert-container` element of the page.

use maud::{Markup, html};

/// A dismissible message box.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message.
    Success { message: String },
    /// An error message with extra details.
    Error { message: String, details: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (is_error, message, details) = match self {
            Alert::Success { message } => (false, message, None),
            Alert::Error { message, details } => (true, message, Some(details)),
        };

        let style = if is_error {
            "flex items-start p-4 mb-4 text-sm rounded-lg border text-red-800 \
            border-red-300 bg-red-50 dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
        } else {
            "flex items-start p-4 mb-4 text-sm rounded-lg border text-green-800 \
            border-green-300 bg-green-50 dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
        };

        // Template adapted from https://flowbite.com/docs/components/alerts/
        html! {
            div
                class=(style)
                role="alert"
                data-alert-kind=(if is_error { "error" } else { "success" })
            {
                div class="flex-1"
                {
                    span class="font-medium" { (message) }

                    @if let Some(details) = details
                    {
                        p class="mt-1" { (details) }
                    }
                }

                button
                    type="button"
                    class="ms-3 -my-1.5 p-1.5 inline-flex items-center justify-center h-8 w-8 rounded-lg hover:bg-gray-200 dark:hover:bg-gray-700"
                    aria-label="Close"
                    onclick="this.parentElement.remove()"
                {
                    "✕"
                }
            }
        }
    }
}
