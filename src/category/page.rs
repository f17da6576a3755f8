//! The categories page and the endpoint for creating categories.

use std::sync::Arc;

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};

use crate::{
    AppState, Error,
    category::{Category, CategoryFormData, CategoryName},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CATEGORY_BADGE_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
    },
    navigation::NavBar,
    store::{TransactionStore, run_blocking},
};

/// The state needed for the categories page and endpoint.
#[derive(Clone)]
pub struct CategoriesState {
    /// The store categories are read from and saved to.
    pub transaction_store: Arc<dyn TransactionStore>,
}

impl FromRef<AppState> for CategoriesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
        }
    }
}

/// Render the list of categories and the form for adding one.
pub async fn get_categories_page(State(state): State<CategoriesState>) -> Result<Response, Error> {
    let categories = run_blocking(&state.transaction_store, |store| store.categories())
        .await
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    Ok(categories_view(&categories).into_response())
}

/// Handle the category creation form.
pub async fn create_category_endpoint(
    State(state): State<CategoriesState>,
    Form(form): Form<CategoryFormData>,
) -> Response {
    let name = match CategoryName::new(&form.name) {
        Ok(name) => name,
        Err(error) => return error.into_alert_response(),
    };

    match run_blocking(&state.transaction_store, move |store| {
        store.create_category(name)
    })
    .await
    {
        Ok(category) => {
            tracing::info!("created category {} \"{}\"", category.id, category.name);

            (
                HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("could not create category: {error}");

            error.into_alert_response()
        }
    }
}

fn categories_view(categories: &[Category]) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-3xl"
            {
                h1 class="text-xl font-bold" { "Categories" }

                (new_category_form())

                table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                        }
                    }

                    tbody
                    {
                        @for category in categories {
                            tr class=(TABLE_ROW_STYLE) data-category-row="true"
                            {
                                td class=(TABLE_CELL_STYLE)
                                {
                                    span class=(CATEGORY_BADGE_STYLE) { (category.name) }
                                }
                            }
                        }

                        @if categories.is_empty() {
                            tr
                            {
                                td class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                {
                                    "No categories created yet."
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Categories", &[], &content)
}

fn new_category_form() -> Markup {
    html! {
        form
            hx-post=(endpoints::CATEGORIES_API)
            hx-target-error="#alert-container"
            class="flex flex-wrap items-end gap-4"
        {
            div class="grow"
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Category Name" }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="e.g. Groceries"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Category" }
            }
        }
    }
}


#[cfg(test)]
mod create_category_endpoint_tests {
    use std::sync::Arc;

    use axum::{Form, extract::State, http::StatusCode};

    use crate::{
        category::{
            CategoryFormData, CategoryName, create_category_endpoint, page::CategoriesState,
        },
        endpoints,
        test_utils::{assert_hx_redirect, parse_html_fragment, sqlite_store_with_categories},
    };

    fn state_with_categories(names: &[&str]) -> CategoriesState {
        CategoriesState {
            transaction_store: Arc::new(sqlite_store_with_categories(names)),
        }
    }

    fn form(name: &str) -> Form<CategoryFormData> {
        Form(CategoryFormData {
            name: name.to_owned(),
        })
    }

    #[tokio::test]
    async fn can_create_category() {
        let state = state_with_categories(&[]);

        let response = create_category_endpoint(State(state.clone()), form("  Rent ")).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::CATEGORIES_VIEW);
        let categories = state.transaction_store.categories().unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, CategoryName::new_unchecked("Rent"));
    }

    #[tokio::test]
    async fn empty_name_is_rejected() {
        let state = state_with_categories(&[]);

        let response = create_category_endpoint(State(state.clone()), form("   ")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Category name cannot be empty"), "{text:?}");
        assert!(state.transaction_store.categories().unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected() {
        let state = state_with_categories(&["Rent"]);

        let response = create_category_endpoint(State(state.clone()), form("Rent")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("already exists"), "{text:?}");
        assert_eq!(state.transaction_store.categories().unwrap().len(), 1);
    }
}
