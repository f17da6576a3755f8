//! Categories group transactions, e.g. 'Groceries' or 'Salary'.

mod db;
mod domain;
mod page;

pub use db::{create_category, create_category_table, get_all_categories};
pub use domain::{Category, CategoryFormData, CategoryId, CategoryName};
pub use page::{create_category_endpoint, get_categories_page};
