//! Dashboard module
//!
//! Provides an overview page showing the cashflow for a year.

mod charts;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;
