//! Consumer layer for the orientation schedule backend: canonical models,
//! the week grid arithmetic, reconciliation of personal and staffing-enriched
//! event lists, and the cached view model the board is rendered from.

pub mod api_client;
pub mod cache;
pub mod models;
pub mod reconcile;
pub mod time_grid;
pub mod view_model;

#[cfg(test)]
#[path = "schedule/tests/tests.rs"]
mod tests;
