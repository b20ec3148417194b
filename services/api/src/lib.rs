//! Admin service: catalog, orders and user management behind the admin gate

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod multipart;
pub mod query;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod storage;

pub use state::AppState;
