//! HTTP client for the Steam store catalog.

pub mod config;
mod response;
pub mod steam;

pub use config::{CatalogConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
pub use steam::SteamCatalog;
