//! Test fixtures shared across applist crates.

pub mod catalog;
pub mod clock;
pub mod error;
pub mod server;

pub use catalog::{app_id, FakeCatalog};
pub use clock::ManualClock;
pub use error::{Result, TestInfraError};
pub use server::{MockApp, MockCatalogServer, MockSearchItem};
