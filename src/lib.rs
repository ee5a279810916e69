//! Subsonic Catalog Server Library
//!
//! Read-only music library served over the Subsonic REST protocol. The
//! modules are public for the binary and for the end-to-end tests.

pub mod catalog_store;
pub mod config;
pub mod server;
pub mod sqlite_persistence;
pub mod subsonic;
pub mod user;

// Re-export commonly used types for convenience
pub use catalog_store::{CatalogStore, SqliteCatalogStore};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
pub use user::CredentialStore;
