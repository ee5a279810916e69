mod error;
mod indexing;
mod models;
mod queries;
mod schema;
mod store;
mod trait_def;

pub use error::{CatalogError, CatalogResult};
pub use indexing::group_by_initial;
pub use models::*;
pub use schema::LIBRARY_SCHEMA;
pub use store::SqliteCatalogStore;
pub use trait_def::CatalogStore;
