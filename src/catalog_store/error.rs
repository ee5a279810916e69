use thiserror::Error;

/// Classification of catalog failures.
///
/// Callers branch on the variant: `NotFound` is a valid request for an entity
/// that does not exist, `InvalidInput` is a malformed request, everything else
/// is `Internal` and must not be shown to clients in detail.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("not found")]
    NotFound,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<rusqlite::Error> for CatalogError {
    fn from(err: rusqlite::Error) -> Self {
        CatalogError::Internal(err.into())
    }
}
