use thiserror::Error;

use crate::validation::ValidationErrors;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Backend(#[from] lpcore::error::BackendError),
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("{0} not found")]
    NotFound(String),
    #[error("misconfiguration: {0}")]
    Misconfiguration(&'static str),
}

#[non_exhaustive]
#[derive(Debug, Error, PartialEq)]
pub enum AuthorizationError {
    #[error("an authenticated user is required")]
    Anonymous,
}
