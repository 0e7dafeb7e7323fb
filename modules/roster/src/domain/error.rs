use roster_db::paging::{PageError, PagingError};
use thiserror::Error;

use super::model::ModelError;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unsupported sort property: {0}")]
    UnknownSortProperty(String),

    #[error("team not found: {0}")]
    TeamNotFound(i64),

    #[error("member not found: {0}")]
    MemberNotFound(i64),

    #[error(transparent)]
    Roster(#[from] ModelError),

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl RosterError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

impl From<PageError> for RosterError {
    fn from(e: PageError) -> Self {
        Self::InvalidArgument(e.to_string())
    }
}

impl From<PagingError> for RosterError {
    fn from(e: PagingError) -> Self {
        match e {
            PagingError::InvalidRequest(e) => e.into(),
            PagingError::UnknownSortProperty(p) => Self::UnknownSortProperty(p),
            PagingError::Db(e) => Self::Database(e),
        }
    }
}
