use crate::DocId;

/// Broad classification of a [`SearchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("invalid document id {0}: ids must be non-negative")]
    InvalidDocumentId(DocId),
    #[error("document id {0} is already indexed")]
    DuplicateDocumentId(DocId),
    #[error("word {0:?} contains control characters")]
    InvalidWord(String),
    #[error("stop word {0:?} contains control characters")]
    InvalidStopWord(String),
    #[error("query word {0:?} is invalid")]
    InvalidQueryWord(String),
    #[error("document {0} has no ratings")]
    EmptyRatings(DocId),
    #[error("document {0} not found")]
    DocumentNotFound(DocId),
}

impl SearchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SearchError::DocumentNotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::InvalidArgument,
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
