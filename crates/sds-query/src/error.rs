use sds_core::CoreError;
use thiserror::Error;

use crate::types::QueryResult;

#[derive(Debug, Error)]
pub enum QueryError {
    /// Network or TLS failure. The URL is stripped before wrapping so the
    /// account key never reaches a message.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Well-formed at the token level but not a usable document.
    #[error("malformed XML document: {0}")]
    Document(String),

    #[error("failed to map feed entry: {0}")]
    Mapping(String),

    #[error(transparent)]
    InvalidRequest(#[from] CoreError),

    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}

/// A query that stopped before completion.
///
/// `partial_results` holds every entry mapped before `error` occurred, in
/// feed order. It may be empty.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct QueryFailure {
    pub partial_results: Vec<QueryResult>,
    #[source]
    pub error: QueryError,
}

impl QueryFailure {
    pub fn new(partial_results: Vec<QueryResult>, error: QueryError) -> Self {
        Self {
            partial_results,
            error,
        }
    }
}

impl From<QueryError> for QueryFailure {
    fn from(error: QueryError) -> Self {
        Self::new(Vec::new(), error)
    }
}
