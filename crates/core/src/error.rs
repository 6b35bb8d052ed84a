//! Unified error types for episearch.

use tokio_rusqlite::rusqlite;

/// Unified error types for the episearch pipelines.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Required query input absent or empty.
    #[error("MISSING_PARAMETER: {0} is required")]
    MissingParameter(&'static str),

    /// A table-of-contents entry did not have the expected shape.
    #[error("MALFORMED_SIDEBAR_ENTRY: {0}")]
    MalformedSidebarEntry(String),

    /// An episode body page did not have the expected shape.
    #[error("MALFORMED_BODY_ELEMENT: {0}")]
    MalformedBodyElement(String),

    /// Network or HTTP failure fetching an upstream page.
    #[error("UPSTREAM_FETCH_ERROR: {0}")]
    UpstreamFetch(String),

    /// Storage operation failed.
    #[error("PERSISTENCE_ERROR: {0}")]
    Persistence(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("PERSISTENCE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Result serialization failed.
    #[error("SERIALIZE_FAILED: {0}")]
    Serialize(String),

    /// Serialized query result exceeds the response payload ceiling.
    #[error("RESPONSE_TOO_LARGE: response is {0} bytes")]
    ResponseTooLarge(usize),
}

impl Error {
    /// HTTP-analogous status for reporting a failure to the caller.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::MissingParameter(_) => 400,
            Error::MalformedSidebarEntry(_) | Error::MalformedBodyElement(_) | Error::UpstreamFetch(_) => 502,
            Error::Persistence(_) | Error::MigrationFailed(_) | Error::Serialize(_) => 500,
            Error::ResponseTooLarge(_) => 503,
        }
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Persistence(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Persistence(tokio_rusqlite::Error::Close(c)),
            _ => Error::Persistence(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Persistence(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Persistence(tokio_rusqlite::Error::Error(err))
    }
}
