use crate::Fault;

/// Errors returned by [`BlobClient`](crate::BlobClient).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request could not be built or signed, or the configuration is
    /// invalid. Retrying will not help.
    #[error("fatal: {0}")]
    Fatal(#[source] blobsign_core::Error),
    /// The request never got a response.
    #[error("transport: {0}")]
    Transport(#[source] blobsign_core::Error),
    /// The operation was canceled.
    #[error("the operation was canceled")]
    Canceled,
    /// The service answered with an error status.
    #[error("rejected: {0}")]
    Rejected(#[source] Fault),
    /// A local read failed.
    #[error("failed to {op}: {source}")]
    Io {
        /// The operation that failed.
        op: &'static str,
        /// The underlying error.
        source: std::io::Error,
    },
}

impl Error {
    /// The fault of a rejected request.
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            Error::Rejected(fault) => Some(fault),
            _ => None,
        }
    }
}

/// Result of [`BlobClient`](crate::BlobClient) operations.
pub type Result<T> = std::result::Result<T, Error>;
