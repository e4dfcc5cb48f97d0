use crate::Result;
use bytes::Bytes;
use std::fmt::Debug;

/// HttpSend is used to send signed requests to the storage service.
///
/// Implementations return the response with its body collected. They may
/// truncate the body to a configured limit, callers that need the full
/// payload must configure the implementation accordingly.
///
/// Errors returned here are connection level failures. A response with an
/// error status is still `Ok`, mapping it is up to the service crate.
#[async_trait::async_trait]
pub trait HttpSend: Debug + Send + Sync + 'static {
    /// Send http request and return the response.
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>>;
}

/// NoopHttpSend is a no-op implementation that always returns an error.
///
/// This is used when no HTTP client is configured.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct NoopHttpSend;

#[async_trait::async_trait]
impl HttpSend for NoopHttpSend {
    async fn http_send(&self, _req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        Err(crate::Error::unexpected(
            "HTTP sending not supported: no HTTP client configured",
        ))
    }
}
