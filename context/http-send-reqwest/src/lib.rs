//! Reqwest-based HTTP sender for blobsign.
//!
//! ```no_run
//! use blobsign_core::Context;
//! use blobsign_http_send_reqwest::ReqwestHttpSend;
//!
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::default().with_error_body_limit(64 * 1024));
//! ```

use async_trait::async_trait;
use blobsign_core::{Error, HttpSend, Result};
use bytes::{Bytes, BytesMut};
use http_body_util::BodyExt;
use reqwest::{Client, Request};

/// Bytes kept from an error response body unless configured otherwise.
pub const DEFAULT_ERROR_BODY_LIMIT: usize = 1024 * 1024;

/// HttpSend implementation on top of [`reqwest::Client`].
///
/// Success bodies are collected in full. Bodies of error responses, status
/// in `[400, 600)`, are read up to the error body limit and the rest is
/// dropped together with the connection.
#[derive(Debug, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
    error_body_limit: usize,
}

impl Default for ReqwestHttpSend {
    fn default() -> Self {
        Self::new(Client::default())
    }
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            error_body_limit: DEFAULT_ERROR_BODY_LIMIT,
        }
    }

    /// Stop reading error response bodies after `limit` bytes.
    pub fn with_error_body_limit(mut self, limit: usize) -> Self {
        self.error_body_limit = limit;
        self
    }
}

fn is_error_status(status: http::StatusCode) -> bool {
    (400..600).contains(&status.as_u16())
}

async fn read_capped(mut body: reqwest::Body, limit: usize) -> Result<Bytes> {
    let mut buf = BytesMut::new();
    while buf.len() < limit {
        let Some(frame) = body.frame().await else {
            break;
        };
        let frame =
            frame.map_err(|e| Error::unexpected("failed to read response body").with_source(e))?;
        if let Ok(data) = frame.into_data() {
            let take = data.len().min(limit - buf.len());
            buf.extend_from_slice(&data[..take]);
        }
    }
    Ok(buf.freeze())
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let req = Request::try_from(req)
            .map_err(|e| Error::request_invalid("failed to convert request").with_source(e))?;
        let resp: http::Response<reqwest::Body> = self
            .client
            .execute(req)
            .await
            .map_err(|e| Error::unexpected("failed to send request").with_source(e))?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = if is_error_status(parts.status) {
            read_capped(body, self.error_body_limit).await?
        } else {
            body.collect()
                .await
                .map(|buf| buf.to_bytes())
                .map_err(|e| Error::unexpected("failed to read response body").with_source(e))?
        };

        Ok(http::Response::from_parts(parts, bs))
    }
}
