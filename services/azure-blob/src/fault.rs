use bytes::Bytes;
use http::{HeaderMap, Response, StatusCode};
use serde::Deserialize;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Returns true if the service answered with an error status, `[400, 600)`.
pub fn is_failure(status: StatusCode) -> bool {
    (400..600).contains(&status.as_u16())
}

/// An error response of the storage service.
///
/// The raw body is kept as received, up to the configured limit. `Code` and
/// `Message` of the XML error body are parsed on a best effort basis.
#[derive(Debug, Clone, thiserror::Error)]
#[error("status {}: {}", .status.as_u16(), String::from_utf8_lossy(.body))]
pub struct Fault {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    error_code: Option<String>,
    error_message: Option<String>,
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

impl Fault {
    /// Build a fault from an error response, keeping at most `limit` bytes
    /// of its body.
    ///
    /// The sender bounds how much of an error body is read off the wire,
    /// `limit` only trims what it handed over.
    pub fn from_response(resp: Response<Bytes>, limit: usize) -> Self {
        let (parts, mut body) = resp.into_parts();
        body.truncate(limit);

        let xml = body.strip_prefix(UTF8_BOM).unwrap_or(&body);
        let parsed: ErrorBody = quick_xml::de::from_reader(xml).unwrap_or_default();

        Self {
            status: parts.status,
            headers: parts.headers,
            body,
            error_code: parsed.code.filter(|v| !v.is_empty()),
            error_message: parsed.message.filter(|v| !v.is_empty()),
        }
    }

    /// HTTP status of the response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Canonical reason of the status, like `Not Found`.
    pub fn status_text(&self) -> &str {
        self.status.canonical_reason().unwrap_or_default()
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw response body, truncated to the configured limit.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// `Code` of the XML error body, like `BlobNotFound`.
    pub fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref()
    }

    /// `Message` of the XML error body.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}
