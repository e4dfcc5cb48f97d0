use std::future::Future;
use std::time::Duration;

use blobsign_core::time::{format_http_date, now};
use blobsign_core::{Context, SignRequest};
use bytes::Bytes;
use http::{header, Method, Request, Response};
use log::{debug, warn};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::sync::CancellationToken;

use crate::constants::*;
use crate::fault::is_failure;
use crate::sas::{encode_query, sign_grant};
use crate::{
    BlobSasPermissions, BlobSignedResource, Config, Credential, DelegationGrant, Error, Fault,
    RequestSigner, Result, SasProtocol,
};

/// Escape a blob name for use in a url path.
///
/// The name is form url encoded, then `+` becomes `%20` and `%2F` goes back
/// to `/` so that virtual directories survive.
///
/// ```
/// use blobsign_azure_blob::escape_blob_name;
///
/// assert_eq!(escape_blob_name("my file+name.png"), "my%20file%2Bname.png");
/// ```
pub fn escape_blob_name(name: &str) -> String {
    form_urlencoded::byte_serialize(name.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
        .replace("%2F", "/")
}

/// BlobClient signs and sends requests to Azure Blob Storage.
///
/// The client holds no mutable state and can be shared between tasks.
/// Every call may be canceled through a [`CancellationToken`]; nothing is
/// retried.
#[derive(Debug, Clone)]
pub struct BlobClient {
    ctx: Context,
    credential: Credential,
    signer: RequestSigner,
    endpoint: Option<String>,
    timeout: Option<Duration>,
    max_error_body: usize,
}

impl BlobClient {
    /// Create a client for `credential`.
    ///
    /// The endpoint defaults to `https://{account}.blob.core.windows.net` for
    /// a shared key credential. A SAS token credential needs
    /// [`BlobClient::with_endpoint`].
    pub fn new(ctx: Context, credential: Credential) -> Self {
        let endpoint = credential
            .account_name()
            .map(|name| format!("https://{name}.blob.core.windows.net"));

        Self {
            ctx,
            credential,
            signer: RequestSigner::new(),
            endpoint,
            timeout: None,
            max_error_body: DEFAULT_MAX_ERROR_BODY,
        }
    }

    /// Create a client from a [`Config`].
    pub fn from_config(ctx: Context, config: &Config) -> Result<Self> {
        let credential = config.credential().map_err(Error::Fatal)?;
        let endpoint = config.endpoint().map_err(Error::Fatal)?;

        let mut client = Self::new(ctx, credential).with_endpoint(endpoint);
        client.timeout = config.timeout;
        if let Some(limit) = config.max_error_body {
            client.max_error_body = limit;
        }
        Ok(client)
    }

    /// Use another blob service endpoint, for example an Azurite emulator at
    /// `http://127.0.0.1:10000/devstoreaccount1`.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into().trim_end_matches('/').to_string());
        self
    }

    /// Fail requests that take longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Keep at most `limit` bytes of error bodies.
    pub fn with_max_error_body(mut self, limit: usize) -> Self {
        self.max_error_body = limit;
        self
    }

    fn endpoint(&self) -> Result<&str> {
        self.endpoint.as_deref().ok_or_else(|| {
            Error::Fatal(blobsign_core::Error::config_invalid(
                "blob endpoint is required for a sas token credential",
            ))
        })
    }

    /// Url of a container.
    pub fn container_url(&self, container: &str) -> Result<String> {
        Ok(format!("{}/{}", self.endpoint()?, container))
    }

    /// Url of a blob, the name is escaped with [`escape_blob_name`].
    pub fn blob_url(&self, container: &str, blob: &str) -> Result<String> {
        Ok(format!(
            "{}/{}/{}",
            self.endpoint()?,
            container,
            escape_blob_name(blob)
        ))
    }

    /// Upload `body` as a block blob.
    pub async fn put_blob(&self, container: &str, blob: &str, body: Bytes) -> Result<()> {
        self.put_blob_with_cancel(container, blob, body, &CancellationToken::new())
            .await
    }

    /// Upload `body` as a block blob, giving up once `cancel` fires.
    pub async fn put_blob_with_cancel(
        &self,
        container: &str,
        blob: &str,
        body: Bytes,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let req = self.put_blob_request(container, blob, body)?;
        debug!(
            "uploading blob {blob} to container {container}, {} bytes",
            req.body().len()
        );

        self.send_with_cancel(req, cancel).await?;
        debug!("uploaded blob {blob} to container {container}");
        Ok(())
    }

    /// Read `reader` to the end and upload it as a block blob.
    pub async fn put_blob_from_reader<R>(
        &self,
        container: &str,
        blob: &str,
        mut reader: R,
        cancel: &CancellationToken,
    ) -> Result<()>
    where
        R: AsyncRead + Unpin + Send,
    {
        let mut buf = Vec::new();
        cancelable(cancel, async {
            reader
                .read_to_end(&mut buf)
                .await
                .map_err(|source| Error::Io {
                    op: "read upload body",
                    source,
                })
        })
        .await?;

        self.put_blob_with_cancel(container, blob, Bytes::from(buf), cancel)
            .await
    }

    fn put_blob_request(&self, container: &str, blob: &str, body: Bytes) -> Result<Request<Bytes>> {
        let content_type = mime_guess::from_path(blob)
            .first()
            .map(|m| m.to_string())
            .unwrap_or_default();

        Request::builder()
            .method(Method::PUT)
            .uri(self.blob_url(container, blob)?)
            .header(X_MS_BLOB_TYPE, BLOCK_BLOB)
            .header(X_MS_DATE, format_http_date(now()))
            .header(X_MS_VERSION, STORAGE_VERSION)
            .header(header::ACCEPT_CHARSET, "UTF-8")
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CONTENT_LENGTH, body.len())
            .body(body)
            .map_err(|err| Error::Fatal(err.into()))
    }

    /// Sign and send `req`.
    pub async fn send(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
        self.send_with_cancel(req, &CancellationToken::new()).await
    }

    /// Sign and send `req`, giving up once `cancel` fires.
    ///
    /// A response with a status in `[400, 600)` is returned as
    /// [`Error::Rejected`].
    pub async fn send_with_cancel(
        &self,
        req: Request<Bytes>,
        cancel: &CancellationToken,
    ) -> Result<Response<Bytes>> {
        let (mut parts, body) = req.into_parts();
        self.signer
            .sign_request(&self.ctx, &mut parts, &self.credential)
            .await
            .map_err(Error::Fatal)?;
        let req = Request::from_parts(parts, body);

        let method = req.method().clone();
        let uri = req.uri().path().to_string();
        let resp = cancelable(cancel, self.http_send(req)).await?;

        if is_failure(resp.status()) {
            let fault = Fault::from_response(resp, self.max_error_body);
            warn!(
                "{method} {uri} rejected with status {}, code {}",
                fault.status(),
                fault.error_code().unwrap_or("unknown")
            );
            return Err(Error::Rejected(fault));
        }

        Ok(resp)
    }

    async fn http_send(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
        let fut = self.ctx.http_send(req);
        match self.timeout {
            None => fut.await.map_err(Error::Transport),
            Some(timeout) => match tokio::time::timeout(timeout, fut).await {
                Ok(resp) => resp.map_err(Error::Transport),
                Err(_) => Err(Error::Transport(blobsign_core::Error::unexpected(format!(
                    "request timed out after {timeout:?}"
                )))),
            },
        }
    }

    /// Url granting what `grant` describes.
    ///
    /// Requires a shared key credential.
    pub fn sas_url(&self, grant: DelegationGrant) -> Result<String> {
        let url = match grant.resource() {
            BlobSignedResource::Container => self.container_url(grant.container())?,
            BlobSignedResource::Blob => self.blob_url(grant.container(), grant.blob())?,
        };
        let pairs = sign_grant(&self.credential, grant).map_err(Error::Fatal)?;

        Ok(format!("{url}?{}", encode_query(&pairs)))
    }

    /// Url that lets anyone read the blob for `days` days.
    ///
    /// `days == 0` returns the plain blob url, useful for public containers.
    /// Negative `days` is rejected. The grant is limited to https unless the
    /// endpoint itself is plain http, like a local emulator.
    pub fn shareable_url(&self, container: &str, blob: &str, days: i64) -> Result<String> {
        let grant = DelegationGrant::expires_in_days(
            container,
            blob,
            BlobSasPermissions::read_only(),
            days,
        )
        .map_err(Error::Fatal)?;

        let Some(grant) = grant else {
            return self.blob_url(container, blob);
        };

        let protocol = if self.endpoint()?.starts_with("http://") {
            SasProtocol::HttpHttps
        } else {
            SasProtocol::Https
        };
        self.sas_url(grant.with_protocol(protocol))
    }
}

async fn cancelable<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Canceled),
        r = fut => r,
    }
}
