use crate::canonical::{canonicalize_headers, canonicalize_resource};
use crate::constants::*;
use crate::Credential;
use async_trait::async_trait;
use blobsign_core::hash::{base64_decode, base64_hmac_sha256};
use blobsign_core::{Context, Result, SignRequest, SigningRequest};
use http::request::Parts;
use http::{header, HeaderName, HeaderValue};
use log::debug;

/// The standard headers of the string to sign, in order.
const STANDARD_HEADERS: [HeaderName; 11] = [
    header::CONTENT_ENCODING,
    header::CONTENT_LANGUAGE,
    header::CONTENT_LENGTH,
    HeaderName::from_static(CONTENT_MD5),
    header::CONTENT_TYPE,
    header::DATE,
    header::IF_MODIFIED_SINCE,
    header::IF_MATCH,
    header::IF_NONE_MATCH,
    header::IF_UNMODIFIED_SINCE,
    header::RANGE,
];

/// RequestSigner that implement Azure Storage Shared Key Authorization.
///
/// The signer only writes the `Authorization` header. Headers that take part
/// in the signature, `x-ms-date` and `x-ms-version` included, must be set by
/// the caller before signing: an absent header is signed as an empty line,
/// and the service rejects the request if it expected a value there.
///
/// - [Authorize with Shared Key](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key)
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestSigner;

impl RequestSigner {
    /// Create a new signer for Azure Blob Storage.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        credential: &Self::Credential,
    ) -> Result<()> {
        let mut ctx = SigningRequest::build(req)?;

        let signed = match credential {
            Credential::SasToken { token } => {
                ctx.query_append(token);
                Ok(())
            }
            Credential::SharedKey {
                account_name,
                account_key,
            } => sign_shared_key(&mut ctx, account_name, account_key),
        };

        // Hand the headers back even if signing failed half way.
        ctx.apply(req)?;
        signed
    }
}

fn sign_shared_key(ctx: &mut SigningRequest, account_name: &str, account_key: &str) -> Result<()> {
    let string_to_sign = string_to_sign(ctx, account_name)?;
    let signature = signature(account_key, &string_to_sign)?;

    ctx.headers.insert(header::AUTHORIZATION, {
        let mut value: HeaderValue = format!("SharedKey {account_name}:{signature}").parse()?;
        value.set_sensitive(true);
        value
    });

    Ok(())
}

/// Sign `string_to_sign` with the base64 encoded account key.
pub(crate) fn signature(account_key: &str, string_to_sign: &str) -> Result<String> {
    let key = base64_decode(account_key)?;
    base64_hmac_sha256(&key, string_to_sign.as_bytes())
}

/// Construct string to sign
///
/// ## Format
///
/// ```text
/// VERB + "\n" +
/// Content-Encoding + "\n" +
/// Content-Language + "\n" +
/// Content-Length + "\n" +
/// Content-MD5 + "\n" +
/// Content-Type + "\n" +
/// Date + "\n" +
/// If-Modified-Since + "\n" +
/// If-Match + "\n" +
/// If-None-Match + "\n" +
/// If-Unmodified-Since + "\n" +
/// Range + "\n" +
/// CanonicalizedHeaders + "\n" +
/// CanonicalizedResource;
/// ```
///
/// Always 14 lines, the canonicalized headers line stays even when empty.
/// A `Content-Length` of `0` is signed as an empty line, as required since
/// version 2015-02-21.
///
/// ## Reference
///
/// - [Blob, Queue, and File Services (Shared Key authorization)](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key)
pub(crate) fn string_to_sign(ctx: &SigningRequest, account_name: &str) -> Result<String> {
    let mut lines = Vec::with_capacity(14);

    lines.push(ctx.method.as_str().to_uppercase());
    for name in &STANDARD_HEADERS {
        let value = ctx.header_get_or_default(name)?;
        if *name == header::CONTENT_LENGTH && value == "0" {
            lines.push(String::new());
        } else {
            lines.push(value.to_string());
        }
    }
    lines.push(canonicalize_headers(ctx)?);
    lines.push(canonicalize_resource(ctx, account_name));

    let s = lines.join("\n");
    debug!("string to sign: {}", &s);

    Ok(s)
}
