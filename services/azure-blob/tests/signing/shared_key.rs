use blobsign_azure_blob::canonical::{canonicalize_headers, canonicalize_resource};
use blobsign_azure_blob::{Credential, RequestSigner};
use blobsign_core::{Context, ErrorKind, SignRequest, SigningRequest};
use http::request::Parts;
use http::Request;
use pretty_assertions::assert_eq;

use crate::AZURITE_KEY;

const LIST_URL: &str =
    "http://127.0.0.1:10000/devstoreaccount1/images?restype=container&comp=list&prefix=a%2Fb";

fn list_request(extra: &[(&str, &str)]) -> Parts {
    let mut builder = Request::get(LIST_URL)
        .header("x-ms-date", "Tue, 01 Mar 2022 08:12:34 GMT")
        .header("x-ms-version", "2017-04-17");
    for (k, v) in extra {
        builder = builder.header(*k, *v);
    }
    builder.body(()).unwrap().into_parts().0
}

async fn authorization(mut parts: Parts) -> String {
    RequestSigner::new()
        .sign_request(
            &Context::new(),
            &mut parts,
            &Credential::with_shared_key("devstoreaccount1", AZURITE_KEY),
        )
        .await
        .unwrap();
    parts.headers["authorization"].to_str().unwrap().to_string()
}

#[tokio::test]
async fn test_sign_list_blobs_on_emulator() {
    assert_eq!(
        authorization(list_request(&[])).await,
        "SharedKey devstoreaccount1:rgNCaY00KTu+zXRiSo/JscJ5azJBpals1bOo24vDb3A="
    );
}

#[tokio::test]
async fn test_content_type_changes_signature() {
    let plain = authorization(list_request(&[])).await;
    let typed = authorization(list_request(&[("content-type", "application/xml")])).await;
    assert_ne!(plain, typed);
}

#[tokio::test]
async fn test_header_order_does_not_change_signature() {
    let a = authorization(list_request(&[("x-ms-meta-b", "2"), ("x-ms-meta-a", "1")])).await;
    let b = authorization(list_request(&[("x-ms-meta-a", "1"), ("x-ms-meta-b", "2")])).await;
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_unsigned_headers_do_not_change_signature() {
    let plain = authorization(list_request(&[])).await;
    let extra = authorization(list_request(&[
        ("accept-charset", "UTF-8"),
        ("user-agent", "blobsign"),
    ]))
    .await;
    assert_eq!(plain, extra);
}

#[tokio::test]
async fn test_query_is_kept_after_signing() {
    let mut parts = list_request(&[]);
    RequestSigner::new()
        .sign_request(
            &Context::new(),
            &mut parts,
            &Credential::with_shared_key("devstoreaccount1", AZURITE_KEY),
        )
        .await
        .unwrap();

    assert_eq!(parts.uri, LIST_URL);
}

#[tokio::test]
async fn test_sign_fails_without_authority() {
    let (mut parts, _) = Request::get("/images/a.png").body(()).unwrap().into_parts();
    let err = RequestSigner::new()
        .sign_request(
            &Context::new(),
            &mut parts,
            &Credential::with_shared_key("devstoreaccount1", AZURITE_KEY),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    assert!(parts.headers.get("authorization").is_none());
}

#[test]
fn test_canonical_strings_of_list_request() {
    let mut parts = list_request(&[("X-Ms-Meta-Owner", "ops")]);
    let req = SigningRequest::build(&mut parts).unwrap();

    assert_eq!(
        canonicalize_headers(&req).unwrap(),
        "x-ms-date:Tue, 01 Mar 2022 08:12:34 GMT\nx-ms-meta-owner:ops\nx-ms-version:2017-04-17"
    );
    assert_eq!(
        canonicalize_resource(&req, "devstoreaccount1"),
        "/devstoreaccount1/devstoreaccount1/images\ncomp:list\nprefix:a/b\nrestype:container"
    );
}
