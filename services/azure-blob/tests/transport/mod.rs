use std::io;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};
use std::time::Duration;

use blobsign_azure_blob::{BlobClient, Config, Credential, Error};
use blobsign_core::{Context, ErrorKind};
use bytes::Bytes;
use http::{Request, StatusCode};
use pretty_assertions::assert_eq;
use tokio::io::{AsyncRead, ReadBuf};
use tokio_util::sync::CancellationToken;

use crate::{MockHttpSend, AZURITE_KEY};

const BLOB_NOT_FOUND: &str = "\u{feff}<?xml version=\"1.0\" encoding=\"utf-8\"?>\
    <Error><Code>BlobNotFound</Code><Message>The specified blob does not exist.</Message></Error>";

fn client(http: &MockHttpSend) -> BlobClient {
    BlobClient::new(
        Context::new().with_http_send(http.clone()),
        Credential::with_shared_key("devstoreaccount1", AZURITE_KEY),
    )
    .with_endpoint("http://127.0.0.1:10000/devstoreaccount1")
}

#[tokio::test]
async fn test_put_blob() {
    let _ = env_logger::builder().is_test(true).try_init();

    let http = MockHttpSend::respond(201, "");
    client(&http)
        .put_blob("images", "graph 1.png", Bytes::from_static(b"\x89PNG"))
        .await
        .unwrap();

    let requests = http.take_requests();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];

    assert_eq!(req.method(), "PUT");
    assert_eq!(
        req.uri(),
        "http://127.0.0.1:10000/devstoreaccount1/images/graph%201.png"
    );
    assert_eq!(req.body().as_ref(), b"\x89PNG");

    let headers = req.headers();
    assert_eq!(headers["x-ms-blob-type"], "BlockBlob");
    assert_eq!(headers["x-ms-version"], "2017-04-17");
    assert_eq!(headers["accept-charset"], "UTF-8");
    assert_eq!(headers["content-type"], "image/png");
    assert_eq!(headers["content-length"], "4");
    assert!(headers.contains_key("x-ms-date"));

    let authorization = &headers["authorization"];
    assert!(authorization.is_sensitive());
    assert!(authorization
        .to_str()
        .unwrap()
        .starts_with("SharedKey devstoreaccount1:"));
}

#[tokio::test]
async fn test_put_blob_with_sas_token() {
    let http = MockHttpSend::respond(201, "");
    let client = BlobClient::new(
        Context::new().with_http_send(http.clone()),
        Credential::with_sas_token("?sv=2022-11-02&sp=cw&sr=c&sig=ab%2Bc%3D"),
    )
    .with_endpoint("https://acct.blob.core.windows.net");

    client
        .put_blob("images", "a.png", Bytes::from_static(b"png"))
        .await
        .unwrap();

    let req = &http.take_requests()[0];
    assert_eq!(
        req.uri(),
        "https://acct.blob.core.windows.net/images/a.png?sv=2022-11-02&sp=cw&sr=c&sig=ab%2Bc%3D"
    );
    assert!(req.headers().get("authorization").is_none());
}

#[tokio::test]
async fn test_blob_not_found_is_rejected() {
    let http = MockHttpSend::respond(404, BLOB_NOT_FOUND);
    let req = Request::get("http://127.0.0.1:10000/devstoreaccount1/images/missing.png")
        .header("x-ms-date", "Tue, 01 Mar 2022 08:12:34 GMT")
        .header("x-ms-version", "2017-04-17")
        .body(Bytes::new())
        .unwrap();

    let err = client(&http).send(req).await.unwrap_err();
    let fault = err.fault().expect("must be rejected");

    assert_eq!(fault.status(), StatusCode::NOT_FOUND);
    assert_eq!(fault.error_code(), Some("BlobNotFound"));
    assert_eq!(
        fault.error_message(),
        Some("The specified blob does not exist.")
    );
    assert_eq!(fault.headers()["x-ms-request-id"], "7f0e");
}

#[tokio::test]
async fn test_success_is_never_a_fault() {
    // An error looking body on a success status is just a body.
    let http = MockHttpSend::respond(200, BLOB_NOT_FOUND);
    let req = Request::get("http://127.0.0.1:10000/devstoreaccount1/images/a.png")
        .body(Bytes::new())
        .unwrap();

    let resp = client(&http).send(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.body().as_ref(), BLOB_NOT_FOUND.as_bytes());
}

#[tokio::test]
async fn test_error_body_is_capped() {
    let http = MockHttpSend::respond(500, "internal error with a long explanation");
    let err = client(&http)
        .with_max_error_body(8)
        .put_blob("images", "a.png", Bytes::new())
        .await
        .unwrap_err();

    let fault = err.fault().unwrap();
    assert_eq!(fault.body().as_ref(), b"internal");
    assert_eq!(fault.error_code(), None);
    assert_eq!(err.to_string(), "rejected: status 500: internal");
}

#[tokio::test]
async fn test_connection_failure_is_transport() {
    let http = MockHttpSend::refuse();
    let err = client(&http)
        .put_blob("images", "a.png", Bytes::new())
        .await
        .unwrap_err();

    let Error::Transport(err) = err else {
        panic!("expected transport error, got {err:?}");
    };
    assert_eq!(err.kind(), ErrorKind::Unexpected);
}

#[tokio::test]
async fn test_timeout_is_transport() {
    let http = MockHttpSend::respond(201, "").with_delay(Duration::from_secs(5));
    let err = client(&http)
        .with_timeout(Duration::from_millis(20))
        .put_blob("images", "a.png", Bytes::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn test_cancel_in_flight_request() {
    let http = MockHttpSend::respond(201, "").with_delay(Duration::from_secs(5));
    let cancel = CancellationToken::new();

    let canceler = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        canceler.cancel();
    });

    let err = client(&http)
        .put_blob_with_cancel("images", "a.png", Bytes::new(), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Canceled), "got {err:?}");
    // The request did go out before it was dropped.
    assert_eq!(http.take_requests().len(), 1);
}

#[tokio::test]
async fn test_canceled_before_sending() {
    let http = MockHttpSend::respond(201, "");
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = client(&http)
        .put_blob_with_cancel("images", "a.png", Bytes::new(), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Canceled));
    assert!(http.take_requests().is_empty());
}

#[tokio::test]
async fn test_put_blob_from_reader() {
    let http = MockHttpSend::respond(201, "");
    let body: &[u8] = b"hello world";

    client(&http)
        .put_blob_from_reader("docs", "notes.txt", body, &CancellationToken::new())
        .await
        .unwrap();

    let req = &http.take_requests()[0];
    assert_eq!(req.body().as_ref(), b"hello world");
    assert_eq!(req.headers()["content-type"], "text/plain");
    assert_eq!(req.headers()["content-length"], "11");
}

struct BrokenReader;

impl AsyncRead for BrokenReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _: &mut TaskContext<'_>,
        _: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "disk gone")))
    }
}

#[tokio::test]
async fn test_read_failure_is_io() {
    let http = MockHttpSend::respond(201, "");
    let err = client(&http)
        .put_blob_from_reader("docs", "notes.txt", BrokenReader, &CancellationToken::new())
        .await
        .unwrap_err();

    let Error::Io { op, source } = err else {
        panic!("expected io error, got {err:?}");
    };
    assert_eq!(op, "read upload body");
    assert_eq!(source.kind(), io::ErrorKind::BrokenPipe);
    assert!(http.take_requests().is_empty());
}

#[tokio::test]
async fn test_client_from_connection_string() {
    let http = MockHttpSend::respond(201, "");
    let mut config = Config::try_from_connection_string("UseDevelopmentStorage=true").unwrap();
    config.timeout = Some(Duration::from_secs(10));

    BlobClient::from_config(Context::new().with_http_send(http.clone()), &config)
        .unwrap()
        .put_blob("images", "a.png", Bytes::new())
        .await
        .unwrap();

    let req = &http.take_requests()[0];
    assert_eq!(
        req.uri(),
        "http://127.0.0.1:10000/devstoreaccount1/images/a.png"
    );
    assert!(req.headers()["authorization"]
        .to_str()
        .unwrap()
        .starts_with("SharedKey devstoreaccount1:"));
}
