//! Tests against a real storage account or an Azurite emulator.
//!
//! Set `BLOBSIGN_AZURE_BLOB_TEST=on` together with the `AZBLOB_*` variables
//! (a `.env` file works too) to run them.

use std::env;

use anyhow::Result;
use blobsign_azure_blob::{BlobClient, Config};
use blobsign_core::{Context, OsEnv};
use blobsign_http_send_reqwest::ReqwestHttpSend;
use bytes::Bytes;
use http::{Method, Request, StatusCode};
use log::{debug, warn};
use rand::distributions::Alphanumeric;
use rand::Rng;

fn init_client() -> Option<(Context, BlobClient, String)> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("BLOBSIGN_AZURE_BLOB_TEST").ok().as_deref() != Some("on") {
        return None;
    }

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let config = Config::default()
        .from_env(&ctx)
        .expect("AZBLOB_* env must be valid");
    let container = config
        .container_name
        .clone()
        .expect("env AZBLOB_CONTAINER_NAME must set");
    let client = BlobClient::from_config(ctx.clone(), &config).expect("client must build");

    Some((ctx, client, container))
}

fn random_blob_name() -> String {
    let name: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(20)
        .map(char::from)
        .collect();
    format!("blobsign/{name}.png")
}

#[tokio::test]
async fn test_head_missing_blob() -> Result<()> {
    let Some((_, client, container)) = init_client() else {
        warn!("BLOBSIGN_AZURE_BLOB_TEST is not set, skipped");
        return Ok(());
    };

    let req = Request::builder()
        .method(Method::HEAD)
        .uri(client.blob_url(&container, "not_exist_file")?)
        .header("x-ms-date", blobsign_core::time::format_http_date(blobsign_core::time::now()))
        .header("x-ms-version", "2017-04-17")
        .body(Bytes::new())?;

    let err = client.send(req).await.unwrap_err();
    debug!("got error: {err:?}");
    assert_eq!(err.fault().map(|f| f.status()), Some(StatusCode::NOT_FOUND));
    Ok(())
}

#[tokio::test]
async fn test_upload_and_share() -> Result<()> {
    let Some((ctx, client, container)) = init_client() else {
        warn!("BLOBSIGN_AZURE_BLOB_TEST is not set, skipped");
        return Ok(());
    };

    let blob = random_blob_name();
    client
        .put_blob(&container, &blob, Bytes::from_static(b"\x89PNG\r\n\x1a\n"))
        .await?;

    let url = client.shareable_url(&container, &blob, 1)?;
    debug!("shareable url: {url}");

    // The signed url needs no authorization header.
    let resp = ctx
        .http_send(Request::get(url).body(Bytes::new())?)
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.body().as_ref(), b"\x89PNG\r\n\x1a\n");
    Ok(())
}
