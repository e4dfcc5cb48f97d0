//! Upload a local file under a random name and print a url to share it.
//!
//! ```shell
//! export AZBLOB_ACCOUNT_NAME=mystorageaccount
//! export AZBLOB_ACCOUNT_KEY=...
//! export AZBLOB_CONTAINER_NAME=images
//! export AZBLOB_SAS_EXPIRATION_DAYS=7
//! cargo run --example upload -- ./graph.png
//! ```

use std::path::Path;

use anyhow::{Context as _, Result};
use blobsign_azure_blob::{BlobClient, Config};
use blobsign_core::{Context, OsEnv};
use blobsign_http_send_reqwest::ReqwestHttpSend;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let _ = dotenv::dotenv();

    let path = std::env::args()
        .nth(1)
        .context("usage: upload <file>")?;

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let config = Config::default().from_env(&ctx)?;
    let container = config
        .container_name
        .clone()
        .context("AZBLOB_CONTAINER_NAME must be set")?;
    let client = BlobClient::from_config(ctx, &config)?;

    let blob = random_name(Path::new(&path));
    let file = tokio::fs::File::open(&path)
        .await
        .with_context(|| format!("failed to open {path}"))?;

    // Ctrl-C stops the upload.
    let cancel = CancellationToken::new();
    let canceler = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            canceler.cancel();
        }
    });

    client
        .put_blob_from_reader(&container, &blob, file, &cancel)
        .await
        .with_context(|| format!("failed to upload {path}"))?;

    let days = config.sas_expiration_days.unwrap_or_default();
    println!("{}", client.shareable_url(&container, &blob, days)?);

    Ok(())
}

/// A random name with the extension of `path`.
fn random_name(path: &Path) -> String {
    let name: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(30)
        .map(char::from)
        .collect();

    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!("{name}.{ext}"),
        None => name,
    }
}
