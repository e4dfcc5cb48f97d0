//! Azure Blob Storage signing and upload for blobsign.
//!
//! This crate signs requests with Shared Key authorization, derives
//! read-only shared access signatures (service SAS) for blobs, and maps
//! error responses of the service into a structured [`Fault`].
//!
//! ## Overview
//!
//! - [`RequestSigner`] implements [`blobsign_core::SignRequest`] for a
//!   [`Credential`]. It only writes the `Authorization` header.
//! - [`sign_grant`] turns a [`DelegationGrant`] into signed query pairs.
//! - [`BlobClient`] builds upload requests, signs and sends them, and renders
//!   shareable urls.
//!
//! ## Example
//!
//! ```no_run
//! use blobsign_azure_blob::{BlobClient, Config};
//! use blobsign_core::{Context, OsEnv};
//! use blobsign_http_send_reqwest::ReqwestHttpSend;
//! use bytes::Bytes;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let ctx = Context::new()
//!         .with_http_send(ReqwestHttpSend::default())
//!         .with_env(OsEnv);
//!
//!     let config = Config::default().from_env(&ctx)?;
//!     let client = BlobClient::from_config(ctx, &config)?;
//!
//!     client
//!         .put_blob("images", "graph.png", Bytes::from_static(b"..."))
//!         .await?;
//!     println!("{}", client.shareable_url("images", "graph.png", 7)?);
//!
//!     Ok(())
//! }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;

pub mod canonical;

mod client;
pub use client::{escape_blob_name, BlobClient};

mod config;
pub use config::Config;

mod connection_string;

mod credential;
pub use credential::Credential;

mod error;
pub use error::{Error, Result};

mod fault;
pub use fault::{is_failure, Fault};

mod sas;
pub use sas::{
    encode_query, sign_grant, BlobSasPermissions, BlobSignedResource, DelegationGrant, SasProtocol,
};

mod sign_request;
pub use sign_request::RequestSigner;
