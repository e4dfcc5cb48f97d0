//! Core components for signing blob storage requests.
//!
//! This crate provides the foundational types and traits shared by the
//! blobsign service crates.
//!
//! ## Overview
//!
//! - **Context**: A container that holds the implementations for HTTP sending and environment access
//! - **SigningRequest**: A read/write view over `http::request::Parts` used while canonicalizing and signing
//! - **Traits**: [`SignRequest`] for service signers and [`SigningCredential`] for credentials
//!
//! ## Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use blobsign_core::{Context, Result, SignRequest, SigningCredential, SigningRequest};
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     key: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.key.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MySigner;
//!
//! #[async_trait]
//! impl SignRequest for MySigner {
//!     type Credential = MyCredential;
//!
//!     async fn sign_request(
//!         &self,
//!         _: &Context,
//!         req: &mut http::request::Parts,
//!         credential: &Self::Credential,
//!     ) -> Result<()> {
//!         let mut ctx = SigningRequest::build(req)?;
//!         ctx.headers.insert("x-my-key", credential.key.parse()?);
//!         ctx.apply(req)
//!     }
//! }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: base64 and HMAC helpers
//! - [`time`]: time formatting used by storage protocols
//! - [`utils`]: redaction of sensitive values

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};

mod context;
pub use context::Context;
mod http_send;
pub use http_send::HttpSend;
mod env;
pub use env::{Env, OsEnv, StaticEnv};

mod api;
pub use api::{SignRequest, SigningCredential};
mod request;
pub use request::SigningRequest;
