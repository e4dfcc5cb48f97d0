use std::fmt::{Debug, Formatter};
use std::str::FromStr;
use std::time::Duration;

use blobsign_core::utils::Redact;
use blobsign_core::{Context, Error, Result};

use crate::connection_string;
use crate::constants::*;
use crate::Credential;

/// Config carries all the configuration for Azure Blob Storage.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// `account_name` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZBLOB_ACCOUNT_NAME`]
    pub account_name: Option<String>,
    /// `account_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZBLOB_ACCOUNT_KEY`]
    pub account_key: Option<String>,
    /// `sas_token` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZBLOB_SAS_TOKEN`]
    pub sas_token: Option<String>,
    /// Container that uploads go to.
    ///
    /// - env value: [`AZBLOB_CONTAINER_NAME`]
    pub container_name: Option<String>,
    /// Blob service endpoint like `https://account.blob.core.windows.net`.
    ///
    /// Built from the account name if unset.
    ///
    /// - env value: [`AZBLOB_ENDPOINT`]
    pub endpoint: Option<String>,
    /// Days a shared url stays valid, `0` hands out the public url.
    ///
    /// - env value: [`AZBLOB_SAS_EXPIRATION_DAYS`]
    pub sas_expiration_days: Option<i64>,
    /// Timeout of every request sent to the service.
    ///
    /// - env value: [`AZBLOB_TIMEOUT_SECS`], in seconds
    pub timeout: Option<Duration>,
    /// Maximum number of bytes kept from an error body, 1 MiB if unset.
    pub max_error_body: Option<usize>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("account_name", &self.account_name)
            .field("account_key", &Redact::from(&self.account_key))
            .field("sas_token", &Redact::from(&self.sas_token))
            .field("container_name", &self.container_name)
            .field("endpoint", &self.endpoint)
            .field("sas_expiration_days", &self.sas_expiration_days)
            .field("timeout", &self.timeout)
            .field("max_error_body", &self.max_error_body)
            .finish()
    }
}

impl Config {
    /// Load config from env.
    ///
    /// Values already set are kept. Numbers that fail to parse are reported
    /// as configuration errors.
    pub fn from_env(mut self, ctx: &Context) -> Result<Self> {
        let envs = ctx.env_vars();

        if let Some(v) = envs.get(AZBLOB_ACCOUNT_NAME) {
            self.account_name.get_or_insert_with(|| v.to_string());
        }
        if let Some(v) = envs.get(AZBLOB_ACCOUNT_KEY) {
            self.account_key.get_or_insert_with(|| v.to_string());
        }
        if let Some(v) = envs.get(AZBLOB_SAS_TOKEN) {
            self.sas_token.get_or_insert_with(|| v.to_string());
        }
        if let Some(v) = envs.get(AZBLOB_CONTAINER_NAME) {
            self.container_name.get_or_insert_with(|| v.to_string());
        }
        if let Some(v) = envs.get(AZBLOB_ENDPOINT) {
            self.endpoint.get_or_insert_with(|| v.to_string());
        }
        if self.sas_expiration_days.is_none() {
            if let Some(v) = envs.get(AZBLOB_SAS_EXPIRATION_DAYS) {
                self.sas_expiration_days = Some(parse_env(AZBLOB_SAS_EXPIRATION_DAYS, v)?);
            }
        }
        if self.timeout.is_none() {
            if let Some(v) = envs.get(AZBLOB_TIMEOUT_SECS) {
                self.timeout = Some(Duration::from_secs(parse_env(AZBLOB_TIMEOUT_SECS, v)?));
            }
        }

        Ok(self)
    }

    /// Parses an [Azure connection string][1] into a configuration object.
    ///
    /// The connection string doesn't have to specify all parameters, the
    /// rest can be set on the returned value.
    ///
    /// ```txt
    /// AccountName=mystorageaccount;
    /// AccountKey=Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==;
    /// BlobEndpoint=https://mystorageaccount.blob.core.windows.net
    /// ```
    ///
    /// `UseDevelopmentStorage=true` points at a local Azurite emulator.
    ///
    /// [1]: https://learn.microsoft.com/en-us/azure/storage/common/storage-configure-connection-string
    pub fn try_from_connection_string(conn_str: &str) -> Result<Self> {
        connection_string::parse(conn_str)
    }

    /// Build the credential described by this config.
    ///
    /// A SAS token wins over a shared key.
    pub fn credential(&self) -> Result<Credential> {
        if let Some(token) = self.sas_token.as_deref().filter(|v| !v.is_empty()) {
            return Ok(Credential::with_sas_token(token));
        }

        match (self.account_name.as_deref(), self.account_key.as_deref()) {
            (Some(name), Some(key)) if !name.is_empty() && !key.is_empty() => {
                Ok(Credential::with_shared_key(name, key))
            }
            _ => Err(Error::credential_missing(
                "neither sas token nor account name and key are configured",
            )),
        }
    }

    /// The blob service endpoint without trailing `/`.
    pub fn endpoint(&self) -> Result<String> {
        if let Some(endpoint) = self.endpoint.as_deref().filter(|v| !v.is_empty()) {
            return Ok(endpoint.trim_end_matches('/').to_string());
        }

        match self.account_name.as_deref() {
            Some(name) if !name.is_empty() => Ok(format!("https://{name}.blob.core.windows.net")),
            _ => Err(Error::config_invalid(
                "endpoint or account name is required to address blob storage",
            )),
        }
    }
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.trim().parse().map_err(|err| {
        Error::config_invalid(format!("invalid value of {key}: {value}")).with_source(
            anyhow::Error::new(err),
        )
    })
}
