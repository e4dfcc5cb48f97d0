use std::collections::HashMap;

use blobsign_core::{Error, Result};

use crate::Config;

/// Well known account of the Azurite storage emulator.
pub(crate) const DEVELOPMENT_ACCOUNT_NAME: &str = "devstoreaccount1";
/// Well known key of the Azurite storage emulator, public by design of the emulator.
pub(crate) const DEVELOPMENT_ACCOUNT_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";
const DEVELOPMENT_BLOB_URI: &str = "http://127.0.0.1:10000";

/// Parse a blob storage connection string.
///
/// Only the fields used by blob storage are read, unknown keys are skipped.
pub(crate) fn parse(conn_str: &str) -> Result<Config> {
    let fields = split_fields(conn_str)?;

    if fields.get("UseDevelopmentStorage").map(String::as_str) == Some("true") {
        return Ok(development_config(&fields));
    }

    let mut config = Config {
        account_name: fields.get("AccountName").cloned(),
        endpoint: blob_endpoint(&fields)?,
        ..Default::default()
    };

    // A signature in the string wins over the account key.
    if let Some(token) = fields.get("SharedAccessSignature") {
        config.sas_token = Some(token.clone());
    } else if config.account_name.is_some() {
        config.account_key = fields.get("AccountKey").cloned();
    }

    Ok(config)
}

fn split_fields(conn_str: &str) -> Result<HashMap<String, String>> {
    conn_str
        .split(';')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(|field| {
            let (key, value) = field.split_once('=').ok_or_else(|| {
                Error::config_invalid(format!(
                    "invalid connection string, expected '=' in field: {field}"
                ))
            })?;
            Ok((key.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

fn development_config(fields: &HashMap<String, String>) -> Config {
    let account_name = fields
        .get("AccountName")
        .map_or(DEVELOPMENT_ACCOUNT_NAME, String::as_str);
    let account_key = fields
        .get("AccountKey")
        .map_or(DEVELOPMENT_ACCOUNT_KEY, String::as_str);
    let proxy = fields
        .get("DevelopmentStorageProxyUri")
        .map_or(DEVELOPMENT_BLOB_URI, String::as_str);

    Config {
        account_name: Some(account_name.to_string()),
        account_key: Some(account_key.to_string()),
        endpoint: Some(format!("{}/{}", proxy.trim_end_matches('/'), account_name)),
        ..Default::default()
    }
}

/// `BlobEndpoint` if present, otherwise built from the account name and
/// `EndpointSuffix`.
fn blob_endpoint(fields: &HashMap<String, String>) -> Result<Option<String>> {
    if let Some(endpoint) = fields.get("BlobEndpoint") {
        return Ok(Some(endpoint.clone()));
    }

    let (Some(account_name), Some(suffix)) = (fields.get("AccountName"), fields.get("EndpointSuffix"))
    else {
        return Ok(None);
    };

    let protocol = fields
        .get("DefaultEndpointsProtocol")
        .map_or("https", String::as_str);
    if protocol != "http" && protocol != "https" {
        return Err(Error::config_invalid(format!(
            "invalid DefaultEndpointsProtocol: {protocol}"
        )));
    }

    Ok(Some(format!("{protocol}://{account_name}.blob.{suffix}")))
}
