//! Canonicalized headers and canonicalized resource strings.

use std::collections::BTreeMap;

use blobsign_core::{Result, SigningRequest};

use crate::constants::X_MS_PREFIX;

/// Build the canonicalized headers string.
///
/// Every `x-ms-*` header becomes a `name:value` line with a lower-cased name
/// and the first value of the header. Lines are sorted as whole lines and
/// joined by `\n`, without a trailing newline. No `x-ms-*` header gives the
/// empty string.
///
/// ## Reference
///
/// - [Constructing the canonicalized headers string](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key#constructing-the-canonicalized-headers-string)
pub fn canonicalize_headers(req: &SigningRequest) -> Result<String> {
    let mut lines: Vec<String> = req
        .header_to_vec_with_prefix(X_MS_PREFIX)?
        .into_iter()
        .map(|(k, v)| format!("{k}:{v}"))
        .collect();
    lines.sort();

    Ok(lines.join("\n"))
}

/// Build the canonicalized resource string.
///
/// The first line is `/{account}{path}` with the path as sent. Every query
/// parameter adds `name:v1,v2` with a lower-cased name and its values
/// sorted. All lines, the path line included, are then sorted again as whole
/// lines. The final sort must stay: services compare against a string built
/// exactly this way.
///
/// ## Reference
///
/// - [Constructing the canonicalized resource string](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key#constructing-the-canonicalized-resource-string)
pub fn canonicalize_resource(req: &SigningRequest, account_name: &str) -> String {
    let mut params: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for (k, v) in &req.query {
        params.entry(k.to_lowercase()).or_default().push(v);
    }

    let mut lines = Vec::with_capacity(params.len() + 1);
    lines.push(format!("/{}{}", account_name, req.path));
    for (k, mut values) in params {
        values.sort_unstable();
        lines.push(format!("{}:{}", k, values.join(",")));
    }
    lines.sort();

    lines.join("\n")
}
