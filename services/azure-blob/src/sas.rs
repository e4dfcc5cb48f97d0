//! Service shared access signatures for blobs and containers.
//!
//! - [Create a service SAS](https://learn.microsoft.com/en-us/rest/api/storageservices/create-service-sas)

use std::fmt;

use blobsign_core::time::{format_rfc3339, now, DateTime};
use blobsign_core::{Error, Result};
use chrono::TimeDelta;
use log::debug;

use crate::constants::SERVICE_SAS_VERSION;
use crate::sign_request::signature;
use crate::Credential;

/// Protocols a SAS may be used over.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SasProtocol {
    /// HTTPS only.
    Https,
    /// HTTP and HTTPS.
    HttpHttps,
}

impl fmt::Display for SasProtocol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SasProtocol::Https => write!(f, "https"),
            SasProtocol::HttpHttps => write!(f, "http,https"),
        }
    }
}

/// Kind of resource a SAS grants access to.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum BlobSignedResource {
    /// A single blob.
    #[default]
    Blob,
    /// A container and every blob in it.
    Container,
}

impl fmt::Display for BlobSignedResource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Blob => write!(f, "b"),
            Self::Container => write!(f, "c"),
        }
    }
}

/// Permissions carried by a blob SAS.
///
/// Rendered in the order `racwdxyltmeop`, which the service requires.
#[allow(clippy::struct_excessive_bools)]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct BlobSasPermissions {
    /// `r`
    pub read: bool,
    /// `a`
    pub add: bool,
    /// `c`
    pub create: bool,
    /// `w`
    pub write: bool,
    /// `d`
    pub delete: bool,
    /// `x`
    pub delete_version: bool,
    /// `y`
    pub permanent_delete: bool,
    /// `l`
    pub list: bool,
    /// `t`
    pub tags: bool,
    /// `m`
    pub move_: bool,
    /// `e`
    pub execute: bool,
    /// `o`
    pub ownership: bool,
    /// `p`
    pub permissions: bool,
}

impl BlobSasPermissions {
    /// Read permission only.
    pub fn read_only() -> Self {
        Self {
            read: true,
            ..Default::default()
        }
    }
}

impl fmt::Display for BlobSasPermissions {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let flags = [
            (self.read, 'r'),
            (self.add, 'a'),
            (self.create, 'c'),
            (self.write, 'w'),
            (self.delete, 'd'),
            (self.delete_version, 'x'),
            (self.permanent_delete, 'y'),
            (self.list, 'l'),
            (self.tags, 't'),
            (self.move_, 'm'),
            (self.execute, 'e'),
            (self.ownership, 'o'),
            (self.permissions, 'p'),
        ];
        for (set, c) in flags {
            if set {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

/// A request for delegated, time limited access to a blob.
///
/// A grant is consumed by [`sign_grant`] and never kept around.
#[derive(Clone, Debug)]
pub struct DelegationGrant {
    container: String,
    blob: String,
    resource: BlobSignedResource,
    permissions: BlobSasPermissions,
    start: Option<DateTime>,
    expiry: DateTime,
    protocol: Option<SasProtocol>,
}

impl DelegationGrant {
    /// Grant `permissions` on `container/blob` until `expiry`.
    ///
    /// `blob` is the plain blob name, not url encoded. It must not be empty,
    /// use [`DelegationGrant::for_container`] for a container grant.
    pub fn new(
        container: impl Into<String>,
        blob: impl Into<String>,
        permissions: BlobSasPermissions,
        expiry: DateTime,
    ) -> Self {
        Self {
            container: container.into(),
            blob: blob.into(),
            resource: BlobSignedResource::Blob,
            permissions,
            start: None,
            expiry,
            protocol: None,
        }
    }

    /// Grant `permissions` on the whole container until `expiry`.
    pub fn for_container(
        container: impl Into<String>,
        permissions: BlobSasPermissions,
        expiry: DateTime,
    ) -> Self {
        Self {
            resource: BlobSignedResource::Container,
            ..Self::new(container, "", permissions, expiry)
        }
    }

    /// Grant `permissions` on `container/blob` for `days` days from now.
    ///
    /// Returns `Ok(None)` when `days` is zero: no grant is wanted and the
    /// caller should hand out the public url instead. Negative `days` is a
    /// configuration error.
    pub fn expires_in_days(
        container: impl Into<String>,
        blob: impl Into<String>,
        permissions: BlobSasPermissions,
        days: i64,
    ) -> Result<Option<Self>> {
        Self::expires_in_days_from(now(), container, blob, permissions, days)
    }

    fn expires_in_days_from(
        now: DateTime,
        container: impl Into<String>,
        blob: impl Into<String>,
        permissions: BlobSasPermissions,
        days: i64,
    ) -> Result<Option<Self>> {
        if days < 0 {
            return Err(Error::config_invalid(format!(
                "sas validity must not be negative, got {days} days"
            )));
        }
        if days == 0 {
            return Ok(None);
        }

        let expiry = TimeDelta::try_days(days)
            .and_then(|d| now.checked_add_signed(d))
            .ok_or_else(|| {
                Error::config_invalid(format!("sas validity of {days} days is out of range"))
            })?;

        Ok(Some(Self::new(container, blob, permissions, expiry)))
    }

    /// Only accept the SAS after `start`.
    pub fn with_start(mut self, start: DateTime) -> Self {
        self.start = Some(start);
        self
    }

    /// Restrict the protocols the SAS can be used over.
    pub fn with_protocol(mut self, protocol: SasProtocol) -> Self {
        self.protocol = Some(protocol);
        self
    }

    /// Container of this grant.
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Blob name of this grant, empty for a container grant.
    pub fn blob(&self) -> &str {
        &self.blob
    }

    /// Expiry of this grant.
    pub fn expiry(&self) -> DateTime {
        self.expiry
    }

    /// Kind of resource this grant covers.
    pub fn resource(&self) -> BlobSignedResource {
        self.resource
    }

    fn canonicalized_resource(&self, account_name: &str) -> String {
        match self.resource {
            BlobSignedResource::Blob => {
                format!("/blob/{}/{}/{}", account_name, self.container, self.blob)
            }
            BlobSignedResource::Container => format!("/blob/{}/{}", account_name, self.container),
        }
    }

    fn string_to_sign(&self, account_name: &str) -> String {
        let fields = [
            self.permissions.to_string(),
            self.start.map(format_rfc3339).unwrap_or_default(),
            format_rfc3339(self.expiry),
            self.canonicalized_resource(account_name),
            String::new(), // signed identifier
            String::new(), // signed ip
            self.protocol.map(|p| p.to_string()).unwrap_or_default(),
            SERVICE_SAS_VERSION.to_string(),
            self.resource.to_string(),
            String::new(), // snapshot time
            String::new(), // encryption scope
            String::new(), // rscc
            String::new(), // rscd
            String::new(), // rsce
            String::new(), // rscl
            String::new(), // rsct
        ];

        fields.join("\n")
    }
}

/// Sign `grant` with a shared key credential.
///
/// Returns the query pairs `sv`, `sp`, `sr`, `st` (if set), `se`, `spr` (if
/// set) and `sig` in that order, not yet url encoded. Use [`encode_query`] to
/// render them.
pub fn sign_grant(credential: &Credential, grant: DelegationGrant) -> Result<Vec<(String, String)>> {
    if grant.resource == BlobSignedResource::Blob && grant.blob.is_empty() {
        return Err(Error::config_invalid(format!(
            "blob grant on container {} has an empty blob name",
            grant.container
        )));
    }

    let Credential::SharedKey {
        account_name,
        account_key,
    } = credential
    else {
        return Err(Error::credential_missing(
            "service sas requires a shared key credential",
        ));
    };

    let string_to_sign = grant.string_to_sign(account_name);
    debug!("sas string to sign: {}", &string_to_sign);
    let sig = signature(account_key, &string_to_sign)?;

    let mut pairs = vec![
        ("sv".to_string(), SERVICE_SAS_VERSION.to_string()),
        ("sp".to_string(), grant.permissions.to_string()),
        ("sr".to_string(), grant.resource.to_string()),
    ];
    if let Some(start) = grant.start {
        pairs.push(("st".to_string(), format_rfc3339(start)));
    }
    pairs.push(("se".to_string(), format_rfc3339(grant.expiry)));
    if let Some(protocol) = grant.protocol {
        pairs.push(("spr".to_string(), protocol.to_string()));
    }
    pairs.push(("sig".to_string(), sig));

    Ok(pairs)
}

/// Render query pairs as `application/x-www-form-urlencoded`.
pub fn encode_query(pairs: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}
