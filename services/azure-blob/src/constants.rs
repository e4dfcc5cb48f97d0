// Headers used in azure blob services.
pub const X_MS_DATE: &str = "x-ms-date";
pub const X_MS_VERSION: &str = "x-ms-version";
pub const X_MS_BLOB_TYPE: &str = "x-ms-blob-type";
pub const CONTENT_MD5: &str = "content-md5";

/// Prefix of the headers that take part in the canonicalized headers.
pub const X_MS_PREFIX: &str = "x-ms-";

/// Storage service version sent with every request.
pub const STORAGE_VERSION: &str = "2017-04-17";

/// Service SAS version, it decides the layout of the SAS string to sign.
pub const SERVICE_SAS_VERSION: &str = "2022-11-02";

pub const BLOCK_BLOB: &str = "BlockBlob";

/// Error bodies are read up to 1 MiB.
pub const DEFAULT_MAX_ERROR_BODY: usize = 1 << 20;

// Env values used in azure blob services.
pub const AZBLOB_ACCOUNT_NAME: &str = "AZBLOB_ACCOUNT_NAME";
pub const AZBLOB_ACCOUNT_KEY: &str = "AZBLOB_ACCOUNT_KEY";
pub const AZBLOB_SAS_TOKEN: &str = "AZBLOB_SAS_TOKEN";
pub const AZBLOB_CONTAINER_NAME: &str = "AZBLOB_CONTAINER_NAME";
pub const AZBLOB_ENDPOINT: &str = "AZBLOB_ENDPOINT";
pub const AZBLOB_SAS_EXPIRATION_DAYS: &str = "AZBLOB_SAS_EXPIRATION_DAYS";
pub const AZBLOB_TIMEOUT_SECS: &str = "AZBLOB_TIMEOUT_SECS";
