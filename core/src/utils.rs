//! Utility functions and types.

use std::fmt;

/// Redact hides a secret when it is formatted with `{:?}`.
///
/// Account keys and SAS tokens are long, so values with 12 or more
/// characters keep their first and last three characters to tell keys
/// apart. Shorter values are fully masked, empty values print `EMPTY`.
#[derive(Clone, Copy)]
pub struct Redact<'a>(&'a str);

impl Redact<'_> {
    const VISIBLE: usize = 3;
    const MIN_PARTIAL: usize = 12;
}

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact(value.as_deref().unwrap_or_default())
    }
}

impl fmt::Debug for Redact<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        if v.is_empty() {
            return f.write_str("EMPTY");
        }
        // Keys are ascii base64, but a non-ascii value must not panic on slicing.
        if v.len() < Self::MIN_PARTIAL || !v.is_ascii() {
            return f.write_str("***");
        }

        let (head, tail) = (&v[..Self::VISIBLE], &v[v.len() - Self::VISIBLE..]);
        write!(f, "{head}***{tail}")
    }
}
