use std::fmt;

/// Where an inbound credential was carried.
///
/// A closed set of backends: dispatch happens on this tag, never by probing
/// every backend speculatively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// `Authorization: Bearer <token>` header
    Bearer,
    /// Session cookie
    Cookie,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Bearer => f.write_str("bearer"),
            CredentialSource::Cookie => f.write_str("cookie"),
        }
    }
}

/// An inbound credential: the raw carried value plus where it came from.
#[derive(Debug, Clone)]
pub struct Credential {
    pub source: CredentialSource,
    pub raw: String,
}

impl Credential {
    pub fn bearer(raw: impl Into<String>) -> Self {
        Self {
            source: CredentialSource::Bearer,
            raw: raw.into(),
        }
    }

    pub fn cookie(raw: impl Into<String>) -> Self {
        Self {
            source: CredentialSource::Cookie,
            raw: raw.into(),
        }
    }
}
