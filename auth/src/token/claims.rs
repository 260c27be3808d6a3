use std::collections::HashMap;
use std::fmt;

use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Purpose tag restricting where a token is accepted.
///
/// A closed set: every token the service issues belongs to exactly one of
/// these, and decoding requires naming the expected member. A verification
/// token can therefore never be replayed as a session or reset credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Audience {
    #[serde(rename = "identity:session")]
    Session,
    #[serde(rename = "identity:reset")]
    ResetPassword,
    #[serde(rename = "identity:verify")]
    VerifyEmail,
}

impl Audience {
    /// The audience string embedded in the token's `aud` claim.
    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::Session => "identity:session",
            Audience::ResetPassword => "identity:reset",
            Audience::VerifyEmail => "identity:verify",
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims carried by a signed token.
///
/// Subject, audience, issued-at, and expiry are always present; anything
/// else rides in `extra` and is flattened into the token payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Audience tag distinguishing the token's purpose
    pub aud: Audience,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Additional custom fields (flattened into token)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Create claims expiring `lifetime_seconds` from now.
    ///
    /// # Arguments
    /// * `subject` - User identifier the token speaks for
    /// * `aud` - Audience tag of the operation the token authorizes
    /// * `lifetime_seconds` - Seconds until expiry (may be negative in tests)
    pub fn new(subject: impl ToString, aud: Audience, lifetime_seconds: i64) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::seconds(lifetime_seconds);

        Self {
            sub: subject.to_string(),
            aud,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            extra: HashMap::new(),
        }
    }

    /// Add a custom field.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key.to_string(), json_value);
        }
        self
    }

    /// Look up a custom claim as a string.
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(|v| v.as_str())
    }
}
