use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Audience;
use super::claims::Claims;
use super::errors::TokenError;

/// Signed-token codec.
///
/// Issues and validates compact, URL-safe signed tokens (JWT, HS256) over a
/// process-wide shared secret. Stateless: every call is a pure function of
/// its inputs and the wall clock.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl TokenCodec {
    /// Create a codec from the shared signing secret.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - The secret must be stable across process restarts or outstanding
    ///   sessions and one-time tokens are invalidated
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Sign claims into a compact token string.
    ///
    /// # Errors
    /// * `EncodingFailed` - Serialization or signing failed
    pub fn issue(&self, claims: &Claims) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Validate a token and return its claims.
    ///
    /// A token is accepted only if the signature matches, the current time
    /// is before `exp` (no leeway), and the `aud` claim equals `expected`.
    ///
    /// # Errors
    /// * `BadSignature` - Signature does not verify against the secret
    /// * `Expired` - Past the `exp` claim
    /// * `AudienceMismatch` - `aud` names a different operation
    /// * `Malformed` - Structurally invalid or missing required claims
    pub fn decode(&self, token: &str, expected: Audience) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_audience(&[expected.as_str()]);
        validation.set_required_spec_claims(&["exp", "aud"]);
        validation.leeway = 0;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    ErrorKind::InvalidSignature => TokenError::BadSignature,
                    ErrorKind::InvalidAudience => TokenError::AudienceMismatch,
                    _ => TokenError::Malformed(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    #[test]
    fn test_issue_and_decode_round_trip() {
        let codec = TokenCodec::new(SECRET);
        let claims = Claims::new("user123", Audience::Session, 3600).with_extra("login", "alice");

        let token = codec.issue(&claims).expect("Failed to issue token");
        let decoded = codec
            .decode(&token, Audience::Session)
            .expect("Failed to decode token");

        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_decode_with_wrong_secret_is_bad_signature() {
        let issuer = TokenCodec::new(SECRET);
        let other = TokenCodec::new(b"another_secret_32_bytes_long_here!!");

        let token = issuer
            .issue(&Claims::new("user123", Audience::Session, 3600))
            .expect("Failed to issue token");

        let result = other.decode(&token, Audience::Session);
        assert!(matches!(result, Err(TokenError::BadSignature)));
    }

    #[test]
    fn test_decode_expired_token() {
        let codec = TokenCodec::new(SECRET);
        let claims = Claims::new("user123", Audience::ResetPassword, -30);

        let token = codec.issue(&claims).expect("Failed to issue token");
        let result = codec.decode(&token, Audience::ResetPassword);

        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_decode_wrong_audience() {
        let codec = TokenCodec::new(SECRET);
        let token = codec
            .issue(&Claims::new("user123", Audience::VerifyEmail, 3600))
            .expect("Failed to issue token");

        // Signature and expiry are valid; only the purpose differs.
        let result = codec.decode(&token, Audience::ResetPassword);
        assert!(matches!(result, Err(TokenError::AudienceMismatch)));
    }

    #[test]
    fn test_decode_garbage_is_malformed() {
        let codec = TokenCodec::new(SECRET);

        let result = codec.decode("not.a.token", Audience::Session);
        assert!(matches!(result, Err(TokenError::Malformed(_))));
    }
}
