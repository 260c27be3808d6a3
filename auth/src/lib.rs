//! Authentication primitives library
//!
//! Provides the I/O-free building blocks of the identity service:
//! - Password hashing (Argon2id)
//! - Signed-token issuance and validation with audience separation
//!
//! The service layer composes these with its own persistence and transport;
//! nothing in this crate touches a database, the network, or the wall clock
//! beyond timestamping claims.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("not_my_password", &hash));
//! ```
//!
//! ## Signed Tokens
//! ```
//! use auth::{Audience, Claims, TokenCodec};
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let claims = Claims::new("user123", Audience::Session, 3600);
//! let token = codec.issue(&claims).unwrap();
//!
//! let decoded = codec.decode(&token, Audience::Session).unwrap();
//! assert_eq!(decoded.sub, "user123");
//!
//! // A session token cannot be replayed against another operation.
//! assert!(codec.decode(&token, Audience::ResetPassword).is_err());
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Audience;
pub use token::Claims;
pub use token::TokenCodec;
pub use token::TokenError;
