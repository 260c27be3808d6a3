pub mod handlers;
pub mod middleware;
#[cfg(feature = "oauth")]
pub mod oauth;
pub mod router;
