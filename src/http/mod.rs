//! HTTP client construction.
//!
//! Every client built here goes through the same middleware stack: request
//! tracing always, transient-failure retries only when asked for. Download
//! workers each get their own [`Session`].
//!
//! # Examples
//!
//! ```rust
//! use imgrab::http::{create_http_client, HttpClientConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = create_http_client(HttpClientConfig::default())?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod session;

pub use client::{browser_headers, create_http_client, HttpClientConfig, USER_AGENT_STRING};
pub use session::Session;
