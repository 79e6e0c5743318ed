//! Blocking client for hosted inference endpoints.
//!
//! ```no_run
//! use infer_client::Client;
//! use infer_client::payload::url_input;
//! use infer_client::schemas::RunRequest;
//!
//! # fn main() -> Result<(), infer_client::error::ClientError> {
//! let client = Client::new("rpa_xxx")?;
//! let endpoint = client.endpoint("my-endpoint")?;
//! let result = endpoint.run_sync(&RunRequest::new(url_input("https://example.com/a.mp3")))?;
//! println!("{result}");
//! # Ok(())
//! # }
//! ```

pub mod cancellable;
mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod http;
pub mod payload;
pub mod schemas;

pub use crate::client::*;
