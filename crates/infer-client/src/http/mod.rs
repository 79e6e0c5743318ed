mod client;
mod error;
mod transport;

pub use client::ReqwestTransport;
pub use error::TransportError;
pub use transport::{HttpRequest, HttpResponse, Transport};
