//! kiosk-api
//!
//! The backend REST contract as seen from the kiosk: one [`Backend`] trait
//! covering every endpoint, the `{IsSuccess, Result}` envelope, request
//! payloads, a blocking-HTTP implementation, and a scriptable in-memory
//! backend for tests.

pub mod backend;
pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod http;
pub mod mock;
pub mod requests;

pub use backend::{Backend, BoxFuture};
pub use endpoint::Endpoint;
pub use envelope::Envelope;
pub use error::ApiError;
pub use http::HttpBackend;
