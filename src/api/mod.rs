// Backend API module.
// Provides the authenticated client, transport seam and types for the REST backend.

pub mod client;
pub mod endpoints;
pub mod transport;
pub mod types;

pub use client::{ApiClient, RequestDescriptor, resolve_url};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use types::*;
