//! HTTP transport: request description, headers and the dispatch protocol.

pub mod headers;
pub mod http;
pub mod request;

pub use http::ApiHttpClient;
pub use request::{ApiRequest, Attempt, RequestOptions};
