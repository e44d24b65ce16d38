pub mod client;
pub mod request;
pub mod response;

pub use client::{HttpClient, HttpClientBuilder, RequestSender};
pub use request::{HttpMethod, PreparedRequest, TargetConfig};
pub use response::ResponseInfo;
