use std::future::Future;
use std::time::Duration;

use crate::error::ApibenchError;
use crate::http::request::PreparedRequest;
use crate::http::response::ResponseInfo;

/// Issues one HTTP request and waits for the full response.
///
/// The timed runner is generic over this so it can be driven without a
/// network. Any returned error aborts the current target.
pub trait RequestSender {
    fn send(
        &self,
        request: PreparedRequest<'_>,
    ) -> impl Future<Output = Result<ResponseInfo, ApibenchError>>;
}

/// Wrapper around a reqwest Client with builder-pattern configuration.
pub struct HttpClient {
    inner: reqwest::Client,
}

/// Builder for [`HttpClient`].
pub struct HttpClientBuilder {
    timeout: Duration,
    pool_max_idle_per_host: usize,
    pool_idle_timeout: Duration,
    user_agent: String,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            pool_max_idle_per_host: 10,
            pool_idle_timeout: Duration::from_secs(90),
            user_agent: format!("apibench/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upper bound for a single request, including reading the body.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn pool_max_idle_per_host(mut self, n: usize) -> Self {
        self.pool_max_idle_per_host = n;
        self
    }

    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    pub fn build(self) -> Result<HttpClient, ApibenchError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .pool_idle_timeout(self.pool_idle_timeout)
            .user_agent(self.user_agent)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(HttpClient { inner: client })
    }
}

impl HttpClient {
    /// Returns a builder for customising the client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }
}

impl RequestSender for HttpClient {
    async fn send(&self, request: PreparedRequest<'_>) -> Result<ResponseInfo, ApibenchError> {
        let mut builder = self.inner.request(request.method.into(), request.url);

        for (key, value) in request.headers {
            builder = builder.header(key, value);
        }

        if let Some(body) = request.body {
            builder = builder.body(body.to_owned());
        }

        // Status is deliberately not checked: a 4xx/5xx is still a timed sample.
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body_bytes = response.bytes().await?;

        Ok(ResponseInfo {
            status,
            size_bytes: body_bytes.len() as u64,
        })
    }
}
