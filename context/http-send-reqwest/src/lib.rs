//! Reqwest-based HTTP transport for osskit.
//!
//! `ReqwestHttpSend` implements [`HttpSend`] on top of a pooled [`reqwest::Client`].
//! Request bodies that are streams are forwarded chunk by chunk, and response
//! bodies are handed back as streams so downloads never sit in memory.
//!
//! ## Example
//!
//! ```no_run
//! use osskit_core::Context;
//! use osskit_http_send_reqwest::ReqwestHttpSend;
//! use std::time::Duration;
//!
//! # fn example() -> osskit_core::Result<()> {
//! // At most 20 idle connections per host, 30 seconds without data is a failure.
//! let http = ReqwestHttpSend::with_pool(20, Duration::from_secs(30))?;
//! let ctx = Context::new().with_http_send(http);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use futures::TryStreamExt;
use log::debug;
use osskit_core::{Body, Error, HttpSend, Result};
use reqwest::Client;
use std::io;
use std::time::Duration;

/// [`HttpSend`] implemented with reqwest.
///
/// Cloning is cheap, clones share the same connection pool.
#[derive(Debug, Default, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a ReqwestHttpSend whose pool keeps at most `max_idle_per_host`
    /// idle connections and fails any connection that stays silent longer
    /// than `timeout`.
    pub fn with_pool(max_idle_per_host: usize, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(max_idle_per_host)
            .read_timeout(timeout)
            .build()
            .map_err(|e| Error::config_invalid("failed to build http client").with_source(e))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Body>) -> Result<http::Response<Body>> {
        let (parts, body) = req.into_parts();

        let body = if body.as_bytes().is_some() {
            // In-memory bodies let reqwest set the length and reuse the buffer as is.
            let bs = body
                .collect()
                .await
                .map_err(|e| Error::request_invalid("failed to read request body").with_source(e))?;
            reqwest::Body::from(bs)
        } else {
            reqwest::Body::wrap_stream(body.into_stream())
        };

        let req = self
            .client
            .request(parts.method, parts.uri.to_string())
            .headers(parts.headers)
            .body(body)
            .build()
            .map_err(|e| Error::request_invalid("failed to build request").with_source(e))?;

        debug!("sending request: {} {}", req.method(), req.url());
        let resp = self
            .client
            .execute(req)
            .await
            .map_err(|e| Error::transport("failed to send request").with_source(e))?;

        let status = resp.status();
        let version = resp.version();
        let headers = resp.headers().clone();
        let body = Body::from_stream(resp.bytes_stream().map_err(io::Error::other));

        let mut out = http::Response::new(body);
        *out.status_mut() = status;
        *out.version_mut() = version;
        *out.headers_mut() = headers;
        Ok(out)
    }
}
