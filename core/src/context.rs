// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::{Body, Error, Result};
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};

/// Context carries the collaborators a client talks to: the HTTP transport,
/// local file I/O and the environment.
///
/// ## Important
///
/// osskit-core provides NO default implementations. Users MAY configure components they need.
/// Any unconfigured component will use a no-op implementation that returns errors or empty values when called.
///
/// ## Example
///
/// ```
/// use osskit_core::{Context, OsEnv};
///
/// // Create a context with explicit implementations
/// let ctx = Context::new()
///     .with_env(OsEnv);  // Optionally configure environment implementation
/// ```
#[derive(Clone)]
pub struct Context {
    fs: Arc<dyn FileIo>,
    http: Arc<dyn HttpSend>,
    env: Arc<dyn Env>,
}

impl Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("fs", &self.fs)
            .field("http", &self.http)
            .field("env", &self.env)
            .finish()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Create a new Context with no-op implementations.
    ///
    /// Use the `with_*` methods to configure the components you need.
    pub fn new() -> Self {
        Self {
            fs: Arc::new(NoopFileIo),
            http: Arc::new(NoopHttpSend),
            env: Arc::new(NoopEnv),
        }
    }

    /// Replace the file I/O implementation.
    pub fn with_file_io(mut self, fs: impl FileIo) -> Self {
        self.fs = Arc::new(fs);
        self
    }

    /// Replace the HTTP client implementation.
    pub fn with_http_send(mut self, http: impl HttpSend) -> Self {
        self.http = Arc::new(http);
        self
    }

    /// Replace the environment implementation.
    pub fn with_env(mut self, env: impl Env) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Return the size in bytes of a local file.
    #[inline]
    pub async fn file_size(&self, path: &Path) -> Result<u64> {
        self.fs.file_size(path).await
    }

    /// Open a local file for streaming reads.
    #[inline]
    pub async fn file_open(&self, path: &Path) -> Result<FileReader> {
        self.fs.file_open(path).await
    }

    /// Create (or truncate) a local file for streaming writes.
    #[inline]
    pub async fn file_create(&self, path: &Path) -> Result<FileWriter> {
        self.fs.file_create(path).await
    }

    /// Send http request and return the response with its body still streaming.
    #[inline]
    pub async fn http_send(&self, req: http::Request<Body>) -> Result<http::Response<Body>> {
        self.http.http_send(req).await
    }

    /// Get the environment variable.
    ///
    /// - Returns `Some(v)` if the environment variable is found and is valid utf-8.
    /// - Returns `None` if the environment variable is not found or value is invalid.
    #[inline]
    pub fn env_var(&self, key: &str) -> Option<String> {
        self.env.var(key)
    }
}

/// Reader handed out by [`FileIo::file_open`].
pub type FileReader = Box<dyn AsyncRead + Send + Unpin>;

/// Writer handed out by [`FileIo::file_create`].
pub type FileWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// FileIo gives streaming access to local files used as upload sources and
/// download sinks.
#[async_trait::async_trait]
pub trait FileIo: Debug + Send + Sync + 'static {
    /// Return the size of the file in bytes.
    async fn file_size(&self, path: &Path) -> Result<u64>;

    /// Open the file for reading.
    async fn file_open(&self, path: &Path) -> Result<FileReader>;

    /// Create or truncate the file for writing.
    async fn file_create(&self, path: &Path) -> Result<FileWriter>;
}

/// HttpSend is used to send http requests to the storage service.
///
/// Implementations own the connection pool. Request bodies may be streams and
/// response bodies must be returned as soon as headers arrive, without reading
/// the body ahead of the caller.
#[async_trait::async_trait]
pub trait HttpSend: Debug + Send + Sync + 'static {
    /// Send http request and return the response.
    async fn http_send(&self, req: http::Request<Body>) -> Result<http::Response<Body>>;
}

/// Permits parameterizing environment access.
pub trait Env: Debug + Send + Sync + 'static {
    /// Get an environment variable.
    ///
    /// - Returns `Some(v)` if the environment variable is found and is valid utf-8.
    /// - Returns `None` if the environment variable is not found or value is invalid.
    fn var(&self, key: &str) -> Option<String>;
}

/// Implements Env for the OS context.
#[derive(Debug, Copy, Clone)]
pub struct OsEnv;

impl Env for OsEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var_os(key)?.into_string().ok()
    }
}

/// StaticEnv provides a static env environment.
///
/// This is useful for testing or for providing a fixed environment.
#[derive(Debug, Clone, Default)]
pub struct StaticEnv {
    /// The environment variables to use.
    pub envs: HashMap<String, String>,
}

impl Env for StaticEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.envs.get(key).cloned()
    }
}

/// NoopFileIo is a no-op implementation that always returns an error.
///
/// This is used when no file I/O is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFileIo;

#[async_trait::async_trait]
impl FileIo for NoopFileIo {
    async fn file_size(&self, _path: &Path) -> Result<u64> {
        Err(Error::unexpected(
            "file access not supported: no file io configured",
        ))
    }

    async fn file_open(&self, _path: &Path) -> Result<FileReader> {
        Err(Error::unexpected(
            "file access not supported: no file io configured",
        ))
    }

    async fn file_create(&self, _path: &Path) -> Result<FileWriter> {
        Err(Error::unexpected(
            "file access not supported: no file io configured",
        ))
    }
}

/// NoopHttpSend is a no-op implementation that always returns an error.
///
/// This is used when no HTTP client is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHttpSend;

#[async_trait::async_trait]
impl HttpSend for NoopHttpSend {
    async fn http_send(&self, _req: http::Request<Body>) -> Result<http::Response<Body>> {
        Err(Error::unexpected(
            "HTTP sending not supported: no HTTP client configured",
        ))
    }
}

/// NoopEnv is a no-op implementation that always returns None.
///
/// This is used when no environment is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEnv;

impl Env for NoopEnv {
    fn var(&self, _key: &str) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[tokio::test]
    async fn test_noop_context() {
        let ctx = Context::new();

        let err = ctx.file_size(Path::new("/tmp/any")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unexpected);

        let req = http::Request::new(Body::empty());
        let err = ctx.http_send(req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unexpected);

        assert!(ctx.env_var("HOME").is_none());
    }

    #[test]
    fn test_static_env() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([("KEY".to_string(), "value".to_string())]),
        });

        assert_eq!(ctx.env_var("KEY").as_deref(), Some("value"));
        assert!(ctx.env_var("MISSING").is_none());
    }
}
