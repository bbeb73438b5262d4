//! Core components for talking to an OSS compatible object storage service.
//!
//! This crate provides the foundational types shared by the osskit crates.
//!
//! ## Overview
//!
//! - **Context**: A container that holds implementations for HTTP sending, local file I/O and environment access
//! - **Body**: A request or response body that is either in memory or a stream of chunks
//! - **Error**: The error type every osskit operation reports, classified by [`ErrorKind`]
//!
//! ## Example
//!
//! ```no_run
//! use osskit_core::{Body, Context, HttpSend, Result};
//! use async_trait::async_trait;
//!
//! // A transport that answers every request with an empty 200.
//! #[derive(Debug)]
//! struct AlwaysOk;
//!
//! #[async_trait]
//! impl HttpSend for AlwaysOk {
//!     async fn http_send(&self, _: http::Request<Body>) -> Result<http::Response<Body>> {
//!         Ok(http::Response::new(Body::empty()))
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::new().with_http_send(AlwaysOk);
//! let resp = ctx.http_send(http::Request::new(Body::empty())).await?;
//! assert!(resp.status().is_success());
//! # Ok(())
//! # }
//! ```
//!
//! ## Traits
//!
//! - [`HttpSend`]: For sending HTTP requests with streaming bodies
//! - [`FileIo`]: For streaming reads and writes of local files
//! - [`Env`]: For environment variable access
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: Time manipulation utilities
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod body;
pub use body::Body;
mod context;
pub use context::{
    Context, Env, FileIo, FileReader, FileWriter, HttpSend, NoopEnv, NoopFileIo, NoopHttpSend,
    OsEnv, StaticEnv,
};
mod error;
pub use error::{Error, ErrorKind, Result};
