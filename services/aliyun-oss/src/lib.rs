//! Aliyun OSS client for osskit.
//!
//! This crate talks to Alibaba Cloud Object Storage Service (OSS) over plain HTTP
//! using the header signature scheme: every request carries a `Date` and an
//! `Authorization: OSS {access_key_id}:{signature}` header, where the signature is
//! a base64 HMAC-SHA1 over the verb, content headers, `x-oss` headers and the
//! addressed resource.
//!
//! ## Quick Start
//!
//! ```no_run
//! use osskit_aliyun_oss::{Acl, Client, Config, GetObjectOptions, PutObjectOptions, Sink};
//! use osskit_core::{Context, OsEnv, Result};
//! use osskit_file_io_tokio::TokioFileIo;
//! use osskit_http_send_reqwest::ReqwestHttpSend;
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let ctx = Context::new().with_env(OsEnv).with_file_io(TokioFileIo);
//!
//!     // Credentials and endpoint from `ALIBABA_CLOUD_*` env values.
//!     let config = Config::default().from_env(&ctx);
//!     let http = ReqwestHttpSend::with_pool(config.max_connections(), config.timeout())?;
//!     let client = Client::new(ctx.with_http_send(http), &config)?;
//!
//!     client.create_bucket("my-bucket", Acl::Private).await?;
//!     client
//!         .put_object(
//!             "my-bucket",
//!             "photos/cat.jpg",
//!             PathBuf::from("/tmp/cat.jpg"),
//!             PutObjectOptions::default(),
//!         )
//!         .await?;
//!
//!     let opts = GetObjectOptions {
//!         sink: Some(Sink::File(PathBuf::from("/tmp/cat-copy.jpg"))),
//!         ..Default::default()
//!     };
//!     client.get_object("my-bucket", "photos/cat.jpg", opts).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Responses
//!
//! Every operation resolves to a [`ResponseOutcome`]:
//!
//! - [`ResponseOutcome::ParsedBody`]: the XML payload as a [`serde_json::Value`]
//! - [`ResponseOutcome::StatusOnly`]: success without a payload
//! - [`ResponseOutcome::HeadersOnly`]: the response headers of `head_object`
//! - [`ResponseOutcome::StreamedToSink`]: the object was written to the requested sink
//!
//! Statuses other than 200 and 204 fail with `ServiceError`, carrying the status
//! and the parsed payload if there was one.

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod sign_request;
pub use sign_request::{build_string_to_sign, RequestSigner};

mod descriptor;
pub use descriptor::{BodySource, ListQuery, RequestDescriptor, Sink, Target};

mod resource;
pub use resource::{canonical_resource, url_path};

mod headers;
pub use headers::build_headers;

pub mod xml;

mod dispatch;
pub use dispatch::{RequestDispatcher, ResponseOutcome};

mod client;
pub use client::{Acl, Client, GetObjectOptions, PutObjectOptions};
