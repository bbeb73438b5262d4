//! Talk to OSS compatible object storage without effort.
//!
//! This crate bundles the osskit crates behind feature flags:
//!
//! - `aliyun`: the Aliyun OSS client, under [`aliyun`]
//! - `default-context`: a ready to use [`Context`] backed by tokio and reqwest
//!
//! ## Example
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> osskit::Result<()> {
//! // Credentials and endpoint come from the `ALIBABA_CLOUD_*` env values.
//! let client = osskit::aliyun::default_client()?;
//! client.list_buckets().await?;
//! # Ok(())
//! # }
//! ```

pub use osskit_core::*;

#[cfg(feature = "default-context")]
mod context;
#[cfg(feature = "default-context")]
pub use context::default_context;

#[cfg(feature = "aliyun")]
pub mod aliyun;
