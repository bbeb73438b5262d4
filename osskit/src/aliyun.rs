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

//! Aliyun OSS service support with convenience APIs
//!
//! This module re-exports the Aliyun OSS client along with convenience
//! functions for common use cases.

// Re-export all Aliyun OSS types
pub use osskit_aliyun_oss::*;

#[cfg(feature = "default-context")]
use crate::{default_context, Context, OsEnv, Result};

/// Create a client configured from the environment.
///
/// This function creates a client with:
/// - Default context (with Tokio file io, reqwest HTTP client, OS environment)
/// - Credentials and endpoint from the `ALIBABA_CLOUD_*` env values
///
/// # Example
///
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> osskit::Result<()> {
/// let client = osskit::aliyun::default_client()?;
/// client.create_bucket("mybucket", osskit::aliyun::Acl::Private).await?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "default-context")]
pub fn default_client() -> Result<Client> {
    from_config(Config::default())
}

/// Create a client from `config`, filling unset fields from the environment.
///
/// The connection pool is sized by `max_connections` and uses the configured
/// timeout.
#[cfg(feature = "default-context")]
pub fn from_config(config: Config) -> Result<Client> {
    let config = config.from_env(&Context::new().with_env(OsEnv));
    let ctx = default_context(config.max_connections(), config.timeout())?;
    Client::new(ctx, &config)
}
