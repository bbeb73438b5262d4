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

use osskit_core::{Context, OsEnv, Result};
use osskit_file_io_tokio::TokioFileIo;
use osskit_http_send_reqwest::ReqwestHttpSend;
use std::time::Duration;

/// Create a context that reads the process environment, does file io with
/// tokio and sends requests through a pooled reqwest client.
///
/// The pool keeps at most `max_idle_per_host` idle connections and fails any
/// connection that stays silent for longer than `timeout`.
pub fn default_context(max_idle_per_host: usize, timeout: Duration) -> Result<Context> {
    let http = ReqwestHttpSend::with_pool(max_idle_per_host, timeout)?;
    Ok(Context::new()
        .with_env(OsEnv)
        .with_file_io(TokioFileIo)
        .with_http_send(http))
}
