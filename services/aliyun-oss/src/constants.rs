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

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use std::time::Duration;

// Env values used in aliyun services.
pub const ALIBABA_CLOUD_ACCESS_KEY_ID: &str = "ALIBABA_CLOUD_ACCESS_KEY_ID";
pub const ALIBABA_CLOUD_ACCESS_KEY_SECRET: &str = "ALIBABA_CLOUD_ACCESS_KEY_SECRET";
pub const ALIBABA_CLOUD_OSS_HOST: &str = "ALIBABA_CLOUD_OSS_HOST";
pub const ALIBABA_CLOUD_OSS_PORT: &str = "ALIBABA_CLOUD_OSS_PORT";
pub const ALIBABA_CLOUD_OSS_TIMEOUT: &str = "ALIBABA_CLOUD_OSS_TIMEOUT";
pub const ALIBABA_CLOUD_OSS_MAX_CONNECTIONS: &str = "ALIBABA_CLOUD_OSS_MAX_CONNECTIONS";

// Client defaults.
pub const DEFAULT_HOST: &str = "oss.aliyuncs.com";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000_000);
pub const DEFAULT_MAX_CONNECTIONS: usize = 20;

/// Chunk size used when streaming files and readers into a request.
pub const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Header names containing this marker take part in the signature.
pub const OSS_HEADER_MARKER: &str = "x-oss";
pub const X_OSS_ACL: &str = "X-OSS-ACL";
pub const X_OSS_COPY_SOURCE: &str = "x-oss-copy-source";
pub const CONTENT_MD5: &str = "content-md5";

/// AsciiSet matching `encodeURIComponent`: everything except
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is escaped.
pub static OSS_URI_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');
