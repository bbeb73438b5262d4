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

//! Tokio-based file I/O implementation for osskit.
//!
//! This crate provides `TokioFileIo`, which implements the `FileIo` trait from
//! `osskit_core` using Tokio's file system operations.
//!
//! ## Overview
//!
//! Uploads read local files through the returned reader in fixed-size chunks,
//! and downloads write into the returned writer as the response arrives, so
//! neither direction holds a whole object in memory.
//!
//! ## Example
//!
//! ```no_run
//! use osskit_core::Context;
//! use osskit_file_io_tokio::TokioFileIo;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() {
//!     let ctx = Context::new().with_file_io(TokioFileIo);
//!
//!     match ctx.file_size(Path::new("/path/to/object.bin")).await {
//!         Ok(size) => println!("object is {size} bytes"),
//!         Err(e) => eprintln!("failed to stat file: {e}"),
//!     }
//! }
//! ```

use async_trait::async_trait;
use osskit_core::{Error, FileIo, FileReader, FileWriter, Result};
use std::path::Path;

/// Tokio-based implementation of the `FileIo` trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileIo;

#[async_trait]
impl FileIo for TokioFileIo {
    async fn file_size(&self, path: &Path) -> Result<u64> {
        let meta = tokio::fs::metadata(path).await.map_err(|e| {
            Error::request_invalid(format!("failed to stat file {}", path.display()))
                .with_source(e)
        })?;
        Ok(meta.len())
    }

    async fn file_open(&self, path: &Path) -> Result<FileReader> {
        let f = tokio::fs::File::open(path).await.map_err(|e| {
            Error::request_invalid(format!("failed to open file {}", path.display()))
                .with_source(e)
        })?;
        Ok(Box::new(f))
    }

    async fn file_create(&self, path: &Path) -> Result<FileWriter> {
        let f = tokio::fs::File::create(path).await.map_err(|e| {
            Error::sink(format!("failed to create file {}", path.display())).with_source(e)
        })?;
        Ok(Box::new(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osskit_core::ErrorKind;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_write_then_read() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("object.txt");

        let mut w = TokioFileIo.file_create(&path).await?;
        w.write_all(b"hello, oss").await?;
        w.shutdown().await?;

        assert_eq!(TokioFileIo.file_size(&path).await?, 10);

        let mut r = TokioFileIo.file_open(&path).await?;
        let mut content = String::new();
        r.read_to_string(&mut content).await?;
        assert_eq!(content, "hello, oss");
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = TokioFileIo
            .file_size(Path::new("/definitely/not/here.bin"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    }

    #[tokio::test]
    async fn test_create_in_missing_dir_is_sink_error() {
        let err = match TokioFileIo
            .file_create(Path::new("/definitely/not/here/out.bin"))
            .await
        {
            Ok(_) => panic!("create must fail"),
            Err(e) => e,
        };
        assert_eq!(err.kind(), ErrorKind::SinkError);
    }
}
