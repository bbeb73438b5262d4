//! Streaming HTTP body shared by requests and responses.

use bytes::{Bytes, BytesMut};
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use std::fmt::{Debug, Formatter};
use std::io;

/// Body of a request sent through [`HttpSend`](crate::HttpSend), or of the response it returns.
///
/// A body is either fully in memory or a stream of chunks. Streams are consumed
/// exactly once; nothing in osskit replays them.
pub struct Body(Inner);

enum Inner {
    Empty,
    Bytes(Bytes),
    Stream(BoxStream<'static, io::Result<Bytes>>),
}

impl Body {
    /// An empty body.
    pub fn empty() -> Self {
        Body(Inner::Empty)
    }

    /// Wrap a stream of chunks.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = io::Result<Bytes>> + Send + 'static,
    {
        Body(Inner::Stream(stream.boxed()))
    }

    /// Returns the in-memory content, or `None` if this body is a stream.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.0 {
            Inner::Empty => Some(&[][..]),
            Inner::Bytes(bs) => Some(bs.as_ref()),
            Inner::Stream(_) => None,
        }
    }

    /// Turn the body into a chunk stream, whatever its representation.
    pub fn into_stream(self) -> BoxStream<'static, io::Result<Bytes>> {
        match self.0 {
            Inner::Empty => futures::stream::empty().boxed(),
            Inner::Bytes(bs) => futures::stream::once(async move { Ok(bs) }).boxed(),
            Inner::Stream(s) => s,
        }
    }

    /// Read the whole body into memory.
    pub async fn collect(self) -> io::Result<Bytes> {
        match self.0 {
            Inner::Empty => Ok(Bytes::new()),
            Inner::Bytes(bs) => Ok(bs),
            Inner::Stream(mut s) => {
                let mut buf = BytesMut::new();
                while let Some(chunk) = s.next().await {
                    buf.extend_from_slice(&chunk?);
                }
                Ok(buf.freeze())
            }
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl Debug for Body {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Inner::Empty => f.write_str("Body::Empty"),
            Inner::Bytes(bs) => write!(f, "Body::Bytes({} bytes)", bs.len()),
            Inner::Stream(_) => f.write_str("Body::Stream"),
        }
    }
}

impl From<Bytes> for Body {
    fn from(bs: Bytes) -> Self {
        if bs.is_empty() {
            Body::empty()
        } else {
            Body(Inner::Bytes(bs))
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(bs: Vec<u8>) -> Self {
        Bytes::from(bs).into()
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Bytes::from(s).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collect_stream() -> io::Result<()> {
        let chunks = vec![
            Ok(Bytes::from_static(b"hello")),
            Ok(Bytes::from_static(b", ")),
            Ok(Bytes::from_static(b"world")),
        ];
        let body = Body::from_stream(futures::stream::iter(chunks));
        assert!(body.as_bytes().is_none());
        assert_eq!(body.collect().await?, Bytes::from_static(b"hello, world"));
        Ok(())
    }

    #[tokio::test]
    async fn test_collect_stream_error() {
        let chunks = vec![
            Ok(Bytes::from_static(b"partial")),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
        ];
        let body = Body::from_stream(futures::stream::iter(chunks));
        let err = body.collect().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
    }

    #[tokio::test]
    async fn test_bytes_into_stream() -> io::Result<()> {
        let body = Body::from(b"abc".to_vec());
        assert_eq!(body.as_bytes(), Some(&b"abc"[..]));

        let mut s = body.into_stream();
        assert_eq!(s.next().await.transpose()?, Some(Bytes::from_static(b"abc")));
        assert!(s.next().await.is_none());
        Ok(())
    }
}
