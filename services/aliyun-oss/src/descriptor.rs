use bytes::Bytes;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::path::PathBuf;
use tokio::io::{AsyncRead, AsyncWrite};

/// What a request is addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// The service itself, e.g. listing buckets.
    Service,
    /// A bucket.
    Bucket(String),
    /// An object inside a bucket.
    Object {
        /// Bucket name.
        bucket: String,
        /// Object key, may contain `/`.
        key: String,
    },
}

/// Query parameters used by object listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Only list keys starting with this prefix.
    pub prefix: Option<String>,
    /// Start listing after this key.
    pub marker: Option<String>,
    /// Group keys sharing a prefix up to this delimiter.
    pub delimiter: Option<String>,
    /// Maximum number of keys returned.
    pub max_keys: Option<u32>,
}

/// Where an upload body comes from.
#[derive(Default)]
pub enum BodySource {
    /// No body.
    #[default]
    None,
    /// A local file, streamed from disk.
    File(PathBuf),
    /// A buffer the caller already holds.
    Bytes(Bytes),
    /// An open reader. Readers are not replayable, so the length must be known upfront.
    Stream {
        /// The reader to drain into the request.
        reader: Box<dyn AsyncRead + Send + Unpin>,
        /// Exact number of bytes the reader yields.
        content_length: u64,
    },
}

impl BodySource {
    /// Wrap an open reader whose length is known.
    pub fn stream(reader: impl AsyncRead + Send + Unpin + 'static, content_length: u64) -> Self {
        BodySource::Stream {
            reader: Box::new(reader),
            content_length,
        }
    }

    /// Check whether there is a body to send.
    pub fn is_some(&self) -> bool {
        !matches!(self, BodySource::None)
    }
}

impl Debug for BodySource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BodySource::None => f.write_str("None"),
            BodySource::File(path) => f.debug_tuple("File").field(path).finish(),
            BodySource::Bytes(bs) => write!(f, "Bytes({} bytes)", bs.len()),
            BodySource::Stream { content_length, .. } => f
                .debug_struct("Stream")
                .field("content_length", content_length)
                .finish_non_exhaustive(),
        }
    }
}

impl From<Bytes> for BodySource {
    fn from(bs: Bytes) -> Self {
        BodySource::Bytes(bs)
    }
}

impl From<Vec<u8>> for BodySource {
    fn from(bs: Vec<u8>) -> Self {
        BodySource::Bytes(bs.into())
    }
}

impl From<PathBuf> for BodySource {
    fn from(path: PathBuf) -> Self {
        BodySource::File(path)
    }
}

/// Where a download body goes.
pub enum Sink {
    /// A local file, created or truncated.
    File(PathBuf),
    /// An open writer. It is flushed and shut down once the body is written.
    Writer(Box<dyn AsyncWrite + Send + Unpin>),
}

impl Sink {
    /// Wrap an open writer.
    pub fn writer(w: impl AsyncWrite + Send + Unpin + 'static) -> Self {
        Sink::Writer(Box::new(w))
    }
}

impl Debug for Sink {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Sink::File(path) => f.debug_tuple("File").field(path).finish(),
            Sink::Writer(_) => f.write_str("Writer"),
        }
    }
}

/// Everything one request needs besides its verb and operation metas.
#[derive(Debug)]
pub struct RequestDescriptor {
    /// Service, bucket or object.
    pub target: Target,
    /// Address the `acl` sub-resource. Ignored for [`Target::Service`].
    pub acl_query: bool,
    /// Listing parameters, only sent when set.
    pub list_query: Option<ListQuery>,
    /// Upload body.
    pub body: BodySource,
    /// Length of a [`BodySource::File`] body. Looked up on disk at dispatch when unset.
    pub content_length: Option<u64>,
    /// Overrides the content type guessed from the file or key extension.
    pub content_type: Option<String>,
    /// Caller supplied `Content-MD5`, base64 encoded.
    pub content_md5: Option<String>,
    /// Metadata merged into the signed headers, e.g. `x-oss-meta-*`.
    pub user_metas: HashMap<String, String>,
    /// Headers sent as is and left out of the signature.
    pub user_headers: HashMap<String, String>,
    /// Download destination.
    pub sink: Option<Sink>,
}

impl RequestDescriptor {
    /// Create a descriptor for the given target.
    pub fn new(target: Target) -> Self {
        Self {
            target,
            acl_query: false,
            list_query: None,
            body: BodySource::None,
            content_length: None,
            content_type: None,
            content_md5: None,
            user_metas: HashMap::new(),
            user_headers: HashMap::new(),
            sink: None,
        }
    }

    /// Create a service level descriptor.
    pub fn service() -> Self {
        Self::new(Target::Service)
    }

    /// Create a bucket level descriptor.
    pub fn bucket(bucket: &str) -> Self {
        Self::new(Target::Bucket(bucket.to_string()))
    }

    /// Create an object level descriptor.
    pub fn object(bucket: &str, key: &str) -> Self {
        Self::new(Target::Object {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    /// Address the `acl` sub-resource.
    pub fn with_acl_query(mut self) -> Self {
        self.acl_query = true;
        self
    }

    /// Set listing parameters.
    pub fn with_list_query(mut self, query: ListQuery) -> Self {
        self.list_query = Some(query);
        self
    }

    /// Set the upload body.
    pub fn with_body(mut self, body: impl Into<BodySource>) -> Self {
        self.body = body.into();
        self
    }

    /// Set the length of a file body.
    pub fn with_content_length(mut self, length: u64) -> Self {
        self.content_length = Some(length);
        self
    }

    /// Override the content type.
    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }

    /// Supply a `Content-MD5` value.
    pub fn with_content_md5(mut self, content_md5: &str) -> Self {
        self.content_md5 = Some(content_md5.to_string());
        self
    }

    /// Add one piece of user metadata.
    pub fn with_user_meta(mut self, key: &str, value: &str) -> Self {
        self.user_metas.insert(key.to_string(), value.to_string());
        self
    }

    /// Add one unsigned user header.
    pub fn with_user_header(mut self, key: &str, value: &str) -> Self {
        self.user_headers.insert(key.to_string(), value.to_string());
        self
    }

    /// Set the download destination.
    pub fn with_sink(mut self, sink: Sink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Object key, if this descriptor targets an object.
    pub fn key(&self) -> Option<&str> {
        match &self.target {
            Target::Object { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Length of the body as far as it is known without touching the disk.
    pub fn body_length(&self) -> Option<u64> {
        match &self.body {
            BodySource::None => None,
            BodySource::Bytes(bs) => Some(bs.len() as u64),
            BodySource::File(_) => self.content_length,
            BodySource::Stream { content_length, .. } => Some(*content_length),
        }
    }
}
