use crate::config::Config;
use crate::constants::{X_OSS_ACL, X_OSS_COPY_SOURCE};
use crate::descriptor::{BodySource, ListQuery, RequestDescriptor, Sink};
use crate::dispatch::{RequestDispatcher, ResponseOutcome};
use crate::sign_request::RequestSigner;
use http::{Method, Uri};
use osskit_core::{Context, Error, Result};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Canned access control list of a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acl {
    /// Only the owner may read or write.
    Private,
    /// Anyone may read, only the owner may write.
    PublicRead,
    /// Anyone may read and write.
    PublicReadWrite,
}

impl Acl {
    /// Wire value of this acl.
    pub fn as_str(&self) -> &'static str {
        match self {
            Acl::Private => "private",
            Acl::PublicRead => "public-read",
            Acl::PublicReadWrite => "public-read-write",
        }
    }
}

impl Display for Acl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Acl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "private" => Ok(Acl::Private),
            "public-read" => Ok(Acl::PublicRead),
            "public-read-write" => Ok(Acl::PublicReadWrite),
            v => Err(Error::request_invalid(format!("unknown acl: {v}"))),
        }
    }
}

/// Optional parameters of [`Client::put_object`].
#[derive(Debug, Clone, Default)]
pub struct PutObjectOptions {
    /// Overrides the content type guessed from the file or key.
    pub content_type: Option<String>,
    /// Base64 encoded MD5 of the body, sent as `Content-MD5`.
    pub content_md5: Option<String>,
    /// Metadata stored with the object, e.g. `x-oss-meta-author`.
    pub user_metas: HashMap<String, String>,
}

/// Optional parameters of [`Client::get_object`].
#[derive(Debug, Default)]
pub struct GetObjectOptions {
    /// Write the object here instead of parsing the response.
    pub sink: Option<Sink>,
    /// Extra request headers, e.g. `Range`.
    pub user_headers: HashMap<String, String>,
}

/// Client of one OSS endpoint.
///
/// All clones share the same credential and request limiter.
#[derive(Debug, Clone)]
pub struct Client {
    dispatcher: RequestDispatcher,
}

impl Client {
    /// Create a client that sends requests through `ctx`.
    ///
    /// Fails with `ConfigInvalid` when the credential is incomplete or the
    /// endpoint is not a valid URI.
    pub fn new(ctx: Context, config: &Config) -> Result<Self> {
        let credential = config.credential()?;
        let endpoint = config.endpoint();
        endpoint.parse::<Uri>()?;

        Ok(Self {
            dispatcher: RequestDispatcher::new(
                ctx,
                endpoint,
                RequestSigner::new(credential),
                config.max_connections(),
            ),
        })
    }

    /// Send a request described by `desc` as is.
    pub async fn send(
        &self,
        verb: Method,
        metas: HashMap<String, String>,
        desc: RequestDescriptor,
    ) -> Result<ResponseOutcome> {
        self.dispatcher.dispatch(verb, metas, desc).await
    }

    /// Create a bucket with the given acl.
    pub async fn create_bucket(&self, bucket: &str, acl: Acl) -> Result<ResponseOutcome> {
        check_bucket(bucket)?;
        self.send(Method::PUT, acl_metas(acl), RequestDescriptor::bucket(bucket))
            .await
    }

    /// Replace the acl of an existing bucket.
    pub async fn set_bucket_acl(&self, bucket: &str, acl: Acl) -> Result<ResponseOutcome> {
        check_bucket(bucket)?;
        self.send(Method::PUT, acl_metas(acl), RequestDescriptor::bucket(bucket))
            .await
    }

    /// List all buckets owned by the credential.
    pub async fn list_buckets(&self) -> Result<ResponseOutcome> {
        self.send(Method::GET, HashMap::new(), RequestDescriptor::service())
            .await
    }

    /// Delete an empty bucket.
    pub async fn delete_bucket(&self, bucket: &str) -> Result<ResponseOutcome> {
        check_bucket(bucket)?;
        self.send(Method::DELETE, HashMap::new(), RequestDescriptor::bucket(bucket))
            .await
    }

    /// Fetch the acl of a bucket.
    pub async fn get_bucket_acl(&self, bucket: &str) -> Result<ResponseOutcome> {
        check_bucket(bucket)?;
        self.send(
            Method::GET,
            HashMap::new(),
            RequestDescriptor::bucket(bucket).with_acl_query(),
        )
        .await
    }

    /// Upload an object.
    pub async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: impl Into<BodySource>,
        opts: PutObjectOptions,
    ) -> Result<ResponseOutcome> {
        check_object(bucket, key)?;

        let mut desc = RequestDescriptor::object(bucket, key).with_body(body);
        desc.content_type = opts.content_type;
        desc.content_md5 = opts.content_md5;
        desc.user_metas = opts.user_metas;
        let file = match &desc.body {
            BodySource::None => return Err(Error::request_invalid("put_object requires a body")),
            BodySource::File(path) => Some(path.clone()),
            _ => None,
        };
        // File bodies are always measured on disk.
        if let Some(path) = file {
            desc.content_length = Some(self.dispatcher.context().file_size(&path).await?);
        }

        self.send(Method::PUT, HashMap::new(), desc).await
    }

    /// Copy `source_key` to `key` inside the same bucket.
    pub async fn copy_object(
        &self,
        bucket: &str,
        key: &str,
        source_key: &str,
    ) -> Result<ResponseOutcome> {
        check_object(bucket, key)?;
        check_object(bucket, source_key)?;

        let metas = HashMap::from([(
            X_OSS_COPY_SOURCE.to_string(),
            format!("/{bucket}/{source_key}"),
        )]);
        self.send(Method::PUT, metas, RequestDescriptor::object(bucket, key))
            .await
    }

    /// Delete an object.
    pub async fn delete_object(&self, bucket: &str, key: &str) -> Result<ResponseOutcome> {
        check_object(bucket, key)?;
        self.send(Method::DELETE, HashMap::new(), RequestDescriptor::object(bucket, key))
            .await
    }

    /// Download an object, into `opts.sink` when set.
    pub async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        opts: GetObjectOptions,
    ) -> Result<ResponseOutcome> {
        check_object(bucket, key)?;

        let mut desc = RequestDescriptor::object(bucket, key);
        desc.sink = opts.sink;
        desc.user_headers = opts.user_headers;
        self.send(Method::GET, HashMap::new(), desc).await
    }

    /// Fetch the headers of an object, custom metadata included.
    pub async fn head_object(&self, bucket: &str, key: &str) -> Result<ResponseOutcome> {
        check_object(bucket, key)?;
        self.send(Method::HEAD, HashMap::new(), RequestDescriptor::object(bucket, key))
            .await
    }

    /// List the objects of a bucket.
    pub async fn list_objects(&self, bucket: &str, query: ListQuery) -> Result<ResponseOutcome> {
        check_bucket(bucket)?;
        self.send(
            Method::GET,
            HashMap::new(),
            RequestDescriptor::bucket(bucket).with_list_query(query),
        )
        .await
    }
}

fn acl_metas(acl: Acl) -> HashMap<String, String> {
    HashMap::from([(X_OSS_ACL.to_string(), acl.to_string())])
}

fn check_bucket(bucket: &str) -> Result<()> {
    if bucket.is_empty() {
        return Err(Error::request_invalid("bucket name must not be empty"));
    }
    Ok(())
}

fn check_object(bucket: &str, key: &str) -> Result<()> {
    check_bucket(bucket)?;
    if key.is_empty() {
        return Err(Error::request_invalid("object key must not be empty"));
    }
    Ok(())
}
