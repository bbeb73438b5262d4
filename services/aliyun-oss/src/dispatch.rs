use crate::constants::UPLOAD_CHUNK_SIZE;
use crate::descriptor::{BodySource, RequestDescriptor, Sink};
use crate::headers::build_headers;
use crate::resource::url_path;
use crate::sign_request::RequestSigner;
use crate::xml;
use futures::TryStreamExt;
use http::{HeaderMap, Method, Request, Response, StatusCode};
use log::debug;
use osskit_core::{Body, Context, Error, FileReader, FileWriter, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::Semaphore;
use tokio_util::io::ReaderStream;

/// What a successful request produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseOutcome {
    /// The response body was written to the requested sink.
    StreamedToSink(StatusCode),
    /// Response headers of a HEAD request.
    HeadersOnly(HeaderMap),
    /// The response body, parsed.
    ParsedBody(StatusCode, Value),
    /// The response carried no usable body.
    StatusOnly(StatusCode),
}

impl ResponseOutcome {
    /// Status code of the response, if the outcome kept it.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ResponseOutcome::StreamedToSink(status)
            | ResponseOutcome::ParsedBody(status, _)
            | ResponseOutcome::StatusOnly(status) => Some(*status),
            ResponseOutcome::HeadersOnly(_) => None,
        }
    }
}

/// RequestDispatcher turns a descriptor into one signed HTTP exchange.
///
/// Every dispatch holds a permit of the shared semaphore from the moment its
/// headers are signed until its response has been consumed, so a queued
/// request never goes out with a stale `Date`.
#[derive(Debug, Clone)]
pub struct RequestDispatcher {
    ctx: Context,
    endpoint: String,
    signer: RequestSigner,
    permits: Arc<Semaphore>,
}

impl RequestDispatcher {
    /// Create a dispatcher sending to `endpoint`, e.g. `http://oss.aliyuncs.com:8080`.
    pub fn new(
        ctx: Context,
        endpoint: impl Into<String>,
        signer: RequestSigner,
        max_connections: usize,
    ) -> Self {
        Self {
            ctx,
            endpoint: endpoint.into(),
            signer,
            permits: Arc::new(Semaphore::new(max_connections.max(1))),
        }
    }

    /// Context requests are sent through.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Send one request and classify its response.
    pub async fn dispatch(
        &self,
        verb: Method,
        metas: HashMap<String, String>,
        mut desc: RequestDescriptor,
    ) -> Result<ResponseOutcome> {
        let unsized_file = match &desc.body {
            BodySource::File(path) if desc.content_length.is_none() => Some(path.clone()),
            _ => None,
        };
        if let Some(path) = unsized_file {
            desc.content_length = Some(self.ctx.file_size(&path).await?);
        }

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| Error::unexpected("request limiter is closed").with_source(e))?;

        let uri = format!("{}{}", self.endpoint, url_path(&desc));
        let headers = build_headers(&self.signer, &verb, &metas, &desc)?;

        let body = self.request_body(std::mem::take(&mut desc.body)).await?;
        let mut req = Request::builder()
            .method(verb.clone())
            .uri(&uri)
            .body(body)?;
        *req.headers_mut() = headers;

        debug!("sending request: {verb} {uri}");
        let resp = self.ctx.http_send(req).await?;
        debug!("got response: {verb} {uri} {}", resp.status());

        self.receive(&verb, desc.sink.take(), resp).await
    }

    async fn request_body(&self, body: BodySource) -> Result<Body> {
        let reader: FileReader = match body {
            BodySource::None => return Ok(Body::empty()),
            BodySource::Bytes(bs) => return Ok(Body::from(bs)),
            BodySource::File(path) => self.ctx.file_open(&path).await?,
            BodySource::Stream { reader, .. } => reader,
        };

        Ok(Body::from_stream(ReaderStream::with_capacity(
            reader,
            UPLOAD_CHUNK_SIZE,
        )))
    }

    async fn receive(
        &self,
        verb: &Method,
        sink: Option<Sink>,
        resp: Response<Body>,
    ) -> Result<ResponseOutcome> {
        let (parts, body) = resp.into_parts();

        if let Some(sink) = sink {
            self.write_sink(sink, body).await?;
            return Ok(ResponseOutcome::StreamedToSink(parts.status));
        }

        if *verb == Method::HEAD {
            return Ok(ResponseOutcome::HeadersOnly(parts.headers));
        }

        let content = body
            .collect()
            .await
            .map_err(|e| Error::transport("failed to read response body").with_source(e))?;
        classify(parts.status, xml::parse(&content))
    }

    async fn write_sink(&self, sink: Sink, body: Body) -> Result<()> {
        let mut writer: FileWriter = match sink {
            Sink::File(path) => self.ctx.file_create(&path).await?,
            Sink::Writer(w) => w,
        };

        let mut stream = body.into_stream();
        while let Some(chunk) = stream
            .try_next()
            .await
            .map_err(|e| Error::transport("failed to read response body").with_source(e))?
        {
            writer
                .write_all(&chunk)
                .await
                .map_err(|e| Error::sink("failed to write response body").with_source(e))?;
        }

        writer
            .flush()
            .await
            .map_err(|e| Error::sink("failed to flush response body").with_source(e))?;
        writer
            .shutdown()
            .await
            .map_err(|e| Error::sink("failed to close sink").with_source(e))?;
        Ok(())
    }
}

/// Map a buffered response onto an outcome.
///
/// Only 200 and 204 count as success.
fn classify(status: StatusCode, payload: Option<Value>) -> Result<ResponseOutcome> {
    let success = matches!(status, StatusCode::OK | StatusCode::NO_CONTENT);
    match (success, payload) {
        (true, Some(v)) => Ok(ResponseOutcome::ParsedBody(status, v)),
        (true, None) => Ok(ResponseOutcome::StatusOnly(status)),
        (false, payload) => Err(Error::service(status, payload)),
    }
}
