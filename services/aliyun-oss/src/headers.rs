//! Request header assembly.

use crate::constants::CONTENT_MD5;
use crate::descriptor::{BodySource, RequestDescriptor};
use crate::resource::canonical_resource;
use crate::sign_request::RequestSigner;
use http::header::{HeaderName, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, DATE};
use http::{HeaderMap, HeaderValue, Method};
use osskit_core::hash::base64_md5;
use osskit_core::time::format_http_date;
use osskit_core::Result;
use std::collections::HashMap;
use std::path::Path;

/// Build the complete header set for a request, `Authorization` included.
///
/// Headers are merged in three layers, each allowed to override the previous one:
///
/// 1. content headers: `Date`, `Content-Type`, `Content-Length`, `Content-MD5`
/// 2. vendor metadata: `metas` from the operation, then the descriptor's user metas
/// 3. the descriptor's user headers
///
/// Layer 2 is what gets signed. `Authorization` is computed from the merged
/// result and added last.
pub fn build_headers(
    signer: &RequestSigner,
    verb: &Method,
    metas: &HashMap<String, String>,
    desc: &RequestDescriptor,
) -> Result<HeaderMap> {
    let date = format_http_date(signer.signing_time());

    // Header names are case-insensitive, so user metas replace operation metas
    // under any spelling.
    let signed_metas: HashMap<String, String> = metas
        .iter()
        .chain(desc.user_metas.iter())
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let mut headers = merge_layers([
        content_headers(desc, date),
        signed_metas.clone().into_iter().collect(),
        desc.user_headers.clone().into_iter().collect(),
    ])?;

    let signature = signer.sign(
        verb,
        header_str(&headers, CONTENT_MD5),
        header_str(&headers, CONTENT_TYPE.as_str()),
        header_str(&headers, DATE.as_str()).unwrap_or_default(),
        &signed_metas,
        &canonical_resource(desc),
    );

    let mut auth: HeaderValue = signer.authorization(&signature).parse()?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    Ok(headers)
}

fn content_headers(desc: &RequestDescriptor, date: String) -> Vec<(String, String)> {
    let mut layer = vec![(DATE.to_string(), date)];
    if !desc.body.is_some() {
        return layer;
    }

    let content_type = desc
        .content_type
        .clone()
        .unwrap_or_else(|| guess_content_type(desc));
    layer.push((CONTENT_TYPE.to_string(), content_type));

    if let Some(length) = desc.body_length() {
        layer.push((CONTENT_LENGTH.to_string(), length.to_string()));
    }

    // Streams can't be read twice, so only in-memory bodies get a computed digest.
    let md5 = match &desc.body {
        BodySource::Bytes(bs) => desc.content_md5.clone().or_else(|| Some(base64_md5(bs))),
        _ => desc.content_md5.clone(),
    };
    if let Some(md5) = md5 {
        layer.push((CONTENT_MD5.to_string(), md5));
    }

    layer
}

fn guess_content_type(desc: &RequestDescriptor) -> String {
    let path = match &desc.body {
        BodySource::File(path) => Some(path.as_path()),
        _ => desc.key().map(Path::new),
    };

    path.map(mime_guess::from_path)
        .and_then(|guess| guess.first())
        .unwrap_or(mime_guess::mime::APPLICATION_OCTET_STREAM)
        .to_string()
}

/// Insert every layer in order into one map, later layers overriding earlier keys.
fn merge_layers<const N: usize>(layers: [Vec<(String, String)>; N]) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for layer in layers {
        for (k, v) in layer {
            let name = HeaderName::from_bytes(k.trim().as_bytes())?;
            let value = HeaderValue::from_str(v.trim())?;
            headers.insert(name, value);
        }
    }
    Ok(headers)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::Credential;
    use crate::sign_request::build_string_to_sign;
    use bytes::Bytes;
    use chrono::TimeZone;
    use osskit_core::hash::base64_hmac_sha1;
    use osskit_core::ErrorKind;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    const DATE_STR: &str = "Tue, 01 Jan 2019 00:00:00 GMT";

    fn signer() -> RequestSigner {
        RequestSigner::new(Credential::new("ak", "sk"))
            .with_time(chrono::Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap())
    }

    fn get<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
        header_str(headers, name)
    }

    #[test]
    fn test_no_body() -> Result<()> {
        let metas = HashMap::from([("X-OSS-ACL".to_string(), "public-read".to_string())]);
        let headers = build_headers(
            &signer(),
            &Method::PUT,
            &metas,
            &RequestDescriptor::bucket("mybucket"),
        )?;

        assert_eq!(get(&headers, "date"), Some(DATE_STR));
        assert_eq!(get(&headers, "x-oss-acl"), Some("public-read"));
        assert!(get(&headers, "content-type").is_none());
        assert!(get(&headers, "content-length").is_none());
        assert!(get(&headers, "content-md5").is_none());

        let expected = base64_hmac_sha1(
            b"sk",
            b"PUT\n\n\nTue, 01 Jan 2019 00:00:00 GMT\nx-oss-acl:public-read\n/mybucket",
        );
        assert_eq!(
            get(&headers, "authorization"),
            Some(format!("OSS ak:{expected}").as_str())
        );
        Ok(())
    }

    #[test]
    fn test_bytes_body() -> Result<()> {
        let desc = RequestDescriptor::object("b", "notes/hello.txt")
            .with_body(Bytes::from_static(b"hello,wolrd"));
        let headers = build_headers(&signer(), &Method::PUT, &HashMap::new(), &desc)?;

        let md5 = base64_md5(b"hello,wolrd");
        assert_eq!(get(&headers, "content-type"), Some("text/plain"));
        assert_eq!(get(&headers, "content-length"), Some("11"));
        assert_eq!(get(&headers, "content-md5"), Some(md5.as_str()));

        let expected = base64_hmac_sha1(
            b"sk",
            build_string_to_sign(
                &Method::PUT,
                Some(&md5),
                Some("text/plain"),
                DATE_STR,
                Vec::<(String, String)>::new(),
                "/b/notes/hello.txt",
            )
            .as_bytes(),
        );
        assert_eq!(
            get(&headers, "authorization"),
            Some(format!("OSS ak:{expected}").as_str())
        );
        Ok(())
    }

    #[test]
    fn test_file_body_uses_supplied_length_and_no_md5() -> Result<()> {
        let desc = RequestDescriptor::object("b", "k")
            .with_body(PathBuf::from("/data/photo.png"))
            .with_content_length(2048);
        let headers = build_headers(&signer(), &Method::PUT, &HashMap::new(), &desc)?;

        assert_eq!(get(&headers, "content-type"), Some("image/png"));
        assert_eq!(get(&headers, "content-length"), Some("2048"));
        assert!(get(&headers, "content-md5").is_none());
        Ok(())
    }

    #[test]
    fn test_file_body_without_length_is_tolerated() -> Result<()> {
        let desc = RequestDescriptor::object("b", "k").with_body(PathBuf::from("/data/a.bin"));
        let headers = build_headers(&signer(), &Method::PUT, &HashMap::new(), &desc)?;
        assert!(get(&headers, "content-length").is_none());
        assert!(get(&headers, "authorization").is_some());
        Ok(())
    }

    #[test]
    fn test_stream_body_with_supplied_md5() -> Result<()> {
        let desc = RequestDescriptor::object("b", "archive")
            .with_body(BodySource::stream(tokio::io::empty(), 0))
            .with_content_md5("1B2M2Y8AsgTpgAmY7PhCfg==");
        let headers = build_headers(&signer(), &Method::PUT, &HashMap::new(), &desc)?;

        assert_eq!(get(&headers, "content-type"), Some("application/octet-stream"));
        assert_eq!(get(&headers, "content-length"), Some("0"));
        assert_eq!(get(&headers, "content-md5"), Some("1B2M2Y8AsgTpgAmY7PhCfg=="));
        Ok(())
    }

    #[test]
    fn test_explicit_content_type_wins() -> Result<()> {
        let desc = RequestDescriptor::object("b", "page.html")
            .with_body(b"<html/>".to_vec())
            .with_content_type("text/x-custom");
        let headers = build_headers(&signer(), &Method::PUT, &HashMap::new(), &desc)?;
        assert_eq!(get(&headers, "content-type"), Some("text/x-custom"));
        Ok(())
    }

    #[test]
    fn test_user_metas_are_signed_and_user_headers_are_not() -> Result<()> {
        let desc = RequestDescriptor::object("b", "k")
            .with_user_meta("x-oss-meta-foo", "bar")
            .with_user_meta("Cache-Control", "max-age=5")
            .with_user_header("x-oss-meta-unsigned", "1")
            .with_user_header("Range", "bytes=0-9");
        let headers = build_headers(&signer(), &Method::GET, &HashMap::new(), &desc)?;

        assert_eq!(get(&headers, "x-oss-meta-foo"), Some("bar"));
        assert_eq!(get(&headers, "cache-control"), Some("max-age=5"));
        assert_eq!(get(&headers, "x-oss-meta-unsigned"), Some("1"));
        assert_eq!(get(&headers, "range"), Some("bytes=0-9"));

        let expected = base64_hmac_sha1(
            b"sk",
            b"GET\n\n\nTue, 01 Jan 2019 00:00:00 GMT\nx-oss-meta-foo:bar\n/b/k",
        );
        assert_eq!(
            get(&headers, "authorization"),
            Some(format!("OSS ak:{expected}").as_str())
        );
        Ok(())
    }

    #[test]
    fn test_merge_order_later_layers_win() -> Result<()> {
        let metas = HashMap::from([("x-oss-meta-owner".to_string(), "op".to_string())]);
        let desc = RequestDescriptor::object("b", "k.txt")
            .with_body(b"data".to_vec())
            .with_user_meta("x-oss-meta-owner", "user")
            .with_user_header("Content-Type", "application/json");
        let headers = build_headers(&signer(), &Method::PUT, &metas, &desc)?;

        assert_eq!(get(&headers, "x-oss-meta-owner"), Some("user"));
        assert_eq!(get(&headers, "content-type"), Some("application/json"));

        // The signature covers the content type that is actually sent.
        let expected = base64_hmac_sha1(
            b"sk",
            build_string_to_sign(
                &Method::PUT,
                Some(&base64_md5(b"data")),
                Some("application/json"),
                DATE_STR,
                [("x-oss-meta-owner", "user")],
                "/b/k.txt",
            )
            .as_bytes(),
        );
        assert_eq!(
            get(&headers, "authorization"),
            Some(format!("OSS ak:{expected}").as_str())
        );
        Ok(())
    }

    #[test]
    fn test_user_meta_overrides_operation_meta_of_any_case() -> Result<()> {
        let metas = HashMap::from([("X-OSS-ACL".to_string(), "private".to_string())]);
        let desc = RequestDescriptor::bucket("b").with_user_meta("x-oss-acl", "public-read");
        let headers = build_headers(&signer(), &Method::PUT, &metas, &desc)?;

        assert_eq!(get(&headers, "x-oss-acl"), Some("public-read"));

        let expected = base64_hmac_sha1(
            b"sk",
            b"PUT\n\n\nTue, 01 Jan 2019 00:00:00 GMT\nx-oss-acl:public-read\n/b",
        );
        assert_eq!(
            get(&headers, "authorization"),
            Some(format!("OSS ak:{expected}").as_str())
        );
        Ok(())
    }

    #[test]
    fn test_authorization_is_sensitive() -> Result<()> {
        let headers = build_headers(
            &signer(),
            &Method::GET,
            &HashMap::new(),
            &RequestDescriptor::service(),
        )?;
        let auth = headers.get(AUTHORIZATION).expect("authorization must be set");
        assert!(auth.is_sensitive());
        Ok(())
    }

    #[test]
    fn test_invalid_header_value() {
        let desc = RequestDescriptor::object("b", "k").with_user_meta("x-oss-meta-bad", "a\nb");
        let err = build_headers(&signer(), &Method::PUT, &HashMap::new(), &desc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    }
}
