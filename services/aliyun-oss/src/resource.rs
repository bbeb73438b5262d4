//! Canonical resource and URL path derivation.

use crate::constants::OSS_URI_ENCODE_SET;
use crate::descriptor::{RequestDescriptor, Target};
use percent_encoding::utf8_percent_encode;

/// Build the canonical resource that takes part in the signature.
///
/// Only bucket, object key and the acl flag matter here; listing parameters
/// change the URL but are never signed. Keys are used as is, not encoded.
pub fn canonical_resource(desc: &RequestDescriptor) -> String {
    match &desc.target {
        Target::Service => "/".to_string(),
        Target::Bucket(bucket) => with_acl(format!("/{bucket}"), desc.acl_query),
        Target::Object { bucket, key } => with_acl(format!("/{bucket}/{key}"), desc.acl_query),
    }
}

fn with_acl(mut resource: String, acl: bool) -> String {
    if acl {
        resource.push_str("?acl");
    }
    resource
}

/// Build the URL path and query for a request.
///
/// Each `/` separated segment of the object key is percent-encoded on its own,
/// so `/` inside a key stays a path separator.
pub fn url_path(desc: &RequestDescriptor) -> String {
    let mut path = match &desc.target {
        Target::Service => return "/".to_string(),
        Target::Bucket(bucket) => format!("/{}", encode(bucket)),
        Target::Object { bucket, key } => {
            format!("/{}/{}", encode(bucket), encode_key(key))
        }
    };

    let mut params = Vec::new();
    if let Some(q) = &desc.list_query {
        if let Some(v) = &q.prefix {
            params.push(format!("prefix={}", encode(v)));
        }
        if let Some(v) = &q.marker {
            params.push(format!("marker={}", encode(v)));
        }
        if let Some(v) = q.max_keys {
            params.push(format!("max-keys={v}"));
        }
        if let Some(v) = &q.delimiter {
            params.push(format!("delimiter={}", encode(v)));
        }
    }
    if desc.acl_query {
        params.push("acl".to_string());
    }

    if !params.is_empty() {
        path.push('?');
        path.push_str(&params.join("&"));
    }
    path
}

fn encode(s: &str) -> String {
    utf8_percent_encode(s, &OSS_URI_ENCODE_SET).to_string()
}

fn encode_key(key: &str) -> String {
    key.split('/').map(encode).collect::<Vec<_>>().join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ListQuery;
    use percent_encoding::percent_decode_str;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(RequestDescriptor::service(), "/"; "service")]
    #[test_case(RequestDescriptor::bucket("b"), "/b"; "bucket")]
    #[test_case(RequestDescriptor::object("b", "k"), "/b/k"; "object")]
    #[test_case(RequestDescriptor::bucket("b").with_acl_query(), "/b?acl"; "bucket acl")]
    #[test_case(RequestDescriptor::object("b", "k").with_acl_query(), "/b/k?acl"; "object acl")]
    #[test_case(RequestDescriptor::service().with_acl_query(), "/"; "service ignores acl")]
    #[test_case(RequestDescriptor::object("b", "a b/c d"), "/b/a b/c d"; "key is not encoded")]
    fn test_canonical_resource(desc: RequestDescriptor, expected: &str) {
        assert_eq!(canonical_resource(&desc), expected);
    }

    #[test]
    fn test_canonical_resource_ignores_list_query() {
        let desc = RequestDescriptor::bucket("b").with_list_query(ListQuery {
            prefix: Some("photos/".to_string()),
            max_keys: Some(10),
            ..Default::default()
        });
        assert_eq!(canonical_resource(&desc), "/b");
    }

    #[test_case(RequestDescriptor::service(), "/"; "service")]
    #[test_case(RequestDescriptor::bucket("b"), "/b"; "bucket")]
    #[test_case(RequestDescriptor::object("b", "dir/file.txt"), "/b/dir/file.txt"; "nested key")]
    #[test_case(RequestDescriptor::object("b", "a b/c d"), "/b/a%20b/c%20d"; "spaces")]
    #[test_case(RequestDescriptor::object("b", "q?x=1#y"), "/b/q%3Fx%3D1%23y"; "reserved")]
    #[test_case(RequestDescriptor::object("b", "it's(1)!*~.txt"), "/b/it's(1)!*~.txt"; "unreserved marks")]
    #[test_case(RequestDescriptor::object("b", "文件.txt"), "/b/%E6%96%87%E4%BB%B6.txt"; "utf8")]
    #[test_case(RequestDescriptor::bucket("b").with_acl_query(), "/b?acl"; "acl")]
    fn test_url_path(desc: RequestDescriptor, expected: &str) {
        assert_eq!(url_path(&desc), expected);
    }

    #[test]
    fn test_url_path_round_trip() {
        let desc = RequestDescriptor::object("b", "a b/c d");
        let path = url_path(&desc);

        let key_part = path.strip_prefix("/b/").expect("path must start with bucket");
        assert_eq!(key_part.split('/').count(), 2);
        assert_eq!(percent_decode_str(key_part).decode_utf8_lossy(), "a b/c d");
    }

    #[test]
    fn test_url_path_list_query() {
        let desc = RequestDescriptor::bucket("b").with_list_query(ListQuery {
            prefix: Some("photos/2019 trip".to_string()),
            marker: Some("photos/a.jpg".to_string()),
            delimiter: Some("/".to_string()),
            max_keys: Some(100),
        });
        assert_eq!(
            url_path(&desc),
            "/b?prefix=photos%2F2019%20trip&marker=photos%2Fa.jpg&max-keys=100&delimiter=%2F"
        );

        let desc = RequestDescriptor::bucket("b").with_list_query(ListQuery {
            prefix: Some("logs".to_string()),
            ..Default::default()
        });
        assert_eq!(url_path(&desc), "/b?prefix=logs");

        let desc = RequestDescriptor::bucket("b").with_list_query(ListQuery::default());
        assert_eq!(url_path(&desc), "/b");
    }

    #[test]
    fn test_url_path_acl_follows_list_query() {
        let desc = RequestDescriptor::bucket("b")
            .with_list_query(ListQuery {
                prefix: Some("p".to_string()),
                ..Default::default()
            })
            .with_acl_query();
        assert_eq!(url_path(&desc), "/b?prefix=p&acl");
    }
}
