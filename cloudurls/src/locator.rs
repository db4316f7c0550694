//! Generic locator parsing and serialization.
//!
//! A [`Locator`] is a loosely validated URL: `scheme:[//authority][/path][?query][#fragment]`.
//! Unlike [`url::Url`] it accepts bare filesystem paths without a scheme, keeps
//! the path as a list of decoded segments and always writes query parameters
//! sorted by key, so normalized output is deterministic.

use std::{collections::BTreeMap, fmt, str::FromStr};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use url::form_urlencoded;

use crate::error::{Error, Result};

/// Characters left unescaped in a path segment.
///
/// Parentheses are escaped, see [`crate::docstore::DEFAULT_DATABASE`].
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b',')
    .remove(b':')
    .remove(b';')
    .remove(b'=')
    .remove(b'@');

const AUTHORITY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=')
    .remove(b':')
    .remove(b'[')
    .remove(b']')
    .remove(b'@');

/// A parsed resource locator.
///
/// The path is stored as decoded segments using split semantics:
/// `/a/b` is `["", "a", "b"]`, `/` is `["", ""]`, a relative `mem` is
/// `["mem"]` and the empty path is `[]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Locator {
    scheme: String,
    authority: String,
    path: Vec<String>,
    query: BTreeMap<String, String>,
    fragment: Option<String>,
}

impl Locator {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::malformed(raw, "empty locator"));
        }
        if raw.bytes().any(|b| b < 0x20 || b == 0x7f) {
            return Err(Error::malformed(raw, "invalid control character"));
        }

        let (rest, fragment) = match raw.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment.to_string())),
            None => (raw, None),
        };

        let (scheme, rest) = split_scheme(raw, rest)?;

        let (rest, query) = match rest.split_once('?') {
            Some((rest, query)) => (rest, parse_query(query)),
            None => (rest, BTreeMap::new()),
        };

        let (authority, path) = match rest.strip_prefix("//") {
            Some(rest) => {
                let (authority, path) = match rest.find('/') {
                    Some(index) => rest.split_at(index),
                    None => (rest, ""),
                };
                if authority.contains(' ') {
                    return Err(Error::malformed(raw, "invalid character in authority"));
                }
                (decode(raw, authority)?, path)
            }
            None => {
                if scheme.is_empty() {
                    let first = rest.split('/').next().unwrap_or_default();
                    if first.contains(':') {
                        return Err(Error::malformed(
                            raw,
                            "first path segment can not contain a colon",
                        ));
                    }
                }
                (String::new(), rest)
            }
        };

        let path = if path.is_empty() {
            Vec::new()
        } else {
            path.split('/')
                .map(|segment| decode(raw, segment))
                .collect::<Result<Vec<_>>>()?
        };

        Ok(Self {
            scheme,
            authority,
            path,
            query,
            fragment,
        })
    }

    /// Lowercased scheme, empty for bare paths.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn set_scheme(&mut self, scheme: impl Into<String>) {
        self.scheme = scheme.into().to_ascii_lowercase();
    }

    /// Decoded authority, including user info and port if present.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn set_authority(&mut self, authority: impl Into<String>) {
        self.authority = authority.into();
    }

    /// The authority without user info and port.
    pub fn host(&self) -> &str {
        let host = match self.authority.rsplit_once('@') {
            Some((_, host)) => host,
            None => &self.authority,
        };
        if host.starts_with('[') {
            return match host.find(']') {
                Some(end) => &host[..=end],
                None => host,
            };
        }
        match host.split_once(':') {
            Some((host, _)) => host,
            None => host,
        }
    }

    pub fn path_segments(&self) -> &[String] {
        &self.path
    }

    pub fn set_path_segments<I, S>(&mut self, segments: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.path = segments.into_iter().map(Into::into).collect();
    }

    /// The decoded path, segments joined with `/`.
    pub fn path(&self) -> String {
        self.path.join("/")
    }

    /// Replace the path, splitting the decoded input on `/`.
    pub fn set_path(&mut self, path: &str) {
        self.path = if path.is_empty() {
            Vec::new()
        } else {
            path.split('/').map(str::to_string).collect()
        };
    }

    /// Replace the path with a cleaned absolute path built from `segments`.
    ///
    /// Empty segments are dropped, so `["", "a", "", "b"]` becomes `/a/b`.
    pub fn set_absolute_path<I, S>(&mut self, segments: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut path = vec![String::new()];
        path.extend(
            segments
                .into_iter()
                .filter(|s| !s.as_ref().is_empty())
                .map(|s| s.as_ref().to_string()),
        );
        if path.len() == 1 {
            path.push(String::new());
        }
        self.path = path;
    }

    /// `true` if the path is the bare root `/`.
    pub fn is_root_path(&self) -> bool {
        self.path.len() == 2 && self.path.iter().all(String::is_empty)
    }

    pub fn query(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Like [`Self::query_param`], but treats an empty value as absent.
    pub fn non_empty_query_param(&self, key: &str) -> Option<&str> {
        self.query_param(key).filter(|v| !v.is_empty())
    }

    pub fn has_query_param(&self, key: &str) -> bool {
        self.query.contains_key(key)
    }

    pub fn set_query_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.insert(key.into(), value.into());
    }

    pub fn remove_query_param(&mut self, key: &str) -> Option<String> {
        self.query.remove(key)
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }
}

impl FromStr for Locator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let absolute = self.path.first().is_some_and(String::is_empty);

        if !self.scheme.is_empty() {
            write!(f, "{}:", self.scheme)?;
        }
        if !self.authority.is_empty() || (absolute && !self.scheme.is_empty()) {
            write!(f, "//{}", utf8_percent_encode(&self.authority, AUTHORITY))?;
        }

        if !self.path.is_empty() && !absolute {
            if !self.authority.is_empty() {
                f.write_str("/")?;
            } else if self.scheme.is_empty() && self.path[0].contains(':') {
                f.write_str("./")?;
            }
        }
        for (index, segment) in self.path.iter().enumerate() {
            if index > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", utf8_percent_encode(segment, PATH_SEGMENT))?;
        }

        if !self.query.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&self.query)
                .finish();
            write!(f, "?{query}")?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

fn split_scheme<'a>(raw: &str, rest: &'a str) -> Result<(String, &'a str)> {
    for (index, c) in rest.char_indices() {
        match c {
            'a'..='z' | 'A'..='Z' => {}
            '0'..='9' | '+' | '-' | '.' if index > 0 => {}
            ':' if index == 0 => return Err(Error::malformed(raw, "missing scheme")),
            ':' => return Ok((rest[..index].to_ascii_lowercase(), &rest[index + 1..])),
            _ => break,
        }
    }
    Ok((String::new(), rest))
}

fn parse_query(query: &str) -> BTreeMap<String, String> {
    form_urlencoded::parse(query.as_bytes())
        .filter(|(k, _)| !k.is_empty())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn decode(raw: &str, component: &str) -> Result<String> {
    let bytes = component.as_bytes();
    for (index, b) in bytes.iter().enumerate() {
        if *b == b'%' {
            let valid = bytes
                .get(index + 1..index + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return Err(Error::malformed(raw, "invalid percent escape"));
            }
        }
    }
    percent_decode_str(component)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|_| Error::malformed(raw, "percent escape is not valid UTF-8"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_parse_components() {
        let loc = Locator::parse("Firestore://projects/p1/databases/db?name_field=id#frag").unwrap();
        assert_eq!(loc.scheme(), "firestore");
        assert_eq!(loc.authority(), "projects");
        assert_eq!(loc.path_segments(), ["", "p1", "databases", "db"]);
        assert_eq!(loc.query_param("name_field"), Some("id"));
        assert_eq!(loc.fragment(), Some("frag"));
    }

    #[test]
    fn test_parse_bare_paths() {
        let mem = Locator::parse("mem").unwrap();
        assert_eq!(mem.scheme(), "");
        assert_eq!(mem.authority(), "");
        assert_eq!(mem.path(), "mem");

        let dot = Locator::parse(".").unwrap();
        assert_eq!(dot.path_segments(), ["."]);

        let abs = Locator::parse("/tmp/data").unwrap();
        assert_eq!(abs.path_segments(), ["", "tmp", "data"]);
        assert_eq!(abs.to_string(), "/tmp/data");
    }

    #[test]
    fn test_path_segment_conventions() {
        assert!(Locator::parse("mongo://db").unwrap().path_segments().is_empty());
        assert!(Locator::parse("mongo://db/").unwrap().is_root_path());
        assert_eq!(
            Locator::parse("mongo://db/a/").unwrap().path_segments(),
            ["", "a", ""]
        );
    }

    #[test]
    fn test_empty_authority_serialization() {
        assert_eq!(Locator::parse("mem://").unwrap().to_string(), "mem:");
        assert_eq!(Locator::parse("dynamodb:").unwrap().to_string(), "dynamodb:");
        assert_eq!(
            Locator::parse("awssns:///arn:aws:sns:us-east-2:1:t").unwrap().to_string(),
            "awssns:///arn:aws:sns:us-east-2:1:t"
        );
    }

    #[test]
    fn test_query_sorted_and_last_write_wins() {
        let loc = Locator::parse("s3://bucket?b=2&a=1&b=3").unwrap();
        assert_eq!(loc.query_param("b"), Some("3"));
        assert_eq!(loc.to_string(), "s3://bucket?a=1&b=3");
    }

    #[test]
    fn test_query_escaping() {
        let mut loc = Locator::parse("mem://c").unwrap();
        loc.set_query_param("filename", "my file&co.json");
        assert_eq!(loc.to_string(), "mem://c?filename=my+file%26co.json");
        let back = Locator::parse(&loc.to_string()).unwrap();
        assert_eq!(back.query_param("filename"), Some("my file&co.json"));
    }

    #[test]
    fn test_path_escaping() {
        let mut loc = Locator::parse("firestore://projects").unwrap();
        loc.set_absolute_path(["p", "databases", "(default)", "documents", "a b"]);
        assert_eq!(
            loc.to_string(),
            "firestore://projects/p/databases/%28default%29/documents/a%20b"
        );
    }

    #[test]
    fn test_authority_with_slash_is_escaped() {
        let mut loc = Locator::default();
        loc.set_scheme("file");
        loc.set_authority("/tmp/data");
        assert_eq!(loc.to_string(), "file://%2Ftmp%2Fdata");
        assert_eq!(Locator::parse(&loc.to_string()).unwrap(), loc);
    }

    #[test]
    fn test_relative_path_with_authority_gets_slash() {
        let mut loc = Locator::parse("mem://jobs").unwrap();
        loc.set_path("_id");
        assert_eq!(loc.to_string(), "mem://jobs/_id");
    }

    #[test]
    fn test_host() {
        let loc = Locator::parse("s3://key:secret@host.example:9000/bucket").unwrap();
        assert_eq!(loc.host(), "host.example");
        let v6 = Locator::parse("http://[::1]:80").unwrap();
        assert_eq!(v6.host(), "[::1]");
    }

    #[test]
    fn test_round_trip() {
        let inputs = [
            "mem:",
            "file://.",
            "s3://my-bucket?region=us-west-1",
            "gs://my-bucket/some/prefix",
            "mem://jobs/_id?filename=x.json",
            "firestore://projects/p/databases/db/documents/c?name_field=_id",
            "dynamodb://tasks?partition_key=job_id&sort_key=_id",
            "mongo://my-db/tasks?id_field=_id",
            "mongo://my-db/",
            "awssns:///arn:aws:sns:us-east-2:123456789012:mytopic?region=us-east-2",
            "https://sqs.us-east-2.amazonaws.com/123456789012/myqueue",
            "gcppubsub://projects/myproject/topics/mytopic",
            "mem",
            "./relative/dir",
            "s3://bucket/a%2Fb#frag",
        ];
        for input in inputs {
            let parsed = Locator::parse(input).unwrap();
            let serialized = parsed.to_string();
            assert_eq!(
                Locator::parse(&serialized).unwrap(),
                parsed,
                "round trip of '{input}' via '{serialized}'"
            );
        }
    }

    #[test]
    fn test_malformed() {
        let inputs = [
            "",
            "://host",
            ":nothing",
            "mem://a\tb",
            "s3://bu cket",
            "s3://b/%zz",
            "./trailing%",
        ];
        for input in inputs {
            let err = Locator::parse(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Malformed, "input: '{input}'");
        }
    }

    #[test]
    fn test_colon_in_first_relative_segment() {
        let loc = Locator::parse("./a:b").unwrap();
        assert_eq!(loc.path_segments(), [".", "a:b"]);
        assert!(Locator::parse("1a:b").is_err());
    }
}
