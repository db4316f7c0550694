//! Blob (object storage) locators.

use crate::{Locator, error::Error, error::Result};

/// Environment variable consulted for the S3 region.
pub const AWS_REGION_VAR: &str = "AWS_REGION";

/// Normalize a blob storage URL.
///
/// `env` is a snapshot of `KEY=VALUE` entries, as returned by
/// [`std::env::vars`] joined with `=`. See [`normalize_blob_url_from_env`].
///
/// * `mem` (no scheme) becomes `mem:`.
/// * Any other bare path becomes a `file://` URL with the path as host.
/// * `s3://` URLs without a `region` query parameter get one from
///   `AWS_REGION`; if that is not set either, an error is returned.
/// * Everything else is passed through.
///
/// ```
/// let url = cloudurls::normalize_blob_url("s3://my-bucket", &["AWS_REGION=us-west-1"]).unwrap();
/// assert_eq!(url, "s3://my-bucket?region=us-west-1");
/// ```
pub fn normalize_blob_url<I, S>(src: &str, env: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut loc = Locator::parse(src)?;

    match loc.scheme() {
        "" => {
            let path = loc.path();
            loc.set_path_segments(Vec::<String>::new());
            if path == "mem" {
                loc.set_scheme("mem");
            } else {
                loc.set_scheme("file");
                loc.set_authority(path);
            }
        }
        "s3" => {
            if !loc.has_query_param("region") {
                let region = lookup_env(env, AWS_REGION_VAR).ok_or_else(|| {
                    Error::missing(
                        "region",
                        &loc,
                        format!("S3 URL has no region query and no {AWS_REGION_VAR} env var"),
                    )
                })?;
                loc.set_query_param("region", region);
            }
        }
        _ => {}
    }

    let out = loc.to_string();
    crate::trace_rewrite("blob", src, &out);
    Ok(out)
}

/// Like [`normalize_blob_url`], but reads the current process environment.
///
/// Entries whose key or value is not valid UTF-8 are skipped.
pub fn normalize_blob_url_from_env(src: &str) -> Result<String> {
    let env = std::env::vars_os()
        .filter_map(|(k, v)| Some(format!("{}={}", k.into_string().ok()?, v.into_string().ok()?)))
        .collect::<Vec<_>>();
    normalize_blob_url(src, env)
}

/// Return the value of the first `KEY=VALUE` entry matching `key`.
fn lookup_env<I, S>(env: I, key: &str) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    env.into_iter().find_map(|entry| {
        entry
            .as_ref()
            .split_once('=')
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    })
}
