//! Pub/Sub (topic and queue) locators.

use crate::{
    BackendKind, Locator,
    error::{Error, Result},
};

const SNS_ARN_PREFIX: &str = "arn:aws:sns";
const SNS_PREFIX: &str = "awssns:///";
const SQS_PREFIX: &str = "awssqs://";
const SQS_WRAPPED_PREFIX: &str = "awssqs://https://";
const SQS_HTTPS_PREFIX: &str = "https://sqs.";
const GCP_PREFIX: &str = "gcppubsub://";

/// Determine which pubsub backend a URL refers to.
///
/// Returns `None` for URLs [`normalize_pubsub_url`] passes through untouched.
pub fn classify_pubsub_url(src: &str) -> Option<BackendKind> {
    if src.starts_with(SNS_ARN_PREFIX) || src.starts_with(SNS_PREFIX) {
        Some(BackendKind::SnsLike)
    } else if src.starts_with(SQS_PREFIX) || src.starts_with(SQS_HTTPS_PREFIX) {
        Some(BackendKind::SqsLike)
    } else if src.starts_with(GCP_PREFIX) {
        Some(BackendKind::PubSubLike)
    } else {
        None
    }
}

/// Normalize a pubsub topic or subscription URL.
///
/// * SNS ARNs (`arn:aws:sns:REGION:ACCOUNT:TOPIC`) become
///   `awssns:///arn:...?region=REGION`.
/// * `awssns:///` URLs without a region get it from the embedded ARN.
/// * SQS queue URLs (`https://sqs.REGION.amazonaws.com/...`, optionally
///   wrapped in `awssqs://`) get the region from the host and are wrapped.
/// * `gcppubsub://project/topic` becomes `gcppubsub://projects/project/topics/topic`.
///
/// Anything else is returned unchanged.
///
/// ```
/// let url = cloudurls::normalize_pubsub_url("arn:aws:sns:us-east-2:123456789012:mytopic").unwrap();
/// assert_eq!(url, "awssns:///arn:aws:sns:us-east-2:123456789012:mytopic?region=us-east-2");
/// ```
pub fn normalize_pubsub_url(src: &str) -> Result<String> {
    let out = match classify_pubsub_url(src) {
        Some(BackendKind::SnsLike) => normalize_sns(src)?,
        Some(BackendKind::SqsLike) => normalize_sqs(src)?,
        Some(BackendKind::PubSubLike) => normalize_gcp(src)?,
        _ => {
            #[cfg(feature = "tracing")]
            tracing::debug!(url = src, "passing through unrecognized pubsub url");
            return Ok(src.to_string());
        }
    };

    crate::trace_rewrite("pubsub", src, &out);
    Ok(out)
}

fn normalize_sns(src: &str) -> Result<String> {
    if src.starts_with(SNS_ARN_PREFIX) {
        let region = arn_region(src, src)?;
        let mut loc = Locator::default();
        loc.set_scheme("awssns");
        loc.set_path_segments(["", src]);
        loc.set_query_param("region", region);
        return Ok(loc.to_string());
    }

    let mut loc = Locator::parse(src)?;
    if !loc.has_query_param("region") {
        let path = loc.path();
        let arn = path.trim_start_matches('/');
        let region = arn_region(src, arn)?;
        loc.set_query_param("region", region);
    }
    Ok(loc.to_string())
}

/// Extract the region field of an ARN (`arn:PARTITION:SERVICE:REGION:...`).
fn arn_region(src: &str, arn: &str) -> Result<String> {
    match arn.split(':').nth(3) {
        Some(region) if !region.is_empty() => Ok(region.to_string()),
        Some(_) => Err(Error::missing("region", src, "the SNS ARN has an empty region")),
        None => Err(Error::mismatch(
            src,
            "arn:aws:sns:(region):(account):(topic)",
        )),
    }
}

fn normalize_sqs(src: &str) -> Result<String> {
    let inner = match src.strip_prefix(SQS_PREFIX) {
        Some(inner) if src.starts_with(SQS_WRAPPED_PREFIX) => inner,
        Some(_) => return Ok(src.to_string()),
        None => src,
    };

    let mut loc = Locator::parse(inner)?;
    if !loc.has_query_param("region") {
        let region = loc
            .host()
            .split('.')
            .nth(1)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| {
                Error::mismatch(
                    src,
                    "https://sqs.(region).amazonaws.com/(account)/(queue)",
                )
            })?
            .to_string();
        loc.set_query_param("region", region);
    }
    Ok(format!("{SQS_PREFIX}{loc}"))
}

fn normalize_gcp(src: &str) -> Result<String> {
    const EXPECTED: &str =
        "gcppubsub://(project)/(topic) or gcppubsub://projects/(project)/topics/(topic)";

    let mut loc = Locator::parse(src)?;
    let elements = loc.path_segments().to_vec();
    match loc.authority() {
        "" => {
            return Err(Error::missing(
                "project",
                &loc,
                "gcppubsub url should have project and topic names",
            ));
        }
        "projects" => {
            if elements.len() != 4 {
                return Err(Error::mismatch(&loc, EXPECTED));
            }
            if elements[1].is_empty() {
                return Err(Error::missing("project", &loc, "gcppubsub url has an empty project name"));
            }
            if elements[3].is_empty() {
                return Err(Error::missing("topic", &loc, "gcppubsub url has an empty topic name"));
            }
        }
        project => {
            if elements.len() != 2 {
                return Err(Error::mismatch(&loc, EXPECTED));
            }
            if elements[1].is_empty() {
                return Err(Error::missing("topic", &loc, "gcppubsub url has an empty topic name"));
            }
            let project = project.to_string();
            loc.set_absolute_path([project.as_str(), "topics", elements[1].as_str()]);
            loc.set_authority("projects");
        }
    }
    Ok(loc.to_string())
}
