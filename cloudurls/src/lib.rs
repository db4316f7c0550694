//! Normalization of cloud resource URLs.
//!
//! Configuration often specifies resources tersely, like `mem://`,
//! `dynamodb://` or a bare SNS ARN. The normalizers in this crate rewrite such
//! locators into the fully-qualified form a resource-opening API expects,
//! filling in regions, collection names and default key fields, and fail
//! early when required information is missing.
//!
//! See [`normalize_blob_url`], [`normalize_docstore_url`] and
//! [`normalize_pubsub_url`].
//!
//! All functions are pure: they never perform I/O and never read global
//! state, except [`normalize_blob_url_from_env`] which snapshots the process
//! environment.

mod backend;
pub mod blob;
pub mod docstore;
mod error;
pub mod locator;
mod options;
pub mod pubsub;

pub use self::{
    backend::BackendKind,
    blob::{normalize_blob_url, normalize_blob_url_from_env},
    docstore::{must_normalize_docstore_url, normalize_docstore_url},
    error::{Error, ErrorKind, Result},
    locator::Locator,
    options::{DEFAULT_KEY_NAME, DocStoreOptions},
    pubsub::{classify_pubsub_url, normalize_pubsub_url},
};

fn trace_rewrite(kind: &'static str, source: &str, canonical: &str) {
    #[cfg(feature = "tracing")]
    tracing::trace!(kind, source, canonical, "normalized locator");

    #[cfg(not(feature = "tracing"))]
    let _ = (kind, source, canonical);
}
