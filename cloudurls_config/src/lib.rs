//! Named locator definitions for application configuration.
//!
//! The types only implement serde, so they can be embedded in whatever
//! configuration format the application already reads.

use cloudurls::DocStoreOptions;

/// Which normalizer a locator is meant for.
#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LocatorKind {
    Blob,
    Docstore,
    Pubsub,
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LocatorConfig {
    pub name: String,
    pub kind: LocatorKind,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Only used for [`LocatorKind::Docstore`].
    #[serde(default)]
    pub options: DocStoreOptions,
}

impl LocatorConfig {
    /// Normalize the configured URI with the matching normalizer.
    ///
    /// `env` is only consulted for blob locators.
    pub fn normalize<I, S>(&self, env: I) -> Result<String, cloudurls::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match self.kind {
            LocatorKind::Blob => cloudurls::normalize_blob_url(&self.uri, env),
            LocatorKind::Docstore => cloudurls::normalize_docstore_url(&self.uri, &self.options),
            LocatorKind::Pubsub => cloudurls::normalize_pubsub_url(&self.uri),
        }
    }
}
