/// Options for [`crate::normalize_docstore_url`].
///
/// Every field is optional. An unset field keeps whatever the locator already
/// says, or falls back to the backend default. It never clears a value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DocStoreOptions {
    /// Primary key field of the collection. Defaults to [`DEFAULT_KEY_NAME`].
    ///
    /// For DynamoDB this becomes the sort key when a partition key is given.
    pub key_name: Option<String>,
    /// DynamoDB partition key. Ignored by the other backends.
    pub partition_key: Option<String>,
    /// Collection (table) name, overriding the one in the locator.
    pub collection: Option<String>,
    /// Backing file of the in-memory store.
    pub file_name: Option<String>,
    /// Revision field of the in-memory store.
    pub revision_field: Option<String>,
}

/// Key field used when none is configured.
pub const DEFAULT_KEY_NAME: &str = "_id";

impl DocStoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key_name(mut self, key_name: impl Into<String>) -> Self {
        self.key_name = Some(key_name.into());
        self
    }

    pub fn with_partition_key(mut self, partition_key: impl Into<String>) -> Self {
        self.partition_key = Some(partition_key.into());
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_revision_field(mut self, revision_field: impl Into<String>) -> Self {
        self.revision_field = Some(revision_field.into());
        self
    }

    /// The key name override, if one was supplied.
    ///
    /// Empty strings count as unset.
    pub(crate) fn key_override(&self) -> Option<&str> {
        non_empty(&self.key_name)
    }

    /// The key name override or [`DEFAULT_KEY_NAME`].
    pub(crate) fn resolved_key_name(&self) -> &str {
        self.key_override().unwrap_or(DEFAULT_KEY_NAME)
    }

    pub(crate) fn partition_override(&self) -> Option<&str> {
        non_empty(&self.partition_key)
    }

    pub(crate) fn collection_override(&self) -> Option<&str> {
        non_empty(&self.collection)
    }

    pub(crate) fn file_name_override(&self) -> Option<&str> {
        non_empty(&self.file_name)
    }

    pub(crate) fn revision_override(&self) -> Option<&str> {
        non_empty(&self.revision_field)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
