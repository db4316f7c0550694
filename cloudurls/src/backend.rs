use std::fmt;

/// The closed set of backends the normalizers know about.
///
/// Each scheme token selects exactly one kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BackendKind {
    /// In-memory document collection (`mem://`).
    InMemoryKv,
    /// Blob storage (`s3://`, `gs://`, `azblob://`, `file://`, `mem://`).
    ObjectStorage,
    /// Firestore style store with a project/database hierarchy (`firestore://`).
    DocumentDbHierarchical,
    /// DynamoDB style wide-column table (`dynamodb://`).
    WideColumn,
    /// MongoDB style store, host is the database name (`mongo://`).
    DocumentDbFlat,
    /// SNS topic (`awssns://`).
    SnsLike,
    /// SQS queue (`awssqs://`).
    SqsLike,
    /// Google Cloud Pub/Sub topic (`gcppubsub://`).
    PubSubLike,
}

impl BackendKind {
    pub const ALL: [Self; 8] = [
        Self::InMemoryKv,
        Self::ObjectStorage,
        Self::DocumentDbHierarchical,
        Self::WideColumn,
        Self::DocumentDbFlat,
        Self::SnsLike,
        Self::SqsLike,
        Self::PubSubLike,
    ];

    /// Resolve a document store scheme.
    pub fn from_docstore_scheme(scheme: &str) -> Option<Self> {
        DocStoreKind::from_scheme(scheme).map(DocStoreKind::backend)
    }

    /// The scheme token written into canonical locators.
    ///
    /// `None` for [`Self::ObjectStorage`], which keeps whatever provider
    /// scheme the locator declares.
    pub fn canonical_scheme(self) -> Option<&'static str> {
        match self {
            Self::InMemoryKv => Some("mem"),
            Self::ObjectStorage => None,
            Self::DocumentDbHierarchical => Some("firestore"),
            Self::WideColumn => Some("dynamodb"),
            Self::DocumentDbFlat => Some("mongo"),
            Self::SnsLike => Some("awssns"),
            Self::SqsLike => Some("awssqs"),
            Self::PubSubLike => Some("gcppubsub"),
        }
    }

    pub fn is_docstore(self) -> bool {
        matches!(
            self,
            Self::InMemoryKv | Self::DocumentDbHierarchical | Self::WideColumn | Self::DocumentDbFlat
        )
    }

    pub fn is_pubsub(self) -> bool {
        matches!(self, Self::SnsLike | Self::SqsLike | Self::PubSubLike)
    }
}

/// The document store subset of [`BackendKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DocStoreKind {
    Mem,
    Firestore,
    Dynamo,
    Mongo,
}

impl DocStoreKind {
    pub(crate) fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme {
            "mem" => Some(Self::Mem),
            "firestore" => Some(Self::Firestore),
            "dynamodb" => Some(Self::Dynamo),
            "mongo" => Some(Self::Mongo),
            _ => None,
        }
    }

    pub(crate) fn backend(self) -> BackendKind {
        match self {
            Self::Mem => BackendKind::InMemoryKv,
            Self::Firestore => BackendKind::DocumentDbHierarchical,
            Self::Dynamo => BackendKind::WideColumn,
            Self::Mongo => BackendKind::DocumentDbFlat,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_scheme().unwrap_or("blob"))
    }
}
