use std::fmt;

/// Declared value type of a record field.
#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    String,
    Bool,
    Integer,
    Float,
    Binary,
    Timestamp,
    /// Anything else, like lists or nested records.
    Other,
}

impl ValueKind {
    /// The DynamoDB attribute type, or `None` if the kind can not be a key.
    pub fn attribute_type(self) -> Option<&'static str> {
        match self {
            Self::String | Self::Timestamp => Some("S"),
            Self::Bool => Some("BOOL"),
            Self::Integer | Self::Float => Some("N"),
            Self::Binary => Some("B"),
            Self::Other => None,
        }
    }
}

/// One field of a stored record.
///
/// Replaces runtime inspection of the record type: callers list the fields
/// explicitly.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: ValueKind,
    /// Stored attribute name, if it differs from `name`.
    #[serde(default)]
    pub rename: Option<String>,
    /// Field is not stored at all.
    #[serde(default)]
    pub excluded: bool,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            rename: None,
            excluded: false,
        }
    }

    pub fn with_rename(mut self, rename: impl Into<String>) -> Self {
        self.rename = Some(rename.into());
        self
    }

    pub fn excluded(mut self) -> Self {
        self.excluded = true;
        self
    }

    /// Attribute name the field is stored under.
    pub fn key_name(&self) -> &str {
        self.rename
            .as_deref()
            .filter(|r| !r.is_empty())
            .unwrap_or(&self.name)
    }
}

/// Which key of the table a field is used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyRole {
    Partition,
    Sort,
}

impl KeyRole {
    pub(crate) fn key_type(self) -> &'static str {
        match self {
            Self::Partition => "HASH",
            Self::Sort => "RANGE",
        }
    }
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Partition => f.write_str("partition key"),
            Self::Sort => f.write_str("sort key"),
        }
    }
}
