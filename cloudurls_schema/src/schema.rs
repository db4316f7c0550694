use cloudurls::{DocStoreOptions, Locator};
use thiserror::Error;

use crate::{FieldSpec, KeyRole, ValueKind};

const DEFAULT_CAPACITY_UNITS: u32 = 5;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error(transparent)]
    Url(#[from] cloudurls::Error),

    #[error("table schemas are only supported for dynamodb: URLs, got '{scheme}'")]
    UnsupportedScheme { scheme: String },

    #[error("type {kind:?} of field '{field}' is not supported for a dynamodb {role}")]
    UnsupportedKeyType {
        field: String,
        kind: ValueKind,
        role: KeyRole,
    },

    #[error("no field is stored as the {role} '{name}'")]
    MissingKeyField { role: KeyRole, name: String },
}

/// A key attribute of a table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyField {
    pub name: String,
    /// DynamoDB attribute type: `S`, `N`, `B` or `BOOL`.
    pub attribute_type: &'static str,
}

impl KeyField {
    fn from_field(field: &FieldSpec, role: KeyRole) -> Result<Self, SchemaError> {
        let attribute_type =
            field
                .kind
                .attribute_type()
                .ok_or_else(|| SchemaError::UnsupportedKeyType {
                    field: field.name.clone(),
                    kind: field.kind,
                    role,
                })?;
        Ok(Self {
            name: field.key_name().to_string(),
            attribute_type,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchemaOptions {
    pub read_capacity_units: u32,
    pub write_capacity_units: u32,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            read_capacity_units: DEFAULT_CAPACITY_UNITS,
            write_capacity_units: DEFAULT_CAPACITY_UNITS,
        }
    }
}

/// Key layout of a DynamoDB table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DynamoDbSchema {
    pub collection: String,
    pub partition_key: KeyField,
    pub sort_key: Option<KeyField>,
}

impl DynamoDbSchema {
    /// Derive the schema for the table a docstore URL points at.
    ///
    /// The URL is normalized first, so `dynamodb://table` works and uses the
    /// default `_id` partition key. Excluded fields are ignored.
    pub fn derive(fields: &[FieldSpec], url: &str) -> Result<Self, SchemaError> {
        let normalized = cloudurls::normalize_docstore_url(url, &DocStoreOptions::default())?;
        let loc = Locator::parse(&normalized)?;
        if loc.scheme() != "dynamodb" {
            return Err(SchemaError::UnsupportedScheme {
                scheme: loc.scheme().to_string(),
            });
        }

        let partition_name = loc
            .non_empty_query_param("partition_key")
            .unwrap_or(cloudurls::DEFAULT_KEY_NAME);
        let sort_name = loc.non_empty_query_param("sort_key");

        let mut partition_key = None;
        let mut sort_key = None;
        for field in fields.iter().filter(|f| !f.excluded) {
            let name = field.key_name();
            if name == partition_name {
                partition_key = Some(KeyField::from_field(field, KeyRole::Partition)?);
            } else if Some(name) == sort_name {
                sort_key = Some(KeyField::from_field(field, KeyRole::Sort)?);
            }
        }

        let partition_key = partition_key.ok_or_else(|| SchemaError::MissingKeyField {
            role: KeyRole::Partition,
            name: partition_name.to_string(),
        })?;
        if let (Some(name), None) = (sort_name, &sort_key) {
            return Err(SchemaError::MissingKeyField {
                role: KeyRole::Sort,
                name: name.to_string(),
            });
        }

        tracing::trace!(
            collection = loc.authority(),
            partition_key = %partition_key.name,
            sort_key = ?sort_key.as_ref().map(|k| &k.name),
            "derived dynamodb schema"
        );

        Ok(Self {
            collection: loc.authority().to_string(),
            partition_key,
            sort_key,
        })
    }

    /// Arguments of the `aws dynamodb create-table` command for this table.
    pub fn create_table_command(&self, opts: &SchemaOptions) -> Vec<String> {
        let read = non_zero_or_default(opts.read_capacity_units);
        let write = non_zero_or_default(opts.write_capacity_units);

        let keys = std::iter::once((&self.partition_key, KeyRole::Partition))
            .chain(self.sort_key.iter().map(|k| (k, KeyRole::Sort)))
            .collect::<Vec<_>>();

        let mut cmd = vec![
            "aws".to_string(),
            "dynamodb".to_string(),
            "create-table".to_string(),
            "--table-name".to_string(),
            self.collection.clone(),
            "--attribute-definitions".to_string(),
        ];
        cmd.extend(keys.iter().map(|(key, _)| {
            format!(
                "AttributeName={},AttributeType={}",
                key.name, key.attribute_type
            )
        }));
        cmd.push("--key-schema".to_string());
        cmd.extend(
            keys.iter()
                .map(|(key, role)| format!("AttributeName={},KeyType={}", key.name, role.key_type())),
        );
        cmd.push("--provisioned-throughput".to_string());
        cmd.push(format!(
            "ReadCapacityUnits={read},WriteCapacityUnits={write}"
        ));
        cmd
    }
}

fn non_zero_or_default(units: u32) -> u32 {
    if units == 0 {
        DEFAULT_CAPACITY_UNITS
    } else {
        units
    }
}
