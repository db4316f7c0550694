//! DynamoDB table schemas for normalized docstore URLs.
//!
//! ```
//! use cloudurls_schema::{DynamoDbSchema, FieldSpec, SchemaOptions, ValueKind};
//!
//! let fields = [
//!     FieldSpec::new("Name", ValueKind::String).with_rename("name"),
//!     FieldSpec::new("Age", ValueKind::Integer),
//! ];
//! let schema = DynamoDbSchema::derive(&fields, "dynamodb://persons?partition_key=name").unwrap();
//! assert_eq!(
//!     schema.create_table_command(&SchemaOptions::default()),
//!     [
//!         "aws", "dynamodb", "create-table", "--table-name", "persons",
//!         "--attribute-definitions", "AttributeName=name,AttributeType=S",
//!         "--key-schema", "AttributeName=name,KeyType=HASH",
//!         "--provisioned-throughput", "ReadCapacityUnits=5,WriteCapacityUnits=5",
//!     ],
//! );
//! ```

mod field;
mod schema;

pub use self::{
    field::{FieldSpec, KeyRole, ValueKind},
    schema::{DynamoDbSchema, KeyField, SchemaError, SchemaOptions},
};
