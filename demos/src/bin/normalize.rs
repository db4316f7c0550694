use anyhow::Context as _;
use cloudurls::DocStoreOptions;
use cloudurls_schema::{DynamoDbSchema, FieldSpec, SchemaOptions, ValueKind};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), anyhow::Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cloudurls=trace"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Region is normally taken from the process environment, see
    // `cloudurls::normalize_blob_url_from_env`.
    let env = ["AWS_REGION=us-west-1"];
    let blob = cloudurls::normalize_blob_url("s3://my-bucket", env)?;
    println!("blob:     {blob}");

    let opts = DocStoreOptions::new()
        .with_collection("tasks")
        .with_partition_key("job_id");
    let tasks = cloudurls::normalize_docstore_url("dynamodb://", &opts)?;
    println!("docstore: {tasks}");

    let topic = cloudurls::normalize_pubsub_url("arn:aws:sns:us-east-2:123456789012:mytopic")?;
    println!("pubsub:   {topic}");

    let fields = [
        FieldSpec::new("job_id", ValueKind::String),
        FieldSpec::new("_id", ValueKind::Integer),
        FieldSpec::new("payload", ValueKind::Binary),
    ];
    let schema = DynamoDbSchema::derive(&fields, &tasks).context("failed to derive table schema")?;
    println!("{}", schema.create_table_command(&SchemaOptions::default()).join(" "));

    Ok(())
}
