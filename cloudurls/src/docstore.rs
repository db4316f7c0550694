//! Document store locators.
//!
//! Applications usually work with several collections (tables) in the same
//! database, so configuration only needs to point at the database and the
//! application fills in the collection name via [`DocStoreOptions::collection`].

use crate::{
    DocStoreOptions, Locator,
    backend::DocStoreKind,
    error::{Error, Result},
};

/// Database name Firestore uses when none is given.
///
/// It must appear unescaped in normalized output, even though parentheses are
/// otherwise percent-encoded in paths.
pub const DEFAULT_DATABASE: &str = "(default)";
const DEFAULT_DATABASE_ENCODED: &str = "%28default%29";

const FIRESTORE_PROJECTS: &str = "projects";

/// Normalize a document store URL.
///
/// Supported schemes: `mem`, `firestore`, `dynamodb` and `mongo`.
///
/// ```
/// use cloudurls::{DocStoreOptions, normalize_docstore_url};
///
/// let opts = DocStoreOptions::new().with_collection("addresses");
/// assert_eq!(
///     normalize_docstore_url("firestore://my-project", &opts).unwrap(),
///     "firestore://projects/my-project/databases/(default)/documents/addresses?name_field=_id",
/// );
///
/// let opts = DocStoreOptions::new()
///     .with_collection("tasks")
///     .with_partition_key("job_id");
/// assert_eq!(
///     normalize_docstore_url("dynamodb://", &opts).unwrap(),
///     "dynamodb://tasks?partition_key=job_id&sort_key=_id",
/// );
/// ```
pub fn normalize_docstore_url(src: &str, opts: &DocStoreOptions) -> Result<String> {
    let loc = Locator::parse(src)?;
    let kind = DocStoreKind::from_scheme(loc.scheme()).ok_or_else(|| Error::UnrecognizedScheme {
        scheme: loc.scheme().to_string(),
    })?;

    let out = match kind {
        DocStoreKind::Mem => normalize_memstore(loc, opts)?,
        DocStoreKind::Firestore => normalize_firestore(loc, opts)?,
        DocStoreKind::Dynamo => normalize_dynamo(loc, opts)?,
        DocStoreKind::Mongo => normalize_mongo(loc, opts)?,
    };

    crate::trace_rewrite("docstore", src, &out);
    Ok(out)
}

/// Like [`normalize_docstore_url`], but panics on error.
///
/// Meant for static configuration that is known to be valid.
pub fn must_normalize_docstore_url(src: &str, opts: &DocStoreOptions) -> String {
    match normalize_docstore_url(src, opts) {
        Ok(url) => url,
        Err(err) => panic!("invalid docstore url '{src}': {err}"),
    }
}

fn normalize_memstore(mut loc: Locator, opts: &DocStoreOptions) -> Result<String> {
    let collection = opts.collection_override();
    if collection.is_none() && loc.authority().is_empty() {
        return Err(Error::missing(
            "collection",
            &loc,
            "opt.collection is required if the URL doesn't have a collection",
        ));
    }
    if let Some(collection) = collection {
        loc.set_authority(collection);
    }

    if let Some(key) = opts.key_override() {
        loc.set_absolute_path([key]);
    } else if loc.path_segments().is_empty() {
        loc.set_absolute_path([opts.resolved_key_name()]);
    }

    if let Some(file_name) = opts.file_name_override() {
        loc.set_query_param("filename", file_name);
    }
    if let Some(revision) = opts.revision_override() {
        loc.set_query_param("revision_field", revision);
    }

    Ok(loc.to_string())
}

fn normalize_firestore(mut loc: Locator, opts: &DocStoreOptions) -> Result<String> {
    fold_firestore_project(&mut loc)?;

    // Split semantics: a leading empty segment precedes the project.
    let elements = loc.path_segments().to_vec();
    let (project, database, collection) = match opts.collection_override() {
        None => match elements.len() {
            4 => (&elements[1], elements[2].as_str(), elements[3].as_str()),
            6 => (&elements[1], elements[3].as_str(), elements[5].as_str()),
            _ => {
                return Err(Error::mismatch(
                    &loc,
                    "firestore://(project)/(database)/(collection) or \
                     firestore://projects/(project)/databases/(database)/documents/(collection)",
                ));
            }
        },
        Some(collection) => match elements.len() {
            2 => (&elements[1], DEFAULT_DATABASE, collection),
            3 => (&elements[1], elements[2].as_str(), collection),
            // A trailing collection segment is replaced by the explicit one.
            4 | 5 => (&elements[1], elements[3].as_str(), collection),
            _ => {
                return Err(Error::mismatch(
                    &loc,
                    "firestore://(project) or firestore://(project)/(database) or \
                     firestore://projects/(project)/databases/(database)/documents",
                ));
            }
        },
    };

    let path = [
        project.as_str(),
        "databases",
        database,
        "documents",
        collection,
    ];
    loc.set_absolute_path(path);
    resolve_key_field(&mut loc, "name_field", opts);

    Ok(loc
        .to_string()
        .replacen(DEFAULT_DATABASE_ENCODED, DEFAULT_DATABASE, 1))
}

/// Rewrite `firestore://project/...` into `firestore://projects/project/...`.
///
/// Empty path segments are dropped along the way.
fn fold_firestore_project(loc: &mut Locator) -> Result<()> {
    if loc.authority().is_empty() {
        return Err(Error::missing(
            "project",
            &*loc,
            "firestore URL doesn't have project information",
        ));
    }

    let mut segments = Vec::new();
    if loc.authority() != FIRESTORE_PROJECTS {
        segments.push(loc.authority().to_string());
        loc.set_authority(FIRESTORE_PROJECTS);
    }
    segments.extend(
        loc.path_segments()
            .iter()
            .filter(|s| !s.is_empty())
            .cloned(),
    );

    let mut path = vec![String::new()];
    path.extend(segments);
    loc.set_path_segments(path);
    Ok(())
}

fn normalize_dynamo(mut loc: Locator, opts: &DocStoreOptions) -> Result<String> {
    let collection = opts.collection_override();
    if collection.is_none() && loc.authority().is_empty() {
        return Err(Error::missing(
            "collection",
            &loc,
            "opt.collection is required if the URL doesn't have a collection",
        ));
    }
    loc.set_scheme("dynamodb");
    if let Some(collection) = collection {
        loc.set_authority(collection);
    }

    let partition = loc.non_empty_query_param("partition_key").map(str::to_string);
    let sort = loc.non_empty_query_param("sort_key").map(str::to_string);

    match (partition, sort) {
        (Some(partition), Some(sort)) => {
            let sort = opts.key_override().map(str::to_string).unwrap_or(sort);
            let partition = opts
                .partition_override()
                .map(str::to_string)
                .unwrap_or(partition);
            loc.set_query_param("partition_key", partition);
            loc.set_query_param("sort_key", sort);
        }
        (Some(partition), None) => {
            let partition = opts
                .key_override()
                .map(str::to_string)
                .unwrap_or(partition);
            loc.set_query_param("partition_key", partition);
            loc.remove_query_param("sort_key");
        }
        (None, _) => {
            let key = opts.resolved_key_name().to_string();
            match opts.partition_override() {
                Some(partition) => {
                    loc.set_query_param("partition_key", partition);
                    loc.set_query_param("sort_key", key);
                }
                None => {
                    loc.set_query_param("partition_key", key);
                    loc.remove_query_param("sort_key");
                }
            }
        }
    }

    Ok(loc.to_string())
}

/// A bare root path (`mongo://db/`) only needs the collection option to be
/// present; the path itself is kept as `/`.
fn normalize_mongo(mut loc: Locator, opts: &DocStoreOptions) -> Result<String> {
    if loc.authority().is_empty() {
        return Err(Error::missing(
            "database name",
            &loc,
            "mongo requires the host to be the database name",
        ));
    }

    if loc.path_segments().is_empty() || loc.is_root_path() {
        let collection = opts.collection_override().ok_or_else(|| {
            Error::missing(
                "collection",
                &loc,
                "opt.collection is required if the URL doesn't have a collection",
            )
        })?;
        if loc.path_segments().is_empty() {
            loc.set_absolute_path([collection]);
        }
    }

    resolve_key_field(&mut loc, "id_field", opts);
    Ok(loc.to_string())
}

/// Set `param` to the key name override, keep an existing value otherwise,
/// and fall back to the default key name.
fn resolve_key_field(loc: &mut Locator, param: &str, opts: &DocStoreOptions) {
    let value = match (opts.key_override(), loc.non_empty_query_param(param)) {
        (Some(key), _) => key.to_string(),
        (None, Some(existing)) => existing.to_string(),
        (None, None) => opts.resolved_key_name().to_string(),
    };
    loc.set_query_param(param, value);
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ErrorKind;

    fn collection(name: &str) -> DocStoreOptions {
        DocStoreOptions::new().with_collection(name)
    }

    fn expect_ok(src: &str, opts: &DocStoreOptions, expected: &str) {
        match normalize_docstore_url(src, opts) {
            Ok(out) => assert_eq!(out, expected, "source: '{src}'"),
            Err(err) => panic!("expected '{src}' to normalize, got error: {err}"),
        }
    }

    fn expect_err(src: &str, opts: &DocStoreOptions, kind: ErrorKind) {
        match normalize_docstore_url(src, opts) {
            Ok(out) => panic!("expected '{src}' to fail, got '{out}'"),
            Err(err) => assert_eq!(err.kind(), kind, "source: '{src}': {err}"),
        }
    }

    #[test]
    fn test_unknown_scheme() {
        let err = normalize_docstore_url("redis://host", &collection("c")).unwrap_err();
        assert_eq!(
            err,
            Error::UnrecognizedScheme {
                scheme: "redis".to_string()
            }
        );
        expect_err("s3://bucket", &collection("c"), ErrorKind::UnrecognizedScheme);
        expect_err("jobs", &collection("c"), ErrorKind::UnrecognizedScheme);
    }

    #[test]
    fn test_memstore() {
        let none = DocStoreOptions::new();
        expect_ok("mem://jobs", &none, "mem://jobs/_id");
        expect_ok("mem://", &collection("jobs"), "mem://jobs/_id");
        expect_ok("mem://other", &collection("jobs"), "mem://jobs/_id");
        expect_err("mem://", &none, ErrorKind::MissingField);
        expect_err("mem://", &collection(""), ErrorKind::MissingField);
    }

    #[test]
    fn test_memstore_key_name() {
        expect_ok(
            "mem://jobs/name",
            &DocStoreOptions::new(),
            "mem://jobs/name",
        );
        expect_ok(
            "mem://jobs/name",
            &DocStoreOptions::new().with_key_name("job_id"),
            "mem://jobs/job_id",
        );
    }

    #[test]
    fn test_memstore_file_and_revision() {
        let opts = collection("jobs")
            .with_file_name("jobs.db")
            .with_revision_field("rev");
        expect_ok(
            "mem://",
            &opts,
            "mem://jobs/_id?filename=jobs.db&revision_field=rev",
        );
        expect_ok(
            "mem://jobs?filename=old.db",
            &DocStoreOptions::new(),
            "mem://jobs/_id?filename=old.db",
        );
    }

    #[test]
    fn test_firestore_with_collection_option() {
        let jobs = collection("jobs");
        let cases = [
            (
                "firestore://projects/my-project",
                "firestore://projects/my-project/databases/(default)/documents/jobs?name_field=_id",
            ),
            (
                "firestore://my-project",
                "firestore://projects/my-project/databases/(default)/documents/jobs?name_field=_id",
            ),
            (
                "firestore://my-project/my-database",
                "firestore://projects/my-project/databases/my-database/documents/jobs?name_field=_id",
            ),
            (
                "firestore://projects/my-project/databases/my-database/documents",
                "firestore://projects/my-project/databases/my-database/documents/jobs?name_field=_id",
            ),
            (
                "firestore://projects/my-project/databases/my-database",
                "firestore://projects/my-project/databases/my-database/documents/jobs?name_field=_id",
            ),
        ];
        for (src, expected) in cases {
            expect_ok(src, &jobs, expected);
        }

        expect_err("firestore://", &jobs, ErrorKind::MissingField);
        expect_err(
            "firestore://projects/my-project/databases/my-database/documents/my-document",
            &jobs,
            ErrorKind::StructuralMismatch,
        );
    }

    /// With an explicit collection, four and five segment paths both take the
    /// database from the fourth segment. A shorthand
    /// `project/database/collection` path therefore reads its collection as
    /// the database, and the source collection is discarded.
    #[test]
    fn test_firestore_explicit_collection_discards_trailing_segment() {
        expect_ok(
            "firestore://projects/my-project/databases/my-database/documents",
            &collection("tasks"),
            "firestore://projects/my-project/databases/my-database/documents/tasks?name_field=_id",
        );
        expect_ok(
            "firestore://my-project/my-database/jobs",
            &collection("tasks"),
            "firestore://projects/my-project/databases/jobs/documents/tasks?name_field=_id",
        );
    }

    #[test]
    fn test_firestore_inline_collection() {
        let none = DocStoreOptions::new();
        let expected =
            "firestore://projects/my-project/databases/my-database/documents/jobs?name_field=_id";
        expect_ok(
            "firestore://projects/my-project/databases/my-database/documents/jobs",
            &none,
            expected,
        );
        expect_ok("firestore://my-project/my-database/jobs", &none, expected);

        for src in [
            "firestore://projects/my-project/databases/my-database/documents",
            "firestore://projects/my-project/databases/my-database/documents/jobs/test",
            "firestore://my-project/my-database",
            "firestore://my-project/my-database/jobs/test",
        ] {
            expect_err(src, &none, ErrorKind::StructuralMismatch);
        }
        expect_err("firestore://", &none, ErrorKind::MissingField);
    }

    #[test]
    fn test_firestore_name_field() {
        let src = "firestore://my-project/db/jobs?name_field=title";
        expect_ok(
            src,
            &DocStoreOptions::new(),
            "firestore://projects/my-project/databases/db/documents/jobs?name_field=title",
        );
        expect_ok(
            src,
            &DocStoreOptions::new().with_key_name("job_id"),
            "firestore://projects/my-project/databases/db/documents/jobs?name_field=job_id",
        );
        expect_ok(
            "firestore://my-project/db/jobs?name_field=",
            &DocStoreOptions::new(),
            "firestore://projects/my-project/databases/db/documents/jobs?name_field=_id",
        );
    }

    #[test]
    fn test_firestore_ignores_empty_segments() {
        expect_ok(
            "firestore://my-project/my-database/",
            &collection("jobs"),
            "firestore://projects/my-project/databases/my-database/documents/jobs?name_field=_id",
        );
    }

    #[test]
    fn test_dynamo() {
        let cases = [
            ("dynamodb:", collection("tasks"), "dynamodb://tasks?partition_key=_id"),
            (
                "dynamodb:",
                collection("tasks").with_partition_key("job_id"),
                "dynamodb://tasks?partition_key=job_id&sort_key=_id",
            ),
            (
                "dynamodb://tasks",
                DocStoreOptions::new(),
                "dynamodb://tasks?partition_key=_id",
            ),
            (
                "dynamodb://tasks",
                DocStoreOptions::new().with_partition_key("job_id"),
                "dynamodb://tasks?partition_key=job_id&sort_key=_id",
            ),
            (
                "dynamodb://my-db",
                collection("tasks"),
                "dynamodb://tasks?partition_key=_id",
            ),
            (
                "DynamoDB://tasks",
                DocStoreOptions::new(),
                "dynamodb://tasks?partition_key=_id",
            ),
        ];
        for (src, opts, expected) in cases {
            expect_ok(src, &opts, expected);
        }
        expect_err("dynamodb://", &DocStoreOptions::new(), ErrorKind::MissingField);
    }

    #[test]
    fn test_dynamo_existing_keys() {
        let both = "dynamodb://tasks?partition_key=job_id&sort_key=created";
        expect_ok(both, &DocStoreOptions::new(), both);
        expect_ok(
            both,
            &DocStoreOptions::new().with_key_name("seq"),
            "dynamodb://tasks?partition_key=job_id&sort_key=seq",
        );
        expect_ok(
            both,
            &DocStoreOptions::new().with_partition_key("user_id"),
            "dynamodb://tasks?partition_key=user_id&sort_key=created",
        );

        let partition_only = "dynamodb://tasks?partition_key=job_id";
        expect_ok(partition_only, &DocStoreOptions::new(), partition_only);
        expect_ok(
            partition_only,
            &DocStoreOptions::new().with_key_name("id"),
            "dynamodb://tasks?partition_key=id",
        );
        // A partition key option does not add a sort key here.
        expect_ok(
            partition_only,
            &DocStoreOptions::new().with_partition_key("user_id"),
            partition_only,
        );

        expect_ok(
            "dynamodb://tasks?sort_key=stray",
            &DocStoreOptions::new(),
            "dynamodb://tasks?partition_key=_id",
        );
    }

    #[test]
    fn test_mongo() {
        expect_ok(
            "mongo://my-db",
            &collection("tasks"),
            "mongo://my-db/tasks?id_field=_id",
        );
        expect_ok(
            "mongo://my-db/",
            &collection("tasks"),
            "mongo://my-db/?id_field=_id",
        );
        expect_ok(
            "mongo://my-db/tasks",
            &DocStoreOptions::new(),
            "mongo://my-db/tasks?id_field=_id",
        );
        expect_ok(
            "mongo://my-db/tasks?id_field=name",
            &DocStoreOptions::new(),
            "mongo://my-db/tasks?id_field=name",
        );
        expect_ok(
            "mongo://my-db/tasks?id_field=name",
            &DocStoreOptions::new().with_key_name("uid"),
            "mongo://my-db/tasks?id_field=uid",
        );

        expect_err("mongo://", &collection("tasks"), ErrorKind::MissingField);
        expect_err("mongo://my-db", &DocStoreOptions::new(), ErrorKind::MissingField);
        expect_err("mongo://my-db/", &DocStoreOptions::new(), ErrorKind::MissingField);
    }

    #[test]
    fn test_mongo_keeps_connection_params() {
        expect_ok(
            "mongo://my-db/tasks?replicaSet=rs0",
            &DocStoreOptions::new(),
            "mongo://my-db/tasks?id_field=_id&replicaSet=rs0",
        );
    }

    #[test]
    #[should_panic(expected = "invalid docstore url")]
    fn test_must_normalize_panics() {
        must_normalize_docstore_url("mem://", &DocStoreOptions::new());
    }
}
