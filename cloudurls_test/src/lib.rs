//! Test helpers for normalizers.
//!
//! Allows for table-driven tests that check every normalizer against the same
//! expectations: literal outputs, failures, and idempotence of canonical
//! output.
//!
//! The helpers are generic over the normalizer function, so they do not depend
//! on the `cloudurls` crate itself.

use std::fmt::Display;

use pretty_assertions::assert_eq;

/// A single table-driven test case.
#[derive(Clone, Debug)]
pub struct Case<'a> {
    pub name: &'a str,
    pub src: &'a str,
    /// Expected output, or `None` if normalization must fail.
    pub expected: Option<&'a str>,
}

impl<'a> Case<'a> {
    pub const fn ok(name: &'a str, src: &'a str, expected: &'a str) -> Self {
        Self {
            name,
            src,
            expected: Some(expected),
        }
    }

    pub const fn err(name: &'a str, src: &'a str) -> Self {
        Self {
            name,
            src,
            expected: None,
        }
    }
}

/// Run all `cases` against `normalize`.
///
/// Successful outputs are also checked for idempotence.
pub fn run_cases<F, E>(normalize: F, cases: &[Case<'_>])
where
    F: Fn(&str) -> Result<String, E>,
    E: Display,
{
    for case in cases {
        tracing::debug!(name = case.name, src = case.src, "running case");

        let res = normalize(case.src);
        match (case.expected, res) {
            (Some(expected), Ok(actual)) => {
                assert_eq!(
                    actual, expected,
                    "case '{}': unexpected output for '{}'",
                    case.name, case.src
                );
                expect_idempotent(&normalize, &actual);
            }
            (Some(_), Err(err)) => {
                panic!(
                    "case '{}': expected '{}' to normalize, got error: {err}",
                    case.name, case.src
                );
            }
            (None, Ok(actual)) => {
                panic!(
                    "case '{}': expected '{}' to fail, got '{actual}'",
                    case.name, case.src
                );
            }
            (None, Err(err)) => {
                tracing::trace!(name = case.name, error = %err, "case failed as expected");
            }
        }
    }
}

/// Ensures that normalizing an already normalized URL is a no-op.
pub fn expect_idempotent<F, E>(normalize: F, canonical: &str)
where
    F: Fn(&str) -> Result<String, E>,
    E: Display,
{
    match normalize(canonical) {
        Ok(again) => assert_eq!(
            again, canonical,
            "normalizing canonical url '{canonical}' again should not change it"
        ),
        Err(err) => panic!("canonical url '{canonical}' failed to normalize again: {err}"),
    }
}
