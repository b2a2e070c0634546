// src/namespace.rs

//! Per-test resource namespaces.
//!
//! Tools such as `docker compose` scope everything they create (containers,
//! networks, volumes) by a project name, and reject upper-case or special
//! characters in it. Two tests running in parallel with the same project name
//! would trample each other's resources, so every test derives its own
//! namespace from its name.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static INVALID_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("namespace pattern is a valid regex"));

/// A sanitized identifier scoping one test's tool-managed resources.
///
/// Always non-empty and made only of `a-z`, `0-9` and `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace(String);

impl Namespace {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derive a namespace from a human-readable test name.
///
/// The input is lower-cased and every maximal run of characters outside
/// `[a-z0-9]` becomes a single `-`:
///
/// ```
/// use toolrun::namespace::generate_namespace;
///
/// assert_eq!(generate_namespace("My Test!!Name").as_str(), "my-test-name");
/// assert_eq!(generate_namespace("already-lower").as_str(), "already-lower");
/// ```
///
/// Total and deterministic. Input with no usable characters (including the
/// empty string) degrades to `"-"`.
pub fn generate_namespace(raw: &str) -> Namespace {
    let lower = raw.to_lowercase();
    let replaced = INVALID_RUN.replace_all(&lower, "-");

    if replaced.is_empty() {
        return Namespace("-".to_string());
    }

    Namespace(replaced.into_owned())
}
