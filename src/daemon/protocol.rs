//! Daemon protocol — request parsing and response codes.
//!
//! Requests are single lines of the form `VERB|NAME|DEPLIST\n`; every
//! request is answered with exactly one of `OK\n`, `FAIL\n` or `ERROR\n`.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::error::{IndexError, Result};

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_\-+]+$").expect("name pattern is valid"));

static DEPENDENCIES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_,\-+]*$").expect("dependency pattern is valid"));

/// Request from a client, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Add or replace a package with its dependency list
    Index {
        name: String,
        dependencies: Vec<String>,
    },

    /// Remove a package nothing depends on
    Remove { name: String },

    /// Check whether a package is indexed
    Query { name: String },
}

impl Request {
    pub fn verb(&self) -> &'static str {
        match self {
            Request::Index { .. } => "INDEX",
            Request::Remove { .. } => "REMOVE",
            Request::Query { .. } => "QUERY",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Request::Index { name, .. } | Request::Remove { name } | Request::Query { name } => {
                name
            }
        }
    }
}

/// Why a request line was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Input does not have 3 arguments : {0:?}")]
    FieldCount(String),

    #[error("Input method should be REMOVE/INDEX/QUERY, not : {0:?}")]
    UnknownVerb(String),

    #[error("Library name missing or incorrect : {0:?}")]
    InvalidName(String),

    #[error("Dependencies are incorrectly formatted : {0:?}")]
    InvalidDependencies(String),
}

/// Parse and validate one request line.
///
/// A single trailing `\n` (or `\r\n`) is stripped. The dependency field is
/// checked for every verb but only carried by `INDEX`.
pub fn parse_request(line: &str) -> std::result::Result<Request, ValidationError> {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);

    let fields: Vec<&str> = line.split('|').collect();
    let &[verb, name, dependencies] = fields.as_slice() else {
        return Err(ValidationError::FieldCount(line.to_string()));
    };

    if !matches!(verb, "INDEX" | "REMOVE" | "QUERY") {
        return Err(ValidationError::UnknownVerb(verb.to_string()));
    }

    if !NAME_RE.is_match(name) {
        return Err(ValidationError::InvalidName(name.to_string()));
    }

    let dependencies = parse_dependencies(dependencies)?;
    let name = name.to_string();

    Ok(match verb {
        "INDEX" => Request::Index { name, dependencies },
        "REMOVE" => Request::Remove { name },
        _ => Request::Query { name },
    })
}

fn parse_dependencies(field: &str) -> std::result::Result<Vec<String>, ValidationError> {
    if !DEPENDENCIES_RE.is_match(field) {
        return Err(ValidationError::InvalidDependencies(field.to_string()));
    }
    if field.is_empty() {
        return Ok(Vec::new());
    }

    let mut seen = HashSet::new();
    let mut dependencies = Vec::new();
    for token in field.split(',') {
        if token.is_empty() {
            return Err(ValidationError::InvalidDependencies(field.to_string()));
        }
        if seen.insert(token) {
            dependencies.push(token.to_string());
        }
    }
    Ok(dependencies)
}

/// Response written back to a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// The request was applied / the package is indexed
    Ok,

    /// The request is legal but its rule did not hold
    Fail,

    /// The request was malformed or the index could not answer
    Error,
}

impl Response {
    pub fn as_line(&self) -> &'static str {
        match self {
            Response::Ok => "OK\n",
            Response::Fail => "FAIL\n",
            Response::Error => "ERROR\n",
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.as_line().trim_end()
    }

    pub fn from_outcome(outcome: &Result<bool>) -> Self {
        match outcome {
            Ok(true) => Response::Ok,
            Ok(false) => Response::Fail,
            Err(_) => Response::Error,
        }
    }

    /// Parse a response line as received by a client.
    pub fn parse(line: &str) -> Result<Self> {
        match line.trim_end_matches(['\n', '\r']) {
            "OK" => Ok(Response::Ok),
            "FAIL" => Ok(Response::Fail),
            "ERROR" => Ok(Response::Error),
            other => Err(IndexError::Protocol(format!(
                "unexpected response line: {:?}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
