//! Error types for the catalog and the runner

use std::io;
use thiserror::Error;

/// Errors raised by ktest itself (never by the code under test)
#[derive(Error, Debug)]
pub enum KtestError {
    #[error("Test names must not be empty")]
    EmptyName,

    #[error("Cannot register test '{name}': the catalog is sealed because a run has started")]
    CatalogSealed { name: String },

    #[error("Failed to locate the current executable: {0}")]
    CurrentExe(#[source] io::Error),

    #[error("Error starting test {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("Error waiting for test {name}: {source}")]
    Wait {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid isolation directive: {0:?}")]
    InvalidChildDirective(String),

    #[error("Isolation directive names test #{index}, but only {len} tests are registered")]
    UnknownChild { index: usize, len: usize },

    #[error("Isolation directive for test #{index} expected '{expected}', found '{found}'")]
    ChildMismatch {
        index: usize,
        expected: String,
        found: String,
    },
}

/// Result type for ktest operations
pub type KtestResult<T> = Result<T, KtestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_error_names_test() {
        let err = KtestError::Spawn {
            name: "parses_header".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("parses_header"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_child_mismatch_message() {
        let err = KtestError::ChildMismatch {
            index: 3,
            expected: "alpha".to_string(),
            found: "beta".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Isolation directive for test #3 expected 'alpha', found 'beta'"
        );
    }
}
