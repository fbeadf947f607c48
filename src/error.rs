//! Error types for the package index.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Package not indexed: {0}")]
    NotIndexed(String),

    #[error("Package {name} depends on non-indexed package {dependency}")]
    UnknownDependency { name: String, dependency: String },

    #[error("Package {name} still has {count} dependent(s)")]
    HasDependents { name: String, count: usize },

    #[error("Index lock poisoned")]
    LockPoisoned,

    #[error("Config error: {0}")]
    Config(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl IndexError {
    /// True for errors raised by the graph store when asked an ill-formed
    /// question (the store never reached a consistent answer).
    pub fn is_store_inconsistency(&self) -> bool {
        matches!(
            self,
            IndexError::NotIndexed(_)
                | IndexError::UnknownDependency { .. }
                | IndexError::HasDependents { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_inconsistency_classification() {
        assert!(IndexError::NotIndexed("a".into()).is_store_inconsistency());
        assert!(IndexError::HasDependents { name: "a".into(), count: 2 }.is_store_inconsistency());
        assert!(!IndexError::LockPoisoned.is_store_inconsistency());
        assert!(!IndexError::Protocol("garbage".into()).is_store_inconsistency());
    }

    #[test]
    fn test_error_messages() {
        let err = IndexError::UnknownDependency {
            name: "pkg3".into(),
            dependency: "pkg1".into(),
        };
        assert_eq!(err.to_string(), "Package pkg3 depends on non-indexed package pkg1");
        assert_eq!(
            IndexError::NotIndexed("lib".into()).to_string(),
            "Package not indexed: lib"
        );
    }
}
