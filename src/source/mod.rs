//! Type record sources.
//!
//! The aggregator never talks to PokeAPI directly; it is handed a
//! [`TypeSource`] and asks it for one record per type name.

pub mod directory;
pub mod pokeapi;

pub use directory::DirectoryTypeSource;
pub use pokeapi::PokeApiClient;

use crate::models::TypeRecord;
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain a type record.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid type name '{name}'")]
    InvalidName { name: String },

    #[error("type '{name}' not found")]
    NotFound { name: String },

    #[error("request for type '{name}' failed: {source}")]
    Http {
        name: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("type '{name}' lookup returned HTTP {status}")]
    Status {
        name: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to read record for type '{name}' from {}: {source}", .path.display())]
    Io {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid record for type '{name}': {source}")]
    Decode {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Name of the type whose fetch failed.
    pub fn type_name(&self) -> &str {
        match self {
            FetchError::InvalidName { name }
            | FetchError::NotFound { name }
            | FetchError::Http { name, .. }
            | FetchError::Status { name, .. }
            | FetchError::Io { name, .. }
            | FetchError::Decode { name, .. } => name,
        }
    }
}

/// Fetch-by-name capability for type relation records.
#[async_trait]
pub trait TypeSource: Send + Sync {
    /// Fetch the record for a single type name.
    async fn fetch_type(&self, name: &str) -> Result<TypeRecord, FetchError>;

    /// Short description used in log output.
    fn describe(&self) -> String;
}

/// Checks that a type name is safe to splice into a URL path or file name.
///
/// PokeAPI accepts slugs (`fire`, `shadow`) and numeric ids, so only
/// ASCII alphanumerics and `-` are allowed.
pub fn validate_type_name(name: &str) -> Result<(), FetchError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');

    if valid {
        Ok(())
    } else {
        Err(FetchError::InvalidName {
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_type_name() {
        assert!(validate_type_name("fire").is_ok());
        assert!(validate_type_name("10").is_ok());
        assert!(validate_type_name("mr-mime").is_ok());
        assert!(validate_type_name("").is_err());
        assert!(validate_type_name("../etc/passwd").is_err());
        assert!(validate_type_name("fire/water").is_err());
        assert!(validate_type_name("fire water").is_err());
    }

    #[test]
    fn test_fetch_error_type_name() {
        let err = FetchError::NotFound {
            name: "shadow".to_string(),
        };
        assert_eq!(err.type_name(), "shadow");
        assert_eq!(err.to_string(), "type 'shadow' not found");
    }
}
