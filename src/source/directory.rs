//! Type records read from saved JSON files.
//!
//! Each record lives at `{dir}/{name}.json` in the same shape PokeAPI
//! serves, so responses can be saved with `curl` and replayed offline.

use super::{validate_type_name, FetchError, TypeSource};
use crate::models::TypeRecord;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// Type source backed by a directory of JSON records.
#[derive(Debug, Clone)]
pub struct DirectoryTypeSource {
    root: PathBuf,
}

impl DirectoryTypeSource {
    /// Create a source reading records from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the record file for a type name.
    pub fn record_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.json", name))
    }
}

#[async_trait]
impl TypeSource for DirectoryTypeSource {
    async fn fetch_type(&self, name: &str) -> Result<TypeRecord, FetchError> {
        validate_type_name(name)?;

        let path = self.record_path(name);
        debug!("Reading {}", path.display());

        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FetchError::NotFound {
                    name: name.to_string(),
                });
            }
            Err(source) => {
                return Err(FetchError::Io {
                    name: name.to_string(),
                    path,
                    source,
                });
            }
        };

        serde_json::from_slice(&content).map_err(|source| FetchError::Decode {
            name: name.to_string(),
            source,
        })
    }

    fn describe(&self) -> String {
        format!("records in {}", self.root.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RelationCategory;
    use std::path::Path;

    fn fixtures() -> DirectoryTypeSource {
        DirectoryTypeSource::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/types"))
    }

    #[tokio::test]
    async fn test_reads_fixture_record() {
        let record = tokio_test::assert_ok!(fixtures().fetch_type("fire").await);

        assert_eq!(record.name, "fire");
        let weak_to: Vec<_> = record
            .damage_relations
            .get(RelationCategory::DoubleDamageFrom)
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(weak_to, vec!["ground", "rock", "water"]);
    }

    #[tokio::test]
    async fn test_missing_record_is_not_found() {
        let err = fixtures().fetch_type("shadow").await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound { ref name } if name == "shadow"));
    }

    #[tokio::test]
    async fn test_malformed_record_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

        let source = DirectoryTypeSource::new(dir.path());
        let err = tokio_test::assert_err!(source.fetch_type("broken").await);
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[test]
    fn test_record_path() {
        let source = DirectoryTypeSource::new("/data/types");
        assert_eq!(
            source.record_path("water"),
            PathBuf::from("/data/types/water.json")
        );
    }
}
