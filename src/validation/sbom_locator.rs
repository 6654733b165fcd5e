//! SBOM file resolution and access
//!
//! Resolves the SBOM path (an explicit path, or `{basedir}/target/bom.json`
//! by default) and reads the file fully into memory before submission, so
//! the handle is released regardless of how the submission goes. An absent
//! file is not an error, the attachment is simply omitted; any other access
//! problem is surfaced.

use crate::core::error::SyncError;
use std::path::{Path, PathBuf};
use tokio::fs;

/// An SBOM file fully read into memory
#[derive(Debug, Clone, PartialEq)]
pub struct SbomFile {
    /// Resolved path the file was read from
    pub path: PathBuf,

    /// Base name submitted as the multipart file name
    pub file_name: String,

    /// Raw file content; the internal structure is not validated
    pub content: Vec<u8>,
}

/// Locator for the optional SBOM attachment
pub struct SbomLocator;

impl Default for SbomLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl SbomLocator {
    /// Create a new SbomLocator
    pub fn new() -> Self {
        Self
    }

    /// Resolve the effective SBOM path
    ///
    /// An explicitly configured path wins; otherwise the conventional
    /// `{basedir}/target/bom.json` location is used.
    pub fn resolve_path(&self, explicit: Option<&Path>, base_dir: &Path) -> PathBuf {
        match explicit {
            Some(path) => path.to_path_buf(),
            None => base_dir.join("target").join("bom.json"),
        }
    }

    /// Locate and read the SBOM file
    ///
    /// Returns `Ok(None)` when no file exists at the resolved path.
    pub async fn locate(
        &self,
        explicit: Option<&Path>,
        base_dir: &Path,
    ) -> Result<Option<SbomFile>, SyncError> {
        let path = self.resolve_path(explicit, base_dir);

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read(&path).await.map_err(|e| SyncError::SbomAccess {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "bom.json".to_string());

        Ok(Some(SbomFile {
            path,
            file_name,
            content,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_path_defaults_to_target_bom_json() {
        let locator = SbomLocator::new();
        let resolved = locator.resolve_path(None, Path::new("/tmp/project"));
        assert_eq!(resolved, PathBuf::from("/tmp/project/target/bom.json"));
    }

    #[test]
    fn test_resolve_path_prefers_explicit_path() {
        let locator = SbomLocator::new();
        let resolved = locator.resolve_path(
            Some(Path::new("/elsewhere/sbom.json")),
            Path::new("/tmp/project"),
        );
        assert_eq!(resolved, PathBuf::from("/elsewhere/sbom.json"));
    }

    #[tokio::test]
    async fn test_locate_missing_file_is_none_not_error() {
        let temp_dir = TempDir::new().unwrap();
        let locator = SbomLocator::new();

        let result = locator.locate(None, temp_dir.path()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_locate_reads_default_location() {
        let temp_dir = TempDir::new().unwrap();
        let target_dir = temp_dir.path().join("target");
        std::fs::create_dir_all(&target_dir).unwrap();
        let mut file = std::fs::File::create(target_dir.join("bom.json")).unwrap();
        write!(file, r#"{{"bomFormat":"CycloneDX"}}"#).unwrap();

        let locator = SbomLocator::new();
        let sbom = locator.locate(None, temp_dir.path()).await.unwrap().unwrap();

        assert_eq!(sbom.file_name, "bom.json");
        assert_eq!(sbom.content, br#"{"bomFormat":"CycloneDX"}"#);
    }

    #[tokio::test]
    async fn test_locate_reads_explicit_path_with_its_base_name() {
        let temp_dir = TempDir::new().unwrap();
        let sbom_path = temp_dir.path().join("custom-bom.json");
        let mut file = std::fs::File::create(&sbom_path).unwrap();
        write!(file, "{{}}").unwrap();

        let locator = SbomLocator::new();
        let sbom = locator
            .locate(Some(&sbom_path), Path::new("/unused"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(sbom.file_name, "custom-bom.json");
        assert_eq!(sbom.path, sbom_path);
    }

    #[tokio::test]
    async fn test_locate_unreadable_path_is_sbom_access_error() {
        let temp_dir = TempDir::new().unwrap();
        // A directory at the resolved path exists but cannot be read as a file
        let sbom_path = temp_dir.path().join("bom-as-dir");
        std::fs::create_dir(&sbom_path).unwrap();

        let locator = SbomLocator::new();
        let result = locator.locate(Some(&sbom_path), Path::new("/unused")).await;

        assert!(matches!(result, Err(SyncError::SbomAccess { .. })));
    }
}
