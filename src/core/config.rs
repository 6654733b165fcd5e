//! Configuration structures and types for vsm-sync
//!
//! This module provides type-safe configuration management with serde support.
//! All values are externally supplied; the core treats them as validated
//! inputs except for the metadata JSON, which the pipeline parses itself.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default label describing the kind of source being registered
pub const DEFAULT_SOURCE_TYPE: &str = "rust";

/// Default label describing the tool that produced the registration
pub const DEFAULT_SOURCE_INSTANCE: &str = "vsm-sync";

/// Default free-form metadata payload
pub const DEFAULT_DATA: &str = "{}";

/// Root configuration object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SyncConfig {
    /// Hosting region of the catalog workspace (e.g. "eu", "us")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// DNS host of the workspace (e.g. https://acme.leanix.net would be "acme")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Admin technical user API token. Not the OAuth token, the user token.
    #[serde(skip_serializing_if = "Option::is_none", rename = "apiToken")]
    pub api_token: Option<String>,

    /// Path to the SBOM file (default: {project}/target/bom.json)
    #[serde(skip_serializing_if = "Option::is_none", rename = "sbomPath")]
    pub sbom_path: Option<PathBuf>,

    /// Skip snapshot versions from being relayed to the catalog (default: true)
    #[serde(skip_serializing_if = "Option::is_none", rename = "skipSnapshot")]
    pub skip_snapshot: Option<bool>,

    /// Optional metadata in a simple {"key":"value"} JSON format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,

    /// Source type label submitted with the registration (default: "rust")
    #[serde(skip_serializing_if = "Option::is_none", rename = "sourceType")]
    pub source_type: Option<String>,

    /// Source instance label submitted with the registration (default: "vsm-sync")
    #[serde(skip_serializing_if = "Option::is_none", rename = "sourceInstance")]
    pub source_instance: Option<String>,

    /// Project identity (optional in the file, may come from the CLI)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectSection>,
}

/// Project identity section of the configuration file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProjectSection {
    /// Group identifier (e.g. "com.acme")
    #[serde(skip_serializing_if = "Option::is_none", rename = "groupId")]
    pub group_id: Option<String>,

    /// Artifact identifier (e.g. "billing-service")
    #[serde(skip_serializing_if = "Option::is_none", rename = "artifactId")]
    pub artifact_id: Option<String>,

    /// Version string of the built artifact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Human-readable description of the project
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SyncConfig {
    /// Whether snapshot versions should be skipped (default: true)
    pub fn skip_snapshot(&self) -> bool {
        self.skip_snapshot.unwrap_or(true)
    }

    /// Raw metadata JSON payload (default: "{}")
    pub fn data(&self) -> &str {
        self.data.as_deref().unwrap_or(DEFAULT_DATA)
    }

    /// Source type label (default: "rust")
    pub fn source_type(&self) -> &str {
        self.source_type.as_deref().unwrap_or(DEFAULT_SOURCE_TYPE)
    }

    /// Source instance label (default: "vsm-sync")
    pub fn source_instance(&self) -> &str {
        self.source_instance
            .as_deref()
            .unwrap_or(DEFAULT_SOURCE_INSTANCE)
    }
}

/// Resolved project identity consumed by the pipeline
///
/// In the original build-tool setting this data comes from the host build
/// system; here it is resolved from the configuration file and CLI before
/// the pipeline starts.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInfo {
    /// Group identifier
    pub group_id: String,

    /// Artifact identifier (also submitted as the service name)
    pub artifact_id: String,

    /// Version string of the built artifact
    pub version: String,

    /// Human-readable description, empty string is submitted when absent
    pub description: Option<String>,

    /// Project base directory, used to resolve the default SBOM path
    pub base_dir: PathBuf,
}

impl ProjectInfo {
    /// Catalog service identifier: `{groupId}.{artifactId}`
    pub fn service_id(&self) -> String {
        format!("{}.{}", self.group_id, self.artifact_id)
    }
}
