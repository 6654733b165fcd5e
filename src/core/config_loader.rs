//! Configuration file loader for vsm-sync
//!
//! This module provides configuration loading, validation, and merging
//! capabilities.

use super::config::{ProjectSection, SyncConfig};
use crate::core::error::SyncError;
use regex::Regex;
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Configuration file name
const CONFIG_FILENAME: &str = ".vsm-sync.yaml";

/// Environment variable pattern (${VAR_NAME})
const ENV_VAR_PATTERN: &str = r"\$\{([A-Z_][A-Z0-9_]*)\}";

/// Configuration load options
#[derive(Debug, Clone)]
pub struct ConfigLoadOptions {
    /// Project path to load config from
    pub project_path: PathBuf,

    /// CLI arguments (highest priority)
    pub cli_args: Option<SyncConfig>,

    /// Environment variables
    pub env: HashMap<String, String>,
}

/// Configuration validation result
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationResult {
    /// Is configuration valid?
    pub valid: bool,

    /// Validation errors
    pub errors: Vec<ConfigValidationError>,

    /// Validation warnings
    pub warnings: Vec<ConfigValidationWarning>,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Field path (e.g., "project.groupId")
    pub field: String,

    /// Error message
    pub message: String,
}

/// Configuration validation warning
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationWarning {
    /// Field path
    pub field: String,

    /// Warning message
    pub message: String,
}

/// Configuration file loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from multiple sources with priority
    ///
    /// Priority (high to low):
    /// 1. CLI arguments
    /// 2. Environment variables
    /// 3. Project config (./.vsm-sync.yaml)
    /// 4. Global config (~/.vsm-sync.yaml)
    /// 5. Default values
    pub async fn load(options: ConfigLoadOptions) -> Result<SyncConfig, SyncError> {
        let mut configs: Vec<SyncConfig> = Vec::new();

        // 5. Default values (lowest priority)
        configs.push(SyncConfig::default());

        // 4. Global config
        if let Some(global_config) = Self::load_global_config().await? {
            configs.push(global_config);
        }

        // 3. Project config
        if let Some(project_config) = Self::load_project_config(&options.project_path).await? {
            configs.push(project_config);
        }

        // 2. Environment variables
        if let Some(env_config) = Self::load_env_config(&options.env) {
            configs.push(env_config);
        }

        // 1. CLI arguments (highest priority)
        if let Some(cli_config) = options.cli_args {
            configs.push(cli_config);
        }

        // Merge all configs
        let merged_config = Self::merge_configs(configs);

        // Expand environment variables
        Ok(Self::expand_env_vars(merged_config, &options.env))
    }

    /// Load global configuration from ~/.vsm-sync.yaml
    async fn load_global_config() -> Result<Option<SyncConfig>, SyncError> {
        let Ok(home_dir) = env::var("HOME") else {
            return Ok(None);
        };
        let global_config_path = PathBuf::from(home_dir).join(CONFIG_FILENAME);

        Self::load_config_file(&global_config_path).await
    }

    /// Load project configuration from ./.vsm-sync.yaml
    async fn load_project_config(project_path: &Path) -> Result<Option<SyncConfig>, SyncError> {
        let project_config_path = project_path.join(CONFIG_FILENAME);

        Self::load_config_file(&project_config_path).await
    }

    /// Load configuration from YAML file
    async fn load_config_file(file_path: &Path) -> Result<Option<SyncConfig>, SyncError> {
        if !file_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(file_path)
            .await
            .map_err(|e| SyncError::ConfigLoad {
                message: format!("Failed to read config file: {}", e),
            })?;

        let config: SyncConfig =
            serde_yaml::from_str(&content).map_err(|e| SyncError::ConfigLoad {
                message: format!("Failed to parse YAML config: {}", e),
            })?;

        Ok(Some(config))
    }

    /// Load configuration from environment variables
    fn load_env_config(env: &HashMap<String, String>) -> Option<SyncConfig> {
        let mut config = SyncConfig::default();
        let mut has_changes = false;

        if let Some(region) = env.get("VSM_SYNC_REGION") {
            config.region = Some(region.clone());
            has_changes = true;
        }

        if let Some(host) = env.get("VSM_SYNC_HOST") {
            config.host = Some(host.clone());
            has_changes = true;
        }

        if let Some(token) = env.get("VSM_SYNC_API_TOKEN") {
            config.api_token = Some(token.clone());
            has_changes = true;
        }

        if let Some(skip) = env.get("VSM_SYNC_SKIP_SNAPSHOT") {
            match skip.as_str() {
                "true" => {
                    config.skip_snapshot = Some(true);
                    has_changes = true;
                }
                "false" => {
                    config.skip_snapshot = Some(false);
                    has_changes = true;
                }
                _ => {}
            }
        }

        if has_changes { Some(config) } else { None }
    }

    /// Merge multiple configurations with priority
    fn merge_configs(configs: Vec<SyncConfig>) -> SyncConfig {
        let mut result = SyncConfig::default();

        for config in configs {
            Self::merge_into(&mut result, config);
        }

        result
    }

    /// Merge source config into target
    fn merge_into(target: &mut SyncConfig, source: SyncConfig) {
        if source.region.is_some() {
            target.region = source.region;
        }
        if source.host.is_some() {
            target.host = source.host;
        }
        if source.api_token.is_some() {
            target.api_token = source.api_token;
        }
        if source.sbom_path.is_some() {
            target.sbom_path = source.sbom_path;
        }
        if source.skip_snapshot.is_some() {
            target.skip_snapshot = source.skip_snapshot;
        }
        if source.data.is_some() {
            target.data = source.data;
        }
        if source.source_type.is_some() {
            target.source_type = source.source_type;
        }
        if source.source_instance.is_some() {
            target.source_instance = source.source_instance;
        }

        // Project section merges field by field
        if let Some(source_project) = source.project {
            let target_project = target.project.get_or_insert(ProjectSection::default());

            if source_project.group_id.is_some() {
                target_project.group_id = source_project.group_id;
            }
            if source_project.artifact_id.is_some() {
                target_project.artifact_id = source_project.artifact_id;
            }
            if source_project.version.is_some() {
                target_project.version = source_project.version;
            }
            if source_project.description.is_some() {
                target_project.description = source_project.description;
            }
        }
    }

    /// Expand environment variables in configuration
    ///
    /// Only the fields likely to carry secrets or computed values are
    /// expanded: the API token and the metadata payload.
    fn expand_env_vars(mut config: SyncConfig, env: &HashMap<String, String>) -> SyncConfig {
        if let Some(token) = &config.api_token {
            config.api_token = Some(Self::expand_string(token, env));
        }
        if let Some(data) = &config.data {
            config.data = Some(Self::expand_string(data, env));
        }

        config
    }

    /// Expand environment variables in a single string
    fn expand_string(input: &str, env: &HashMap<String, String>) -> String {
        let env_var_regex = Regex::new(ENV_VAR_PATTERN).unwrap();

        let mut result = input.to_string();
        for cap in env_var_regex.captures_iter(input) {
            let var_name = &cap[1];

            if let Some(value) = env.get(var_name) {
                result = result.replace(&format!("${{{}}}", var_name), value);
            } else {
                eprintln!("⚠️  Environment variable {} not found", var_name);
            }
        }

        result
    }

    /// Validate configuration before any network use
    pub fn validate(config: &SyncConfig) -> ConfigValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if config.region.as_deref().unwrap_or("").is_empty() {
            errors.push(ConfigValidationError {
                field: "region".to_string(),
                message: "region is required (e.g. eu, de, us, au, ca, ch)".to_string(),
            });
        }

        if config.host.as_deref().unwrap_or("").is_empty() {
            errors.push(ConfigValidationError {
                field: "host".to_string(),
                message: "host is required (the workspace DNS host)".to_string(),
            });
        }

        if config.api_token.as_deref().unwrap_or("").is_empty() {
            errors.push(ConfigValidationError {
                field: "apiToken".to_string(),
                message: "apiToken is required (set VSM_SYNC_API_TOKEN or use ${VAR} expansion)"
                    .to_string(),
            });
        }

        match &config.project {
            None => {
                errors.push(ConfigValidationError {
                    field: "project".to_string(),
                    message: "project identity (groupId, artifactId, version) is required"
                        .to_string(),
                });
            }
            Some(project) => {
                for (field, value) in [
                    ("project.groupId", &project.group_id),
                    ("project.artifactId", &project.artifact_id),
                    ("project.version", &project.version),
                ] {
                    if value.as_deref().unwrap_or("").is_empty() {
                        errors.push(ConfigValidationError {
                            field: field.to_string(),
                            message: format!("{} is required", field),
                        });
                    }
                }

                if project.description.as_deref().unwrap_or("").is_empty() {
                    warnings.push(ConfigValidationWarning {
                        field: "project.description".to_string(),
                        message: "description is empty, an empty string will be submitted"
                            .to_string(),
                    });
                }
            }
        }

        // Surface malformed metadata before the pipeline runs
        if serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(config.data())
            .is_err()
        {
            errors.push(ConfigValidationError {
                field: "data".to_string(),
                message: "data must be a JSON object, e.g. {\"team\":\"platform\"}".to_string(),
            });
        }

        ConfigValidationResult {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}
