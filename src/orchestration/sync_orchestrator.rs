//! Sync Orchestrator - Sequences the catalog publish pipeline
//!
//! Runs the full chain for one build: endpoint resolution, SBOM lookup,
//! snapshot gating, token exchange, metadata composition, and registration
//! submission. Every failure raised anywhere in the chain is caught exactly
//! once here and reduced to a warning: relaying build data to the catalog
//! is best-effort and must never fail the host build.

use crate::catalog::endpoints::CatalogEndpoints;
use crate::catalog::service_publisher::{PublishOutcome, RegistrationRequest, ServicePublisher};
use crate::core::config::{ProjectInfo, SyncConfig};
use crate::core::error::SyncError;
use crate::security::token_client::TokenClient;
use crate::validation::metadata_composer::MetadataComposer;
use crate::validation::sbom_locator::SbomLocator;
use crate::validation::snapshot_gate::SnapshotGate;
use reqwest::Client;
use secrecy::SecretString;
use std::time::Instant;

/// Report returned after one sync invocation
///
/// Produced fresh per build and discarded with the process; there is no
/// state carried across invocations.
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Whether the catalog accepted the registration
    pub published: bool,

    /// Whether the snapshot gate stopped the pipeline before any network call
    pub skipped: bool,

    /// Response classification when the discovery endpoint was reached
    pub outcome: Option<PublishOutcome>,

    /// Everything that went wrong, already reduced to warnings
    pub warnings: Vec<String>,

    /// Wall-clock duration of the invocation
    pub duration_ms: u64,
}

/// Result of the pipeline steps before warning reduction
enum PipelineResult {
    /// The snapshot gate decided not to relay this build
    Skipped,

    /// The registration request was submitted and classified
    Completed(PublishOutcome),
}

/// Main orchestrator for one catalog sync invocation
pub struct SyncOrchestrator {
    config: SyncConfig,
    project: ProjectInfo,
}

impl SyncOrchestrator {
    /// Create a new SyncOrchestrator
    ///
    /// # Arguments
    ///
    /// * `config` - Resolved configuration (connection settings, gating, metadata)
    /// * `project` - Resolved project identity
    pub fn new(config: SyncConfig, project: ProjectInfo) -> Self {
        Self { config, project }
    }

    /// Run the publish pipeline
    ///
    /// Infallible by type: any pipeline error is logged as a warning and
    /// recorded in the report, and the host build proceeds either way.
    pub async fn run(&self) -> SyncReport {
        let start_time = Instant::now();
        let mut warnings = Vec::new();

        println!("🔄 vsm-sync execution begins");
        println!("-----------------------------------------------------------------------");

        let result = self.execute(&mut warnings).await;

        let (published, skipped, outcome) = match result {
            Ok(PipelineResult::Skipped) => (false, true, None),
            Ok(PipelineResult::Completed(outcome)) => (outcome.success, false, Some(outcome)),
            Err(e) => {
                println!("⚠️  Problem relaying build data to the catalog: {}", e);
                for action in e.suggested_actions() {
                    println!("   - {}", action);
                }
                warnings.push(format!("[{}] {}", e.code(), e));
                (false, false, None)
            }
        };

        SyncReport {
            published,
            skipped,
            outcome,
            warnings,
            duration_ms: start_time.elapsed().as_millis() as u64,
        }
    }

    /// Execute the pipeline steps in order
    async fn execute(&self, warnings: &mut Vec<String>) -> Result<PipelineResult, SyncError> {
        // 1. Resolve endpoints
        let api_token =
            SecretString::new(self.config.api_token.clone().unwrap_or_default().into());
        let endpoints = CatalogEndpoints::new(
            self.config.region.as_deref().unwrap_or_default(),
            self.config.host.as_deref().unwrap_or_default(),
            &api_token,
        );

        // 2. Locate the optional SBOM attachment
        let locator = SbomLocator::new();
        let sbom = locator
            .locate(self.config.sbom_path.as_deref(), &self.project.base_dir)
            .await?;
        match &sbom {
            Some(sbom) => println!("   SBOM found at {}", sbom.path.display()),
            None => {
                let resolved = locator
                    .resolve_path(self.config.sbom_path.as_deref(), &self.project.base_dir);
                println!("   SBOM not found at '{}' SKIPPING attachment", resolved.display());
            }
        }

        // 3. Snapshot gate
        let gate = SnapshotGate::new();
        if !gate.should_publish(&self.project.version, self.config.skip_snapshot()) {
            println!("------------------------------------------------");
            println!("⏭️  ***SKIPPING*** relaying build data to the catalog");
            println!("------------------------------------------------");
            return Ok(PipelineResult::Skipped);
        }

        println!("   Project version is {}", self.project.version);
        println!("   skipSnapshot is set to {}", self.config.skip_snapshot());

        // 4. Bearer token exchange
        let client = Client::new();
        println!("🔐 Requesting bearer token...");
        let token = TokenClient::new()
            .fetch_bearer_token(&client, &endpoints)
            .await?;
        println!("   Token {} obtained", token.masked());

        // 5. Compose metadata
        let data = MetadataComposer::new().compose(self.config.data(), &self.project.version)?;

        // 6. Submit the registration
        let request = RegistrationRequest {
            service_id: self.project.service_id(),
            source_type: self.config.source_type().to_string(),
            source_instance: self.config.source_instance().to_string(),
            name: self.project.artifact_id.clone(),
            description: self.project.description.clone(),
            data,
            sbom,
        };

        println!("📤 Registering service {} ...", request.service_id);
        let outcome = ServicePublisher::new()
            .publish(&client, &endpoints, &token, &request)
            .await?;

        if outcome.success {
            println!(
                "   ✅ Catalog accepted the registration (HTTP {})",
                outcome.http_status
            );
        } else {
            println!(
                "   ⚠️  FAILURE to post to the catalog, got response code: {} and message: {}",
                outcome.http_status, outcome.message
            );
            warnings.push(format!(
                "catalog rejected the registration: HTTP {} {}",
                outcome.http_status, outcome.message
            ));
        }

        Ok(PipelineResult::Completed(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SyncConfig;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn project(version: &str, base_dir: PathBuf) -> ProjectInfo {
        ProjectInfo {
            group_id: "com.acme".to_string(),
            artifact_id: "billing-service".to_string(),
            version: version.to_string(),
            description: Some("Billing backend".to_string()),
            base_dir,
        }
    }

    #[tokio::test]
    async fn test_snapshot_build_is_skipped_without_network() {
        let temp_dir = TempDir::new().unwrap();
        // No region/host/token configured: any network attempt would fail,
        // so a clean skipped report proves the gate stopped the pipeline.
        let config = SyncConfig::default();
        let orchestrator = SyncOrchestrator::new(
            config,
            project("1.0.0-SNAPSHOT", temp_dir.path().to_path_buf()),
        );

        let report = orchestrator.run().await;

        assert!(report.skipped);
        assert!(!report.published);
        assert!(report.outcome.is_none());
        assert!(report.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_build_publishes_when_skip_disabled() {
        let temp_dir = TempDir::new().unwrap();
        // The space makes the token URL invalid, so the exchange fails
        // before any network traffic.
        let config = SyncConfig {
            host: Some("bad host".to_string()),
            skip_snapshot: Some(false),
            ..Default::default()
        };
        let orchestrator = SyncOrchestrator::new(
            config,
            project("1.0.0-SNAPSHOT", temp_dir.path().to_path_buf()),
        );

        let report = orchestrator.run().await;

        // The gate lets it through; the failed token exchange is reduced
        // to a warning.
        assert!(!report.skipped);
        assert!(!report.published);
        assert_eq!(report.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_pipeline_failure_never_escapes_run() {
        let temp_dir = TempDir::new().unwrap();
        // An invalid token URL fails the exchange without any network
        // traffic; the failure must come back as a warning, not a panic
        // or an Err.
        let config = SyncConfig {
            region: Some("eu".to_string()),
            host: Some("bad host".to_string()),
            api_token: Some("token".to_string()),
            ..Default::default()
        };
        let orchestrator =
            SyncOrchestrator::new(config, project("1.0.0", temp_dir.path().to_path_buf()));

        let report = orchestrator.run().await;

        assert!(!report.published);
        assert!(!report.skipped);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("TOKEN_EXCHANGE"));
    }
}
