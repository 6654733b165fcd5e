//! vsm-sync CLI
//!
//! Relays a build's identity, metadata, and SBOM to the service catalog

use anyhow::Result;
use clap::{Parser, Subcommand};
use secrecy::SecretString;
use std::path::PathBuf;
use std::process;
use vsm_sync::{
    CatalogEndpoints, ConfigLoadOptions, ConfigLoader, ProjectInfo, ProjectSection, SbomLocator,
    SnapshotGate, SyncConfig, SyncOrchestrator,
};

/// Relay build metadata and SBOM to the service catalog
#[derive(Parser)]
#[command(name = "vsm-sync")]
#[command(version = "0.1.0")]
#[command(about = "Relay build metadata and SBOM to the service catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Relay the current build to the catalog
    Sync {
        /// Project path (defaults to current directory)
        #[arg(value_name = "PROJECT_PATH")]
        project_path: Option<PathBuf>,

        /// Hosting region of the workspace (eu|de|us|au|ca|ch)
        #[arg(long)]
        region: Option<String>,

        /// DNS host of the workspace
        #[arg(long)]
        host: Option<String>,

        /// Admin technical user API token
        #[arg(long)]
        api_token: Option<String>,

        /// SBOM path (defaults to {project}/target/bom.json)
        #[arg(long)]
        sbom_path: Option<PathBuf>,

        /// Whether snapshot versions are skipped (default: true)
        #[arg(long)]
        skip_snapshot: Option<bool>,

        /// Metadata in a simple {"key":"value"} JSON format
        #[arg(long)]
        data: Option<String>,

        /// Source type label
        #[arg(long)]
        source_type: Option<String>,

        /// Source instance label
        #[arg(long)]
        source_instance: Option<String>,

        /// Project group identifier
        #[arg(long)]
        group_id: Option<String>,

        /// Project artifact identifier
        #[arg(long)]
        artifact_id: Option<String>,

        /// Project version string
        #[arg(long)]
        project_version: Option<String>,

        /// Project description
        #[arg(long)]
        description: Option<String>,
    },

    /// Validate configuration and show the publish decision, no network calls
    Check {
        /// Project path (defaults to current directory)
        #[arg(value_name = "PROJECT_PATH")]
        project_path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let result = run().await;

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("\n❌ Error");
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sync {
            project_path,
            region,
            host,
            api_token,
            sbom_path,
            skip_snapshot,
            data,
            source_type,
            source_instance,
            group_id,
            artifact_id,
            project_version,
            description,
        } => {
            let path = project_path.unwrap_or_else(|| PathBuf::from("."));

            let overrides = SyncConfig {
                region,
                host,
                api_token,
                sbom_path,
                skip_snapshot,
                data,
                source_type,
                source_instance,
                project: Some(ProjectSection {
                    group_id,
                    artifact_id,
                    version: project_version,
                    description,
                }),
            };

            sync_command(path, overrides).await
        }
        Commands::Check { project_path } => {
            let path = project_path.unwrap_or_else(|| PathBuf::from("."));
            check_command(path).await
        }
    }
}

async fn sync_command(project_path: PathBuf, overrides: SyncConfig) -> Result<i32> {
    println!("\n📦 vsm-sync\n");

    let config = match load_config(&project_path, Some(overrides)).await {
        Ok(config) => config,
        Err(e) => {
            // Relaying is best-effort: a broken configuration is warned
            // about and the host build proceeds.
            eprintln!("⚠️  {}", e);
            return Ok(0);
        }
    };

    let validation = ConfigLoader::validate(&config);
    if !validation.valid {
        eprintln!("⚠️  Configuration incomplete, skipping catalog sync:");
        for error in &validation.errors {
            eprintln!("  - [{}] {}", error.field, error.message);
        }
        return Ok(0);
    }

    let project = resolve_project(&config, project_path);
    let orchestrator = SyncOrchestrator::new(config, project);
    let report = orchestrator.run().await;

    println!();
    if report.skipped {
        println!("⏭️  Skipped (snapshot version, skipSnapshot=true)");
    } else if report.published {
        println!("✅ Build data relayed to the catalog ({} ms)", report.duration_ms);
    } else {
        println!("⚠️  Build data was not relayed");
        for warning in &report.warnings {
            eprintln!("  - {}", warning);
        }
    }

    // The host build is never failed by this step
    Ok(0)
}

async fn check_command(project_path: PathBuf) -> Result<i32> {
    println!("\n🔍 Configuration check\n");

    let config = match load_config(&project_path, None).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            return Ok(1);
        }
    };

    let validation = ConfigLoader::validate(&config);

    if !validation.errors.is_empty() {
        println!("❌ Errors:");
        for error in &validation.errors {
            println!("  - [{}] {}", error.field, error.message);
        }
    }
    if !validation.warnings.is_empty() {
        println!("⚠️  Warnings:");
        for warning in &validation.warnings {
            println!("  - [{}] {}", warning.field, warning.message);
        }
    }
    if !validation.valid {
        println!();
        return Ok(1);
    }

    println!("✅ Configuration is valid\n");

    let project = resolve_project(&config, project_path);

    let endpoints = CatalogEndpoints::new(
        config.region.as_deref().unwrap_or_default(),
        config.host.as_deref().unwrap_or_default(),
        &SecretString::new(config.api_token.clone().unwrap_or_default().into()),
    );
    println!("  Token endpoint:     {}", endpoints.token_url);
    println!("  Discovery endpoint: {}", endpoints.discovery_url);
    println!("  Service id:         {}", project.service_id());

    let gate = SnapshotGate::new();
    if gate.should_publish(&project.version, config.skip_snapshot()) {
        println!("  Gate decision:      publish (version {})", project.version);
    } else {
        println!("  Gate decision:      skip (snapshot version {})", project.version);
    }

    let locator = SbomLocator::new();
    let resolved = locator.resolve_path(config.sbom_path.as_deref(), &project.base_dir);
    if resolved.exists() {
        println!("  SBOM:               {}", resolved.display());
    } else {
        println!("  SBOM:               not found at {} (will be omitted)", resolved.display());
    }

    println!();
    Ok(0)
}

async fn load_config(
    project_path: &PathBuf,
    overrides: Option<SyncConfig>,
) -> Result<SyncConfig, vsm_sync::SyncError> {
    let options = ConfigLoadOptions {
        project_path: project_path.clone(),
        cli_args: overrides,
        env: std::env::vars().collect(),
    };

    ConfigLoader::load(options).await
}

/// Build the resolved project identity from a validated configuration
fn resolve_project(config: &SyncConfig, base_dir: PathBuf) -> ProjectInfo {
    let section = config.project.clone().unwrap_or_default();

    ProjectInfo {
        group_id: section.group_id.unwrap_or_default(),
        artifact_id: section.artifact_id.unwrap_or_default(),
        version: section.version.unwrap_or_default(),
        description: section.description,
        base_dir,
    }
}
