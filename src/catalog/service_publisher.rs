//! Service registration submission
//!
//! Builds the multipart registration request (service identity, metadata,
//! optional SBOM attachment) and submits it to the catalog discovery
//! endpoint with a bearer token. A non-2xx response is classified into a
//! failed outcome, not raised as an error: only transport-level failures
//! abort the submission.

use crate::catalog::endpoints::CatalogEndpoints;
use crate::core::error::SyncError;
use crate::security::token_client::BearerToken;
use crate::validation::sbom_locator::SbomFile;
use reqwest::Client;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};

/// Content type of the SBOM attachment
const SBOM_MIME: &str = "application/json";

/// Registration request describing the built artifact
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationRequest {
    /// Catalog service identifier: `{groupId}.{artifactId}`
    pub service_id: String,

    /// Kind of source being registered (e.g. "rust")
    pub source_type: String,

    /// Tool instance that produced the registration
    pub source_instance: String,

    /// Service display name (the artifact identifier)
    pub name: String,

    /// Project description, submitted as an empty string when absent
    pub description: Option<String>,

    /// Composed metadata JSON, always an object carrying `version`
    pub data: String,

    /// Optional SBOM attachment, already read into memory
    pub sbom: Option<SbomFile>,
}

impl RegistrationRequest {
    /// Effective description form part: empty string when absent or blank
    pub fn description_or_empty(&self) -> &str {
        match self.description.as_deref() {
            Some(description) if !description.trim().is_empty() => description,
            _ => "",
        }
    }
}

/// Outcome of a registration submission
///
/// Produced once per invocation; never retried or merged with prior
/// outcomes. A failed outcome is reported as a warning by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishOutcome {
    /// Whether the catalog accepted the registration
    pub success: bool,

    /// HTTP status returned by the discovery endpoint
    pub http_status: u16,

    /// Response body, useful when the catalog rejects the submission
    pub message: String,
}

impl PublishOutcome {
    /// Classify a discovery response: any status above 299 is a failure
    pub fn classify(http_status: u16, message: String) -> Self {
        Self {
            success: http_status <= 299,
            http_status,
            message,
        }
    }
}

/// Publisher for the catalog discovery endpoint
#[derive(Default)]
pub struct ServicePublisher;

impl ServicePublisher {
    /// Create a new ServicePublisher
    pub fn new() -> Self {
        Self
    }

    /// Submit the registration request with the given bearer token
    pub async fn publish(
        &self,
        client: &Client,
        endpoints: &CatalogEndpoints,
        token: &BearerToken,
        request: &RegistrationRequest,
    ) -> Result<PublishOutcome, SyncError> {
        let form = Self::build_form(request)?;

        let response = client
            .post(&endpoints.discovery_url)
            .header(ACCEPT, "*/*")
            .bearer_auth(token.expose())
            .multipart(form)
            .send()
            .await
            .map_err(|e| SyncError::Registration {
                message: e.to_string(),
            })?;

        let http_status = response.status().as_u16();
        let message = response.text().await.map_err(|e| SyncError::Registration {
            message: e.to_string(),
        })?;

        Ok(PublishOutcome::classify(http_status, message))
    }

    /// Build the multipart form body
    ///
    /// The `bom` part is only attached when an SBOM file was located.
    fn build_form(request: &RegistrationRequest) -> Result<Form, SyncError> {
        let mut form = Form::new()
            .text("id", request.service_id.clone())
            .text("sourceType", request.source_type.clone())
            .text("sourceInstance", request.source_instance.clone())
            .text("name", request.name.clone())
            .text("description", request.description_or_empty().to_string())
            .text("data", request.data.clone());

        if let Some(sbom) = &request.sbom {
            let part = Part::bytes(sbom.content.clone())
                .file_name(sbom.file_name.clone())
                .mime_str(SBOM_MIME)
                .map_err(|e| SyncError::Registration {
                    message: e.to_string(),
                })?;
            form = form.part("bom", part);
        }

        Ok(form)
    }
}
