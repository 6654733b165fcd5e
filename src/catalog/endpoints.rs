//! Catalog endpoint resolution
//!
//! Resolves the two service URLs and the encoded Basic credential from the
//! region, host, and API token configuration. Pure string composition, no
//! validation of region or host contents: malformed values simply produce
//! URLs that fail downstream with a network or 4xx error.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use secrecy::{ExposeSecret, SecretString};

/// Prefix combined with the API token before encoding
const API_TOKEN_PREFIX: &str = "apitoken:";

/// Resolved catalog endpoints for one invocation
///
/// Immutable once constructed. The encoded credential is held as a secret
/// so it never shows up in Debug output or logs.
pub struct CatalogEndpoints {
    /// OAuth2 token endpoint
    pub token_url: String,

    /// Service discovery/registration endpoint
    pub discovery_url: String,

    /// base64("apitoken:" + apiToken), used as the Basic credential
    pub encoded_credential: SecretString,
}

impl CatalogEndpoints {
    /// Resolve endpoints from the workspace region, host, and API token
    pub fn new(region: &str, host: &str, api_token: &SecretString) -> Self {
        let token_url = format!("https://{}.leanix.net/services/mtm/v1/oauth2/token", host);
        let discovery_url = format!(
            "https://{}-vsm.leanix.net/services/vsm/discovery/v1/service",
            region
        );
        let encoded_credential = SecretString::new(
            BASE64
                .encode(format!("{}{}", API_TOKEN_PREFIX, api_token.expose_secret()))
                .into(),
        );

        Self {
            token_url,
            discovery_url,
            encoded_credential,
        }
    }
}
