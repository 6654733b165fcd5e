//! Bearer token acquisition with memory-safe handling and masking
//!
//! This module performs the OAuth2 client-credentials exchange against the
//! catalog token endpoint, using the `secrecy` crate to prevent accidental
//! token exposure in logs or memory dumps. The token is short-lived, used
//! exactly once per invocation, and never persisted.

use crate::catalog::endpoints::CatalogEndpoints;
use crate::core::error::SyncError;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};

/// Form-encoded body of the client-credentials exchange
const GRANT_BODY: &str = "grant_type=client_credentials";

/// Key of the consumed field in the token response
const ACCESS_TOKEN_KEY: &str = "access_token";

/// Opaque bearer token, owned solely by the current publish attempt
pub struct BearerToken(SecretString);

impl BearerToken {
    /// Wrap an already-acquired token
    pub fn new(token: SecretString) -> Self {
        Self(token)
    }

    /// Expose the raw token string for the Authorization header
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Masked rendering for safe logging
    pub fn masked(&self) -> String {
        mask_token(self.0.expose_secret())
    }
}

/// Client for the catalog token endpoint
#[derive(Default)]
pub struct TokenClient;

impl TokenClient {
    /// Create a new TokenClient
    pub fn new() -> Self {
        Self
    }

    /// Exchange the encoded credential for a bearer token
    ///
    /// Sends a single POST to the token endpoint with the Basic credential.
    /// A response status above 299 is fatal to the whole publish attempt;
    /// there is no fallback and no retry.
    pub async fn fetch_bearer_token(
        &self,
        client: &Client,
        endpoints: &CatalogEndpoints,
    ) -> Result<BearerToken, SyncError> {
        let response = client
            .post(&endpoints.token_url)
            .header(
                AUTHORIZATION,
                format!("Basic {}", endpoints.encoded_credential.expose_secret()),
            )
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(GRANT_BODY)
            .send()
            .await
            .map_err(|e| SyncError::TokenExchange {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if status > 299 {
            return Err(SyncError::AuthenticationFailed { status });
        }

        let body = response.text().await.map_err(|e| SyncError::TokenExchange {
            message: e.to_string(),
        })?;

        let token = extract_access_token(&body)?;
        Ok(BearerToken(SecretString::new(token.into())))
    }
}

/// Extract the `access_token` field from the token response body
///
/// A response without the field is rejected instead of being passed
/// downstream as an empty token: the catalog would reject the follow-up
/// request anyway, and failing here names the actual problem.
fn extract_access_token(body: &str) -> Result<String, SyncError> {
    let response: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(body).map_err(|e| SyncError::TokenExchange {
            message: format!("failed to decode token response: {}", e),
        })?;

    match response.get(ACCESS_TOKEN_KEY).and_then(|v| v.as_str()) {
        Some(token) => Ok(token.to_string()),
        None => Err(SyncError::TokenExchange {
            message: format!("token response has no {} field", ACCESS_TOKEN_KEY),
        }),
    }
}

/// Masks a token for safe logging
///
/// Shows only the first 3 and last 3 characters for identification.
/// Tokens shorter than 10 characters are fully masked as "****".
pub fn mask_token(token: &str) -> String {
    if token.is_empty() || token.len() < 10 {
        return "****".to_string();
    }

    let prefix = &token[..3];
    let suffix = &token[token.len() - 3..];
    format!("{}...{}", prefix, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tiny_http::{Response, Server};

    fn local_endpoints(addr: &str) -> CatalogEndpoints {
        CatalogEndpoints {
            token_url: format!("http://{}", addr),
            discovery_url: format!("http://{}", addr),
            encoded_credential: SecretString::new("ZmFrZQ==".into()),
        }
    }

    #[tokio::test]
    async fn test_fetch_bearer_token_sends_credentials_grant() {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_string();

        let handle = std::thread::spawn(move || {
            let mut request = server.recv().unwrap();
            let mut body = String::new();
            request.as_reader().read_to_string(&mut body).unwrap();
            let auth = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("authorization"))
                .map(|h| h.value.to_string());
            request
                .respond(Response::from_string(
                    r#"{"access_token":"abcdef123456","token_type":"bearer"}"#,
                ))
                .unwrap();
            (body, auth)
        });

        let client = Client::new();
        let token = TokenClient::new()
            .fetch_bearer_token(&client, &local_endpoints(&addr))
            .await
            .unwrap();

        let (body, auth) = handle.join().unwrap();
        assert_eq!(token.expose(), "abcdef123456");
        assert_eq!(body, "grant_type=client_credentials");
        assert_eq!(auth.as_deref(), Some("Basic ZmFrZQ=="));
    }

    #[tokio::test]
    async fn test_fetch_bearer_token_401_is_authentication_failed() {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_string();

        let handle = std::thread::spawn(move || {
            let request = server.recv().unwrap();
            request
                .respond(Response::from_string("unauthorized").with_status_code(401))
                .unwrap();
        });

        let client = Client::new();
        let result = TokenClient::new()
            .fetch_bearer_token(&client, &local_endpoints(&addr))
            .await;

        handle.join().unwrap();
        assert!(matches!(
            result,
            Err(SyncError::AuthenticationFailed { status: 401 })
        ));
    }

    #[tokio::test]
    async fn test_fetch_bearer_token_unreachable_endpoint_is_token_exchange() {
        let client = Client::new();
        // Invalid URL, fails before any network traffic
        let endpoints = CatalogEndpoints {
            token_url: "http://bad host/token".to_string(),
            discovery_url: String::new(),
            encoded_credential: SecretString::new("x".into()),
        };

        let result = TokenClient::new()
            .fetch_bearer_token(&client, &endpoints)
            .await;

        assert!(matches!(result, Err(SyncError::TokenExchange { .. })));
    }

    #[test]
    fn test_extract_access_token_from_valid_response() {
        let body = r#"{"access_token":"abc-123","token_type":"bearer","expires_in":3600}"#;
        let token = extract_access_token(body).unwrap();
        assert_eq!(token, "abc-123");
    }

    #[test]
    fn test_extract_access_token_missing_key_is_error() {
        let body = r#"{"token_type":"bearer"}"#;
        let result = extract_access_token(body);

        assert!(matches!(result, Err(SyncError::TokenExchange { .. })));
        assert!(result.unwrap_err().to_string().contains("access_token"));
    }

    #[test]
    fn test_extract_access_token_non_string_value_is_error() {
        let body = r#"{"access_token":42}"#;
        assert!(matches!(
            extract_access_token(body),
            Err(SyncError::TokenExchange { .. })
        ));
    }

    #[test]
    fn test_extract_access_token_invalid_json_is_error() {
        assert!(matches!(
            extract_access_token("<html>not json</html>"),
            Err(SyncError::TokenExchange { .. })
        ));
    }

    #[test]
    fn test_extract_access_token_non_object_body_is_error() {
        assert!(matches!(
            extract_access_token(r#"["access_token"]"#),
            Err(SyncError::TokenExchange { .. })
        ));
    }

    #[test]
    fn test_mask_token_with_short_token() {
        assert_eq!(mask_token("short"), "****");
        assert_eq!(mask_token(""), "****");
    }

    #[test]
    fn test_mask_token_with_long_token() {
        assert_eq!(mask_token("abcdef123456"), "abc...456");
        assert_eq!(mask_token("very-long-token-string"), "ver...ing");
    }

    #[test]
    fn test_bearer_token_masked_rendering() {
        let token = BearerToken(SecretString::new("abcdef123456".into()));
        assert_eq!(token.masked(), "abc...456");
        assert_eq!(token.expose(), "abcdef123456");
    }
}
