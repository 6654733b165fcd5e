//! Error handling for catalog synchronization
//!
//! This module provides the typed error taxonomy for the publish pipeline
//! using the thiserror crate for ergonomic error handling. Every failure
//! raised inside the pipeline is caught exactly once at the orchestrator
//! boundary and reported as a warning.

use thiserror::Error;

/// Main error type for catalog synchronization operations
#[derive(Error, Debug)]
pub enum SyncError {
    // Configuration errors
    #[error("設定ファイルの読み込みに失敗しました: {message}")]
    ConfigLoad { message: String },

    #[error("メタデータJSONの解析に失敗しました: {message}")]
    InvalidMetadata { message: String },

    // Authentication errors
    #[error("ベアラートークンの取得に失敗しました（HTTP {status}）")]
    AuthenticationFailed { status: u16 },

    #[error("トークンエンドポイントとの通信に失敗しました: {message}")]
    TokenExchange { message: String },

    // Submission errors
    #[error("サービスカタログへの送信に失敗しました: {message}")]
    Registration { message: String },

    // SBOM file errors
    #[error("SBOMファイルの読み込みに失敗しました（{path}）: {message}")]
    SbomAccess { path: String, message: String },
}

impl SyncError {
    /// Check if this error occurred before any data reached the catalog
    ///
    /// Authentication and configuration errors abort the attempt before
    /// the registration endpoint is ever contacted.
    pub fn is_pre_submission(&self) -> bool {
        !matches!(self, Self::Registration { .. })
    }

    /// Get suggested actions for this error
    pub fn suggested_actions(&self) -> Vec<&'static str> {
        match self {
            Self::ConfigLoad { .. } => vec![
                ".vsm-sync.yamlの構文を確認してください",
                "設定ファイルのアクセス権限を確認してください",
            ],
            Self::InvalidMetadata { .. } => {
                vec!["dataパラメータが {\"key\":\"value\"} 形式のJSONオブジェクトか確認してください"]
            }
            Self::AuthenticationFailed { .. } => vec![
                "APIトークンを確認してください",
                "host設定がワークスペースのDNSホストと一致しているか確認してください",
                "トークンの有効期限を確認してください",
            ],
            Self::TokenExchange { .. } => vec![
                "ネットワーク接続を確認してください",
                "host設定を確認してください",
            ],
            Self::Registration { .. } => vec![
                "ネットワーク接続を確認してください",
                "region設定を確認してください",
                "カタログサービスのステータスを確認してください",
            ],
            Self::SbomAccess { .. } => vec![
                "SBOMファイルのアクセス権限を確認してください",
                "sbomPathの指定を確認してください",
            ],
        }
    }

    /// Get error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigLoad { .. } => "CONFIG_LOAD",
            Self::InvalidMetadata { .. } => "INVALID_METADATA",
            Self::AuthenticationFailed { .. } => "AUTHENTICATION_FAILED",
            Self::TokenExchange { .. } => "TOKEN_EXCHANGE",
            Self::Registration { .. } => "REGISTRATION",
            Self::SbomAccess { .. } => "SBOM_ACCESS",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_failed_error() {
        let error = SyncError::AuthenticationFailed { status: 401 };

        assert_eq!(error.code(), "AUTHENTICATION_FAILED");
        assert!(error.is_pre_submission());
        let display = format!("{}", error);
        assert!(display.contains("401"));
    }

    #[test]
    fn test_token_exchange_error_with_message() {
        let error = SyncError::TokenExchange {
            message: "connection refused".to_string(),
        };

        assert_eq!(error.code(), "TOKEN_EXCHANGE");
        assert!(error.is_pre_submission());
        assert!(error.to_string().contains("connection refused"));
    }

    #[test]
    fn test_registration_error_is_post_submission() {
        let error = SyncError::Registration {
            message: "connection reset by peer".to_string(),
        };

        assert_eq!(error.code(), "REGISTRATION");
        assert!(!error.is_pre_submission());
    }

    #[test]
    fn test_invalid_metadata_error() {
        let error = SyncError::InvalidMetadata {
            message: "expected value at line 1 column 1".to_string(),
        };

        assert_eq!(error.code(), "INVALID_METADATA");
        assert!(error.suggested_actions().len() > 0);
    }

    #[test]
    fn test_sbom_access_error() {
        let error = SyncError::SbomAccess {
            path: "/tmp/project/target/bom.json".to_string(),
            message: "permission denied".to_string(),
        };

        assert_eq!(error.code(), "SBOM_ACCESS");
        let display = error.to_string();
        assert!(display.contains("/tmp/project/target/bom.json"));
        assert!(display.contains("permission denied"));
    }

    #[test]
    fn test_config_load_error() {
        let error = SyncError::ConfigLoad {
            message: "invalid type: string".to_string(),
        };

        assert_eq!(error.code(), "CONFIG_LOAD");
        let actions = error.suggested_actions();
        assert!(actions.iter().any(|&a| a.contains(".vsm-sync.yaml")));
    }
}
