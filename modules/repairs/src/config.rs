use serde::{Deserialize, Serialize};

pub const INSECURE_DEFAULT_SECRET: &str = "your-secret-key-change-in-production";

/// Configuration for the repairs module (`modules.repairs` in the app config)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepairsConfig {
    /// HS256 signing key for access tokens.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: i64,
    /// Upload directory, relative to `server.home_dir` unless absolute.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: u64,
}

impl Default for RepairsConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_minutes: default_token_ttl_minutes(),
            upload_dir: default_upload_dir(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

fn default_jwt_secret() -> String {
    INSECURE_DEFAULT_SECRET.to_string()
}

fn default_token_ttl_minutes() -> i64 {
    30
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

fn default_max_upload_mb() -> u64 {
    5
}
