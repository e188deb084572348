use serde::{Deserialize, Serialize};

/// HTTP host settings, read from `modules.api_ingress`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiIngressConfig {
    /// Overrides `server.host:server.port` when set.
    #[serde(default)]
    pub bind_addr: Option<String>,
    #[serde(default = "default_true")]
    pub enable_docs: bool,
    #[serde(default = "default_true")]
    pub cors_enabled: bool,
    #[serde(default = "default_body_limit_mb")]
    pub body_limit_mb: usize,
}

fn default_true() -> bool {
    true
}

fn default_body_limit_mb() -> usize {
    16
}

impl Default for ApiIngressConfig {
    fn default() -> Self {
        Self {
            bind_addr: None,
            enable_docs: true,
            cors_enabled: true,
            body_limit_mb: default_body_limit_mb(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: ApiIngressConfig = serde_json::from_str(r#"{"enable_docs": false}"#).unwrap();
        assert!(!cfg.enable_docs);
        assert!(cfg.cors_enabled);
        assert_eq!(cfg.body_limit_mb, 16);
        assert!(cfg.bind_addr.is_none());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<ApiIngressConfig>(r#"{"bind": "x"}"#).is_err());
    }
}
