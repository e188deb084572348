use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::paths::home_dir::resolve_home_dir;

const DEFAULT_SUBDIR: &str = ".repairdesk";

/// Application configuration: typed global sections plus a per-module bag
/// that each module deserializes into its own config struct.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    /// Absent means "run without persistence", which the server refuses.
    pub database: Option<DatabaseConfig>,
    /// Absent means plain console logging.
    pub logging: Option<LoggingConfig>,
    /// Directory of extra `<module>.yaml` files merged into `modules`.
    #[serde(default)]
    pub modules_dir: Option<String>,
    /// module_name → arbitrary YAML/JSON value.
    #[serde(default)]
    pub modules: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Normalized to an absolute path on load. Uploads and relative SQLite
    /// paths live under it.
    pub home_dir: String,
    pub host: String,
    pub port: u16,
    /// Per-request handler timeout; 0 keeps the ingress default.
    #[serde(default)]
    pub timeout_sec: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// e.g. "sqlite://database/repairdesk.db" (relative to home_dir) or "sqlite::memory:".
    pub url: String,
    pub max_conns: Option<u32>,
}

/// Subsystem name → logging section. `default` catches every target that
/// has no section of its own.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Section {
    /// "trace" | "debug" | "info" | "warn" | "error" | "off"
    pub console_level: String,
    /// Log file relative to home_dir; empty disables file output.
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub file_level: String,
    #[serde(default)]
    pub max_backups: Option<usize>,
    #[serde(default)]
    pub max_size_mb: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            home_dir: String::new(),
            host: "127.0.0.1".to_string(),
            port: 8001,
            timeout_sec: 0,
        }
    }
}

pub fn default_logging_config() -> LoggingConfig {
    let mut logging = HashMap::new();
    logging.insert(
        "default".to_string(),
        Section {
            console_level: "info".to_string(),
            file: "logs/repairdesk.log".to_string(),
            file_level: "debug".to_string(),
            max_backups: Some(3),
            max_size_mb: Some(100),
        },
    );
    logging
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: Some(DatabaseConfig {
                url: "sqlite://database/repairdesk.db".to_string(),
                max_conns: Some(10),
            }),
            logging: Some(default_logging_config()),
            modules_dir: None,
            modules: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Defaults → YAML file → `APP__*` environment variables.
    ///
    /// Optional sections stay `None` unless the file or the environment sets them.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Yaml},
            Figment,
        };

        let path = config_path.as_ref();
        if !path.exists() {
            anyhow::bail!("config file not found: {}", path.display());
        }

        let base = AppConfig {
            server: ServerConfig::default(),
            database: None,
            logging: None,
            modules_dir: None,
            modules: HashMap::new(),
        };

        // APP__SERVER__PORT=8001 maps to server.port
        let mut config: AppConfig = Figment::new()
            .merge(Serialized::defaults(base))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("APP__").split("__"))
            .extract()
            .with_context(|| format!("failed to parse yaml config {}", path.display()))?;

        normalize_home_dir_inplace(&mut config.server)?;

        if let Some(dir) = config.modules_dir.clone() {
            merge_module_files(&mut config.modules, dir)?;
        }

        Ok(config)
    }

    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_layered(path),
            None => {
                let mut config = Self::default();
                normalize_home_dir_inplace(&mut config.server)?;
                Ok(config)
            }
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// Typed view of one module's config bag; falls back to `T::default()`
    /// when the module has no entry.
    pub fn module_config<T>(&self, module: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        match self.modules.get(module) {
            Some(raw) => serde_json::from_value(raw.clone())
                .with_context(|| format!("invalid config for module '{module}'")),
            None => Ok(T::default()),
        }
    }

    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(port) = args.port {
            self.server.port = port;
        }

        let logging = self.logging.get_or_insert_with(default_logging_config);
        if let Some(default_section) = logging.get_mut("default") {
            match args.verbose {
                0 => {}
                1 => default_section.console_level = "debug".to_string(),
                _ => default_section.console_level = "trace".to_string(),
            }
        }
    }

    pub fn home_dir(&self) -> PathBuf {
        PathBuf::from(&self.server.home_dir)
    }
}

/// Command line values that influence configuration.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config: Option<String>,
    pub port: Option<u16>,
    pub print_config: bool,
    pub verbose: u8,
    /// Use an in-memory database instead of the configured one.
    pub mock: bool,
}

fn normalize_home_dir_inplace(server: &mut ServerConfig) -> Result<()> {
    let configured = if server.home_dir.trim().is_empty() {
        None
    } else {
        Some(server.home_dir.clone())
    };

    let resolved = resolve_home_dir(configured, DEFAULT_SUBDIR, true)
        .context("Failed to resolve server.home_dir")?;
    server.home_dir = resolved.to_string_lossy().to_string();
    Ok(())
}

fn merge_module_files(
    bag: &mut HashMap<String, serde_json::Value>,
    dir: impl AsRef<Path>,
) -> Result<()> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(());
    }
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_yaml = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);
        if !path.is_file() || !is_yaml {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let value: serde_yaml::Value = serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse yaml module file {}", path.display()))?;
        bag.insert(name.to_string(), serde_json::to_value(value)?);
    }
    Ok(())
}
