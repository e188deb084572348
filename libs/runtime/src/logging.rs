//! Tracing subscriber setup driven by [`LoggingConfig`].
//!
//! Console output is human readable and filtered per subsystem. File output
//! is JSON, written through a size-rotated file under `home_dir`.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt;

use crate::config::{LoggingConfig, Section};

const DEFAULT_SECTION: &str = "default";
const DEFAULT_MAX_SIZE_MB: u64 = 100;
const DEFAULT_MAX_BACKUPS: usize = 3;

fn parse_level(s: &str) -> LevelFilter {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" | "none" => LevelFilter::OFF,
        _ => LevelFilter::INFO,
    }
}

/// Shared handle to the rotating log file.
#[derive(Clone)]
struct RotatingFile(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap_or_else(|p| p.into_inner()).write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().unwrap_or_else(|p| p.into_inner()).flush()
    }
}

impl<'a> fmt::MakeWriter<'a> for RotatingFile {
    type Writer = RotatingFile;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Relative log paths are anchored at `base_dir`.
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn open_rotating_file(path: &Path, section: &Section) -> std::io::Result<RotatingFile> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
    let backups = section.max_backups.unwrap_or(DEFAULT_MAX_BACKUPS);

    let rot = FileRotate::new(
        path,
        AppendTimestamp::default(FileLimit::MaxFiles(backups)),
        ContentLimit::BytesSurpassed(max_bytes as usize),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    Ok(RotatingFile(Arc::new(Mutex::new(rot))))
}

/// Console filter: `default.console_level` for everything, each named
/// section overriding its own target prefix.
fn console_targets(cfg: &LoggingConfig) -> Targets {
    let default = cfg
        .get(DEFAULT_SECTION)
        .map(|s| parse_level(&s.console_level))
        .unwrap_or(LevelFilter::INFO);

    cfg.iter()
        .filter(|(name, _)| name.as_str() != DEFAULT_SECTION)
        .fold(Targets::new().with_default(default), |targets, (name, s)| {
            targets.with_target(name.clone(), parse_level(&s.console_level))
        })
}

/// File filter: `default.file_level` for everything, sections override. A
/// section without `file_level` inherits the default.
fn file_targets(cfg: &LoggingConfig) -> Targets {
    let default = cfg
        .get(DEFAULT_SECTION)
        .filter(|s| !s.file_level.trim().is_empty())
        .map(|s| parse_level(&s.file_level))
        .unwrap_or(LevelFilter::DEBUG);

    cfg.iter()
        .filter(|(name, s)| name.as_str() != DEFAULT_SECTION && !s.file_level.trim().is_empty())
        .fold(Targets::new().with_default(default), |targets, (name, s)| {
            targets.with_target(name.clone(), parse_level(&s.file_level))
        })
}

/// Install the global subscriber. Calling it twice is harmless: the second
/// install is ignored.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

    // bridge `log` records (sqlx, sea-orm) into tracing
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = tracing_subscriber::fmt()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .try_init();
        return;
    }

    let console = fmt::layer()
        .with_ansi(atty::is(atty::Stream::Stdout))
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(console_targets(cfg));

    let file = cfg
        .get(DEFAULT_SECTION)
        .filter(|s| !s.file.trim().is_empty())
        .and_then(|s| {
            let path = resolve_log_path(&s.file, base_dir);
            match open_rotating_file(&path, s) {
                Ok(writer) => Some(writer),
                Err(e) => {
                    eprintln!("Failed to open log file '{}': {e}", path.display());
                    None
                }
            }
        })
        .map(|writer| {
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_writer(writer)
                .with_filter(file_targets(cfg))
        });

    let _ = Registry::default().with(console).with(file).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_logging_config;
    use tempfile::tempdir;

    fn section(console: &str, file_level: &str) -> Section {
        Section {
            console_level: console.into(),
            file: String::new(),
            file_level: file_level.into(),
            max_backups: None,
            max_size_mb: None,
        }
    }

    #[test]
    fn level_parsing() {
        assert_eq!(parse_level("trace"), LevelFilter::TRACE);
        assert_eq!(parse_level("DEBUG"), LevelFilter::DEBUG);
        assert_eq!(parse_level(" Warn "), LevelFilter::WARN);
        assert_eq!(parse_level("off"), LevelFilter::OFF);
        assert_eq!(parse_level("none"), LevelFilter::OFF);
        assert_eq!(parse_level("bogus"), LevelFilter::INFO);
    }

    #[test]
    fn console_sections_override_default() {
        let mut cfg = default_logging_config();
        cfg.insert("repairs".into(), section("trace", ""));
        cfg.insert("sqlx".into(), section("off", ""));

        let targets = console_targets(&cfg);
        assert!(targets.would_enable("repairs::domain", &tracing::Level::TRACE));
        assert!(!targets.would_enable("sqlx::query", &tracing::Level::ERROR));
        assert!(targets.would_enable("api_ingress", &tracing::Level::INFO));
        assert!(!targets.would_enable("api_ingress", &tracing::Level::DEBUG));
    }

    #[test]
    fn file_sections_without_level_inherit_default() {
        let mut cfg = default_logging_config();
        cfg.insert("repairs".into(), section("info", ""));
        cfg.insert("api_ingress".into(), section("info", "warn"));

        let targets = file_targets(&cfg);
        assert!(targets.would_enable("repairs", &tracing::Level::DEBUG));
        assert!(!targets.would_enable("api_ingress", &tracing::Level::INFO));
    }

    #[test]
    fn log_paths_resolve_against_base_dir() {
        let tmp = tempdir().unwrap();
        let resolved = resolve_log_path("logs/test.log", tmp.path());
        assert!(resolved.starts_with(tmp.path()));
        assert!(resolved.ends_with("logs/test.log"));

        let abs = tmp.path().join("abs.log");
        assert_eq!(resolve_log_path(&abs.to_string_lossy(), Path::new("/x")), abs);
    }

    #[test]
    fn rotating_file_creates_parent_dir() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("nested/dir/app.log");
        let mut writer = open_rotating_file(&path, &section("info", "debug")).unwrap();
        writer.write_all(b"hello\n").unwrap();
        writer.flush().unwrap();
        assert!(path.parent().unwrap().exists());
    }
}
