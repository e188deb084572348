use std::path::PathBuf;

use anyhow::{bail, Context, Result};

/// Resolve the server home directory into an absolute path.
///
/// - `None` falls back to `<platform home>/<default_subdir>`
///   (Windows: `%APPDATA%`, elsewhere: `$HOME`).
/// - A leading `~` is expanded against the platform home.
/// - Relative paths are anchored at the current working directory.
///
/// With `create` set, the directory is created when missing.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let path = match configured {
        None => platform_home()?.join(default_subdir),
        Some(raw) => expand(&raw)?,
    };

    let path = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .context("cannot read current directory")?
            .join(path)
    };

    if create {
        std::fs::create_dir_all(&path)
            .with_context(|| format!("cannot create home dir {}", path.display()))?;
    }
    Ok(path)
}

fn expand(raw: &str) -> Result<PathBuf> {
    if raw == "~" {
        return platform_home();
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(platform_home()?.join(rest));
    }
    Ok(PathBuf::from(raw))
}

fn platform_home() -> Result<PathBuf> {
    let var = if cfg!(windows) { "APPDATA" } else { "HOME" };
    match std::env::var_os(var) {
        Some(v) if !v.is_empty() => Ok(PathBuf::from(v)),
        _ => bail!("environment variable {var} is not set"),
    }
}
