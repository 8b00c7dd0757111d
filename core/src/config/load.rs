use std::path::{Path, PathBuf};

use super::types::ZentaoConfig;
use crate::error::{Result, ZentaoError};

const CONFIG_FILE_NAME: &str = "config.json";

/// Get the default data directory: ~/.zentao
pub fn get_zentao_data_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| ZentaoError::Config("cannot determine home directory".to_string()))?;
    Ok(PathBuf::from(home).join(".zentao"))
}

fn legacy_config_path() -> PathBuf {
    Path::new(".zentao").join(CONFIG_FILE_NAME)
}

/// Where `save_config` writes: `$ZENTAO_CONFIG_DIR/config.json`, else `~/.zentao/config.json`.
pub fn primary_config_path() -> PathBuf {
    let dir = std::env::var("ZENTAO_CONFIG_DIR")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| get_zentao_data_dir().ok())
        .unwrap_or_else(|| PathBuf::from(".zentao"));
    dir.join(CONFIG_FILE_NAME)
}

/// Candidate config files in priority order, without duplicates.
pub fn config_candidates() -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::new();
    for path in [primary_config_path(), legacy_config_path()] {
        let resolved = std::path::absolute(&path).unwrap_or(path);
        if !out.contains(&resolved) {
            out.push(resolved);
        }
    }
    out
}

/// Loads the first complete config found among `candidates`.
///
/// Missing files are skipped. A file that exists but lacks url, username or
/// password is skipped too. A file that fails to parse is an error.
pub fn load_from(
    candidates: &[PathBuf],
    env_api_version: Option<&str>,
) -> Result<Option<ZentaoConfig>> {
    for path in candidates {
        if !path.exists() {
            continue;
        }
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ZentaoError::Config(format!("read {} failed: {e}", path.display()))
        })?;
        let cfg = serde_json::from_str::<ZentaoConfig>(&raw).map_err(|e| {
            ZentaoError::Config(format!("parse {} failed: {e}", path.display()))
        })?;
        let cfg = cfg.normalized(env_api_version);
        if cfg.is_complete() {
            tracing::debug!(target: "zentao.config", path = %path.display(), "config loaded");
            return Ok(Some(cfg));
        }
        tracing::debug!(
            target: "zentao.config",
            path = %path.display(),
            "config incomplete, skipped"
        );
    }
    Ok(None)
}

pub fn load_default() -> Result<Option<ZentaoConfig>> {
    let env_api_version = std::env::var("ZENTAO_API_VERSION").ok();
    load_from(&config_candidates(), env_api_version.as_deref())
}

/// Writes the normalised config, creating parent directories.
pub fn save_to(path: &Path, config: &ZentaoConfig) -> Result<()> {
    let env_api_version = std::env::var("ZENTAO_API_VERSION").ok();
    let normalized = config.clone().normalized(env_api_version.as_deref());
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ZentaoError::Config(format!("create {} failed: {e}", parent.display()))
        })?;
    }
    let json = serde_json::to_string_pretty(&normalized)
        .map_err(|e| ZentaoError::Config(format!("serialize config failed: {e}")))?;
    std::fs::write(path, json)
        .map_err(|e| ZentaoError::Config(format!("write {} failed: {e}", path.display())))
}

pub fn save_config(config: &ZentaoConfig) -> Result<PathBuf> {
    let path = primary_config_path();
    save_to(&path, config)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> ZentaoConfig {
        ZentaoConfig {
            url: "https://zentao.local".to_string(),
            username: "alice".to_string(),
            password: "secret".to_string(),
            api_version: "v1".to_string(),
        }
    }

    #[test]
    fn save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        save_to(&path, &sample()).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"apiVersion\""));

        let loaded = load_from(&[path], None).unwrap();
        assert_eq!(loaded, Some(sample()));
    }

    #[test]
    fn incomplete_candidate_falls_through() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("a.json");
        let second = dir.path().join("b.json");
        std::fs::write(&first, r#"{"url":"https://zentao.local","username":"alice"}"#).unwrap();
        save_to(&second, &sample()).unwrap();

        let loaded = load_from(&[first, second], None).unwrap();
        assert_eq!(loaded.map(|c| c.password), Some("secret".to_string()));
    }

    #[test]
    fn missing_files_yield_none() {
        let dir = TempDir::new().unwrap();
        let loaded = load_from(&[dir.path().join("nope.json")], None).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_from(&[path], None).unwrap_err();
        assert!(matches!(err, ZentaoError::Config(_)));
    }
}
