use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_VERSION: &str = "v1";

/// Connect/response timeout applied to every backend call.
pub const REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Backend connection settings, stored on disk as `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZentaoConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub api_version: String,
}

impl ZentaoConfig {
    /// Trims connection fields and fills in the API version.
    ///
    /// `env_api_version` is the value of `ZENTAO_API_VERSION`, consulted only
    /// when the file leaves the version blank.
    pub fn normalized(self, env_api_version: Option<&str>) -> Self {
        let api_version = Some(self.api_version.trim())
            .filter(|v| !v.is_empty())
            .or_else(|| env_api_version.map(str::trim).filter(|v| !v.is_empty()))
            .unwrap_or(DEFAULT_API_VERSION)
            .to_string();
        Self {
            url: self.url.trim().to_string(),
            username: self.username.trim().to_string(),
            password: self.password,
            api_version,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.url.is_empty() && !self.username.is_empty() && !self.password.is_empty()
    }

    /// REST root, e.g. `https://zentao.example.com/api.php/v1`.
    pub fn api_base_url(&self) -> String {
        format!(
            "{}/api.php/{}",
            self.url.trim_end_matches('/'),
            self.api_version.trim_matches('/')
        )
    }
}

/// Environment-driven knobs consumed by the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeOptions {
    /// Directory holding `projects.json`. `None` means `$HOME/.zentao/cache`.
    pub cache_dir: Option<PathBuf>,
    /// Verbose diagnostics on stderr.
    pub debug: bool,
}

impl RuntimeOptions {
    pub fn from_env() -> Self {
        let cache_dir = std::env::var("ZENTAO_CACHE_DIR")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let debug = std::env::var("ZENTAO_DEBUG")
            .map(|v| v.trim() == "1")
            .unwrap_or(false);
        Self { cache_dir, debug }
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }
}
