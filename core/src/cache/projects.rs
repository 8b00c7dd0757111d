//! Two-tier cache for the project list: process memory in front of a JSON file.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::{get_zentao_data_dir, RuntimeOptions};
use crate::error::Result;
use crate::model::Project;

pub const DEFAULT_PROJECT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const CACHE_FILE_NAME: &str = "projects.json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectQuery {
    /// Skip both tiers and refetch.
    pub refresh: bool,
    /// Maximum age of a cached list. `None` or zero means one day.
    pub ttl: Option<Duration>,
}

impl ProjectQuery {
    pub fn ttl(&self) -> Duration {
        self.ttl.filter(|ttl| !ttl.is_zero()).unwrap_or(DEFAULT_PROJECT_TTL)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedProjects {
    /// Epoch milliseconds.
    updated_at: i64,
    projects: Vec<Project>,
}

#[derive(Debug, Clone)]
struct MemoryEntry {
    projects: Vec<Project>,
    updated_at_ms: i64,
    expires_at_ms: i64,
}

impl MemoryEntry {
    /// Fresh only while before its expiry and no older than the TTL asked for now.
    fn is_fresh(&self, now_ms: i64, ttl_ms: i64) -> bool {
        self.expires_at_ms > now_ms && now_ms - self.updated_at_ms <= ttl_ms
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn ttl_millis(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)
}

pub struct ProjectCache {
    path: PathBuf,
    memory: Mutex<Option<MemoryEntry>>,
}

impl ProjectCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            memory: Mutex::new(None),
        }
    }

    /// `$ZENTAO_CACHE_DIR/projects.json`, else `~/.zentao/cache/projects.json`.
    pub fn from_options(options: &RuntimeOptions) -> Result<Self> {
        let dir = match &options.cache_dir {
            Some(dir) => dir.clone(),
            None => get_zentao_data_dir()?.join("cache"),
        };
        Ok(Self::new(dir.join(CACHE_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serves the project list from memory, then disk, then `fetch`.
    ///
    /// A fetched list overwrites both tiers. Disk problems never fail the call:
    /// an unreadable file is a miss and a failed write is only logged.
    pub async fn get_or_fetch<F, Fut>(&self, query: ProjectQuery, fetch: F) -> Result<Vec<Project>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Project>>>,
    {
        let ttl_ms = ttl_millis(query.ttl());

        if !query.refresh {
            let now = now_ms();
            if let Some(entry) = self.memory.lock().await.as_ref() {
                if entry.is_fresh(now, ttl_ms) {
                    tracing::debug!(
                        target: "zentao.cache",
                        stage = "cache.projects.memory",
                        projects = entry.projects.len()
                    );
                    return Ok(entry.projects.clone());
                }
            }

            if let Some(persisted) = self.read_persisted(now, ttl_ms).await {
                tracing::debug!(
                    target: "zentao.cache",
                    stage = "cache.projects.file",
                    projects = persisted.projects.len()
                );
                *self.memory.lock().await = Some(MemoryEntry {
                    projects: persisted.projects.clone(),
                    updated_at_ms: persisted.updated_at,
                    expires_at_ms: now.saturating_add(ttl_ms),
                });
                return Ok(persisted.projects);
            }
        }

        let projects = fetch().await?;
        let now = now_ms();
        tracing::debug!(
            target: "zentao.cache",
            stage = "cache.projects.fetched",
            projects = projects.len(),
            refresh = query.refresh
        );
        *self.memory.lock().await = Some(MemoryEntry {
            projects: projects.clone(),
            updated_at_ms: now,
            expires_at_ms: now.saturating_add(ttl_ms),
        });
        self.write_persisted(&projects, now).await;
        Ok(projects)
    }

    async fn read_persisted(&self, now: i64, ttl_ms: i64) -> Option<PersistedProjects> {
        let raw = tokio::fs::read_to_string(&self.path).await.ok()?;
        let persisted = match serde_json::from_str::<PersistedProjects>(&raw) {
            Ok(persisted) => persisted,
            Err(err) => {
                tracing::debug!(
                    target: "zentao.cache",
                    stage = "cache.projects.file.invalid",
                    error = %err
                );
                return None;
            }
        };
        if now - persisted.updated_at > ttl_ms {
            return None;
        }
        Some(persisted)
    }

    async fn write_persisted(&self, projects: &[Project], now: i64) {
        let result = async {
            if let Some(parent) = self.path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            let json = serde_json::to_string_pretty(&serde_json::json!({
                "updatedAt": now,
                "projects": projects,
            }))?;
            tokio::fs::write(&self.path, json).await?;
            Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
        }
        .await;

        if let Err(err) = result {
            tracing::warn!(
                target: "zentao.cache",
                stage = "cache.projects.write_failed",
                path = %self.path.display(),
                error = %err
            );
        }
    }
}
