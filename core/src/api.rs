//! Stable re-exports for consumers (`cli` and external crates).
//!
//! Prefer importing from `zentao_core::api` instead of reaching into internal modules.

pub use crate::cache::{ProjectCache, ProjectQuery, DEFAULT_PROJECT_TTL};
pub use crate::client::{password_digest, RequestBody, ZentaoClient};
pub use crate::config::{
    load_default, primary_config_path, save_config, RuntimeOptions, ZentaoConfig,
    DEFAULT_API_VERSION, REQUEST_TIMEOUT_MS,
};
pub use crate::error::{RequestError, RequestErrorKind, Result, ZentaoError};
pub use crate::model::{
    Bug, BugResolution, BugStatus, CreateTaskRequest, Execution, Product, Project, Resolution,
    Task, TaskStatus, TaskUpdate,
};
pub use crate::session::ZentaoSession;
pub use crate::tasks::{CreatedTask, TaskQuery};
