use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient::{de_opt_i64, de_opt_string, de_positive_id, de_string};

/// Page size assumed when a listing omits `limit`.
pub const DEFAULT_PAGE_SIZE: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Wait,
    Doing,
    Done,
    Pause,
    Cancel,
    Closed,
    #[default]
    All,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wait => "wait",
            Self::Doing => "doing",
            Self::Done => "done",
            Self::Pause => "pause",
            Self::Cancel => "cancel",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wait" => Ok(Self::Wait),
            "doing" => Ok(Self::Doing),
            "done" => Ok(Self::Done),
            "pause" => Ok(Self::Pause),
            "cancel" => Ok(Self::Cancel),
            "closed" => Ok(Self::Closed),
            "all" => Ok(Self::All),
            other => Err(format!("unknown task status: {other}")),
        }
    }
}

/// A task as returned by listing or detail endpoints.
///
/// Only the identity and a few common fields are typed. Everything else,
/// including whatever key a deployment uses for child tasks, is kept in
/// `extra` so detail payloads survive a round trip untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(deserialize_with = "de_positive_id")]
    pub id: u64,
    #[serde(default, deserialize_with = "de_string")]
    pub name: String,
    #[serde(default, deserialize_with = "de_string")]
    pub status: String,
    #[serde(default, deserialize_with = "de_opt_i64", skip_serializing_if = "Option::is_none")]
    pub pri: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}

/// Input of `create_task`. Field names follow the backend's wire format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pri: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story: Option<u64>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub est_started: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// One page of an execution's task listing, with the declared paging metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPage {
    pub tasks: Vec<Task>,
    /// Entries the backend returned, including ones that failed to decode.
    pub listed: usize,
    pub declared_total: Option<u64>,
    pub declared_page_size: Option<u64>,
}

impl TaskPage {
    pub fn page_size(&self) -> u64 {
        self.declared_page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Declared total, or this page's length when the backend omitted it.
    pub fn total(&self) -> u64 {
        self.declared_total.unwrap_or(self.listed as u64)
    }

    /// Whether `page` (1-based) is the last one worth requesting.
    ///
    /// An empty page always ends the walk, so a backend that overstates
    /// `total` costs one extra call rather than an endless loop.
    pub fn is_last(&self, page: u32) -> bool {
        self.listed == 0 || u64::from(page).saturating_mul(self.page_size()) >= self.total()
    }
}
