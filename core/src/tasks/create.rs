//! Task creation across deployments that disagree on the request encoding.

use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};

use super::pager::TaskPager;
use crate::client::{RequestBody, ZentaoClient};
use crate::error::{Result, ZentaoError};
use crate::model::{lenient, to_fields, CreateTaskRequest, Task, TaskStatus};

/// Pages scanned when looking up a freshly created task by name.
pub const NAME_SCAN_MAX_PAGES: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskEncoding {
    /// The request fields as a JSON body.
    Json,
    /// The JSON body nested under `task`.
    WrappedJson,
    /// Form-encoded `key=value` pairs.
    Form,
    /// Form-encoded `task[key]=value` pairs.
    NestedForm,
}

impl TaskEncoding {
    /// Order in which encodings are tried.
    pub const ALL: [TaskEncoding; 4] = [
        TaskEncoding::Json,
        TaskEncoding::WrappedJson,
        TaskEncoding::Form,
        TaskEncoding::NestedForm,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskEncoding::Json => "json",
            TaskEncoding::WrappedJson => "wrapped_json",
            TaskEncoding::Form => "form",
            TaskEncoding::NestedForm => "nested_form",
        }
    }

    pub fn encode(self, fields: &Map<String, Value>) -> RequestBody {
        match self {
            TaskEncoding::Json => RequestBody::Json(Value::Object(fields.clone())),
            TaskEncoding::WrappedJson => {
                let mut wrapper = Map::new();
                wrapper.insert("task".to_string(), Value::Object(fields.clone()));
                RequestBody::Json(Value::Object(wrapper))
            }
            TaskEncoding::Form => RequestBody::Form(form_pairs(fields, |k| k.to_string())),
            TaskEncoding::NestedForm => {
                RequestBody::Form(form_pairs(fields, |k| format!("task[{k}]")))
            }
        }
    }
}

fn form_pairs(fields: &Map<String, Value>, key: impl Fn(&str) -> String) -> Vec<(String, String)> {
    fields
        .iter()
        .filter_map(|(k, v)| {
            let text = match v {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key(k), text))
        })
        .collect()
}

/// A create response counts only if it is an object with a positive id.
pub fn is_created_task(value: &Value) -> bool {
    value
        .as_object()
        .and_then(|obj| obj.get("id"))
        .and_then(lenient::positive_id)
        .is_some()
}

/// What `create_task` could establish about the new task.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CreatedTask {
    /// The create endpoint answered with the task itself.
    Confirmed(Task),
    /// No encoding returned a task, but one with the exact name exists in the execution.
    Matched(Task),
    /// Last-resort: the final successful response was an object without a
    /// usable id. It may not describe a task at all.
    Unverified(Value),
}

impl CreatedTask {
    pub fn task(&self) -> Option<&Task> {
        match self {
            CreatedTask::Confirmed(task) | CreatedTask::Matched(task) => Some(task),
            CreatedTask::Unverified(_) => None,
        }
    }

    pub fn is_verified(&self) -> bool {
        self.task().is_some()
    }
}

fn validate(request: &CreateTaskRequest) -> Result<u64> {
    if request.name.trim().is_empty() {
        return Err(ZentaoError::Validation("task name is required".to_string()));
    }
    request
        .execution
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            ZentaoError::Validation("creating a task requires an execution id".to_string())
        })
}

/// First task in the execution whose name equals `name` exactly.
pub async fn find_task_by_name(
    client: &ZentaoClient,
    execution_id: u64,
    name: &str,
) -> Result<Option<Task>> {
    let mut pager = TaskPager::new(client, execution_id, TaskStatus::All)
        .with_max_pages(NAME_SCAN_MAX_PAGES);
    while let Some(tasks) = pager.next_page().await? {
        if let Some(found) = tasks.into_iter().find(|t| t.name == name) {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

pub async fn create_task(
    client: &ZentaoClient,
    request: &CreateTaskRequest,
) -> Result<CreatedTask> {
    let execution_id = validate(request)?;
    let fields = to_fields("task request", request)?;
    let path = format!("/executions/{}/tasks", execution_id);

    let mut last_response: Option<Value> = None;
    for encoding in TaskEncoding::ALL {
        let result = client
            .send("create_task", Method::POST, &path, &[], encoding.encode(&fields))
            .await;
        match result {
            Ok(value) => {
                tracing::debug!(
                    target: "zentao.create",
                    stage = "create.attempt",
                    encoding = encoding.as_str(),
                    accepted = is_created_task(&value)
                );
                if is_created_task(&value) {
                    if let Ok(task) = Task::from_value(value.clone()) {
                        return Ok(CreatedTask::Confirmed(task));
                    }
                }
                last_response = Some(value);
            }
            Err(err) => {
                tracing::debug!(
                    target: "zentao.create",
                    stage = "create.attempt.failed",
                    encoding = encoding.as_str(),
                    error = %err
                );
            }
        }
    }

    if let Some(found) = find_task_by_name(client, execution_id, &request.name).await? {
        tracing::debug!(
            target: "zentao.create",
            stage = "create.matched_by_name",
            execution_id = execution_id,
            task_id = found.id
        );
        return Ok(CreatedTask::Matched(found));
    }

    match last_response {
        Some(value) if value.is_object() => {
            tracing::warn!(
                target: "zentao.create",
                stage = "create.unverified",
                execution_id = execution_id,
                "create response had no task id and no task with that name was found"
            );
            Ok(CreatedTask::Unverified(value))
        }
        _ => Err(ZentaoError::Creation(format!(
            "no encoding returned a task and execution {} has no task named {:?}",
            execution_id, request.name
        ))),
    }
}
