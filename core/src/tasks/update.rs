use chrono::{SecondsFormat, Utc};
use reqwest::Method;
use serde_json::Value;

use crate::client::{RequestBody, ZentaoClient};
use crate::error::Result;
use crate::model::{to_fields, TaskStatus, TaskUpdate};

pub(crate) fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `PUT /tasks/{id}` with the caller's fields plus `assignedTo` set to the session account.
pub async fn update_task(
    client: &ZentaoClient,
    task_id: u64,
    update: &TaskUpdate,
) -> Result<Value> {
    let mut body = to_fields("task update", update)?;
    body.insert("assignedTo".to_string(), Value::String(client.username().to_string()));

    tracing::debug!(
        target: "zentao.tasks",
        stage = "task.update",
        task_id = task_id,
        fields = body.len()
    );
    let path = format!("/tasks/{}", task_id);
    client
        .send("update_task", Method::PUT, &path, &[], RequestBody::Json(Value::Object(body)))
        .await
}

/// Marks a task done now; fields the caller sets take precedence.
pub async fn finish_task(
    client: &ZentaoClient,
    task_id: u64,
    update: TaskUpdate,
) -> Result<Value> {
    let update = TaskUpdate {
        status: update.status.or(Some(TaskStatus::Done)),
        finished_date: update.finished_date.or_else(|| Some(now_iso())),
        ..update
    };
    update_task(client, task_id, &update).await
}

/// Sum of declared task totals over the project's executions, page 1 only.
pub async fn get_project_task_count(
    client: &ZentaoClient,
    project_id: u64,
    status: TaskStatus,
) -> Result<u64> {
    let executions = crate::catalog::get_executions(client, Some(project_id)).await?;
    let mut count = 0u64;
    for execution in &executions {
        let path = format!("/executions/{}/tasks", execution.id);
        let query = [("status", status.as_str().to_string()), ("page", "1".to_string())];
        let value = client.get("get_project_task_count", &path, &query).await?;
        let declared = value
            .get("total")
            .and_then(crate::model::lenient::number)
            .filter(|n| *n >= 0.0)
            .map(|n| n as u64);
        let listed = value
            .get("tasks")
            .and_then(Value::as_array)
            .map_or(0, |tasks| tasks.len() as u64);
        count += declared.unwrap_or(listed);
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::{client_for, mock_token};
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test]
    async fn update_merges_assignee() {
        let mut server = Server::new_async().await;
        let _t = mock_token(&mut server).await;
        let m = server
            .mock("PUT", "/api.php/v1/tasks/3")
            .match_body(Matcher::Json(json!({
                "consumed": 2.0,
                "comment": "wip",
                "assignedTo": "alice"
            })))
            .with_status(200)
            .with_body(r#"{"id":3,"status":"doing"}"#)
            .create_async()
            .await;

        let update = TaskUpdate {
            consumed: Some(2.0),
            comment: Some("wip".to_string()),
            ..Default::default()
        };
        let v = update_task(&client_for(&server), 3, &update).await.unwrap();
        assert_eq!(v["status"], "doing");
        m.assert_async().await;
    }

    #[tokio::test]
    async fn finish_defaults_status_and_date() {
        let mut server = Server::new_async().await;
        let _t = mock_token(&mut server).await;
        let m = server
            .mock("PUT", "/api.php/v1/tasks/4")
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJson(json!({
                    "status": "done",
                    "left": 0.0,
                    "assignedTo": "alice"
                })),
                Matcher::Regex(r#""finishedDate":"\d{4}-\d{2}-\d{2}T"#.to_string()),
            ]))
            .with_status(200)
            .with_body(r#"{"id":4}"#)
            .create_async()
            .await;

        let update = TaskUpdate { left: Some(0.0), ..Default::default() };
        finish_task(&client_for(&server), 4, update).await.unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn finish_keeps_caller_date() {
        let mut server = Server::new_async().await;
        let _t = mock_token(&mut server).await;
        let m = server
            .mock("PUT", "/api.php/v1/tasks/4")
            .match_body(Matcher::PartialJson(json!({
                "finishedDate": "2024-01-02",
                "status": "done"
            })))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let update = TaskUpdate {
            finished_date: Some("2024-01-02".to_string()),
            ..Default::default()
        };
        finish_task(&client_for(&server), 4, update).await.unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn project_count_sums_declared_totals() {
        let mut server = Server::new_async().await;
        let _t = mock_token(&mut server).await;
        let _e = server
            .mock("GET", "/api.php/v1/executions")
            .with_status(200)
            .with_body(
                json!({"executions": [
                    {"id": 1, "project": 5},
                    {"id": 2, "project": 5},
                    {"id": 3, "project": 6}
                ]})
                .to_string(),
            )
            .create_async()
            .await;
        let _a = server
            .mock("GET", "/api.php/v1/executions/1/tasks")
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(200)
            .with_body(r#"{"total":"12","tasks":[{"id":1}]}"#)
            .create_async()
            .await;
        let _b = server
            .mock("GET", "/api.php/v1/executions/2/tasks")
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(200)
            .with_body(r#"{"tasks":[{"id":7},{"id":8}]}"#)
            .create_async()
            .await;
        let other = server
            .mock("GET", "/api.php/v1/executions/3/tasks")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server);
        assert_eq!(get_project_task_count(&client, 5, TaskStatus::All).await.unwrap(), 14);
        assert_eq!(get_project_task_count(&client, 99, TaskStatus::All).await.unwrap(), 0);
        other.assert_async().await;
    }
}
