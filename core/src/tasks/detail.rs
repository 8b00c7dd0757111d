use serde_json::Value;

use crate::client::ZentaoClient;
use crate::error::{Result, ZentaoError};
use crate::model::Task;

/// Fetches one task; deployments answer either `{task: {..}}` or the bare object.
pub async fn get_task_detail(client: &ZentaoClient, task_id: u64) -> Result<Task> {
    let path = format!("/tasks/{}", task_id);
    let value = client.get("get_task_detail", &path, &[]).await?;
    let operation = || format!("get_task_detail task={task_id}");

    let task_value = match value {
        Value::Object(mut map) => match map.remove("task") {
            Some(inner) => inner,
            None => Value::Object(map),
        },
        other => return Err(ZentaoError::response_shape(operation(), &other)),
    };

    Task::from_value(task_value.clone())
        .map_err(|_| ZentaoError::response_shape(operation(), &task_value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::{client_for, mock_token};
    use mockito::Server;

    #[tokio::test]
    async fn unwraps_task_envelope() {
        let mut server = Server::new_async().await;
        let _t = mock_token(&mut server).await;
        let _m = server
            .mock("GET", "/api.php/v1/tasks/5")
            .with_status(200)
            .with_body(r#"{"task":{"id":5,"name":"wrapped","children":[6]}}"#)
            .create_async()
            .await;

        let task = get_task_detail(&client_for(&server), 5).await.unwrap();
        assert_eq!(task.name, "wrapped");
        assert!(task.extra.contains_key("children"));
    }

    #[tokio::test]
    async fn accepts_bare_task() {
        let mut server = Server::new_async().await;
        let _t = mock_token(&mut server).await;
        let _m = server
            .mock("GET", "/api.php/v1/tasks/8")
            .with_status(200)
            .with_body(r#"{"id":8,"name":"bare"}"#)
            .create_async()
            .await;

        let task = get_task_detail(&client_for(&server), 8).await.unwrap();
        assert_eq!((task.id, task.name.as_str()), (8, "bare"));
    }

    #[tokio::test]
    async fn rejects_non_task_payloads() {
        let mut server = Server::new_async().await;
        let _t = mock_token(&mut server).await;
        let _a = server
            .mock("GET", "/api.php/v1/tasks/1")
            .with_status(200)
            .with_body(r#"[1,2,3]"#)
            .create_async()
            .await;
        let _b = server
            .mock("GET", "/api.php/v1/tasks/2")
            .with_status(200)
            .with_body(r#"{"task":null}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        for id in [1, 2] {
            let err = get_task_detail(&client, id).await.unwrap_err();
            assert!(matches!(err, ZentaoError::ResponseShape { .. }), "task {id}");
        }
    }
}
