use crate::catalog::list_executions;
use crate::client::ZentaoClient;
use crate::error::Result;
use crate::model::{decode_list, Execution, ListShape, Task, TaskStatus};

use super::collect::TaskCollector;
use super::discover::expand;
use super::pager::TaskPager;

/// Narrowing and capping options for `get_my_tasks`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskQuery {
    pub execution_id: Option<u64>,
    pub project_id: Option<u64>,
    pub limit: Option<usize>,
}

/// Execution id wins over project id; with neither, everything is kept.
pub fn select_executions(executions: Vec<Execution>, query: &TaskQuery) -> Vec<Execution> {
    if let Some(execution_id) = query.execution_id {
        executions.into_iter().filter(|e| e.id == execution_id).collect()
    } else if let Some(project_id) = query.project_id {
        executions
            .into_iter()
            .filter(|e| e.belongs_to_project(project_id))
            .collect()
    } else {
        executions
    }
}

/// Tasks assigned to the session's own account, as the backend lists them.
pub async fn list_assigned_tasks(client: &ZentaoClient, status: TaskStatus) -> Result<Vec<Task>> {
    let query = [
        ("assignedTo", client.username().to_string()),
        ("status", status.as_str().to_string()),
    ];
    let value = client.get("list_assigned_tasks", "/tasks", &query).await?;
    let (tasks, _) =
        decode_list::<Task>("list_assigned_tasks", &value, "tasks", ListShape::Lenient)?;
    Ok(tasks)
}

/// Team-wide task listing reconciled across executions.
///
/// Executions are walked in listing order, one page at a time, de-duplicating
/// by id. Once every selected execution is exhausted, each gathered task is
/// expanded to pick up children the listings leave out. Hitting the cap at any
/// point returns immediately.
pub async fn aggregate_tasks(
    client: &ZentaoClient,
    status: TaskStatus,
    query: &TaskQuery,
) -> Result<Vec<Task>> {
    let executions = select_executions(list_executions(client).await?, query);
    tracing::debug!(
        target: "zentao.tasks",
        stage = "aggregate.executions",
        executions = executions.len(),
        execution_id = ?query.execution_id,
        project_id = ?query.project_id,
        limit = ?query.limit
    );

    let mut collector = TaskCollector::new(query.limit);
    for execution in &executions {
        let mut pager = TaskPager::new(client, execution.id, status);
        while let Some(tasks) = pager.next_page().await? {
            for task in tasks {
                collector.push(task);
                if collector.is_full() {
                    tracing::debug!(
                        target: "zentao.tasks",
                        stage = "aggregate.capped",
                        execution_id = execution.id,
                        total = collector.len()
                    );
                    return Ok(collector.into_tasks());
                }
            }
        }
    }

    let listed = collector.len();
    expand(client, &mut collector).await;
    tracing::debug!(
        target: "zentao.tasks",
        stage = "aggregate.done",
        listed = listed,
        discovered = collector.len() - listed
    );
    Ok(collector.into_tasks())
}

pub async fn get_my_tasks(
    client: &ZentaoClient,
    status: TaskStatus,
    include_all: bool,
    query: &TaskQuery,
) -> Result<Vec<Task>> {
    if include_all {
        aggregate_tasks(client, status, query).await
    } else {
        list_assigned_tasks(client, status).await
    }
}
