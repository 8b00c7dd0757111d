use serde_json::Value;

use crate::client::ZentaoClient;
use crate::error::{Result, ZentaoError};
use crate::model::{decode_list, lenient, ListShape, Task, TaskPage, TaskStatus};

/// Declared paging numbers count only when positive; zero or junk means "absent".
fn declared(value: &Value, key: &str) -> Option<u64> {
    value
        .get(key)
        .and_then(lenient::number)
        .filter(|n| *n >= 1.0)
        .map(|n| n as u64)
}

pub async fn fetch_task_page(
    client: &ZentaoClient,
    execution_id: u64,
    status: TaskStatus,
    page: u32,
) -> Result<TaskPage> {
    let path = format!("/executions/{}/tasks", execution_id);
    let query = [("status", status.as_str().to_string()), ("page", page.to_string())];
    let value = client.get("fetch_task_page", &path, &query).await?;
    if !value.is_object() {
        return Err(ZentaoError::response_shape(
            format!("fetch_task_page execution={execution_id} page={page}"),
            &value,
        ));
    }

    let (tasks, listed) =
        decode_list::<Task>("fetch_task_page", &value, "tasks", ListShape::Lenient)?;
    let out = TaskPage {
        tasks,
        listed,
        declared_total: declared(&value, "total"),
        declared_page_size: declared(&value, "limit"),
    };
    tracing::debug!(
        target: "zentao.tasks",
        stage = "tasks.page",
        execution_id = execution_id,
        page = page,
        listed = out.listed,
        total = ?out.declared_total,
        limit = ?out.declared_page_size
    );
    Ok(out)
}

/// Walks one execution's task listing page by page.
///
/// Pages are fetched on demand, so a caller that stops early issues no further
/// calls. A pager is single-use; build a new one to walk again from page 1.
pub struct TaskPager<'a> {
    client: &'a ZentaoClient,
    execution_id: u64,
    status: TaskStatus,
    fetched: u32,
    max_pages: Option<u32>,
    done: bool,
}

impl<'a> TaskPager<'a> {
    pub fn new(client: &'a ZentaoClient, execution_id: u64, status: TaskStatus) -> Self {
        Self {
            client,
            execution_id,
            status,
            fetched: 0,
            max_pages: None,
            done: false,
        }
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    pub fn pages_fetched(&self) -> u32 {
        self.fetched
    }

    pub async fn next_page(&mut self) -> Result<Option<Vec<Task>>> {
        if self.done {
            return Ok(None);
        }
        if self.max_pages.is_some_and(|max| self.fetched >= max) {
            self.done = true;
            return Ok(None);
        }

        let page_no = self.fetched + 1;
        let page = fetch_task_page(self.client, self.execution_id, self.status, page_no).await?;
        self.fetched = page_no;
        if page.is_last(page_no) {
            self.done = true;
        }
        Ok(Some(page.tasks))
    }
}

pub async fn fetch_all_tasks(
    client: &ZentaoClient,
    execution_id: u64,
    status: TaskStatus,
) -> Result<Vec<Task>> {
    let mut pager = TaskPager::new(client, execution_id, status);
    let mut out = Vec::new();
    while let Some(tasks) = pager.next_page().await? {
        out.extend(tasks);
    }
    Ok(out)
}
