//! Hidden child-task discovery.
//!
//! Some deployments leave sub-tasks out of execution listings. The only trace
//! of them is inside the parent's detail payload, under one of a handful of
//! key names and at no fixed depth. Discovery walks those keys and then
//! fetches whatever ids turn up.

use std::collections::{HashMap, HashSet, VecDeque};

use serde_json::{Map, Value};

use super::collect::TaskCollector;
use super::detail::get_task_detail;
use crate::client::ZentaoClient;
use crate::model::{lenient, Task};

/// Detail keys that may hold child tasks. Nothing else is inspected.
pub const CHILD_KEYS: [&str; 6] = [
    "children",
    "childTasks",
    "subTasks",
    "subtasks",
    "tasks",
    "sons",
];

/// Ordered, de-duplicated candidate ids.
#[derive(Default)]
struct Candidates {
    seen: HashSet<u64>,
    ids: Vec<u64>,
}

impl Candidates {
    fn push(&mut self, value: &Value) {
        if let Some(id) = lenient::positive_id(value) {
            if self.seen.insert(id) {
                self.ids.push(id);
            }
        }
    }

    fn walk(&mut self, value: &Value) {
        match value {
            Value::Null | Value::Bool(_) => {}
            Value::Number(_) | Value::String(_) => self.push(value),
            Value::Array(items) => {
                for item in items {
                    self.walk(item);
                }
            }
            Value::Object(map) => {
                if let Some(id) = map.get("id") {
                    self.push(id);
                }
                for v in map.values() {
                    self.walk(v);
                }
            }
        }
    }
}

/// Candidate child ids found beneath the allow-listed keys of a detail payload.
///
/// Every scalar under those keys that reads as a positive integer counts,
/// including unrelated numeric fields of nested objects. Ids that do not
/// resolve to a task are dropped later when the fetch fails.
pub fn discover_children_in(payload: &Map<String, Value>) -> Vec<u64> {
    let mut candidates = Candidates::default();
    for key in CHILD_KEYS {
        if let Some(value) = payload.get(key) {
            candidates.walk(value);
        }
    }
    candidates.ids
}

pub fn discover_children(task: &Task) -> Vec<u64> {
    discover_children_in(&task.extra)
}

/// Expands every gathered task through its detail payload, appending newly
/// found children to `collector` until the queue drains or the cap is hit.
///
/// Each id is expanded at most once and a child is fetched only if the
/// collector has not seen it, so cyclic parent/child references terminate.
/// Fetch failures skip that id.
pub async fn expand(client: &ZentaoClient, collector: &mut TaskCollector) {
    if collector.is_full() {
        return;
    }

    let mut details: HashMap<u64, Task> = HashMap::new();
    let mut processed: HashSet<u64> = HashSet::new();
    let mut queue: VecDeque<u64> = collector.ids().into();
    let seeded = queue.len();

    while let Some(task_id) = queue.pop_front() {
        if !processed.insert(task_id) {
            continue;
        }

        let detail = match details.remove(&task_id) {
            Some(detail) => detail,
            None => match get_task_detail(client, task_id).await {
                Ok(detail) => detail,
                Err(err) => {
                    tracing::debug!(
                        target: "zentao.discover",
                        stage = "discover.detail.skip",
                        task_id = task_id,
                        error = %err
                    );
                    continue;
                }
            },
        };

        for child_id in discover_children(&detail) {
            if collector.contains(child_id) {
                continue;
            }
            let child = match get_task_detail(client, child_id).await {
                Ok(child) => child,
                Err(err) => {
                    tracing::debug!(
                        target: "zentao.discover",
                        stage = "discover.child.skip",
                        parent_id = task_id,
                        child_id = child_id,
                        error = %err
                    );
                    continue;
                }
            };

            let added = collector.push(child.clone());
            collector.mark_seen(child_id);
            if !added {
                continue;
            }
            tracing::debug!(
                target: "zentao.discover",
                stage = "discover.child.added",
                parent_id = task_id,
                child_id = child_id
            );
            details.insert(child_id, child);
            queue.push_back(child_id);
            if collector.is_full() {
                return;
            }
        }
    }

    tracing::debug!(
        target: "zentao.discover",
        stage = "discover.done",
        seeded = seeded,
        total = collector.len()
    );
}
