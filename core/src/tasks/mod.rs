mod aggregate;
mod collect;
mod create;
mod detail;
mod discover;
mod pager;
mod update;

pub use aggregate::{
    aggregate_tasks, get_my_tasks, list_assigned_tasks, select_executions, TaskQuery,
};
pub use collect::TaskCollector;
pub use create::{
    create_task, find_task_by_name, is_created_task, CreatedTask, TaskEncoding, NAME_SCAN_MAX_PAGES,
};
pub use detail::get_task_detail;
pub use discover::{discover_children, discover_children_in, expand, CHILD_KEYS};
pub use pager::{fetch_all_tasks, fetch_task_page, TaskPager};
pub use update::{finish_task, get_project_task_count, update_task};

pub(crate) use update::now_iso;
