pub mod lenient;

mod bug;
mod fields;
mod list;
mod project;
mod task;

pub(crate) use fields::to_fields;
pub(crate) use list::{decode_list, ListShape};

pub use bug::{Bug, BugResolution, BugStatus, Resolution};
pub use project::{Execution, Product, Project};
pub use task::{CreateTaskRequest, Task, TaskPage, TaskStatus, TaskUpdate, DEFAULT_PAGE_SIZE};
