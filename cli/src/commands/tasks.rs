use zentao_core::api::{CreateTaskRequest, TaskQuery, TaskUpdate, ZentaoSession};

use super::cli::{
    CreateTaskArgs, FinishTaskArgs, MyTasksArgs, ProjectTaskCountArgs, UpdateTaskArgs, WorkLogArgs,
};
use super::print_json;

fn work_update(work: WorkLogArgs) -> TaskUpdate {
    TaskUpdate {
        consumed: work.consumed,
        left: work.left,
        comment: work.comment,
        ..TaskUpdate::default()
    }
}

pub async fn my_tasks(session: &ZentaoSession, args: MyTasksArgs) -> anyhow::Result<()> {
    let query = TaskQuery {
        execution_id: args.execution_id,
        project_id: args.project_id,
        limit: args.limit.map(|n| usize::try_from(n).unwrap_or(usize::MAX)),
    };
    let tasks = session.get_my_tasks(args.status, args.include_all, &query).await?;
    tracing::debug!(target: "zentao", stage = "my_tasks.out", tasks = tasks.len());
    print_json(&tasks)
}

pub async fn task(session: &ZentaoSession, id: u64) -> anyhow::Result<()> {
    print_json(&session.get_task_detail(id).await?)
}

pub async fn update_task(session: &ZentaoSession, args: UpdateTaskArgs) -> anyhow::Result<()> {
    let update = TaskUpdate {
        status: args.status,
        finished_date: args.finished_date,
        ..work_update(args.work)
    };
    print_json(&session.update_task(args.id, &update).await?)
}

pub async fn finish_task(session: &ZentaoSession, args: FinishTaskArgs) -> anyhow::Result<()> {
    print_json(&session.finish_task(args.id, work_update(args.work)).await?)
}

pub async fn create_task(session: &ZentaoSession, args: CreateTaskArgs) -> anyhow::Result<()> {
    let request = CreateTaskRequest {
        name: args.name,
        desc: args.desc,
        pri: args.pri,
        estimate: args.estimate,
        project: args.project,
        execution: Some(args.execution),
        module: args.module,
        story: args.story,
        kind: args.kind,
        assigned_to: args.assigned_to,
        est_started: args.est_started,
        deadline: args.deadline,
    };
    let created = session.create_task(&request).await?;
    if !created.is_verified() {
        tracing::warn!(
            target: "zentao",
            stage = "create_task.unverified",
            "backend response carries no task id"
        );
    }
    print_json(&created)
}

pub async fn project_task_count(
    session: &ZentaoSession,
    args: ProjectTaskCountArgs,
) -> anyhow::Result<()> {
    let count = session.get_project_task_count(args.project_id, args.status).await?;
    print_json(&serde_json::json!({ "projectId": args.project_id, "count": count }))
}
