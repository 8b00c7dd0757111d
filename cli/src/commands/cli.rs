use clap::{Args as ClapArgs, Parser, Subcommand};
use zentao_core::api::{BugStatus, Resolution, TaskStatus};

#[derive(Parser, Debug)]
#[command(name = "zentao", version, about = "Query and update a Zentao instance")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Save connection settings (when given) and verify them by logging in.
    Init(InitArgs),
    /// Tasks assigned to you, or every task across executions with `--all`.
    MyTasks(MyTasksArgs),
    /// Show one task.
    Task(IdArgs),
    UpdateTask(UpdateTaskArgs),
    /// Mark a task done, stamping the finish date.
    FinishTask(FinishTaskArgs),
    CreateTask(CreateTaskArgs),
    Products,
    /// List projects through the local cache.
    Projects(ProjectsArgs),
    Executions(ExecutionsArgs),
    ProjectTaskCount(ProjectTaskCountArgs),
    MyBugs(MyBugsArgs),
    /// Show one bug.
    Bug(IdArgs),
    ResolveBug(ResolveBugArgs),
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct InitArgs {
    #[arg(long, requires_all = ["username", "password"])]
    pub url: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    #[arg(long)]
    pub api_version: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct IdArgs {
    pub id: u64,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct MyTasksArgs {
    #[arg(long, default_value = "all")]
    pub status: TaskStatus,

    /// Aggregate across executions instead of listing only your assignments.
    #[arg(long = "all")]
    pub include_all: bool,

    #[arg(long)]
    pub execution_id: Option<u64>,

    #[arg(long)]
    pub project_id: Option<u64>,

    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub limit: Option<u64>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct WorkLogArgs {
    #[arg(long)]
    pub consumed: Option<f64>,

    #[arg(long)]
    pub left: Option<f64>,

    #[arg(long)]
    pub comment: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct UpdateTaskArgs {
    pub id: u64,

    #[command(flatten)]
    pub work: WorkLogArgs,

    #[arg(long)]
    pub status: Option<TaskStatus>,

    #[arg(long)]
    pub finished_date: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct FinishTaskArgs {
    pub id: u64,

    #[command(flatten)]
    pub work: WorkLogArgs,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CreateTaskArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub execution: u64,

    #[arg(long)]
    pub project: Option<u64>,

    #[arg(long)]
    pub desc: Option<String>,

    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
    pub pri: Option<u8>,

    #[arg(long)]
    pub estimate: Option<f64>,

    #[arg(long)]
    pub module: Option<u64>,

    #[arg(long)]
    pub story: Option<u64>,

    /// Task type, e.g. `devel` or `test`.
    #[arg(long = "type")]
    pub kind: Option<String>,

    #[arg(long)]
    pub assigned_to: Option<String>,

    #[arg(long)]
    pub est_started: Option<String>,

    #[arg(long)]
    pub deadline: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ProjectsArgs {
    /// Bypass both cache tiers.
    #[arg(long)]
    pub refresh: bool,

    /// Maximum cache age in milliseconds (default one day).
    #[arg(long)]
    pub ttl_ms: Option<u64>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ExecutionsArgs {
    #[arg(long)]
    pub project_id: Option<u64>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ProjectTaskCountArgs {
    pub project_id: u64,

    #[arg(long, default_value = "all")]
    pub status: TaskStatus,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct MyBugsArgs {
    #[arg(long, default_value = "all")]
    pub status: BugStatus,

    #[arg(long)]
    pub product_id: Option<u64>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ResolveBugArgs {
    pub id: u64,

    #[arg(long)]
    pub resolution: Resolution,

    #[arg(long)]
    pub resolved_build: Option<String>,

    #[arg(long)]
    pub duplicate_bug: Option<u64>,

    #[arg(long)]
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Commands {
        Args::try_parse_from(std::iter::once("zentao").chain(argv.iter().copied()))
            .unwrap()
            .command
    }

    #[test]
    fn my_tasks_flags() {
        let argv = [
            "my-tasks",
            "--all",
            "--status",
            "doing",
            "--project-id",
            "7",
            "--limit",
            "5",
        ];
        let Commands::MyTasks(args) = parse(&argv) else {
            panic!("expected my-tasks");
        };
        assert!(args.include_all);
        assert_eq!(args.status, TaskStatus::Doing);
        assert_eq!(args.project_id, Some(7));
        assert_eq!(args.limit, Some(5));
    }

    #[test]
    fn create_task_rejects_out_of_range_priority() {
        let argv = [
            "zentao",
            "create-task",
            "--name",
            "x",
            "--execution",
            "1",
            "--pri",
            "9",
        ];
        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn zero_limit_is_rejected() {
        assert!(Args::try_parse_from(["zentao", "my-tasks", "--limit", "0"]).is_err());
    }

    #[test]
    fn resolve_bug_parses_resolution() {
        let argv = [
            "resolve-bug",
            "12",
            "--resolution",
            "fixed",
            "--resolved-build",
            "trunk",
        ];
        let Commands::ResolveBug(args) = parse(&argv) else {
            panic!("expected resolve-bug");
        };
        assert_eq!(args.id, 12);
        assert_eq!(args.resolution, Resolution::Fixed);
        assert_eq!(args.resolved_build.as_deref(), Some("trunk"));
    }

    #[test]
    fn init_url_requires_credentials() {
        assert!(Args::try_parse_from(["zentao", "init", "--url", "http://z"]).is_err());
        assert!(matches!(parse(&["init"]), Commands::Init(_)));
    }
}
