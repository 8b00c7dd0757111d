use clap::Parser;
use zentao_core::api as core_api;

mod commands;
mod logging;

use commands::cli::{self, Commands};
use commands::{bugs, catalog, init, tasks};

#[tokio::main]
async fn main() {
    if let Err(e) = real_main().await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn real_main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    let options = core_api::RuntimeOptions::from_env();
    logging::init_tracing(options.debug).map_err(anyhow::Error::msg)?;

    dispatch(args.command, &options).await
}

fn open_session(options: &core_api::RuntimeOptions) -> anyhow::Result<core_api::ZentaoSession> {
    let config = core_api::load_default()?.ok_or_else(|| {
        anyhow::anyhow!(
            "no configuration found at {}; run `zentao init` first",
            core_api::primary_config_path().display()
        )
    })?;
    Ok(core_api::ZentaoSession::new(&config, options)?)
}

async fn dispatch(cmd: Commands, options: &core_api::RuntimeOptions) -> anyhow::Result<()> {
    if let Commands::Init(args) = cmd {
        return init::handle_init(args, options).await;
    }
    let session = &open_session(options)?;
    match cmd {
        Commands::Init(_) => Ok(()),
        Commands::MyTasks(args) => tasks::my_tasks(session, args).await,
        Commands::Task(args) => tasks::task(session, args.id).await,
        Commands::UpdateTask(args) => tasks::update_task(session, args).await,
        Commands::FinishTask(args) => tasks::finish_task(session, args).await,
        Commands::CreateTask(args) => tasks::create_task(session, args).await,
        Commands::ProjectTaskCount(args) => tasks::project_task_count(session, args).await,
        Commands::Products => catalog::products(session).await,
        Commands::Projects(args) => catalog::projects(session, args).await,
        Commands::Executions(args) => catalog::executions(session, args).await,
        Commands::MyBugs(args) => bugs::my_bugs(session, args).await,
        Commands::Bug(args) => bugs::bug(session, args.id).await,
        Commands::ResolveBug(args) => bugs::resolve_bug(session, args).await,
    }
}
