use std::time::Duration;

use zentao_core::api::{ProjectQuery, ZentaoSession};

use super::cli::{ExecutionsArgs, ProjectsArgs};
use super::print_json;

pub async fn products(session: &ZentaoSession) -> anyhow::Result<()> {
    print_json(&session.get_products().await?)
}

pub async fn projects(session: &ZentaoSession, args: ProjectsArgs) -> anyhow::Result<()> {
    let query = ProjectQuery {
        refresh: args.refresh,
        ttl: args.ttl_ms.map(Duration::from_millis),
    };
    print_json(&session.get_projects(query).await?)
}

pub async fn executions(session: &ZentaoSession, args: ExecutionsArgs) -> anyhow::Result<()> {
    print_json(&session.get_executions(args.project_id).await?)
}
