use zentao_core::api::{BugResolution, ZentaoSession};

use super::cli::{MyBugsArgs, ResolveBugArgs};
use super::print_json;

pub async fn my_bugs(session: &ZentaoSession, args: MyBugsArgs) -> anyhow::Result<()> {
    print_json(&session.get_my_bugs(args.status, args.product_id).await?)
}

pub async fn bug(session: &ZentaoSession, id: u64) -> anyhow::Result<()> {
    print_json(&session.get_bug_detail(id).await?)
}

pub async fn resolve_bug(session: &ZentaoSession, args: ResolveBugArgs) -> anyhow::Result<()> {
    let resolution = BugResolution {
        resolution: args.resolution,
        resolved_build: args.resolved_build,
        duplicate_bug: args.duplicate_bug,
        comment: args.comment,
    };
    print_json(&session.resolve_bug(args.id, &resolution).await?)
}
