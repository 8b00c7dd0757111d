//! Connection setup: persist settings, then prove they work.
use anyhow::Context;
use serde_json::json;
use zentao_core::api as core_api;

use super::cli::InitArgs;
use super::print_json;

pub async fn handle_init(
    args: InitArgs,
    options: &core_api::RuntimeOptions,
) -> anyhow::Result<()> {
    let (config, saved_to) = match args.url {
        Some(url) => {
            let env_version = std::env::var("ZENTAO_API_VERSION").ok();
            let config = core_api::ZentaoConfig {
                url,
                username: args.username.unwrap_or_default(),
                password: args.password.unwrap_or_default(),
                api_version: args.api_version.unwrap_or_default(),
            }
            .normalized(env_version.as_deref());
            if !config.is_complete() {
                anyhow::bail!("url, username and password must all be non-empty");
            }
            let path = core_api::save_config(&config)?;
            tracing::debug!(target: "zentao", stage = "init.saved", path = %path.display());
            (config, Some(path))
        }
        None => {
            let config = core_api::load_default()?.with_context(|| {
                format!(
                    "no configuration found; run `zentao init --url <url> \
                     --username <user> --password <password>` (writes {})",
                    core_api::primary_config_path().display()
                )
            })?;
            (config, None)
        }
    };

    let session = core_api::ZentaoSession::new(&config, options)?;
    session.login().await.context("credentials were rejected")?;

    print_json(&json!({
        "url": config.url,
        "username": config.username,
        "apiVersion": config.api_version,
        "configPath": saved_to.map(|p| p.display().to_string()),
    }))
}
