use anyhow::Result;
use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cse_client::CseClient;
use mobiwatch_common::{catalogs, Catalogs, Config};
use mobiwatch_scout::fetchers::{GoogleSearchFetcher, HttpPageWatcher, KkjFetcher};
use mobiwatch_scout::notify::EmailNotifier;
use mobiwatch_scout::scheduling::Budget;
use mobiwatch_scout::scout::{Scout, ScoutDeps};
use mobiwatch_scout::store::JsonStore;
use mobiwatch_scout::traits::SearchFetcher;
use resend_client::ResendClient;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("mobiwatch=info".parse()?))
        .init();

    info!("Mobiwatch starting...");

    let config = Config::from_env();
    config.log_redacted();

    let catalogs = Catalogs::builtin();
    let budget = Budget::builtin();

    let cse = CseClient::new(config.google_api_key.clone(), config.google_cse_id.clone());
    let site_search = catalogs
        .sites
        .iter()
        .map(|site| {
            (
                site.name.clone(),
                Box::new(GoogleSearchFetcher::aggregator(cse.clone(), &site.name))
                    as Box<dyn SearchFetcher>,
            )
        })
        .collect();

    let deps = ScoutDeps {
        generic_search: Box::new(GoogleSearchFetcher::generic(cse)),
        site_search,
        procurement: Box::new(KkjFetcher::new(catalogs::target_lg_codes())),
        page_watcher: Box::new(HttpPageWatcher::new()),
        notifier: Box::new(EmailNotifier::new(
            ResendClient::new(config.resend_api_key.clone()),
            config.notify_from.clone(),
            config.notify_to.clone(),
        )),
    };

    let scout = Scout::new(catalogs, budget, JsonStore::new(&config.data_dir), deps)?;
    let stats = scout.run(Utc::now()).await?;
    info!("Watch run complete. {stats}");

    Ok(())
}
