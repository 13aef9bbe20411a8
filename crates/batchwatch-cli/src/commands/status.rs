//! Module for the "status" command: acquire a snapshot, resolve it, and show it.

use batchwatch::source::{file::FileCache, load_cached, Acquisition, Coordinator};
use chrono::Local;

use super::*;

#[derive(Args, Clone, Debug, Default)]
pub struct StatusOptions {
  /// Show the saved snapshot without contacting the store
  #[arg(long)]
  pub offline: bool,

  /// Print the status records as JSON instead of cards
  #[arg(long)]
  pub json: bool,
}

/// Function for the [`Commands::Status`] in the CLI.
pub async fn status<I: UserInteraction>(
  interaction: &I,
  config: &Config,
  status_options: StatusOptions,
) -> Result<()> {
  let StatusOptions { offline, json } = status_options;

  if !json {
    interaction.reply(ResponseContent::Info(if offline {
      "Loading saved snapshot..."
    } else {
      "Syncing..."
    }))?;
  }

  let cache = FileCache::new(&config.cache.path);
  let acquisition = if offline {
    load_cached(&cache).await
  } else {
    match Coordinator::from_config(config) {
      Ok(coordinator) => coordinator.acquire().await,
      Err(e) => {
        warn!("Cannot sync: {e}");
        load_cached(&cache).await
      },
    }
  };

  let Acquisition::Available { snapshot, provenance } = acquisition else {
    debug!("No snapshot from {} or the local cache", config.remote.base_url);
    if json {
      println!("{}", serde_json::json!({ "source": null, "accounts": [] }));
      return Ok(());
    }
    return interaction.reply(ResponseContent::Unavailable);
  };

  let statuses = resolve(&snapshot, Local::now().naive_local());
  if json {
    let document = serde_json::json!({
      "source": provenance.to_string(),
      "accounts": statuses,
    });
    println!("{}", serde_json::to_string_pretty(&document)?);
    return Ok(());
  }
  interaction.reply(ResponseContent::Statuses(&statuses, provenance))
}
