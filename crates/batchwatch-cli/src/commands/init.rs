//! Module for writing a batchwatch configuration file.

use super::*;

#[derive(Args, Clone, Debug)]
pub struct InitOptions {
  /// Root URL of the document store
  #[arg(long)]
  pub base_url:     Option<String>,
  /// Where to keep the last fetched snapshot
  #[arg(long)]
  pub cache_path:   Option<PathBuf>,
  /// Upper bound on a single fetch, in seconds
  #[arg(long)]
  pub timeout_secs: Option<u64>,
}

/// Function for the [`Commands::Init`] in the CLI.
pub fn init<I: UserInteraction>(
  interaction: &I,
  config_path: PathBuf,
  init_options: InitOptions,
) -> Result<()> {
  let InitOptions { base_url, cache_path, timeout_secs } = init_options;

  if config_path.exists()
    && !interaction.confirm(&format!(
      "A configuration already exists at {}, do you want to overwrite it?",
      config_path.display()
    ))?
  {
    interaction.reply(ResponseContent::Info(
      "Keeping the existing configuration, choose another location with --config",
    ))?;
    return Ok(());
  }

  let mut config = Config::default();
  if let Some(base_url) = base_url {
    config = config.with_base_url(base_url);
  } else {
    interaction.reply(ResponseContent::Warning(&format!(
      "No --base-url given, using {}",
      config.remote.base_url
    )))?;
  }
  if let Some(cache_path) = cache_path {
    config = config.with_cache_path(cache_path);
  }
  if let Some(timeout_secs) = timeout_secs {
    config = config.with_timeout_secs(timeout_secs);
  }

  // Fail here rather than on the first sync.
  config.remote.endpoint()?;
  config.save(&config_path)?;

  interaction.reply(ResponseContent::Success(&format!(
    "Configuration initialized successfully\nConfig path: {}\nStore endpoint: {}\nSnapshot \
     cache: {}",
    config_path.display(),
    config.remote.endpoint()?,
    config.cache.path.display(),
  )))
}
