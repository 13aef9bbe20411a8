//! Module for deleting the saved snapshot.

use batchwatch::source::file::FileCache;

use super::*;

/// Function for the [`Commands::Clean`] in the CLI.
pub fn clean<I: UserInteraction>(interaction: &I, config: &Config) -> Result<()> {
  let cache = FileCache::new(&config.cache.path);
  let path = cache.path().display();

  if !cache.path().exists() {
    return interaction.reply(ResponseContent::Info(&format!("No saved snapshot at {path}")));
  }

  if !interaction.confirm(&format!("Delete the saved snapshot at {path}?"))? {
    return interaction.reply(ResponseContent::Info("Operation cancelled"));
  }

  if cache.clear()? {
    interaction.reply(ResponseContent::Success(&format!("Saved snapshot removed from {path}")))
  } else {
    interaction.reply(ResponseContent::Info(&format!("No saved snapshot at {path}")))
  }
}
