//! Terminal output and prompts.
//!
//! Commands talk to the user only through [`UserInteraction`], so every message shares the
//! same prefixes and colors and `--accept-defaults` can answer every prompt.

use console::Style;
use dialoguer::Confirm;

use super::*;

pub static INFO_PREFIX: &str = "ℹ ";
pub static SUCCESS_PREFIX: &str = "✓ ";
pub static ERROR_PREFIX: &str = "✗ ";
pub static WARNING_PREFIX: &str = "! ";
pub static PROMPT_PREFIX: &str = "❯ ";
pub static PIN: &str = "📌";
pub static CONTINUE_PREFIX: &str = "│  ";
pub static TREE_LEAF: &str = "└";

/// Something a command wants to show.
#[derive(Debug)]
pub enum ResponseContent<'a> {
  /// Resolved account statuses and where their snapshot came from
  Statuses(&'a [StatusRecord], Provenance),
  /// Neither the store nor the saved snapshot produced data
  Unavailable,
  Success(&'a str),
  Warning(&'a str),
  Error(&'a BatchwatchCliError),
  Info(&'a str),
}

pub trait UserInteraction {
  fn confirm(&self, message: &str) -> Result<bool>;
  fn reply(&self, content: ResponseContent) -> Result<()>;
}

impl UserInteraction for Cli {
  fn confirm(&self, message: &str) -> Result<bool> {
    if self.accept_defaults {
      return Ok(true);
    }
    Ok(
      Confirm::new()
        .with_prompt(format!("{} {}", style(PROMPT_PREFIX).cyan(), message))
        .default(false)
        .wait_for_newline(true)
        .interact()?,
    )
  }

  fn reply(&self, content: ResponseContent) -> Result<()> {
    match content {
      ResponseContent::Statuses(statuses, provenance) => print_statuses(statuses, provenance),
      ResponseContent::Unavailable => {
        println!("{} {}", style(ERROR_PREFIX).red(), style("Connection Failed").red().bold());
        println!("{}", style("No internet & No saved file.").red());
      },
      ResponseContent::Success(message) => println!("{} {message}", style(SUCCESS_PREFIX).green()),
      ResponseContent::Warning(message) => println!("{} {message}", style(WARNING_PREFIX).yellow()),
      ResponseContent::Error(error) =>
        eprintln!("{} {}", style(ERROR_PREFIX).red(), style(error).red()),
      ResponseContent::Info(message) => println!("{} {message}", style(INFO_PREFIX).cyan()),
    }
    Ok(())
  }
}

/// Prints the source header and one card per account, sorted by account name.
fn print_statuses(statuses: &[StatusRecord], provenance: Provenance) {
  print!("{}", render_statuses(statuses, provenance));
}

/// Renders what [`print_statuses`] shows.
///
/// The bundled sources never yield a snapshot without accounts, but a custom [`LocalCache`] or
/// [`RemoteSource`] can, and that case gets its own line.
fn render_statuses(statuses: &[StatusRecord], provenance: Provenance) -> String {
  let source_style = match provenance {
    Provenance::Cloud => Style::new().green(),
    Provenance::OfflineCache => Style::new().yellow(),
  };
  let mut out = format!("{}\n", source_style.apply_to(format!("Data Source: {provenance}")));

  if statuses.is_empty() {
    out.push_str(&format!("{}\n", style("No accounts found.").dim()));
    return out;
  }

  let mut statuses: Vec<&StatusRecord> = statuses.iter().collect();
  statuses.sort_by(|a, b| a.account_name.cmp(&b.account_name));

  for status in statuses {
    let tier_style = tier_style(status.display_tier());
    out.push('\n');
    out.push_str(&format!("{} {}\n", PIN, style(&status.account_name).bold()));
    out.push_str(&format!("{}{}\n", CONTINUE_PREFIX, style("CURRENT BATCH:").dim()));
    out.push_str(&format!("{}{}\n", CONTINUE_PREFIX, style(&status.current_batch_label).bold()));
    out.push_str(&format!(
      "{}{}\n",
      CONTINUE_PREFIX,
      tier_style.apply_to(&status.time_message).bold()
    ));
    out.push_str(&format!(
      "{}  {}\n",
      TREE_LEAF,
      style(format!("Ends: {}", status.ends_label())).dim()
    ));
  }
  out
}

/// Color for a tier. Expired and critical share red.
fn tier_style(tier: UrgencyTier) -> Style {
  match tier {
    UrgencyTier::Expired | UrgencyTier::Critical => Style::new().red(),
    UrgencyTier::Warning => Style::new().yellow(),
    UrgencyTier::Safe => Style::new().green(),
    UrgencyTier::Unknown => Style::new().dim(),
  }
}
