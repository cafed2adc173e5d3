mod app;
mod config;
mod demo;
mod event;
mod screen;

use clap::Parser;
use color_eyre::Result;
use multiselect::{JsonFields, MultiSelect};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "multiselect-demo")]
#[command(about = "Terminal demo of a searchable multi-select dropdown")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/multiselect/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// JSON file with an array of items to pick from (default: built-in people)
  #[arg(short, long)]
  items: Option<PathBuf>,

  /// Field of each JSON item used as identifier
  #[arg(long)]
  key_field: Option<String>,

  /// Field of each JSON item shown and searched
  #[arg(long)]
  label_field: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;

  // Command line overrides
  if let Some(items) = args.items {
    config.items.path = Some(items);
  }
  if let Some(field) = args.key_field {
    config.items.key_field = field;
  }
  if let Some(field) = args.label_field {
    config.items.label_field = field;
  }

  let _guard = init_logging(&config.log_dir())?;
  info!("Starting multiselect demo");

  match &config.items.path {
    Some(path) => {
      let fields = JsonFields::new(&config.items.key_field, &config.items.label_field)?;
      let items = demo::load_items(path)?;
      info!(
        count = items.len(),
        path = %path.display(),
        key_field = fields.key_field(),
        label_field = fields.label_field(),
        "Loaded items"
      );

      let mut select = MultiSelect::new(fields, config.widget.clone())?;
      select.set_items(items)?;
      app::App::new(select).run().await?;
    }
    None => {
      let mut select = MultiSelect::new(demo::person_accessor(), config.widget.clone())?;
      select.set_items(demo::people())?;
      app::App::new(select).run().await?;
    }
  }

  Ok(())
}

/// Log to a file; the terminal belongs to the UI
fn init_logging(dir: &Path) -> Result<WorkerGuard> {
  std::fs::create_dir_all(dir)?;
  let appender = tracing_appender::rolling::never(dir, "multiselect.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(writer)
    .with_ansi(false)
    .init();

  Ok(guard)
}
