use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use studio_engine::{
    HttpOptionFetcher, OptionSource, RemoteOptionResolver, ResolutionState, ResponseFormat, StudioConfig, config,
};
use studio_tui::{PickerOutcome, run_picker};
use studio_types::FieldMapping;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Resolve and pick values for option-backed studio fields.
#[derive(Debug, Parser)]
#[command(name = "studio", version, about)]
struct Cli {
    /// Path to the studio config file (defaults to $STUDIO_CONFIG_PATH or the user config dir).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List configured option fields and where they resolve.
    Fields,
    /// Run one resolution cycle and print the options as JSON.
    Resolve(ResolveArgs),
    /// Open the interactive picker and print the committed patch as JSON.
    Pick(PickArgs),
}

#[derive(Debug, Args)]
struct ResolveArgs {
    /// Configured field name, e.g. equipmentGuide.heroEquipment.
    #[arg(required_unless_present = "url", conflicts_with = "url")]
    field: Option<String>,

    /// Resolve an ad-hoc URL instead of a configured field.
    #[arg(long)]
    url: Option<String>,

    /// Item key holding the option label (requires --value).
    #[arg(long, requires_all = ["url", "value"])]
    label: Option<String>,

    /// Item key holding the option value (requires --label).
    #[arg(long, requires_all = ["url", "label"])]
    value: Option<String>,

    /// Item key holding an optional image URL.
    #[arg(long, requires = "label")]
    image: Option<String>,

    /// Dot path to the option array inside an object body, e.g. data.models.
    #[arg(long, requires = "label")]
    items_path: Option<String>,
}

#[derive(Debug, Args)]
struct PickArgs {
    /// Configured field name.
    field: String,

    /// Value the field currently holds; highlighted when the list loads.
    #[arg(long)]
    current: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(matches!(cli.command, Command::Pick(_)))?;

    let loaded = match cli.config.as_deref() {
        Some(path) => config::load_config_from_path(path),
        None => config::load_config(),
    }
    .context("load studio config")?;
    let studio_config = config::install(loaded)?;

    match cli.command {
        Command::Fields => list_fields(studio_config),
        Command::Resolve(args) => resolve_command(studio_config, args).await,
        Command::Pick(args) => pick_command(studio_config, args).await,
    }
}

/// Install the tracing subscriber. The picker owns the terminal, so its logs go
/// to `<cache_dir>/studio/studio.log` instead of stderr.
fn init_tracing(to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if !to_file {
        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
        return Ok(());
    }

    let log_dir = dirs_next::cache_dir().unwrap_or_else(|| PathBuf::from(".")).join("studio");
    fs::create_dir_all(&log_dir).with_context(|| format!("create log directory {}", log_dir.display()))?;
    let log_path = log_dir.join("studio.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("open log file {}", log_path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

fn list_fields(config: &StudioConfig) -> Result<()> {
    for (name, definition) in &config.fields {
        let target = match config.option_source(name) {
            Ok(source) if source.is_unconfigured() => "(unconfigured: set backend_url)".to_string(),
            Ok(source) => source.url,
            Err(error) => format!("(error: {error})"),
        };
        println!("{name}\t{}\t{target}", definition.title);
    }
    Ok(())
}

fn fetcher(config: &StudioConfig) -> Result<Arc<HttpOptionFetcher>> {
    let fetcher = HttpOptionFetcher::from_settings(config.client_settings()).context("build option fetcher")?;
    Ok(Arc::new(fetcher))
}

fn adhoc_source(url: String, args: &ResolveArgs) -> OptionSource {
    let format = match (&args.label, &args.value) {
        (Some(label), Some(value)) => {
            let mut mapping = FieldMapping::new(label.clone(), value.clone());
            if let Some(image) = &args.image {
                mapping = mapping.with_image(image.clone());
            }
            if let Some(items_path) = &args.items_path {
                mapping = mapping.with_items_path(items_path.clone());
            }
            ResponseFormat::FieldMap(mapping)
        }
        _ => ResponseFormat::Identity,
    };
    OptionSource::new(url, format)
}

async fn resolve_command(config: &StudioConfig, args: ResolveArgs) -> Result<()> {
    let source = match (&args.field, &args.url) {
        (_, Some(url)) => adhoc_source(url.clone(), &args),
        (Some(field), None) => config.option_source(field)?,
        (None, None) => bail!("pass a field name or --url"),
    };
    debug!(unconfigured = source.is_unconfigured(), "resolving option source");

    let mut resolver = RemoteOptionResolver::new(fetcher(config)?);
    resolver.resolve(source);
    match resolver.settled().await {
        ResolutionState::Ready(options) => {
            info!(option_count = options.len(), "resolved options");
            println!("{}", serde_json::to_string_pretty(&options)?);
            Ok(())
        }
        ResolutionState::Failed(error) => bail!("There has been an error: {error}"),
        other => bail!("resolution did not settle: {other:?}"),
    }
}

async fn pick_command(config: &StudioConfig, args: PickArgs) -> Result<()> {
    let definition = config
        .field(&args.field)
        .with_context(|| format!("unknown option field '{}'", args.field))?;
    let source = config.option_source(&args.field)?;

    match run_picker(&definition.title, source, fetcher(config)?, args.current).await? {
        PickerOutcome::Committed(patch) => println!("{}", serde_json::to_string(&patch)?),
        PickerOutcome::Cancelled => eprintln!("No change."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn resolve_accepts_field_or_url() {
        let cli = Cli::try_parse_from(["studio", "resolve", "equipmentGuide.heroEquipment"]).unwrap();
        assert!(matches!(cli.command, Command::Resolve(ResolveArgs { field: Some(_), url: None, .. })));

        let cli = Cli::try_parse_from([
            "studio",
            "--config",
            "studio.yaml",
            "resolve",
            "--url",
            "https://api.example.com/models",
            "--label",
            "model_name",
            "--value",
            "model_slug",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("studio.yaml")));
        let Command::Resolve(args) = cli.command else {
            panic!("expected resolve");
        };
        let source = adhoc_source(args.url.clone().unwrap(), &args);
        assert_eq!(source.format, ResponseFormat::FieldMap(FieldMapping::new("model_name", "model_slug")));
    }

    #[test]
    fn resolve_rejects_incomplete_mapping() {
        assert!(Cli::try_parse_from(["studio", "resolve"]).is_err());
        assert!(
            Cli::try_parse_from(["studio", "resolve", "--url", "https://api.example.com/models", "--label", "name"]).is_err()
        );
    }

    #[test]
    fn pick_takes_current_value() {
        let cli = Cli::try_parse_from(["studio", "pick", "equipmentGuide.heroEquipment", "--current", "x1"]).unwrap();
        let Command::Pick(args) = cli.command else {
            panic!("expected pick");
        };
        assert_eq!(args.current.as_deref(), Some("x1"));
    }
}
