//! marquee - movie and series search over the OMDb catalog.

/// Application configuration (TOML).
mod config;
/// Tracing subscriber setup.
mod logging;
/// Terminal UI components.
mod tui;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::instrument;
use url::Url;

use crate::config::{AppConfig, resolve_config_path, resolve_log_path};
use crate::tui::detail::{DetailLoader, DetailState};
use crate::tui::presenter::{self, DetailView, PROMPT_MESSAGE, ResultView};
use crate::tui::search::QueryController;
use crate::tui::{BrowserOptions, run_browser};
use marquee_api::omdb::{Category, OmdbClient, PlotLength, SearchParams, search_with_params};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// OMDb API key. Takes precedence over `OMDB_API_KEY` and the config file.
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Search the catalog by title.
    Search(SearchArgs),
    /// Show full details for one IMDb ID.
    Details(DetailsArgs),
    /// List entries for the featured term.
    ///
    /// Use `browse --featured` to open entries from the same listing.
    Featured(FeaturedArgs),
    /// Browse the catalog interactively via TUI.
    Browse(BrowseArgs),
    /// Manage the configuration file.
    Config(ConfigCommand),
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Title to search for.
    #[arg(long, short)]
    query: String,

    /// Restrict results to one kind.
    #[arg(long = "type", value_enum)]
    category: Option<CategoryArg>,

    /// Restrict results to one release year.
    #[arg(long)]
    year: Option<u32>,
}

/// Entry kinds accepted by `--type`.
#[derive(Clone, Copy, ValueEnum)]
enum CategoryArg {
    /// Feature films.
    Movie,
    /// TV series.
    Series,
    /// Single episodes.
    Episode,
}

impl From<CategoryArg> for Category {
    fn from(value: CategoryArg) -> Self {
        match value {
            CategoryArg::Movie => Self::Movie,
            CategoryArg::Series => Self::Series,
            CategoryArg::Episode => Self::Episode,
        }
    }
}

/// Arguments for the `details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// IMDb ID (e.g. tt0372784).
    #[arg(long)]
    id: String,

    /// Plot length.
    #[arg(long, value_enum, default_value_t = PlotArg::Full)]
    plot: PlotArg,
}

/// Plot lengths accepted by `--plot`.
#[derive(Clone, Copy, ValueEnum)]
enum PlotArg {
    /// One-paragraph synopsis.
    Short,
    /// Full plot.
    Full,
}

impl From<PlotArg> for PlotLength {
    fn from(value: PlotArg) -> Self {
        match value {
            PlotArg::Short => Self::Short,
            PlotArg::Full => Self::Full,
        }
    }
}

/// Arguments for the `featured` subcommand.
#[derive(clap::Args)]
struct FeaturedArgs {
    /// Term to list (default: `search.featured_term` from config).
    #[arg(long)]
    term: Option<String>,
}

/// Arguments for the `browse` subcommand.
#[derive(clap::Args)]
struct BrowseArgs {
    /// Query to start with.
    #[arg(long, short, conflicts_with = "featured")]
    query: Option<String>,

    /// Start with the featured term from config.
    #[arg(long)]
    featured: bool,
}

impl BrowseArgs {
    /// Query typed in before the first frame.
    fn initial_query(&self, config: &AppConfig) -> Option<String> {
        if self.featured {
            return Some(config.search.featured_term.clone());
        }
        self.query.clone()
    }
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show the effective configuration.
    Show,
    /// Write a default config file.
    Init(ConfigInitArgs),
}

/// Arguments for the `config init` subcommand.
#[derive(clap::Args)]
struct ConfigInitArgs {
    /// Overwrite an existing file.
    #[arg(long)]
    force: bool,
}

/// Loads the config file for `dir`.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file is invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let path = resolve_config_path(dir)?;
    AppConfig::load(&path)
}

/// Builds an OMDb client from config, the CLI flag and the environment.
///
/// # Errors
///
/// Returns an error if the configured base URL is invalid or the client fails to build.
#[instrument(skip_all)]
fn build_omdb_client(config: &AppConfig, cli_api_key: Option<&str>) -> Result<OmdbClient> {
    let env_api_key = std::env::var("OMDB_API_KEY").ok();
    let api_key = config
        .omdb
        .resolve_api_key(cli_api_key, env_api_key.as_deref());
    let base_url = Url::parse(&config.omdb.base_url)
        .with_context(|| format!("invalid omdb.base_url: {}", config.omdb.base_url))?;

    OmdbClient::builder()
        .api_key(api_key)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .base_url(base_url)
        .timeout(config.omdb.timeout())
        .build()
        .context("failed to build OMDb client")
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or the client fails to build.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>, api_key: Option<&str>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_omdb_client(&config, api_key)?;

    if args.query.trim().is_empty() {
        tracing::info!("{PROMPT_MESSAGE}");
        return Ok(());
    }

    let mut params = SearchParams::new(args.query.trim());
    if let Some(category) = args.category {
        params = params.category(category.into());
    }
    if let Some(year) = args.year {
        params = params.year(year);
    }

    let results = search_with_params(&client, &params).await;

    match presenter::present(
        &args.query,
        false,
        &results,
        &config.search.placeholder_poster,
    ) {
        ResultView::Prompt | ResultView::Searching { .. } => tracing::info!("{PROMPT_MESSAGE}"),
        ResultView::NoResults { term } => {
            tracing::info!("{}", presenter::no_results_message(term));
        }
        ResultView::Results { summary, rows } => {
            tracing::info!("{summary}");
            tracing::info!("#\tIMDb ID\t\tYear\tType\tTitle\t\t\tPoster");
            for row in &rows {
                tracing::info!(
                    "{}\t{}\t{}\t{}\t{}\t\t\t{}",
                    row.rank,
                    row.imdb_id,
                    row.year,
                    row.category,
                    row.title,
                    row.poster,
                );
            }
        }
    }

    Ok(())
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or the client fails to build.
#[instrument(skip_all)]
async fn run_details(
    args: &DetailsArgs,
    dir: Option<&PathBuf>,
    api_key: Option<&str>,
) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_omdb_client(&config, api_key)?;

    let mut loader = DetailLoader::new(Arc::new(client)).with_plot(args.plot.into());
    loader.open(args.id.trim());
    loader.wait_for_result().await;

    match loader.state() {
        DetailState::Loaded(record) => {
            log_detail(&presenter::detail_view(
                record,
                &config.search.placeholder_poster,
            ));
        }
        _ => tracing::info!("No details found for {}", args.id),
    }

    Ok(())
}

/// Logs a detail view line by line.
fn log_detail(view: &DetailView) {
    tracing::info!("{}", view.title);
    if !view.badges.is_empty() {
        tracing::info!("{}", view.badges.join(" | "));
    }
    if !view.genres.is_empty() {
        tracing::info!("Genres: {}", view.genres.join(", "));
    }
    tracing::info!("Plot: {}", view.plot);
    for (label, value) in &view.fields {
        tracing::info!("{label}: {value}");
    }
    if let Some(awards) = &view.awards {
        tracing::info!("Awards: {awards}");
    }
    tracing::info!("IMDb rating: {}", view.imdb_rating);
    for rating in &view.ratings {
        tracing::info!("  {rating}");
    }
    tracing::info!("Poster: {}", view.poster);
    tracing::info!("URL: {}", view.imdb_url);
}

/// Runs the `featured` subcommand.
///
/// # Errors
///
/// Returns an error if the term is blank, the config cannot be loaded or the client fails to build.
#[instrument(skip_all)]
async fn run_featured(
    args: &FeaturedArgs,
    dir: Option<&PathBuf>,
    api_key: Option<&str>,
) -> Result<()> {
    let config = load_config(dir)?;
    let term = args
        .term
        .clone()
        .unwrap_or_else(|| config.search.featured_term.clone());
    if term.trim().is_empty() {
        bail!("featured term must not be empty");
    }
    let client = build_omdb_client(&config, api_key)?;

    let mut controller = QueryController::new(Arc::new(client), Duration::ZERO);
    controller.set_query(term.as_str());
    controller.wait_for_results().await;

    let searched = controller.searched_term().unwrap_or_else(|| term.trim());
    if controller.results().is_empty() {
        tracing::info!("{}", presenter::no_results_message(searched));
        return Ok(());
    }

    tracing::info!("Featured: {searched}");
    for (rank, record) in (1..).zip(controller.results()) {
        tracing::info!(
            "{}",
            presenter::featured_line(rank, record, &config.search.placeholder_poster)
        );
    }
    tracing::info!("Open an entry with `details --id <ID>` or `browse --featured`");

    Ok(())
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the TUI fails.
async fn run_browse(args: &BrowseArgs, dir: Option<&PathBuf>, api_key: Option<&str>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_omdb_client(&config, api_key)?;
    tracing::info!(base_url = %client.base_url(), "Starting browser");

    let initial_query = args.initial_query(&config);
    run_browser(
        Arc::new(client),
        BrowserOptions {
            quiet_period: config.search.debounce(),
            placeholder_poster: config.search.placeholder_poster,
            initial_query,
        },
    )
    .await
}

/// Masks all but the first four characters of an API key.
fn mask_api_key(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    format!("{visible}****")
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config path cannot be resolved or the file is invalid.
fn run_config_show(dir: Option<&PathBuf>, api_key: Option<&str>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    let config = AppConfig::load(&path)?;

    if path.exists() {
        tracing::info!("Config file: {}", path.display());
    } else {
        tracing::info!("Config file: {} (not found, using defaults)", path.display());
    }

    let env_api_key = std::env::var("OMDB_API_KEY").ok();
    let resolved_key = config
        .omdb
        .resolve_api_key(api_key, env_api_key.as_deref());

    tracing::info!("omdb.api_key = {}", mask_api_key(&resolved_key));
    tracing::info!("omdb.base_url = {}", config.omdb.base_url);
    tracing::info!("omdb.timeout_secs = {}", config.omdb.timeout_secs);
    tracing::info!("search.debounce_ms = {}", config.search.debounce_ms);
    tracing::info!("search.featured_term = {}", config.search.featured_term);
    tracing::info!(
        "search.placeholder_poster = {}",
        config.search.placeholder_poster
    );

    Ok(())
}

/// Runs the `config init` subcommand.
///
/// # Errors
///
/// Returns an error if the file exists (without `--force`) or cannot be written.
fn run_config_init(args: &ConfigInitArgs, dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    if path.exists() && !args.force {
        bail!(
            "config file already exists: {} (use --force to overwrite)",
            path.display()
        );
    }

    AppConfig::default().save(&path)?;
    tracing::info!("Wrote default config to {}", path.display());
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = match cli.command {
        Commands::Browse(_) => Some(resolve_log_path(cli.dir.as_ref())?),
        _ => None,
    };
    logging::init(log_file.as_deref())?;

    let dir = cli.dir.as_ref();
    let api_key = cli.api_key.as_deref();
    match cli.command {
        Commands::Search(args) => run_search(&args, dir, api_key).await,
        Commands::Details(args) => run_details(&args, dir, api_key).await,
        Commands::Featured(args) => run_featured(&args, dir, api_key).await,
        Commands::Browse(args) => run_browse(&args, dir, api_key).await,
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Show => run_config_show(dir, api_key),
            ConfigSubcommands::Init(args) => run_config_init(&args, dir),
        },
    }
}
