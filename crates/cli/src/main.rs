mod keys;
mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use paydesk_api::{EventHub, PaydeskClient, SearchKind, SearchResults};
use paydesk_types::{FieldState, PushEvent};
use paydesk_util::{PaydeskConfig, default_config_path, strip_markup};
use tracing::info;

/// Paydesk payment terminal. Without a subcommand the terminal UI starts.
#[derive(Debug, Parser)]
#[command(name = "paydesk", version, about)]
struct Cli {
    /// Backend URL; wins over PAYDESK_BASE_URL and the config file.
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Config file to use instead of the default location.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search accounts, products or categories.
    Search {
        /// One of accounts, products, categories.
        kind: SearchKind,
        query: String,
    },
    /// Print push events as they arrive, until Ctrl+C.
    Events,
    /// Run the money editor over a key script and print every state.
    Keys(KeysArgs),
    /// Show the config file location and the effective settings.
    Config {
        /// Write the defaults to the config file if it does not exist.
        #[arg(long)]
        init: bool,
    },
}

#[derive(Debug, Args)]
struct KeysArgs {
    /// Starting text of the field.
    #[arg(long, default_value = "")]
    text: String,

    /// Starting caret offset; defaults to the end of the text.
    #[arg(long)]
    caret: Option<usize>,

    /// Key names, e.g. `5 0 , PageUp ctrl+a`.
    #[arg(required = true, allow_hyphen_values = true)]
    keys: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // No subcommands => TUI
    if cli.command.is_none() {
        let log_path = logging::init_file()?;
        info!(path = %log_path.display(), "starting terminal UI");
        let config = load_config(cli.config.as_ref())?;
        let client = PaydeskClient::new(&config, cli.base_url.as_deref())?;
        return paydesk_tui::run(config, client).await;
    }

    logging::init_stderr();
    match cli.command {
        Some(Command::Search { kind, query }) => {
            let config = load_config(cli.config.as_ref())?;
            let client = PaydeskClient::new(&config, cli.base_url.as_deref())?;
            run_search(&client, &config, kind, &query).await
        }
        Some(Command::Events) => {
            let config = load_config(cli.config.as_ref())?;
            let client = PaydeskClient::new(&config, cli.base_url.as_deref())?;
            run_events(&client).await
        }
        Some(Command::Keys(args)) => run_keys(args),
        Some(Command::Config { init }) => run_config(cli.config, cli.base_url.as_deref(), init),
        None => Ok(()),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<PaydeskConfig> {
    let config = match path {
        Some(path) => PaydeskConfig::load_from(path),
        None => PaydeskConfig::load(),
    };
    config.context("failed to load configuration")
}

async fn run_search(client: &PaydeskClient, config: &PaydeskConfig, kind: SearchKind, query: &str) -> Result<()> {
    let results = client
        .search(kind, query)
        .await
        .with_context(|| format!("{kind} search failed"))?;
    for line in result_lines(&results, &config.currency_symbol) {
        println!("{line}");
    }
    Ok(())
}

/// One tab-separated line per row, with highlight markup removed.
fn result_lines(results: &SearchResults, symbol: &str) -> Vec<String> {
    let price = |text: &str| {
        let plain = strip_markup(text);
        if plain.is_empty() { plain } else { format!("{plain}{symbol}") }
    };
    match results {
        SearchResults::Accounts(rows) => rows
            .iter()
            .map(|row| {
                let permission = if row.shows_permission() {
                    strip_markup(&row.permission_search)
                } else {
                    String::new()
                };
                format!(
                    "{}\t{}\t{}\t{}",
                    row.id,
                    strip_markup(&row.name_search),
                    strip_markup(&row.mail_search),
                    permission
                )
            })
            .collect(),
        SearchResults::Products(rows) => rows
            .iter()
            .map(|row| {
                format!(
                    "{}\t{}\t{}\t{}",
                    row.id,
                    strip_markup(&row.name_search),
                    strip_markup(&row.category_search),
                    price(&row.current_price_search)
                )
            })
            .collect(),
        SearchResults::Categories(rows) => rows
            .iter()
            .map(|row| {
                format!(
                    "{}\t{}\t{}",
                    row.id,
                    strip_markup(&row.name_search),
                    price(&row.current_price_search)
                )
            })
            .collect(),
    }
}

async fn run_events(client: &PaydeskClient) -> Result<()> {
    let hub = Arc::new(EventHub::new());
    hub.subscribe("paydesk-cli", |event: &PushEvent| {
        println!("{}", event_line(event));
    });
    hub.connect(client);
    info!(base_url = client.base_url(), "listening for push events; press Ctrl+C to stop");

    tokio::signal::ctrl_c().await.context("failed to wait for Ctrl+C")?;
    hub.shutdown();
    Ok(())
}

fn event_line(event: &PushEvent) -> String {
    let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
    let payload = serde_json::to_string(event).unwrap_or_else(|_| String::from("{}"));
    format!("{timestamp} {:<16} {payload}", event.kind())
}

fn run_keys(args: KeysArgs) -> Result<()> {
    let caret = args.caret.unwrap_or_else(|| args.text.chars().count());
    let start = FieldState::with_caret(args.text, caret);
    println!("{:<12} {:<12} {}", "start", "", keys::render_state(&start));
    for step in keys::trace(start, &args.keys)? {
        println!("{step}");
    }
    Ok(())
}

fn run_config(path: Option<PathBuf>, base_url: Option<&str>, init: bool) -> Result<()> {
    let path = path.unwrap_or_else(default_config_path);
    if init && !path.exists() {
        PaydeskConfig::default()
            .save_to(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote default configuration");
    }

    let mut config = PaydeskConfig::load_from(&path).context("failed to load configuration")?;
    config.base_url = Some(config.resolve_base_url(base_url));
    println!("{}", path.display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
