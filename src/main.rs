use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;

use assetdesk::api::ApiClient;
use assetdesk::app::App;
use assetdesk::config::Config;
use assetdesk::logging;
use assetdesk::registration::duplicate_record;
use assetdesk::types::EntityKind;

#[derive(Parser)]
#[command(
    name = "assetdesk",
    about = "Terminal console for IT asset inventory management",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to an explicit config file
    #[arg(short, long)]
    config: Option<String>,

    /// Force debug-level logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List records of one kind
    List {
        /// Record kind (assets, products, components, ...)
        #[arg(value_enum)]
        entity: EntityKind,

        /// Filter by name fragment
        #[arg(short, long)]
        search: Option<String>,

        /// Page number, starting at 1
        #[arg(short, long)]
        page: Option<usize>,
    },

    /// Duplicate a product or component under the next free clone name
    Duplicate {
        /// Record kind (products or components)
        #[arg(value_enum)]
        entity: EntityKind,

        /// Id of the record to copy
        id: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Check that the inventory server is reachable
    Ping,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    // Logging goes to a file when the TUI takes over the screen.
    let tui_mode = cli.command.is_none();
    let logging = logging::init_logging(&config, tui_mode, cli.debug)?;

    match cli.command {
        Some(Commands::List {
            entity,
            search,
            page,
        }) => cmd_list(&config, entity, search, page).await,
        Some(Commands::Duplicate { entity, id, yes }) => {
            cmd_duplicate(&config, entity, id, yes).await
        }
        Some(Commands::Ping) => cmd_ping(&config).await,
        None => run_tui(config, logging.log_file_path).await,
    }
}

/// Print a helpful error message when the server is not configured
fn print_setup_error(err: &anyhow::Error) {
    eprintln!("Error: {}", err);
    eprintln!();
    eprintln!("Set the inventory server URL in one of:");
    eprintln!("  .assetdesk/config.toml            [server] base_url = \"http://...\"");
    eprintln!("  ~/.config/assetdesk/config.toml");
    eprintln!("  ASSETDESK_SERVER__BASE_URL        environment variable");
}

/// Ask a yes/no question on stdin; anything but `y` counts as no.
fn confirm_on_stdin(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

async fn run_tui(config: Config, log_file_path: Option<PathBuf>) -> Result<()> {
    let mut app = match App::new(config) {
        Ok(app) => app,
        Err(err) => {
            print_setup_error(&err);
            std::process::exit(1);
        }
    };

    let result = app.run().await;

    // Tell the user where the session log went, unless nothing was written.
    if let Some(path) = log_file_path {
        let has_lines = path.metadata().map(|m| m.len() > 0).unwrap_or(false);
        if has_lines {
            eprintln!("Session log: {}", path.display());
        }
    }

    result
}

async fn cmd_list(
    config: &Config,
    entity: EntityKind,
    search: Option<String>,
    page: Option<usize>,
) -> Result<()> {
    let client = ApiClient::from_config(config)?;

    let page = page.unwrap_or(1).max(1);
    let result = client
        .list(entity, search.as_deref(), page, config.ui.page_size)
        .await?;

    if result.records.is_empty() {
        println!("No {} found", entity.api_path());
        return Ok(());
    }

    println!("{} ({} total)", entity.display_name(), result.total);
    println!("{}", "─".repeat(60));

    for index in 0..result.records.len() {
        let id = result.records.id_at(index).unwrap_or_default();
        let name = result.records.name_at(index).unwrap_or("-");
        println!("  #{:<6} {}", id, name);
    }

    let shown = (page - 1) * config.ui.page_size + result.records.len();
    if (shown as u64) < result.total {
        println!(
            "... and {} more (use --page {})",
            result.total - shown as u64,
            page + 1
        );
    }

    Ok(())
}

async fn cmd_duplicate(
    config: &Config,
    entity: EntityKind,
    id: i64,
    skip_confirm: bool,
) -> Result<()> {
    let client = ApiClient::from_config(config)?;

    if !entity.supports_duplicate() {
        println!("{} records cannot be duplicated", entity.display_name());
        println!("Duplication is available for: products, components");
        return Ok(());
    }

    if !skip_confirm {
        println!("Duplicate {} #{}", entity.singular(), id);
        if !confirm_on_stdin("Proceed?")? {
            println!("Cancelled");
            return Ok(());
        }
    }

    let outcome = duplicate_record(&client, entity, id).await?;
    println!("Created '{}' (#{})", outcome.clone_name, outcome.new_id);

    Ok(())
}

async fn cmd_ping(config: &Config) -> Result<()> {
    let client = ApiClient::from_config(config)?;

    print!("Checking {} ... ", config.server.base_url);
    io::stdout().flush()?;

    match client.ping().await {
        Ok(()) => {
            println!("ok");
        }
        Err(err) => {
            println!("failed");
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    }

    Ok(())
}
