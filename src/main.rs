//! KoreaSEL 命令行入口

use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;

use koreasel::config::SelectorConfig;
use koreasel::core::{
    print_error_message, print_info_message, read_fragments, read_input, run_document,
    KoreaSelOptions,
};
use koreasel::env::{EnvVar, NoColor};
use koreasel::error::KoreaSelResult;
use koreasel::extension::{
    load_stats, on_installed, reset_stats, ControlSurface, InstallReason, JsonFileStorage,
    NoActiveTab, SharedStorage, Theme,
};

/// KoreaSEL CLI.
#[derive(Parser)]
#[command(name = "koreasel")]
#[command(about = "Finds country selectors in web pages and selects Korea automatically")]
#[command(version)]
struct Cli {
    /// JSON file holding the toggle, theme and statistics
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a page, run the auto-selector and write the result
    Run {
        /// HTML file to process, `-` for stdin
        input: String,

        /// Write the document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Page URL recorded in statistics
        #[arg(long)]
        url: Option<String>,

        /// HTML fragments appended to <body> after load, in order
        #[arg(short = 'i', long = "insert")]
        fragments: Vec<PathBuf>,

        /// Input and output charset
        #[arg(short = 'E', long)]
        encoding: Option<String>,
    },

    /// Turn automatic selection on or off
    Toggle {
        #[arg(value_enum)]
        state: Switch,
    },

    /// Set the popup theme
    Theme { theme: Theme },

    /// Show selection statistics
    Stats {
        /// Clear the statistics
        #[arg(long)]
        reset: bool,
    },

    /// Run the install hook
    Install {
        /// install, update, chrome_update or shared_module_update
        #[arg(long)]
        reason: Option<InstallReason>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
}

fn main() {
    let cli = Cli::parse();

    let config = match SelectorConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            print_error_message(&format!("Error: {e}"));
            process::exit(1);
        }
    };

    init_logging(cli.log_level.as_deref().unwrap_or(&config.log_level));

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            print_error_message(&format!("Error: failed to start runtime: {e}"));
            process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(execute(cli, config)) {
        print_error_message(&format!("Error: {e}"));
        process::exit(1);
    }
}

fn init_logging(level: &str) {
    let level = level.parse::<Level>().unwrap_or(Level::INFO);
    let ansi = !NoColor::get_or_default(false) && atty::is(atty::Stream::Stderr);

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(false)
        .try_init();
}

async fn execute(cli: Cli, config: SelectorConfig) -> KoreaSelResult<()> {
    let state_file = cli.state_file.unwrap_or_else(|| config.state_file_path());
    tracing::debug!(state_file = %state_file.display(), "使用状态文件");
    let file_storage = Arc::new(JsonFileStorage::new(state_file));
    let first_run = !file_storage.exists();
    let storage: SharedStorage = file_storage;

    match cli.command {
        Commands::Run {
            input,
            output,
            url,
            fragments,
            encoding,
        } => {
            let (data, file_url) = read_input(&input)?;
            let options = KoreaSelOptions {
                url,
                encoding,
                fragments: read_fragments(&fragments)?,
                config,
            };

            let summary = run_document(&data, &options, storage, file_url).await?;

            match output {
                Some(path) => fs::write(&path, &summary.document)?,
                None => {
                    use std::io::Write;
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(&summary.document)?;
                    stdout.flush()?;
                }
            }

            if summary.enabled {
                print_info_message(&format!(
                    "Korea selected {} time(s) ({} on load, {} after insertion); {} control(s) processed",
                    summary.total_selections(),
                    summary.initial_selections,
                    summary.inserted_selections,
                    summary.processed_controls
                ));
            } else {
                print_info_message("Automatic selection is disabled; document left unchanged");
            }
        }

        Commands::Toggle { state } => {
            let enabled = matches!(state, Switch::On);
            let mut popup = ControlSurface::open(storage, NoActiveTab)?;
            popup.toggle(enabled).await?;
            println!("{}", popup.view().status_text);
        }

        Commands::Theme { theme } => {
            let mut popup = ControlSurface::open(storage, NoActiveTab)?;
            popup.select_theme(theme)?;
            println!("{}", popup.view().theme);
        }

        Commands::Stats { reset } => {
            if reset {
                reset_stats(storage.as_ref())?;
                println!("Statistics cleared");
            } else {
                let stats = load_stats(storage.as_ref())?;
                println!("Total selections: {}", stats.total_selections);
                if let Some(last) = stats.last_selection {
                    let when = chrono::DateTime::from_timestamp_millis(last.timestamp)
                        .map(|time| time.to_rfc3339())
                        .unwrap_or_else(|| last.timestamp.to_string());
                    println!("Last selection: {} at {}", last.url, when);
                }
            }
        }

        Commands::Install { reason } => {
            let reason = reason.unwrap_or(if first_run {
                InstallReason::Install
            } else {
                InstallReason::Update
            });
            match on_installed(reason) {
                Some(url) => println!("{url}"),
                None => tracing::info!(?reason, "无需打开欢迎页"),
            }
        }
    }

    Ok(())
}
