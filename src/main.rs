//! mybank-pfm -- command-line dashboard for the MyBank PFM API.
//!
//! This is the application entry point. It wires together:
//!   - Configuration loading
//!   - Tracing initialization
//!   - Session store and API client
//!   - One subcommand, printed as JSON

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use mybank_pfm::commands::{self, Command};
use mybank_pfm::config::Config;
use mybank_pfm::session;

// ---------------------------------------------------------------------------
// CLI argument parsing (minimal, no clap dependency)
// ---------------------------------------------------------------------------

struct CliArgs {
    config_path: Option<PathBuf>,
    command: Vec<String>,
}

fn parse_args() -> CliArgs {
    let mut args = std::env::args().skip(1);
    let mut config_path = None;
    let mut command = Vec::new();

    while let Some(arg) = args.next() {
        if !command.is_empty() {
            command.push(arg);
            continue;
        }
        match arg.as_str() {
            "--config" | "-c" => {
                if let Some(path) = args.next() {
                    config_path = Some(PathBuf::from(path));
                } else {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("mybank-pfm {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            _ => command.push(arg),
        }
    }

    CliArgs {
        config_path,
        command,
    }
}

fn print_usage() {
    println!(
        "\
mybank-pfm {version} -- MyBank personal finance dashboard

USAGE:
    mybank-pfm [OPTIONS] <COMMAND> [ARGS]

COMMANDS:
    login <email> [password]           Sign in (password from PFM_PASSWORD if omitted)
    register <email> <password> <name> <phone>
    kakao <code>                       Sign in with a Kakao authorization code
    logout                             Sign out and forget the stored session
    whoami                             Show the signed-in user
    status                             Show local session state
    assets                             Aggregated balances
    sync                               Refresh balances from linked institutions
    transactions [--page N] [--size N] [--account ID]
    spending [--days N]                Spending analysis (default 30 days)
    transfer <from> <to> <recipient> <amount> [description]
    payment <payment-id>
    history [--page N] [--size N]
    invest                             Round-up investment summary
    roundup <enable|disable> <account>
    config                             Show effective configuration

OPTIONS:
    -c, --config <PATH>    Path to configuration file [default: pfm.toml]
    -h, --help             Print this help message
    -V, --version          Print version information

ENVIRONMENT:
    RUST_LOG               Override log level (e.g. RUST_LOG=debug)
    PFM_CONFIG             Alternative to --config flag
    PFM_API_URL            API origin [default: http://localhost:8080]
",
        version = env!("CARGO_PKG_VERSION")
    );
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Parse CLI arguments
    let cli = parse_args();

    // --config wins over PFM_CONFIG
    let config_path = cli
        .config_path
        .or_else(|| std::env::var("PFM_CONFIG").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("pfm.toml"));

    // 2. Load configuration
    let config = Config::load(&config_path)?;

    // 3. Initialize tracing/logging
    init_tracing(&config);

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path.display(),
        "Starting mybank-pfm"
    );

    // 4. Parse the subcommand
    let command = Command::parse(cli.command)?;
    if !command.needs_client() {
        print!("{}", commands::render_config(&config));
        return Ok(());
    }

    // 5. Open the session; events are reported after the command finishes
    let client = session::build_client(&config).await?;
    let mut events = client.subscribe();

    // 6. Run
    let outcome = commands::run(&client, command).await;
    for notice in session::drain_notices(&mut events) {
        eprintln!("{notice}");
    }
    println!("{}", outcome?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tracing initialization
// ---------------------------------------------------------------------------

/// Set up the tracing subscriber based on configuration.
fn init_tracing(config: &Config) {
    // RUST_LOG env var takes precedence over config file
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.logging.level;
        EnvFilter::new(format!("mybank_pfm={level},pfm_client={level},warn"))
    });

    // Logs go to stderr so stdout stays valid JSON
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if config.logging.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
