use clap::{Parser, Subcommand};
use sessionlog::core::config::Config;
use sessionlog::core::state::StateStore;
use sessionlog::core::traits::SystemClock;
use sessionlog::runner::Runner;
use sessionlog::sources::session::EmbeddedNames;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sessionlog")]
#[command(about = "Shopper session log generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate sessions and append them to the outputs.
    Gen {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Number of users to simulate (defaults to the config value).
        #[arg(short, long)]
        users: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the persisted ID counters.
    State {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("Error generating sessions: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Gen {
            config,
            output,
            users,
            seed,
            dry_run,
        } => {
            let mut loaded = load_config(config.as_deref(), output)?;
            if seed.is_some() {
                loaded.seed = seed;
            }
            let users = users.unwrap_or(loaded.users);

            if dry_run {
                println!("config loaded: {loaded:#?}");
                println!("users: {users}");
                return Ok(());
            }

            let mut runner =
                Runner::from_config(loaded, Box::new(EmbeddedNames), Box::new(SystemClock))?;
            let summary = runner.run(users)?;
            info!(
                users = summary.users,
                events = summary.events,
                last_user_id = summary.state.last_user_id,
                last_session_id = summary.state.last_session_id,
                json = %summary.json_path.display(),
                csv = %summary.csv_path.display(),
                "run complete"
            );
            println!("Sessions generated successfully.");
        }
        Commands::State { config, output } => {
            let loaded = load_config(config.as_deref(), output)?;
            let state = StateStore::new(loaded.output.state_path()).load()?;
            println!(
                "lastUserId={} lastSessionId={}",
                state.last_user_id, state.last_session_id
            );
        }
    }

    Ok(())
}

fn load_config(
    path: Option<&Path>,
    output: Option<PathBuf>,
) -> Result<Config, Box<dyn std::error::Error>> {
    let mut loaded = match path {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };
    if let Some(dir) = output {
        loaded.output.dir = dir;
    }
    Ok(loaded)
}
