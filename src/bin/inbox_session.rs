use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use inbox_session::config::{Config, SessionPaths, env_lookup, load_dotenv};
use inbox_session::extract::candidates_from_source;
use inbox_session::mail::imap_client::ImapClient;
use inbox_session::session::clock::SystemClock;
use inbox_session::session::{RunOutcome, SessionController};
use inbox_session::terminal::TerminalSelector;

#[derive(Parser)]
#[command(name = "inbox_session")]
#[command(about = "Pick an address from recent mail and run the task for it", long_about = None)]
struct Cli {
    /// TOML file with non-secret settings (default: <config dir>/<APPNAME>/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// How many recent messages to scan (overrides FETCH_LIMIT)
    #[arg(long, global = true)]
    limit: Option<usize>,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Select an address, provision a session directory and run the task (default)
    Run,

    /// Print the candidate addresses found in recent mail
    List,

    /// Print the application data directory
    Appdir,
}

fn main() -> Result<ExitCode> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.cmd.unwrap_or(Command::Run) {
        Command::Appdir => {
            load_dotenv();
            let paths = SessionPaths::from_lookup(&env_lookup)?;
            println!("{}", paths.app_data_dir.display());
            Ok(ExitCode::SUCCESS)
        }

        Command::List => {
            let cfg = load_config(cli.config, cli.limit)?;
            let imap = ImapClient::new(cfg.imap.clone());
            for c in candidates_from_source(&imap, &cfg.candidate_label)? {
                println!("{c}");
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Run => {
            let cfg = load_config(cli.config, cli.limit)?;
            let imap = ImapClient::new(cfg.imap.clone());
            let candidates = candidates_from_source(&imap, &cfg.candidate_label)?;

            let mut controller = SessionController::new(
                cfg.paths,
                cfg.task,
                TerminalSelector::default(),
                SystemClock,
                std::io::stdout(),
            );
            let outcome = controller.run_session(&candidates)?;
            if outcome == RunOutcome::Cancelled {
                eprintln!("No email selected");
            }
            Ok(ExitCode::from(u8::try_from(outcome.exit_code()).unwrap_or(1)))
        }
    }
}

fn load_config(file: Option<PathBuf>, limit: Option<usize>) -> Result<Config> {
    let mut cfg = Config::load(file.as_deref())?;
    if let Some(n) = limit {
        cfg.imap.limit = n;
    }
    Ok(cfg)
}
