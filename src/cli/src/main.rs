//! Operator CLI for a persisted block-indexed balance ledger.

use anyhow::Result;
use blocktrace_cli::commands::{advance, balance, history, mint, replace_history, transfer};
use blocktrace_cli::{CliConfig, Session};
use blocktrace_core::{Balance, Step};
use colored::Colorize;
use std::path::PathBuf;
use structopt::StructOpt;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Command line arguments for the blocktrace CLI.
#[derive(Debug, StructOpt)]
#[structopt(name = "blocktrace", about = "Block-indexed balance history ledger")]
struct Opt {
    /// Path to the configuration file
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Path to the data directory
    #[structopt(short, long, parse(from_os_str))]
    data_dir: Option<PathBuf>,

    /// Subcommand to run
    #[structopt(subcommand)]
    cmd: Command,
}

/// Subcommands for the blocktrace CLI.
#[derive(Debug, StructOpt)]
enum Command {
    /// Show the head step
    #[structopt(name = "head")]
    Head,

    /// Move the head step forward
    #[structopt(name = "advance")]
    Advance {
        /// Number of steps to advance
        #[structopt(long, default_value = "1")]
        steps: Step,
    },

    /// Get the balance of an account, optionally as of a past step
    #[structopt(name = "balance")]
    Balance {
        /// Account address or label
        #[structopt(long)]
        account: String,

        /// Step to query (defaults to the latest balance)
        #[structopt(long)]
        step: Option<Step>,
    },

    /// List the checkpoints of an account
    #[structopt(name = "history")]
    History {
        /// Account address or label
        #[structopt(long)]
        account: String,

        /// Print as JSON
        #[structopt(long)]
        json: bool,
    },

    /// Mint tokens at the head step
    #[structopt(name = "mint")]
    Mint {
        /// Recipient address or label
        #[structopt(long)]
        to: String,

        /// Amount to mint
        #[structopt(long)]
        amount: Balance,
    },

    /// Transfer tokens at the head step
    #[structopt(name = "transfer")]
    Transfer {
        /// Sender address or label
        #[structopt(long)]
        from: String,

        /// Recipient address or label
        #[structopt(long)]
        to: String,

        /// Amount to transfer
        #[structopt(long)]
        amount: Balance,
    },

    /// Transfer to several recipients at the head step
    #[structopt(name = "batch-transfer")]
    BatchTransfer {
        /// Sender address or label
        #[structopt(long)]
        from: String,

        /// Comma-separated recipient addresses or labels
        #[structopt(long, use_delimiter = true)]
        to: Vec<String>,

        /// Comma-separated amounts, one per recipient
        #[structopt(long, use_delimiter = true)]
        amounts: Vec<Balance>,
    },

    /// Overwrite an account's history from a JSON file (administrative)
    #[structopt(name = "replace-history")]
    ReplaceHistory {
        /// Account address or label
        #[structopt(long)]
        account: String,

        /// JSON file with a list of {step, balance} checkpoints
        #[structopt(long, parse(from_os_str))]
        file: PathBuf,
    },

    /// Write the effective configuration to a file
    #[structopt(name = "init-config")]
    InitConfig {
        /// Destination path
        #[structopt(long, parse(from_os_str))]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Parse command line arguments
    let opt = Opt::from_args();

    // Load configuration
    let mut config = match &opt.config {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };

    // Override data directory if specified
    if let Some(dir) = opt.data_dir {
        config.data_dir = dir.to_string_lossy().into_owned();
    }

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let open = || Session::open(&config);

    // Run the appropriate command
    match opt.cmd {
        Command::Head => {
            let session = open()?;
            println!("{} {}", "Head step:".green(), session.head());
        }
        Command::Advance { steps } => {
            let mut session = open()?;
            let head = advance::run(&mut session, steps)?;
            println!("{} {}", "Head step:".green(), head);
        }
        Command::Balance { account, step } => {
            let session = open()?;
            let bal = balance::run(&session, &account, step)?;
            match step {
                Some(step) => println!("{} {}", format!("Balance at step {}:", step).green(), bal),
                None => println!("{} {}", "Balance:".green(), bal),
            }
        }
        Command::History { account, json } => {
            let session = open()?;
            let checkpoints = history::run(&session, &account)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&checkpoints)?);
            } else if checkpoints.is_empty() {
                println!("{}", "No checkpoints".yellow());
            } else {
                for (index, checkpoint) in checkpoints.iter().enumerate() {
                    println!(
                        "{} step {} balance {}",
                        format!("#{}", index).cyan(),
                        checkpoint.step,
                        checkpoint.balance
                    );
                }
            }
        }
        Command::Mint { to, amount } => {
            let mut session = open()?;
            let (step, bal) = mint::run(&mut session, &to, amount)?;
            println!("{} {} at step {} (balance {})", "Minted:".green(), amount, step, bal);
        }
        Command::Transfer { from, to, amount } => {
            let mut session = open()?;
            let step = transfer::run(&mut session, &from, &to, amount)?;
            println!("{} {} at step {}", "Transferred:".green(), amount, step);
        }
        Command::BatchTransfer { from, to, amounts } => {
            let mut session = open()?;
            let step = transfer::run_batch(&mut session, &from, &to, &amounts)?;
            println!("{} {} legs at step {}", "Transferred:".green(), to.len(), step);
        }
        Command::ReplaceHistory { account, file } => {
            let mut session = open()?;
            let length = replace_history::run(&mut session, &account, &file)?;
            println!("{} {} checkpoints", "History replaced:".green(), length);
            println!("{}", "WARNING: replaced histories bypass the one-checkpoint-per-step policy".red());
        }
        Command::InitConfig { path } => {
            config.to_file(&path)?;
            println!("{} {}", "Configuration written:".green(), path.display());
        }
    }

    Ok(())
}
