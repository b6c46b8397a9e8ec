use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use winpath::config::Config;
use winpath::core::{format_error_with_help, WinPathError, WinPathResult};
use winpath::model::{DedupChoice, Scope};
use winpath::store::PathStore;
use winpath::{registry, ui, JsonFileStore};

mod cli;

use cli::prompt::TerminalPrompter;
use cli::session::Session;

#[derive(Parser)]
#[command(name = "winpath")]
#[command(about = "Inspect and tidy the Windows USER and SYSTEM PATH")]
#[command(version)]
struct Cli {
    /// Work on a backup JSON file instead of the registry
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Config file (default: <config dir>/winpath/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Don't colour the output
    #[arg(long, global = true)]
    no_color: bool,

    /// More logging on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu (the default)
    Menu,
    /// Print the numbered combined view
    Show {
        /// Only entries containing this text
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Print lengths; exit status 2 when %PATH% is too long
    Check,
    /// Write a JSON and a text backup
    Backup {
        /// Appended to the file name
        #[arg(short, long)]
        comment: Option<String>,
    },
    /// Delete entries whose directory doesn't exist, then save
    Purge {
        /// Don't ask before each deletion
        #[arg(short, long)]
        yes: bool,
    },
    /// Remove entries present in both scopes, then save
    Dedup {
        /// Scope to remove them from
        #[arg(long, value_enum)]
        choice: ChoiceArg,
    },
    /// Put entries at the front of a scope, then save
    Add {
        /// user or system
        #[arg(short, long)]
        scope: Scope,
        /// Entries to add; each may be a ;-joined list
        #[arg(required = true)]
        entries: Vec<String>,
    },
    /// Replace Program Files by short junctions, then save
    Shorten,
}

#[derive(Clone, Copy, ValueEnum)]
enum ChoiceArg {
    User,
    System,
    Both,
}

impl From<ChoiceArg> for DedupChoice {
    fn from(choice: ChoiceArg) -> Self {
        match choice {
            ChoiceArg::User => DedupChoice::User,
            ChoiceArg::System => DedupChoice::System,
            ChoiceArg::Both => DedupChoice::Both,
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_store(source: Option<PathBuf>) -> WinPathResult<Box<dyn PathStore>> {
    match source {
        Some(path) => Ok(Box::new(JsonFileStore::new(path))),
        None => registry::open_registry(),
    }
}

fn run(cli: Cli) -> WinPathResult<ExitCode> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    ui::set_color(config.color && !cli.no_color);

    let store = open_store(cli.source)?;
    let mut session = Session::open(store, config, Box::new(TerminalPrompter::new()))?;

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            ctrlc::set_handler(|| {
                println!("\nInterrupted.");
                std::process::exit(1);
            })
            .map_err(|e| WinPathError::Input(format!("Failed to set signal handler: {}", e)))?;
            cli::menu::run(&mut session)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Show { filter } => cli::show::run(&session, filter),
        Commands::Check => cli::show::check(&session),
        Commands::Backup { comment } => cli::backup::run(&session, comment),
        Commands::Purge { yes } => cli::edit::purge(&mut session, yes),
        Commands::Dedup { choice } => cli::edit::dedup(&mut session, choice.into()),
        Commands::Add { scope, entries } => cli::edit::add(&mut session, scope, entries),
        Commands::Shorten => cli::edit::shorten(&mut session),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            // Display error with helpful suggestions
            eprintln!("\n{}", format_error_with_help(&e));
            ExitCode::FAILURE
        }
    }
}
