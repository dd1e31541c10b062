use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod logging;
mod render;

use commands::AppContext;

#[derive(Parser)]
#[command(name = "parley")]
#[command(version, about = "Parley - ask a hosted model and browse past conversations", long_about = None)]
struct Cli {
    /// Log parley internals at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write logs to a daily file in the data directory
    #[arg(long, global = true)]
    log_file: bool,

    /// Keep config and history under this directory instead of the platform defaults
    #[arg(long, global = true, env = "PARLEY_HOME")]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a single question in a new thread
    Ask {
        /// The prompt; multiple words are joined with spaces
        #[arg(required = true)]
        prompt: Vec<String>,
    },
    /// Start an interactive conversation
    Chat {
        /// Continue an existing thread
        #[arg(long)]
        thread: Option<String>,
    },
    /// Show past conversations grouped by day
    History {
        /// Show the on-device history instead of the online one
        #[arg(long)]
        offline: bool,
    },
    /// Print one thread's transcript
    Thread {
        id: String,
        #[arg(long)]
        offline: bool,
    },
    /// List the built-in system prompt presets
    Presets,
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration (file plus environment)
    Show,
    /// Print the config file location
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = AppContext::new(cli.home.as_deref())?;

    let log_dir = if cli.log_file {
        Some(ctx.logs_dir()?)
    } else {
        None
    };
    let _log_guard = logging::init(cli.verbose, log_dir.as_deref())?;

    match cli.command {
        Commands::Ask { prompt } => commands::ask::run(&ctx, &prompt.join(" ")).await?,
        Commands::Chat { thread } => commands::chat::run(&ctx, thread).await?,
        Commands::History { offline } => {
            commands::history::list(&ctx, commands::history_kind(offline)).await?
        }
        Commands::Thread { id, offline } => {
            commands::history::show_thread(&ctx, &id, commands::history_kind(offline)).await?
        }
        Commands::Presets => commands::config::presets(),
        Commands::Config { action } => match action {
            ConfigAction::Init { force } => commands::config::init(&ctx, force)?,
            ConfigAction::Show => commands::config::show(&ctx)?,
            ConfigAction::Path => commands::config::path(&ctx),
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ask_joins_words_and_accepts_global_flags() {
        let cli = Cli::try_parse_from([
            "parley", "ask", "why", "is", "the", "sky", "blue", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Ask { prompt } => assert_eq!(prompt.join(" "), "why is the sky blue"),
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_ask_requires_a_prompt() {
        assert!(Cli::try_parse_from(["parley", "ask"]).is_err());
    }
}
