//! # MiniBot — FAQ chatbot server
//!
//! Answers free-text questions from a fixed knowledge base using fuzzy
//! string matching.
//!
//! Usage:
//!   minibot                                   # Serve on 127.0.0.1:5000
//!   minibot serve --port 8080                 # Custom port
//!   minibot serve --knowledge kb.json         # Custom knowledge base
//!   minibot ask "what are your hours"         # One-off lookup, no server
//!   minibot history --limit 5                 # Latest saved conversations

use anyhow::Result;
use clap::{Parser, Subcommand};
use minibot_core::MiniBotConfig;
use minibot_core::config::{HistoryBackend, HistoryConfig};
use minibot_history::{JsonFileHistory, SqliteHistory};
use minibot_knowledge::Responder;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "minibot",
    version,
    about = "🤖 MiniBot — fuzzy-matching FAQ chatbot"
)]
struct Cli {
    /// Config file (defaults to $MINIBOT_CONFIG or ~/.minibot/config.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server (default)
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Listen port
        #[arg(short, long)]
        port: Option<u16>,

        /// Knowledge base JSON file
        #[arg(short, long)]
        knowledge: Option<String>,

        /// History backend: json, sqlite or none
        #[arg(long)]
        history: Option<String>,

        /// History file (JSON document or SQLite database)
        #[arg(long)]
        history_path: Option<String>,
    },
    /// Answer one question from the knowledge base and exit
    Ask {
        question: String,

        /// Knowledge base JSON file
        #[arg(short, long)]
        knowledge: Option<String>,
    },
    /// Show the most recent saved conversations
    History {
        /// Number of conversations to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}

fn expand_path(p: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(p).to_string())
}

fn show_history(config: &HistoryConfig, limit: usize) -> Result<()> {
    let path = config.resolved_path();
    match config.backend()? {
        HistoryBackend::Sqlite => {
            let db = SqliteHistory::open(&path)?;
            println!("📜 {} conversations in {}", db.count()?, path.display());
            for row in db.recent(limit)? {
                println!(
                    "#{} [{}] {:?} → {:?}",
                    row.id,
                    row.created_at.format("%Y-%m-%d %H:%M:%S"),
                    row.question,
                    row.answer
                );
            }
        }
        HistoryBackend::Json => {
            let records = JsonFileHistory::new(&path).load()?;
            println!("📜 {} conversations in {}", records.len(), path.display());
            for record in records.iter().rev().take(limit) {
                println!("{:?} → {:?}", record.question, record.answer);
            }
        }
        HistoryBackend::None => println!("History is disabled (backend = \"none\")"),
    }
    Ok(())
}

fn load_config(path: Option<&str>) -> Result<MiniBotConfig> {
    let config = match path {
        Some(p) => MiniBotConfig::load_from(&expand_path(p))?,
        None => MiniBotConfig::load()?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "minibot=debug,minibot_knowledge=debug,minibot_history=debug,\
         minibot_gateway=debug,tower_http=debug"
    } else {
        "minibot=info,minibot_knowledge=info,minibot_history=info,minibot_gateway=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let mut config = load_config(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
        knowledge: None,
        history: None,
        history_path: None,
    }) {
        Command::Serve {
            host,
            port,
            knowledge,
            history,
            history_path,
        } => {
            if let Some(host) = host {
                config.gateway.host = host;
            }
            if let Some(port) = port {
                config.gateway.port = port;
            }
            if let Some(knowledge) = knowledge {
                config.knowledge.path = knowledge;
            }
            if let Some(history) = history {
                config.history.backend = history;
            }
            if let Some(history_path) = history_path {
                config.history.path = history_path;
            }

            tracing::info!("🤖 MiniBot v{} starting", env!("CARGO_PKG_VERSION"));
            let responder = Responder::from_config(&config.knowledge);
            let sink = minibot_history::open_sink_or_none(&config.history);
            minibot_gateway::start(&config, responder, Arc::from(sink)).await?;
        }
        Command::Ask {
            question,
            knowledge,
        } => {
            if let Some(knowledge) = knowledge {
                config.knowledge.path = knowledge;
            }
            let responder = Responder::from_config(&config.knowledge);
            let answer = responder.answer(&question)?;
            println!("{}", answer.answer);
            match answer.matched {
                Some(matched) => println!("   ↳ matched {:?} (score {})", matched, answer.score),
                None => println!("   ↳ no confident match (best score {})", answer.score),
            }
        }
        Command::History { limit } => show_history(&config.history, limit)?,
    }

    Ok(())
}
