//! # docchat CLI
//!
//! Command-line host for the docchat assistant: ingest documents or web
//! pages, then ask questions answered from the indexed content by an
//! Ollama-served model.
//!
//! ## Commands
//!
//! - `docchat ask <QUERY> [--source <PATH_OR_URL>]` - One-shot question
//! - `docchat chat [--source <PATH_OR_URL>]` - Interactive session
//! - `docchat models` - List models served by the runtime
//! - `docchat config show|init` - Inspect configuration
//!
//! ## Examples
//!
//! ```bash
//! # Ask about a PDF
//! docchat ask "what does section 3 require?" --source ./contract.pdf
//!
//! # Interactive session over a web page
//! docchat chat --source https://example.com/handbook
//! ```
//!
//! Inside `chat`, lines starting with `:` are commands (`:ingest <SOURCE>`,
//! `:model <ID>`, `:models`, `:sources`, `:clear`, `:quit`); anything else
//! is a question.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use docchat_core::{DocumentSource, Embedder};
use docchat_embed::{EmbedderPool, HashEmbedder, OllamaEmbedder};
use docchat_extract::LoaderRegistry;
use docchat_llm::{ModelProvider, OllamaProvider};
use docchat_session::Assistant;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "docchat")]
#[command(about = "Chat with your documents using a local model runtime")]
#[command(version)]
struct Cli {
    /// Path to config file (default: ~/.config/docchat/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a single question
    Ask {
        /// The question
        query: String,

        /// Document or URL to ingest first
        #[arg(short, long)]
        source: Option<String>,
    },

    /// Start an interactive chat session
    Chat {
        /// Document or URL to ingest before the first question
        #[arg(short, long)]
        source: Option<String>,
    },

    /// List models served by the runtime
    Models,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Print a sample configuration file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;

    init_logging(&config, cli.verbose);

    match cli.command {
        Commands::Ask { query, source } => {
            let mut assistant = build_assistant(&config)?;
            if let Some(source) = source {
                let source = parse_source(&source);
                let chunks = assistant.ingest(&source).await?;
                eprintln!("ingested {source} ({chunks} chunks)");
            }
            let answer = assistant.ask(&query).await?;
            println!("{answer}");
        }

        Commands::Chat { source } => {
            let mut assistant = build_assistant(&config)?;
            if let Some(source) = source {
                let source = parse_source(&source);
                let chunks = assistant.ingest(&source).await?;
                eprintln!("ingested {source} ({chunks} chunks)");
            }
            run_repl(&mut assistant).await?;
        }

        Commands::Models => {
            let provider =
                OllamaProvider::new(&config.ollama.base_url).context("creating provider")?;
            let models = provider.list_models().await.context("listing models")?;
            if models.is_empty() {
                eprintln!("no models available");
            }
            for model in models {
                println!("{model}");
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                println!("{}", toml::to_string_pretty(&config)?);
            }
            ConfigAction::Init => {
                println!("{}", Config::sample());
            }
        },
    }

    Ok(())
}

fn init_logging(config: &Config, verbose: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("docchat={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Interpret a CLI source argument: http(s) means URL, anything else a path.
fn parse_source(raw: &str) -> DocumentSource {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        DocumentSource::url(raw)
    } else {
        DocumentSource::file(raw)
    }
}

/// Wire the pipeline per configuration.
fn build_assistant(config: &Config) -> Result<Assistant> {
    let loaders = LoaderRegistry::with_defaults().context("creating loaders")?;

    let embedder: Arc<dyn Embedder> = match config.embedding.backend.as_str() {
        "hash" => Arc::new(HashEmbedder::with_dimension(config.embedding.dimension)),
        "ollama" => Arc::new(
            OllamaEmbedder::new(
                &config.ollama.base_url,
                &config.embedding.model,
                config.embedding.dimension,
            )
            .context("creating embedder")?,
        ),
        other => bail!("unknown embedding backend: {other}"),
    };
    let pool = Arc::new(EmbedderPool::new(embedder, config.embedding.max_concurrent));

    let provider =
        Arc::new(OllamaProvider::new(&config.ollama.base_url).context("creating provider")?);

    Assistant::new(
        loaders,
        pool,
        provider,
        &config.ollama.chat_model,
        config.assistant_config(),
    )
    .context("creating assistant")
}

/// Interactive loop over stdin.
async fn run_repl(assistant: &mut Assistant) -> Result<()> {
    eprintln!(
        "docchat ({}). Questions answer from ingested content; :help lists commands.",
        assistant.model_id()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        eprint!("> ");
        std::io::stderr().flush().ok();

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix(':') {
            let mut parts = command.splitn(2, ' ');
            let verb = parts.next().unwrap_or_default();
            let arg = parts.next().map(str::trim).unwrap_or_default();

            match verb {
                "quit" | "q" | "exit" => break,
                "help" => {
                    eprintln!(
                        ":ingest <SOURCE>  index a document or URL\n\
                         :model <ID>       switch model (resets conversation)\n\
                         :models           list available models\n\
                         :sources          show what is indexed\n\
                         :clear            drop index and conversation\n\
                         :quit             leave"
                    );
                }
                "ingest" if !arg.is_empty() => {
                    let source = parse_source(arg);
                    match assistant.ingest(&source).await {
                        Ok(chunks) => eprintln!("ingested {source} ({chunks} chunks)"),
                        Err(e) => eprintln!("ingest failed: {e}"),
                    }
                }
                "model" if !arg.is_empty() => {
                    assistant.set_model(arg);
                    eprintln!("model set to {arg} (conversation reset)");
                }
                "models" => match assistant.list_models().await {
                    Ok(models) => {
                        for model in models {
                            eprintln!("{model}");
                        }
                    }
                    Err(e) => eprintln!("cannot list models: {e}"),
                },
                "sources" => {
                    let sources = assistant.list_sources().await;
                    if sources.is_empty() {
                        eprintln!("nothing ingested");
                    }
                    for source in sources {
                        eprintln!("{source}");
                    }
                }
                "clear" => {
                    assistant.clear();
                    eprintln!("cleared");
                }
                _ => eprintln!("unknown command; :help lists commands"),
            }
            continue;
        }

        match assistant.ask(line).await {
            Ok(answer) => println!("{answer}"),
            Err(e) => eprintln!("error: {e}"),
        }
    }

    Ok(())
}
