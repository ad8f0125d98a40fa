//! CLI Module
//!
//! Command-line interface for the voice relay using Clap v4.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::logging::{self, LogConfig};
use crate::provider::{create_provider, ChatMessage};
use crate::relay::ChatRelay;

/// Voice assistant backend: chat, transcription and speech relays
#[derive(Parser, Debug)]
#[command(name = "voice-relay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug mode (also writes daily log files)
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve {
        /// Address to bind, overrides server.bind
        #[arg(short, long)]
        bind: Option<String>,

        /// Port to listen on, overrides server.port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Send one prompt through the chat relay and print the reply
    Ask {
        /// The prompt to send
        prompt: String,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration
    Config {
        /// Show full configuration including secrets
        #[arg(short, long)]
        show_secrets: bool,
    },

    /// Log management operations
    Logs {
        #[command(subcommand)]
        operation: LogCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum LogCommands {
    /// Show log file location and status
    Status,
    /// View recent log entries (requires debug mode)
    View {
        /// Number of lines to show (default: 50)
        #[arg(short, long, default_value = "50")]
        lines: usize,
    },
    /// Clean up old log files
    Clean {
        /// Maximum age in days (default: 7)
        #[arg(short = 'a', long, default_value = "7")]
        days: u64,
    },
}

/// Main CLI entry point
pub async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    let log_dir = resolve_log_dir(&config);
    let log_config = LogConfig::new()
        .with_debug_mode(cli.debug)
        .with_log_dir(log_dir.clone())
        .with_level(config.logging.level.clone())
        .with_json(config.logging.json);

    let _guard = logging::init_logging(log_config).context("Failed to initialize logging")?;

    // Keep a week of debug logs
    if cli.debug
        && let Ok(removed) = logging::cleanup_old_logs(&log_dir, 7)
        && removed > 0
    {
        tracing::info!("Cleaned up {} old log file(s)", removed);
    }

    match cli.command {
        None => cmd_serve(config, None, None).await,
        Some(Commands::Serve { bind, port }) => cmd_serve(config, bind, port).await,
        Some(Commands::Ask { prompt }) => cmd_ask(&config, prompt).await,
        Some(Commands::Init { force }) => cmd_init(cli.config, force),
        Some(Commands::Config { show_secrets }) => cmd_config(&config, show_secrets),
        Some(Commands::Logs { operation }) => cmd_logs(&log_dir, operation),
    }
}

/// Load configuration from file or defaults
fn load_config(config_path: Option<&std::path::Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

fn resolve_log_dir(config: &Config) -> PathBuf {
    config
        .logging
        .dir
        .clone()
        .unwrap_or_else(logging::default_log_dir)
}

/// Apply command-line overrides and run the server
async fn cmd_serve(mut config: Config, bind: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.validate()?;

    crate::server::serve(config).await
}

/// One-shot chat through the same relay the server uses
async fn cmd_ask(config: &Config, prompt: String) -> Result<()> {
    config.validate()?;
    tracing::info!("Running one-shot chat");

    let provider = create_provider(config)?;
    let relay = ChatRelay::new(provider, &config.assistant);
    let reply = relay.relay(vec![ChatMessage::user(prompt)]).await?;

    println!("{}", reply.reply);
    Ok(())
}

/// Initialize configuration file
fn cmd_init(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = match config_path {
        Some(path) => path,
        None => Config::system_config_path().context("Could not determine config directory")?,
    };

    if config_path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at: {}\nUse --force to overwrite",
            config_path.display()
        );
    }

    Config::default().save(&config_path)?;

    println!("Configuration initialized at: {}", config_path.display());
    println!("\nNext steps:");
    println!("   1. Set OPENAI_API_KEY (environment, .env or provider.api_key)");
    println!("   2. Run 'voice-relay serve'");

    Ok(())
}

/// Show configuration
fn cmd_config(config: &Config, show_secrets: bool) -> Result<()> {
    println!("Voice Relay Configuration\n");

    println!("Server: {}:{}", config.server.bind, config.server.port);
    println!("Max upload: {} bytes", config.server.max_upload_bytes);
    println!("Permissive CORS: {}", config.server.cors_permissive);
    println!("Log level: {}", config.logging.level);

    println!("\nProvider: {}", config.provider.base_url);
    println!(
        "  chat: {} (max_tokens {})",
        config.provider.chat_model, config.provider.max_tokens
    );
    println!(
        "  transcription: {} ({})",
        config.provider.transcription_model, config.provider.transcription_format
    );
    println!(
        "  speech: {} voice={} format={}",
        config.provider.speech_model, config.provider.speech_voice, config.provider.speech_format
    );

    match (config.provider.api_key(), show_secrets) {
        (Some(key), true) => println!("  API Key: {}", key.expose_secret()),
        (Some(_), false) => println!("  API Key: [SET]"),
        (None, _) => println!("  API Key: [NOT SET]"),
    }

    if !show_secrets {
        println!("\nUse --show-secrets to display API keys");
    }

    Ok(())
}

/// Log file maintenance
fn cmd_logs(log_dir: &std::path::Path, operation: LogCommands) -> Result<()> {
    use std::io::{BufRead, BufReader};

    match operation {
        LogCommands::Status => {
            println!("Log directory: {}", log_dir.display());

            let (count, total_size) = logging::log_stats(log_dir)?;
            if count == 0 {
                println!("Status: no logs found");
                println!("\nRun with -d to enable file logging");
                return Ok(());
            }

            println!("Log files: {}", count);
            println!(
                "Total size: {:.2} MB",
                total_size as f64 / (1024.0 * 1024.0)
            );
            if let Some(newest) = logging::get_log_path(log_dir) {
                println!("Latest log: {}", newest.display());
            }
            Ok(())
        }

        LogCommands::View { lines } => {
            let Some(log_path) = logging::get_log_path(log_dir) else {
                println!("No log files found.\n");
                println!("Run with -d to enable file logging");
                return Ok(());
            };

            println!("Last {} lines of: {}\n", lines, log_path.display());

            let file = std::fs::File::open(&log_path)
                .with_context(|| format!("Failed to open {:?}", log_path))?;
            let all_lines: Vec<String> = BufReader::new(file)
                .lines()
                .map_while(|line| line.ok())
                .collect();
            let start = all_lines.len().saturating_sub(lines);

            for line in &all_lines[start..] {
                println!("{}", line);
            }

            if all_lines.is_empty() {
                println!("(empty log file)");
            }
            Ok(())
        }

        LogCommands::Clean { days } => {
            println!("Cleaning up log files older than {} days...\n", days);

            let removed = logging::cleanup_old_logs(log_dir, days)?;
            if removed > 0 {
                println!("Removed {} old log file(s)", removed);
            } else {
                println!("No old log files to remove");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["voice-relay"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.debug);
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli =
            Cli::try_parse_from(["voice-relay", "--debug", "serve", "--bind", "0.0.0.0", "-p", "8080"])
                .unwrap();
        assert!(cli.debug);
        match cli.command {
            Some(Commands::Serve { bind, port }) => {
                assert_eq!(bind.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(8080));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_logs_clean_days() {
        let cli = Cli::try_parse_from(["voice-relay", "logs", "clean", "-a", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Logs {
                operation: LogCommands::Clean { days: 3 }
            })
        ));
    }

    #[test]
    fn test_global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["voice-relay", "ask", "hola", "--config", "relay.toml"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("relay.toml")));
        assert!(matches!(cli.command, Some(Commands::Ask { ref prompt }) if prompt == "hola"));
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        cmd_init(Some(path.clone()), false).unwrap();
        assert!(path.exists());

        assert!(cmd_init(Some(path.clone()), false).is_err());
        assert!(cmd_init(Some(path.clone()), true).is_ok());

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.server.port, 3000);
    }

    #[tokio::test]
    async fn test_only_provider_commands_validate() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();

        assert!(cmd_config(&config, false).is_ok());
        assert!(cmd_ask(&config, "hola".to_string()).await.is_err());
        assert!(cmd_serve(config, None, None).await.is_err());
    }

    #[test]
    fn test_resolve_log_dir_prefers_config() {
        let mut config = Config::default();
        assert_eq!(resolve_log_dir(&config), logging::default_log_dir());

        config.logging.dir = Some(PathBuf::from("/var/log/voice-relay"));
        assert_eq!(resolve_log_dir(&config), PathBuf::from("/var/log/voice-relay"));
    }
}
