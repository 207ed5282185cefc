//! Command-line argument parsing
//!
//! Provides clap-based CLI with one subcommand per API operation and
//! verbosity control.

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

use crate::config::ClientConfig;
use crate::errors::Result;
use crate::streaming::DecodePolicy;
use crate::types::Options;

/// ollama-client - talk to a local Ollama server
#[derive(Parser, Debug)]
#[command(name = "ollama-client")]
#[command(version)]
#[command(about = "Generate, chat, embed, list and pull against an Ollama server", long_about = None)]
pub struct Args {
    /// API base URL (overrides the config file)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Fail on undecodable stream lines instead of skipping them
    #[arg(long)]
    pub strict: bool,

    /// Verbosity level: -q (quiet), default (normal), -v, -vv, -vvv
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Generate a completion for a prompt
    Generate {
        model: String,
        prompt: String,

        /// Print tokens as they arrive
        #[arg(long)]
        stream: bool,

        /// Extra request field, key=value (value parsed as JSON when possible)
        #[arg(short = 'o', long = "option", value_name = "KEY=VALUE", value_parser = parse_option)]
        options: Vec<(String, Value)>,
    },

    /// Send one user message to a chat model
    Chat {
        model: String,
        message: String,

        /// System prompt placed before the message
        #[arg(long)]
        system: Option<String>,

        /// Print tokens as they arrive
        #[arg(long)]
        stream: bool,

        /// Extra request field, key=value (value parsed as JSON when possible)
        #[arg(short = 'o', long = "option", value_name = "KEY=VALUE", value_parser = parse_option)]
        options: Vec<(String, Value)>,
    },

    /// Compute an embedding
    Embed {
        model: String,
        prompt: String,

        /// Extra request field, key=value (value parsed as JSON when possible)
        #[arg(short = 'o', long = "option", value_name = "KEY=VALUE", value_parser = parse_option)]
        options: Vec<(String, Value)>,
    },

    /// List installed models
    List,

    /// Download a model
    Pull {
        model: String,

        /// Allow insecure registry connections
        #[arg(long)]
        insecure: bool,

        /// Wait for the final status instead of showing progress
        #[arg(long)]
        no_stream: bool,
    },

    /// Show the server version
    Version,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
    Trace,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                2 => Verbosity::VeryVerbose,
                _ => Verbosity::Trace,
            }
        }
    }

    /// Build the client configuration: file first, then flags on top
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::load_from_file(path)?,
            None => ClientConfig::default(),
        };

        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }

        if self.strict {
            config.decode_policy = DecodePolicy::Strict;
        }

        config.validate()?;
        Ok(config)
    }
}

impl Verbosity {
    /// Check if should show progress bars
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }
}

/// Parse a `key=value` option; the value is JSON if it parses, else a string
pub fn parse_option(raw: &str) -> std::result::Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty option key in '{}'", raw));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Collect parsed options into a request option map
pub fn into_options(pairs: Vec<(String, Value)>) -> Options {
    pairs.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(parse(&["ollama-client", "list"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["ollama-client", "-q", "list"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["ollama-client", "-v", "list"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["ollama-client", "-vv", "list"]).verbosity(), Verbosity::VeryVerbose);
        assert_eq!(parse(&["ollama-client", "list", "-vvv"]).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_generate_command() {
        let args = parse(&[
            "ollama-client",
            "generate",
            "llama3",
            "Tell me a joke.",
            "--stream",
            "-o",
            "options={\"temperature\":0}",
            "-o",
            "keep_alive=5m",
        ]);

        match args.command {
            Commands::Generate { model, prompt, stream, options } => {
                assert_eq!(model, "llama3");
                assert_eq!(prompt, "Tell me a joke.");
                assert!(stream);
                assert_eq!(
                    into_options(options),
                    json!({"options": {"temperature": 0}, "keep_alive": "5m"})
                        .as_object()
                        .unwrap()
                        .clone()
                );
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_pull_command() {
        let args = parse(&["ollama-client", "pull", "all-minilm", "--insecure", "--no-stream"]);
        assert_eq!(
            args.command,
            Commands::Pull {
                model: "all-minilm".to_string(),
                insecure: true,
                no_stream: true,
            }
        );
    }

    #[test]
    fn test_missing_subcommand_rejected() {
        assert!(Args::try_parse_from(["ollama-client"]).is_err());
    }

    #[test]
    fn test_parse_option_values() {
        assert_eq!(parse_option("seed=42").unwrap(), ("seed".to_string(), json!(42)));
        assert_eq!(parse_option("raw=true").unwrap(), ("raw".to_string(), json!(true)));
        assert_eq!(parse_option("format=json").unwrap(), ("format".to_string(), json!("json")));
        assert_eq!(parse_option("suffix=").unwrap(), ("suffix".to_string(), json!("")));
        assert_eq!(
            parse_option("stop=[\"\\n\"]").unwrap(),
            ("stop".to_string(), json!(["\n"]))
        );
    }

    #[test]
    fn test_parse_option_errors() {
        assert!(parse_option("no-separator").is_err());
        assert!(parse_option("=value").is_err());
    }

    #[test]
    fn test_client_config_flags_override() {
        let args = parse(&[
            "ollama-client",
            "--base-url",
            "http://gpu-box:11434/api",
            "--strict",
            "version",
        ]);

        let config = args.client_config().unwrap();
        assert_eq!(config.base_url, "http://gpu-box:11434/api");
        assert_eq!(config.decode_policy, DecodePolicy::Strict);
    }

    #[test]
    fn test_client_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.toml");
        std::fs::write(&path, "base_url = \"http://10.0.0.5:11434/api\"\n").unwrap();

        let args = parse(&["ollama-client", "--config", path.to_str().unwrap(), "list"]);
        let config = args.client_config().unwrap();
        assert_eq!(config.base_url, "http://10.0.0.5:11434/api");
        assert_eq!(config.decode_policy, DecodePolicy::Skip);
    }
}
