//! CLI interface for filescope

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "filescope")]
#[command(about = "Sniff, analyze and chat about uploaded files")]
#[command(long_about = "Detect file types from their bytes, summarize images, PDFs and text files, and ask a chat model about them")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze files and print their reports
    Analyze {
        /// Files to analyze, processed in the given order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Include base64 image payloads in JSON output
        #[arg(long)]
        payload: bool,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Print the detected media type of each file
    Detect {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Ask the chat model a question, optionally about attached files
    Ask {
        /// The message to send
        message: String,

        /// Files to analyze and attach
        #[arg(short, long = "file")]
        files: Vec<PathBuf>,

        /// Chat history file (JSON); read for context and updated with this turn
        #[arg(long)]
        history: Option<PathBuf>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file location
    Path,

    /// Reset configuration to defaults
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask_with_files() {
        let cli = Cli::parse_from([
            "filescope", "ask", "What is this?", "-f", "a.png", "--file", "b.pdf", "--history", "h.json",
        ]);

        match cli.command {
            Commands::Ask { message, files, history } => {
                assert_eq!(message, "What is this?");
                assert_eq!(files, vec![PathBuf::from("a.png"), PathBuf::from("b.pdf")]);
                assert_eq!(history, Some(PathBuf::from("h.json")));
            }
            _ => panic!("expected ask command"),
        }
    }

    #[test]
    fn test_analyze_requires_files() {
        assert!(Cli::try_parse_from(["filescope", "analyze"]).is_err());
    }
}
