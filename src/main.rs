//! filescope: sniff, analyze and chat about uploaded files

use clap::Parser;
use colored::Colorize;
use filescope::cli::{Cli, Commands, ConfigAction};
use filescope::config::Config;
use filescope::error::{FilescopeError, Result};
use filescope::input::file_detector::detect_kind;
use filescope::input::manager::{BatchItem, InputManager};
use filescope::llm::client::ChatClient;
use filescope::llm::history::{ChatHistory, Role};
use filescope::output::formatter::{formatter_for, parse_output_format};
use filescope::processing::analyzer::{AnalysisResult, FileAnalyzer};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let config_path = cli.config.unwrap_or_else(Config::config_path);
    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Analyze {
            files,
            output,
            payload,
            save,
        } => {
            let format = match output {
                Some(name) => parse_output_format(&name).map_err(FilescopeError::InvalidInput)?,
                None => config.output.format,
            };

            let manager = input_manager(&config);
            let results = analyze_with_progress(&manager, &files).await;
            if results.is_empty() {
                return Err(FilescopeError::InvalidInput("No files could be analyzed".to_string()));
            }

            let color_output = config.output.color_output && save.is_none();
            let include_payload = payload || config.output.include_payload;
            let rendered = formatter_for(format, color_output, include_payload).format_results(&results)?;

            match save {
                Some(path) => {
                    std::fs::write(&path, rendered)?;
                    println!("💾 Saved analysis of {} file(s) to {}", results.len(), path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Detect { files } => {
            for path in files {
                let bytes = tokio::fs::read(&path).await?;
                let detection = detect_kind(&bytes);
                println!("{}: {} ({})", path.display(), detection.media_type, detection.kind);
            }
        }

        Commands::Ask {
            message,
            files,
            history,
        } => {
            let client = ChatClient::new(&config.backend)?;
            let manager = input_manager(&config);
            let attachments = analyze_with_progress(&manager, &files).await;

            let mut chat_history = match &history {
                Some(path) => ChatHistory::load(path)?,
                None => ChatHistory::new(),
            };

            match client.respond(&message, &attachments, &chat_history).await {
                Ok(reply) => {
                    println!("{}", reply);
                    if let Some(path) = &history {
                        chat_history.push(Role::User, message);
                        chat_history.push(Role::Assistant, reply);
                        chat_history.save(path)?;
                        info!("History saved to {} ({} messages)", path.display(), chat_history.len());
                    }
                }
                Err(e) => {
                    eprintln!("{}", e.user_message().red());
                    return Err(e.into());
                }
            }
        }

        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => {
                let content = toml::to_string_pretty(&config)
                    .map_err(|e| FilescopeError::Configuration(e.to_string()))?;
                println!("{}", content);
            }
            ConfigAction::Path => println!("{}", config_path.display()),
            ConfigAction::Reset => {
                Config::default().save_to(config_path)?;
                println!("✅ Configuration reset: {}", config_path.display());
            }
        },
    }

    Ok(())
}

fn input_manager(config: &Config) -> InputManager {
    InputManager::new(FileAnalyzer::with_limits((&config.analysis).into()))
}

/// Analyze files in order, showing progress; unreadable files are reported
/// and left out of the returned results.
async fn analyze_with_progress(manager: &InputManager, files: &[PathBuf]) -> Vec<AnalysisResult> {
    if files.is_empty() {
        return Vec::new();
    }

    let progress = ProgressBar::new(files.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}") {
        progress.set_style(style);
    }

    let items = manager
        .analyze_batch(files, |done, item| {
            progress.set_message(item.path.display().to_string());
            progress.set_position(done as u64);
        })
        .await;
    progress.finish_and_clear();

    items
        .into_iter()
        .filter_map(|BatchItem { path, outcome }| match outcome {
            Ok(result) => Some(result),
            Err(e) => {
                eprintln!("{} {}: {}", "⚠️".yellow(), path.display(), e);
                None
            }
        })
        .collect()
}
