mod config;
mod engine;
mod symbols;

use anyhow::{Context, Result};
use std::env;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;

use config::ConfigManager;
use engine::SuggestionEngine;
use symbols::SymbolCatalog;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    log::info!("Starting texpander suggestion engine");

    // Load configuration
    let (config_manager, config_rx) = ConfigManager::new()
        .await
        .context("Failed to initialize configuration")?;

    let initial_config = config_manager.get_config().await.clone();
    log::info!(
        "Loaded {} patterns from {}",
        initial_config.patterns.len(),
        config_manager.path().display()
    );

    // Load the bundled symbol catalog; a broken catalog degrades fuzzy
    // suggestions to always-empty instead of failing startup
    let catalog = match SymbolCatalog::bundled() {
        Ok(catalog) => {
            log::info!("Loaded {} catalog symbols", catalog.len());
            catalog
        }
        Err(e) => {
            log::error!(
                "Failed to load symbol catalog, fuzzy suggestions disabled: {}",
                e
            );
            SymbolCatalog::empty()
        }
    };

    let engine = SuggestionEngine::new(&initial_config, catalog);

    // Feed stdin lines to the engine; the cursor sits at the end of
    // each typed line
    let (query_tx, query_rx) = mpsc::channel::<String>(16);
    tokio::spawn(async move {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if query_tx.send(line).await.is_err() {
                break;
            }
        }
    });

    log::info!("Type a line of text to see suggestions (Ctrl-D to quit)");
    engine.run(query_rx, config_rx).await
}

/// Print usage information
fn print_usage() {
    eprintln!(
        r#"texpander - LaTeX shortcut suggestions for note-taking editors

USAGE:
    texpander [OPTIONS]

    Reads lines from stdin and prints ranked LaTeX replacement
    suggestions for the word before the end of each line, as a host
    editor would query them per keystroke. A line of the form
    ":patterns <literal>" lists the patterns stored under that exact
    literal instead.

OPTIONS:
    -h, --help      Show this help message

CONFIGURATION:
    Edit ~/.config/texpander/config.yaml to add patterns:

    patterns:
      - pattern: "sum"
        replacements: ["\\sum"]

      - pattern: "in"
        replacements: ["\\in"]
        fast_replace: true

      - pattern: "([a-zA-Z])_over"
        is_regex: true
        replacements: ["\\overline{{$1}}"]

    The file is watched; edits are picked up without restarting.

SUGGESTIONS:
    Inside $...$ or $$...$$ regions all patterns apply, plus fuzzy
    matches over the bundled MathJax symbol catalog. Outside math
    regions only patterns with normal_mode apply, and only when
    enable_normal_mode is set in the settings section.
"#
    );
}
