pub mod cursor;
pub mod fuzzy;
pub mod latex;
pub mod matcher;
mod trie;

pub use cursor::{has_unclosed_math, trim_word, word_under_cursor, CursorWord, TextMode};
pub use latex::fill_latex_braces;
pub use matcher::{RegexMatcher, Suggestion, SuggestionMatcher, SuggestionSet};

use anyhow::Result;
use tokio::sync::mpsc;

use crate::config::{MathConfig, Pattern, UserSettings};
use crate::symbols::SymbolCatalog;

/// Default result cap for interactive queries
pub const DEFAULT_MAX_RESULTS: usize = 9;

/// The engine that ties together mode classification, word extraction,
/// and suggestion matching over the current configuration
pub struct SuggestionEngine {
    matcher: SuggestionMatcher,
    settings: UserSettings,
    catalog: SymbolCatalog,
}

impl SuggestionEngine {
    /// Create an engine over a configuration and symbol catalog
    pub fn new(config: &MathConfig, catalog: SymbolCatalog) -> Self {
        Self {
            matcher: SuggestionMatcher::new(config, &catalog),
            settings: config.settings.clone(),
            catalog,
        }
    }

    /// Suggestions for the cursor at `cursor` (a character offset) on
    /// `line`. Returns an empty list when no word can be extracted.
    pub fn suggest(
        &self,
        line: &str,
        cursor: usize,
        filler_color: &str,
        max_results: usize,
    ) -> Vec<Suggestion> {
        match word_under_cursor(line, cursor, &self.settings) {
            Some(word) => {
                self.matcher
                    .get_suggestions(&word, filler_color, max_results, &self.settings)
            }
            None => Vec::new(),
        }
    }

    /// Exact-literal pattern lookup for management UIs
    pub fn matching_patterns(&self, literal: &str) -> &[Pattern] {
        self.matcher.get_matching_patterns(literal)
    }

    /// Swap in freshly built indexes for a new configuration. The
    /// matcher is constructed completely before the single assignment
    /// below, so readers never observe a half-rebuilt index.
    pub fn reload(&mut self, config: &MathConfig) {
        self.matcher = SuggestionMatcher::new(config, &self.catalog);
        self.settings = config.settings.clone();
        log::info!(
            "Rebuilt suggestion indexes for {} patterns",
            config.patterns.len()
        );
    }

    /// Run the engine over a query channel and a reload channel.
    /// Each query is a line of text with the cursor at its end.
    pub async fn run(
        mut self,
        mut query_rx: mpsc::Receiver<String>,
        mut reload_rx: mpsc::Receiver<MathConfig>,
    ) -> Result<()> {
        log::info!(
            "Suggestion engine started ({} catalog symbols)",
            self.catalog.len()
        );

        loop {
            tokio::select! {
                Some(line) = query_rx.recv() => {
                    if let Some(literal) = line.strip_prefix(":patterns ") {
                        print_patterns(literal, self.matching_patterns(literal));
                        continue;
                    }
                    let cursor = line.chars().count();
                    let suggestions =
                        self.suggest(&line, cursor, "blue", DEFAULT_MAX_RESULTS);
                    print_suggestions(&line, &suggestions);
                }
                Some(config) = reload_rx.recv() => {
                    log::info!("Reloading engine configuration...");
                    self.reload(&config);
                }
                else => break,
            }
        }

        log::info!("Suggestion engine stopped");
        Ok(())
    }
}

fn print_patterns(literal: &str, patterns: &[Pattern]) {
    if patterns.is_empty() {
        println!("(no patterns match '{}')", literal);
        return;
    }
    for p in patterns {
        println!(
            "{} -> {}{}",
            p.pattern,
            p.replacements.join(", "),
            p.category
                .as_deref()
                .map(|c| format!("  [{}]", c))
                .unwrap_or_default()
        );
    }
}

fn print_suggestions(line: &str, suggestions: &[Suggestion]) {
    if suggestions.is_empty() {
        println!("(no suggestions for '{}')", line);
        return;
    }
    for (i, s) in suggestions.iter().enumerate() {
        let marker = if s.fast_replace { " [fast]" } else { "" };
        println!(
            "{}. {}{}  (consumes '{}')",
            i + 1,
            s.replacement,
            marker,
            s.matched_string
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(patterns: Vec<Pattern>) -> SuggestionEngine {
        let config = MathConfig {
            patterns,
            ..Default::default()
        };
        SuggestionEngine::new(&config, SymbolCatalog::empty())
    }

    #[test]
    fn test_suggest_end_to_end() {
        let engine = engine_with(vec![Pattern::new("sum", "\\sum")]);

        let result = engine.suggest("$x + sum", 8, "blue", DEFAULT_MAX_RESULTS);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].replacement, "\\sum");
    }

    #[test]
    fn test_suggest_outside_math_is_empty_by_default() {
        let engine = engine_with(vec![Pattern::new("sum", "\\sum")]);
        assert!(engine.suggest("x + sum", 7, "blue", 9).is_empty());
    }

    #[test]
    fn test_reload_swaps_indexes() {
        let mut engine = engine_with(vec![Pattern::new("sum", "\\sum")]);
        assert_eq!(engine.suggest("$sum", 4, "blue", 9).len(), 1);

        let new_config = MathConfig {
            patterns: vec![Pattern::new("int", "\\int")],
            ..Default::default()
        };
        engine.reload(&new_config);

        assert!(engine.suggest("$sum", 4, "blue", 9).is_empty());
        assert_eq!(engine.suggest("$int", 4, "blue", 9).len(), 1);
        assert_eq!(engine.matching_patterns("int").len(), 1);
    }

    #[test]
    fn test_degrades_without_catalog() {
        // A zero-symbol catalog leaves exact matching intact and fuzzy
        // suggestions always-empty
        let engine = engine_with(vec![Pattern::new("in", "\\in")]);
        let result = engine.suggest("$in", 3, "blue", 9);
        assert_eq!(result.len(), 1);
    }
}
