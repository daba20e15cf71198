use regex::Regex;
use std::sync::LazyLock;

use crate::config::{MathConfig, Pattern, UserSettings};
use crate::symbols::SymbolCatalog;

use super::cursor::{trim_word, CursorWord, TextMode};
use super::fuzzy::FuzzyMatcher;
use super::latex::fill_latex_braces;
use super::trie::Trie;

/// One ranked replacement candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// The text to insert
    pub replacement: String,
    /// Popup rendering of the replacement (brace-filled, or the
    /// symbol's display override)
    pub display_replacement: String,
    /// Eligible for promotion to the auto-apply top slot
    pub fast_replace: bool,
    /// Exactly how much of the typed input this suggestion consumes;
    /// the replace step deletes that many trailing characters
    pub matched_string: String,
    /// Eligible outside math regions
    pub normal_mode: bool,
}

/// Suggestions from a single matching source, with the source's
/// aggregate fast-replace verdict
#[derive(Debug, Default)]
pub struct SuggestionSet {
    pub suggestions: Vec<Suggestion>,
    pub fast_replace: bool,
}

/// Regex for capture-group placeholders ($1, $2, ...) in replacements
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([1-9]\d*)").expect("Invalid placeholder regex"));

/// Evaluates all regex-typed patterns against the raw cursor word
pub struct RegexMatcher {
    patterns: Vec<(Regex, Pattern)>,
}

impl RegexMatcher {
    /// Compile all regex-typed patterns once. A malformed expression is
    /// reported and excluded; one bad user pattern must not disable the
    /// rest of the rebuild.
    pub fn new(patterns: &[Pattern]) -> Self {
        let patterns = patterns
            .iter()
            .filter(|p| p.is_regex)
            .filter_map(|p| match Regex::new(&p.pattern) {
                Ok(regex) => Some((regex, p.clone())),
                Err(e) => {
                    log::warn!("Invalid regex pattern '{}', disabling it: {}", p.pattern, e);
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    /// Test every regex against the input, expanding `$n` placeholders
    /// in each replacement with the captured text (empty when the group
    /// did not participate)
    pub fn get_suggestions(&self, input: &str) -> SuggestionSet {
        let mut result = SuggestionSet::default();

        for (regex, pattern) in &self.patterns {
            let Some(caps) = regex.captures(input) else {
                continue;
            };
            // Group 0 is the span the replace step will delete
            let matched = caps.get(0).map_or("", |m| m.as_str());

            for replacement in &pattern.replacements {
                let expanded = PLACEHOLDER_REGEX
                    .replace_all(replacement, |c: &regex::Captures| {
                        let index: usize = c[1].parse().unwrap_or(0);
                        caps.get(index).map_or(String::new(), |m| m.as_str().to_string())
                    })
                    .into_owned();
                result.suggestions.push(Suggestion {
                    display_replacement: expanded.clone(),
                    replacement: expanded,
                    fast_replace: pattern.fast_replace,
                    matched_string: matched.to_string(),
                    normal_mode: pattern.normal_mode,
                });
            }
            result.fast_replace = result.fast_replace
                || (pattern.fast_replace && pattern.replacements.len() == 1);
        }

        result
    }
}

/// Combines the trie, regex, and fuzzy sources into one ranked,
/// deduplicated, bounded suggestion list.
///
/// Holds only the immutable indexes built at configuration load;
/// get_suggestions is a pure function of its inputs. Configuration
/// changes construct a brand-new matcher, never mutating one in place.
pub struct SuggestionMatcher {
    trie: Trie,
    regexes: RegexMatcher,
    fuzzy: FuzzyMatcher,
}

impl SuggestionMatcher {
    /// Build all three indexes as one unit
    pub fn new(config: &MathConfig, catalog: &SymbolCatalog) -> Self {
        Self {
            trie: Trie::new(&config.patterns),
            regexes: RegexMatcher::new(&config.patterns),
            fuzzy: FuzzyMatcher::new(catalog, &config.symbol_overrides),
        }
    }

    /// Exact trie lookup, exposed for pattern-management UIs that need
    /// to know which patterns produced a literal
    pub fn get_matching_patterns(&self, search: &str) -> &[Pattern] {
        self.trie.lookup(search)
    }

    /// Produce the ranked suggestion list for a cursor word.
    ///
    /// Sources run in strict priority order (regex, then exact, then
    /// fuzzy), stopping as soon as max_results is reached. The regex
    /// source sees the raw word; exact and fuzzy see the trimmed one.
    pub fn get_suggestions(
        &self,
        cursor_word: &CursorWord,
        filler_color: &str,
        max_results: usize,
        settings: &UserSettings,
    ) -> Vec<Suggestion> {
        let mut suggestions: Vec<Suggestion> = Vec::new();
        if cursor_word.word.is_empty() {
            return suggestions;
        }
        let trimmed = trim_word(&cursor_word.word);
        log::debug!(
            "{:?} mode search: '{}', trimmed '{}'",
            cursor_word.mode,
            cursor_word.word,
            trimmed
        );

        for candidate in self.regexes.get_suggestions(&cursor_word.word).suggestions {
            if suggestions.len() >= max_results {
                break;
            }
            insert_suggestion(&mut suggestions, cursor_word.mode, settings, candidate);
        }

        'exact: for pattern in self.trie.lookup(trimmed) {
            for replacement in pattern.replacements.iter().take(max_results) {
                if suggestions.len() >= max_results {
                    break 'exact;
                }
                let candidate = Suggestion {
                    replacement: replacement.clone(),
                    display_replacement: fill_latex_braces(replacement, filler_color),
                    fast_replace: pattern.fast_replace,
                    matched_string: trimmed.to_string(),
                    normal_mode: pattern.normal_mode,
                };
                insert_suggestion(&mut suggestions, cursor_word.mode, settings, candidate);
            }
        }

        if suggestions.len() < max_results
            && settings.include_fuzzy_suggestions
            && search_long_enough(trimmed, settings)
        {
            for candidate in self.fuzzy.get_suggestions(trimmed, filler_color) {
                if suggestions.len() >= max_results {
                    break;
                }
                insert_suggestion(&mut suggestions, cursor_word.mode, settings, candidate);
            }
        }

        suggestions
    }
}

/// Length gate for the fuzzy source: a word whose head looks alphabetic
/// (a letter, or a backslash then a letter) is judged by the alpha
/// threshold, anything else by the symbol threshold. Keeps one-character
/// symbol fragments from producing noisy fuzzy matches.
fn search_long_enough(trimmed: &str, settings: &UserSettings) -> bool {
    let mut head = trimmed.chars();
    let alpha_head = match (head.next(), head.next()) {
        (Some(c), _) if c.is_ascii_alphabetic() => true,
        (Some('\\'), Some(c)) if c.is_ascii_alphabetic() => true,
        _ => false,
    };
    let len = trimmed.chars().count();
    if alpha_head {
        len >= settings.min_alpha_suggest_chars
    } else {
        len >= settings.min_symbol_suggest_chars
    }
}

/// Uniform insertion rule for every source: the candidate must be
/// eligible in the current mode and not duplicate an accepted
/// replacement (first seen wins). An accepted fast-replace candidate is
/// promoted to the top slot unless one already holds it.
fn insert_suggestion(
    suggestions: &mut Vec<Suggestion>,
    mode: TextMode,
    settings: &UserSettings,
    candidate: Suggestion,
) -> bool {
    let eligible = mode == TextMode::Math || candidate.normal_mode;
    if !eligible
        || suggestions
            .iter()
            .any(|s| s.replacement == candidate.replacement)
    {
        return false;
    }

    if candidate.fast_replace
        && settings.enable_fast_replace
        && (suggestions.is_empty() || !suggestions[0].fast_replace)
    {
        suggestions.insert(0, candidate);
    } else {
        suggestions.push(candidate);
    }
    true
}
