use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher as _;
use std::collections::HashMap;

use crate::config::SuggestionOverride;
use crate::symbols::{MathJaxSymbol, SuggestionConfig, SymbolCatalog};

use super::latex::fill_latex_braces;
use super::matcher::Suggestion;

/// A catalog symbol admitted to the fuzzy index, with the user's
/// overrides already merged in
struct IndexedSymbol {
    symbol: MathJaxSymbol,
    config: SuggestionConfig,
}

/// Fuzzy search over the symbol catalog, keyed on the normalized
/// search name. Used as the lowest-priority suggestion source; fuzzy
/// results are never fast-replace candidates.
pub struct FuzzyMatcher {
    matcher: SkimMatcherV2,
    symbols: Vec<IndexedSymbol>,
}

impl FuzzyMatcher {
    pub fn new(
        catalog: &SymbolCatalog,
        overrides: &HashMap<String, SuggestionOverride>,
    ) -> Self {
        let symbols = catalog
            .symbols()
            .iter()
            .map(|sym| {
                let config = match overrides.get(&sym.name) {
                    Some(o) => sym.suggestion_config.with_override(o),
                    None => sym.suggestion_config,
                };
                IndexedSymbol {
                    symbol: sym.clone(),
                    config,
                }
            })
            .filter(|entry| entry.config.suggestion_enabled)
            .collect();

        Self {
            matcher: SkimMatcherV2::default(),
            symbols,
        }
    }

    /// Score the trimmed word against every enabled symbol and return
    /// hits ranked by descending score; ties keep catalog order.
    pub fn get_suggestions(&self, input: &str, filler_color: &str) -> Vec<Suggestion> {
        // Search keys carry no braces or backslashes, so normalize the
        // query the same way ("\su" should still reach "sum")
        let query: String = input
            .chars()
            .filter(|c| !matches!(c, '{' | '}' | '\\'))
            .collect();
        if query.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(i64, &IndexedSymbol)> = self
            .symbols
            .iter()
            .filter_map(|entry| {
                self.matcher
                    .fuzzy_match(&entry.symbol.search_name, &query)
                    .map(|score| (score, entry))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        scored
            .into_iter()
            .map(|(_, entry)| Suggestion {
                replacement: entry.symbol.name.clone(),
                display_replacement: match &entry.symbol.suggestion_display {
                    Some(display) => display.clone(),
                    None => fill_latex_braces(&entry.symbol.name, filler_color),
                },
                fast_replace: false,
                matched_string: input.to_string(),
                normal_mode: entry.config.normal_mode,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SymbolCatalog {
        SymbolCatalog::from_json(
            r#"{"symbols": [
                {"name": "\\sum", "description": "Summation."},
                {"name": "\\sup", "description": "Supremum."},
                {"name": "\\frac{}{}", "description": "Fraction."},
                {"name": "\\sqrt[]{}", "description": "Nth root.",
                 "suggestion_display": "\\sqrt[n]{x}"},
                {"name": "\\int", "description": "Integral.",
                 "suggestion_config": {"suggestion_enabled": false}}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_matches_by_search_name() {
        let fuzzy = FuzzyMatcher::new(&catalog(), &HashMap::new());
        let hits = fuzzy.get_suggestions("sum", "blue");
        assert_eq!(hits[0].replacement, "\\sum");
        assert!(!hits[0].fast_replace);
        assert_eq!(hits[0].matched_string, "sum");
    }

    #[test]
    fn test_backslash_query_normalized() {
        let fuzzy = FuzzyMatcher::new(&catalog(), &HashMap::new());
        let hits = fuzzy.get_suggestions("\\su", "blue");
        assert!(!hits.is_empty());
        // Original input is preserved as the consumed span
        assert_eq!(hits[0].matched_string, "\\su");
    }

    #[test]
    fn test_display_brace_filling_and_override() {
        let fuzzy = FuzzyMatcher::new(&catalog(), &HashMap::new());

        let hits = fuzzy.get_suggestions("frac", "blue");
        assert_eq!(hits[0].replacement, "\\frac{}{}");
        assert_eq!(
            hits[0].display_replacement,
            "\\frac{\\color{blue}{a}}{\\color{blue}{b}}"
        );

        let hits = fuzzy.get_suggestions("sqrt", "blue");
        assert_eq!(hits[0].display_replacement, "\\sqrt[n]{x}");
    }

    #[test]
    fn test_disabled_symbol_not_indexed() {
        let fuzzy = FuzzyMatcher::new(&catalog(), &HashMap::new());
        let hits = fuzzy.get_suggestions("int", "blue");
        assert!(hits.iter().all(|s| s.replacement != "\\int"));
    }

    #[test]
    fn test_override_can_reenable_and_disable() {
        let mut overrides = HashMap::new();
        overrides.insert(
            "\\int".to_string(),
            SuggestionOverride {
                suggestion_enabled: Some(true),
                ..Default::default()
            },
        );
        overrides.insert(
            "\\sum".to_string(),
            SuggestionOverride {
                suggestion_enabled: Some(false),
                ..Default::default()
            },
        );
        let fuzzy = FuzzyMatcher::new(&catalog(), &overrides);

        assert!(fuzzy
            .get_suggestions("int", "blue")
            .iter()
            .any(|s| s.replacement == "\\int"));
        assert!(fuzzy
            .get_suggestions("sum", "blue")
            .iter()
            .all(|s| s.replacement != "\\sum"));
    }

    #[test]
    fn test_empty_catalog_degrades_to_no_results() {
        let fuzzy = FuzzyMatcher::new(&SymbolCatalog::empty(), &HashMap::new());
        assert!(fuzzy.get_suggestions("sum", "blue").is_empty());
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let fuzzy = FuzzyMatcher::new(&catalog(), &HashMap::new());
        assert!(fuzzy.get_suggestions("zzzzz", "blue").is_empty());
    }
}
