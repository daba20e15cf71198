use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main configuration structure for texpander
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MathConfig {
    #[serde(default)]
    pub settings: UserSettings,
    #[serde(default)]
    pub patterns: Vec<Pattern>,

    /// Per-symbol overrides of the catalog's suggestion config, keyed by
    /// the symbol's canonical name (e.g. "\\sum")
    #[serde(default)]
    pub symbol_overrides: HashMap<String, SuggestionOverride>,
}

/// User-tunable suggestion behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    /// Include fuzzy symbol-catalog results after regex and exact matches
    #[serde(default = "default_true")]
    pub include_fuzzy_suggestions: bool,

    /// Allow fast-replace patterns to be promoted to the top slot
    #[serde(default = "default_true")]
    pub enable_fast_replace: bool,

    /// Offer suggestions outside math regions (only patterns opted in
    /// via normal_mode apply there)
    #[serde(default)]
    pub enable_normal_mode: bool,

    /// Minimum typed characters before fuzzy search runs, when the word
    /// starts with a letter or backslash-letter
    #[serde(default = "default_min_alpha")]
    pub min_alpha_suggest_chars: usize,

    /// Minimum typed characters before fuzzy search runs for symbol
    /// words like "->" or "=="
    #[serde(default = "default_min_symbol")]
    pub min_symbol_suggest_chars: usize,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            include_fuzzy_suggestions: true,
            enable_fast_replace: true,
            enable_normal_mode: false,
            min_alpha_suggest_chars: default_min_alpha(),
            min_symbol_suggest_chars: default_min_symbol(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_min_alpha() -> usize {
    2
}

fn default_min_symbol() -> usize {
    1
}

/// A single suggestion pattern: a literal or regex key mapped to one or
/// more LaTeX replacements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern {
    /// The key to match: a literal string, or a regex source when
    /// is_regex is set
    pub pattern: String,

    /// Use regex matching for this pattern
    #[serde(default)]
    pub is_regex: bool,

    /// Ordered replacement candidates; must be non-empty
    pub replacements: Vec<String>,

    /// Promote this pattern's suggestion to the top slot for
    /// auto-apply; meaningful with a single replacement
    #[serde(default)]
    pub fast_replace: bool,

    /// Optional grouping label, passed through for management UIs
    #[serde(default)]
    pub category: Option<String>,

    /// Keep this pattern's suggestions eligible outside math regions
    #[serde(default)]
    pub normal_mode: bool,
}

impl Pattern {
    /// Create a new literal pattern with a single replacement
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            is_regex: false,
            replacements: vec![replacement.into()],
            fast_replace: false,
            category: None,
            normal_mode: false,
        }
    }

    /// Builder method to add a replacement candidate
    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacements.push(replacement.into());
        self
    }

    /// Builder method to mark the pattern as a regex
    pub fn with_regex(mut self) -> Self {
        self.is_regex = true;
        self
    }

    /// Builder method to enable fast replace
    pub fn with_fast_replace(mut self) -> Self {
        self.fast_replace = true;
        self
    }

    /// Builder method to keep the pattern active outside math regions
    pub fn with_normal_mode(mut self) -> Self {
        self.normal_mode = true;
        self
    }

    /// Builder method to set a category label
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// A user's partial override of one catalog symbol's suggestion config.
/// Unset fields fall back to the symbol's own (already defaulted) config.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SuggestionOverride {
    #[serde(default)]
    pub suggestion_enabled: Option<bool>,
    #[serde(default)]
    pub fast_replace: Option<bool>,
    #[serde(default)]
    pub normal_mode: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MathConfig::default();
        assert!(config.settings.include_fuzzy_suggestions);
        assert!(config.settings.enable_fast_replace);
        assert!(!config.settings.enable_normal_mode);
        assert_eq!(config.settings.min_alpha_suggest_chars, 2);
        assert_eq!(config.settings.min_symbol_suggest_chars, 1);
        assert!(config.patterns.is_empty());
        assert!(config.symbol_overrides.is_empty());
    }

    #[test]
    fn test_pattern_builder() {
        let pattern = Pattern::new("sum", "\\sum")
            .with_replacement("\\Sigma")
            .with_category("operators");

        assert_eq!(pattern.pattern, "sum");
        assert_eq!(pattern.replacements, vec!["\\sum", "\\Sigma"]);
        assert_eq!(pattern.category, Some("operators".to_string()));
        assert!(!pattern.is_regex);
        assert!(!pattern.fast_replace);
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
settings:
  include_fuzzy_suggestions: false
patterns:
  - pattern: "sum"
    replacements: ["\\sum"]
    fast_replace: true
  - pattern: "([a-z])_over"
    is_regex: true
    replacements: ["\\overline{$1}"]
"#;
        let config: MathConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(!config.settings.include_fuzzy_suggestions);
        // Unspecified settings still get defined values
        assert!(config.settings.enable_fast_replace);
        assert_eq!(config.settings.min_alpha_suggest_chars, 2);

        assert_eq!(config.patterns.len(), 2);
        assert!(!config.patterns[0].is_regex);
        assert!(config.patterns[0].fast_replace);
        assert!(config.patterns[1].is_regex);
        assert_eq!(config.patterns[1].replacements, vec!["\\overline{$1}"]);
    }

    #[test]
    fn test_deserialize_symbol_overrides() {
        let yaml = r#"
symbol_overrides:
  "\\sum":
    suggestion_enabled: false
  "\\in":
    fast_replace: true
"#;
        let config: MathConfig = serde_yaml::from_str(yaml).unwrap();
        let sum = &config.symbol_overrides["\\sum"];
        assert_eq!(sum.suggestion_enabled, Some(false));
        assert_eq!(sum.fast_replace, None);

        let isin = &config.symbol_overrides["\\in"];
        assert_eq!(isin.fast_replace, Some(true));
        assert_eq!(isin.normal_mode, None);
    }
}
