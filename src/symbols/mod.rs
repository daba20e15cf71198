use serde::Deserialize;
use thiserror::Error;

use crate::config::SuggestionOverride;

/// Bundled MathJax symbol catalog, embedded at compile time
const BUNDLED_SYMBOLS: &str = include_str!("mathjax_symbols.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("malformed symbol catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Per-symbol suggestion behavior, always fully populated after load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionConfig {
    /// Whether the symbol appears as an autocomplete suggestion
    pub suggestion_enabled: bool,
    /// Whether the symbol is offered as a fast-replace suggestion
    pub fast_replace: bool,
    /// Whether the symbol stays eligible outside math blocks
    pub normal_mode: bool,
}

pub const GLOBAL_SUGGEST_DEFAULTS: SuggestionConfig = SuggestionConfig {
    suggestion_enabled: true,
    fast_replace: false,
    normal_mode: false,
};

impl SuggestionConfig {
    /// Apply a user's partial override on top of this config
    pub fn with_override(self, overrides: &SuggestionOverride) -> Self {
        Self {
            suggestion_enabled: overrides
                .suggestion_enabled
                .unwrap_or(self.suggestion_enabled),
            fast_replace: overrides.fast_replace.unwrap_or(self.fast_replace),
            normal_mode: overrides.normal_mode.unwrap_or(self.normal_mode),
        }
    }
}

/// A catalog symbol, ready for indexing
#[derive(Debug, Clone)]
pub struct MathJaxSymbol {
    /// Canonical LaTeX form, e.g. "\\frac{}{}"
    pub name: String,
    /// Name with brace and backslash characters stripped, used as the
    /// fuzzy-search key
    pub search_name: String,
    pub description: String,
    pub examples: Vec<String>,
    /// Optional display override for the suggestion popup
    pub suggestion_display: Option<String>,
    pub suggestion_config: SuggestionConfig,
}

/// Symbol record as it appears in the bundled JSON
#[derive(Debug, Deserialize)]
struct RawSymbol {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    examples: Vec<String>,
    #[serde(default)]
    suggestion_display: Option<String>,
    #[serde(default)]
    suggestion_config: RawSuggestionConfig,
}

#[derive(Debug, Default, Deserialize)]
struct RawSuggestionConfig {
    #[serde(default)]
    suggestion_enabled: Option<bool>,
    #[serde(default)]
    fast_replace: Option<bool>,
    #[serde(default)]
    normal_mode: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    symbols: Vec<RawSymbol>,
}

impl MathJaxSymbol {
    /// Pure transform from a raw record to a fully-populated symbol:
    /// compute the search key and merge the partial config onto the
    /// global defaults, so no consumer ever sees an unset field
    fn from_raw(raw: RawSymbol) -> Self {
        let search_name = raw
            .name
            .chars()
            .filter(|c| !matches!(c, '{' | '}' | '\\'))
            .collect();
        let defaults = GLOBAL_SUGGEST_DEFAULTS;
        Self {
            search_name,
            suggestion_config: SuggestionConfig {
                suggestion_enabled: raw
                    .suggestion_config
                    .suggestion_enabled
                    .unwrap_or(defaults.suggestion_enabled),
                fast_replace: raw
                    .suggestion_config
                    .fast_replace
                    .unwrap_or(defaults.fast_replace),
                normal_mode: raw
                    .suggestion_config
                    .normal_mode
                    .unwrap_or(defaults.normal_mode),
            },
            name: raw.name,
            description: raw.description,
            examples: raw.examples,
            suggestion_display: raw.suggestion_display,
        }
    }
}

/// The fixed symbol catalog backing fuzzy suggestions
pub struct SymbolCatalog {
    symbols: Vec<MathJaxSymbol>,
}

impl SymbolCatalog {
    /// Load the catalog bundled with the binary
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_SYMBOLS)
    }

    /// Parse a catalog from JSON
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        Ok(Self {
            symbols: raw.symbols.into_iter().map(MathJaxSymbol::from_raw).collect(),
        })
    }

    /// A catalog with no symbols; fuzzy suggestions degrade to
    /// always-empty instead of failing startup
    pub fn empty() -> Self {
        Self {
            symbols: Vec::new(),
        }
    }

    pub fn symbols(&self) -> &[MathJaxSymbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
