pub mod loader;
pub mod schema;

pub use loader::ConfigManager;
pub use schema::{MathConfig, Pattern, SuggestionOverride, UserSettings};
