use anyhow::{Context, Result};
use notify::{Config as NotifyConfig, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use super::schema::{MathConfig, Pattern};

/// Configuration manager with hot-reload support
pub struct ConfigManager {
    config: Arc<RwLock<MathConfig>>,
    config_path: PathBuf,
    _watcher: Option<RecommendedWatcher>,
}

impl ConfigManager {
    /// Create a new ConfigManager and load the configuration
    pub async fn new() -> Result<(Self, mpsc::Receiver<MathConfig>)> {
        let config_path = Self::get_config_path()?;

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        // Load or create initial config
        let config = if config_path.exists() {
            Self::load_config(&config_path)?
        } else {
            let default_config = MathConfig::default();
            Self::save_config(&config_path, &default_config)?;
            default_config
        };

        let config = Arc::new(RwLock::new(config));
        let (tx, rx) = mpsc::channel(16);

        // Set up file watcher
        let watcher = Self::setup_watcher(&config_path, config.clone(), tx)?;

        Ok((
            Self {
                config,
                config_path,
                _watcher: Some(watcher),
            },
            rx,
        ))
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("texpander").join("config.yaml"))
    }

    /// Load configuration from a file
    pub fn load_config(path: &Path) -> Result<MathConfig> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: MathConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!(
            "Loaded {} patterns from {}",
            config.patterns.len(),
            path.display()
        );
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_config(path: &Path, config: &MathConfig) -> Result<()> {
        let content = serde_yaml::to_string(config).context("Failed to serialize config")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        log::info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Set up file watcher for hot-reload
    fn setup_watcher(
        config_path: &Path,
        config: Arc<RwLock<MathConfig>>,
        tx: mpsc::Sender<MathConfig>,
    ) -> Result<RecommendedWatcher> {
        let path = config_path.to_path_buf();
        let handle = tokio::runtime::Handle::current();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    if event.kind.is_modify() || event.kind.is_create() {
                        log::debug!("Config file changed, reloading...");

                        match Self::load_config(&path) {
                            Ok(new_config) => {
                                let config = config.clone();
                                let tx = tx.clone();
                                let new_config_clone = new_config.clone();

                                handle.spawn(async move {
                                    let mut cfg = config.write().await;
                                    *cfg = new_config_clone.clone();
                                    if tx.send(new_config_clone).await.is_err() {
                                        log::warn!("Failed to send config update notification");
                                    }
                                    log::info!("Configuration reloaded successfully");
                                });
                            }
                            Err(e) => {
                                log::error!("Failed to reload config: {}", e);
                            }
                        }
                    }
                }
            },
            NotifyConfig::default(),
        )?;

        // Watch the config file's parent directory
        if let Some(parent) = config_path.parent() {
            watcher.watch(parent, RecursiveMode::NonRecursive)?;
        }

        log::info!("Watching config file for changes: {}", config_path.display());
        Ok(watcher)
    }

    /// Get a read lock on the current configuration
    pub async fn get_config(&self) -> tokio::sync::RwLockReadGuard<'_, MathConfig> {
        self.config.read().await
    }

    /// Update and save the configuration
    pub async fn update_config(&self, config: MathConfig) -> Result<()> {
        Self::save_config(&self.config_path, &config)?;
        let mut cfg = self.config.write().await;
        *cfg = config;
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Add a new pattern to the configuration
    pub async fn add_pattern(&self, pattern: Pattern) -> Result<()> {
        let mut config = self.config.write().await;
        config.patterns.push(pattern);
        Self::save_config(&self.config_path, &config)?;
        Ok(())
    }

    /// Remove a pattern by index
    pub async fn remove_pattern(&self, index: usize) -> Result<()> {
        let mut config = self.config.write().await;
        if index < config.patterns.len() {
            config.patterns.remove(index);
            Self::save_config(&self.config_path, &config)?;
        }
        Ok(())
    }

    /// Update a pattern at a specific index
    pub async fn update_pattern(&self, index: usize, pattern: Pattern) -> Result<()> {
        let mut config = self.config.write().await;
        if index < config.patterns.len() {
            config.patterns[index] = pattern;
            Self::save_config(&self.config_path, &config)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_save_and_load_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let mut config = MathConfig::default();
        config.patterns.push(Pattern::new("sum", "\\sum"));

        ConfigManager::save_config(&path, &config).unwrap();
        let loaded = ConfigManager::load_config(&path).unwrap();

        assert_eq!(loaded.patterns.len(), 1);
        assert_eq!(loaded.patterns[0].pattern, "sum");
        assert_eq!(loaded.patterns[0].replacements, vec!["\\sum"]);
    }

    #[tokio::test]
    async fn test_load_partial_config_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        std::fs::write(
            &path,
            "patterns:\n  - pattern: \"in\"\n    replacements: [\"\\\\in\"]\n",
        )
        .unwrap();

        let loaded = ConfigManager::load_config(&path).unwrap();
        assert_eq!(loaded.patterns.len(), 1);
        assert!(loaded.settings.enable_fast_replace);
        assert_eq!(loaded.settings.min_symbol_suggest_chars, 1);
    }
}
