use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cleaner::RemovalMode;
use crate::scanner::registry::{KnownApp, StaticRegistry};
use crate::scanner::{CategoryRoots, ScanLayout, Scanner};

/// Global cleaner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Override for the config root (default: XDG config dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_root: Option<PathBuf>,

    /// Override for the cache root (default: XDG cache dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_root: Option<PathBuf>,

    /// Override for the local-data root (default: XDG data dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_root: Option<PathBuf>,

    /// Directories searched for `<name>.desktop`
    #[serde(default = "default_application_dirs")]
    pub application_dirs: Vec<PathBuf>,

    /// Icon templates with an `{icon}` placeholder
    #[serde(default = "default_icon_templates")]
    pub icon_templates: Vec<String>,

    /// Directory-name prefix of independently packaged apps
    #[serde(default = "default_discovery_prefix")]
    pub discovery_prefix: String,

    /// Glob patterns of discovered directories to skip
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Measure and log deletions without removing anything
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,

    /// Well-known applications and their candidate paths
    #[serde(default)]
    pub known_apps: Vec<KnownApp>,
}

fn default_application_dirs() -> Vec<PathBuf> {
    let mut dirs_list = Vec::new();
    if let Some(data) = dirs::data_dir() {
        dirs_list.push(data.join("applications"));
    }
    dirs_list.push(PathBuf::from("/usr/local/share/applications"));
    dirs_list.push(PathBuf::from("/usr/share/applications"));
    dirs_list
}
fn default_icon_templates() -> Vec<String> {
    vec![
        "/usr/share/icons/hicolor/86x86/apps/{icon}.png".to_string(),
        "/usr/share/themes/sailfish-default/meegotouch/z1.0/icons/{icon}.png".to_string(),
    ]
}
fn default_discovery_prefix() -> String {
    "harbour-".to_string()
}
fn default_dry_run() -> bool {
    RemovalMode::default() == RemovalMode::DryRun
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_root: None,
            cache_root: None,
            data_root: None,
            application_dirs: default_application_dirs(),
            icon_templates: default_icon_templates(),
            discovery_prefix: default_discovery_prefix(),
            exclude_patterns: Vec::new(),
            dry_run: default_dry_run(),
            known_apps: Vec::new(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("appdata-cleaner")
            .join("config.toml")
    }

    /// Load config from the default location, or defaults if it does not exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`, or defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?;
            Ok(config.expanded())
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config dir: {}", dir.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Resolve `~` in every configured path
    fn expanded(mut self) -> Self {
        self.config_root = self.config_root.map(|p| expand_tilde(&p));
        self.cache_root = self.cache_root.map(|p| expand_tilde(&p));
        self.data_root = self.data_root.map(|p| expand_tilde(&p));
        self.application_dirs = self.application_dirs.iter().map(|p| expand_tilde(p)).collect();
        for app in &mut self.known_apps {
            for list in [&mut app.config, &mut app.cache, &mut app.local_data] {
                *list = list.iter().map(|p| expand_tilde(p)).collect();
            }
        }
        self
    }

    /// The three category roots, falling back to the XDG base directories
    pub fn roots(&self) -> CategoryRoots {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
        CategoryRoots {
            config: self
                .config_root
                .clone()
                .or_else(dirs::config_dir)
                .unwrap_or_else(|| home.join(".config")),
            cache: self
                .cache_root
                .clone()
                .or_else(dirs::cache_dir)
                .unwrap_or_else(|| home.join(".cache")),
            local_data: self
                .data_root
                .clone()
                .or_else(dirs::data_dir)
                .unwrap_or_else(|| home.join(".local/share")),
        }
    }

    pub fn scan_layout(&self) -> Result<ScanLayout> {
        let mut layout = ScanLayout::new(self.roots(), self.discovery_prefix.clone())
            .with_excludes(&self.exclude_patterns)?;
        layout.application_dirs = self.application_dirs.clone();
        layout.icon_templates = self.icon_templates.clone();
        Ok(layout)
    }

    pub fn registry(&self) -> StaticRegistry {
        StaticRegistry::new(self.known_apps.clone())
    }

    pub fn scanner(&self) -> Result<Scanner> {
        Ok(Scanner::new(Arc::new(self.registry()), self.scan_layout()?))
    }

    /// Dry run when configured, and always in a `safe-mode` build
    pub fn removal_mode(&self) -> RemovalMode {
        if self.dry_run || cfg!(feature = "safe-mode") {
            RemovalMode::DryRun
        } else {
            RemovalMode::Delete
        }
    }
}

/// Replace a leading `~` with the home directory
pub fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
