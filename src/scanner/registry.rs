use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A well-known application and the candidate paths it may own
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownApp {
    pub name: String,
    #[serde(default)]
    pub config: Vec<PathBuf>,
    #[serde(default)]
    pub cache: Vec<PathBuf>,
    #[serde(default)]
    pub local_data: Vec<PathBuf>,
}

impl KnownApp {
    pub fn new(name: impl Into<String>) -> Self {
        KnownApp {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.push(path.into());
        self
    }

    pub fn with_cache(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache.push(path.into());
        self
    }

    pub fn with_local_data(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_data.push(path.into());
        self
    }
}

/// Source of known-application descriptors.
///
/// Paths are absolute and fully resolved by the implementation; the scanner
/// does no placeholder substitution. Implementations are read-only.
pub trait AppRegistry: Send + Sync {
    fn known_apps(&self) -> Vec<KnownApp>;
}

/// Registry backed by a fixed list, in the order given
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    apps: Vec<KnownApp>,
}

impl StaticRegistry {
    pub fn new(apps: Vec<KnownApp>) -> Self {
        StaticRegistry { apps }
    }
}

impl AppRegistry for StaticRegistry {
    fn known_apps(&self) -> Vec<KnownApp> {
        self.apps.clone()
    }
}
