pub mod desktop;
pub mod registry;
pub mod size;

use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::common::errors::{CleanerError, Result};
use crate::store::{Category, CategoryData, Entry, EntryStore};
use desktop::DesktopEntry;
use registry::{AppRegistry, KnownApp};

pub use size::measure;

/// Platform-standard roots searched by the discovery pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRoots {
    pub config: PathBuf,
    pub cache: PathBuf,
    pub local_data: PathBuf,
}

impl CategoryRoots {
    pub fn get(&self, category: Category) -> &Path {
        match category {
            Category::Config => &self.config,
            Category::Cache => &self.cache,
            Category::LocalData => &self.local_data,
        }
    }
}

/// Where and how the scanner looks, supplied by the hosting environment
#[derive(Debug, Clone)]
pub struct ScanLayout {
    pub roots: CategoryRoots,
    /// Directories searched for `<name>.desktop`, in priority order
    pub application_dirs: Vec<PathBuf>,
    /// Icon path templates containing an `{icon}` placeholder
    pub icon_templates: Vec<String>,
    /// Directory-name prefix of independently packaged apps
    pub discovery_prefix: String,
    /// Full paths matching any of these are skipped by discovery
    pub exclude: Vec<glob::Pattern>,
}

impl ScanLayout {
    pub fn new(roots: CategoryRoots, discovery_prefix: impl Into<String>) -> Self {
        ScanLayout {
            roots,
            application_dirs: Vec::new(),
            icon_templates: Vec::new(),
            discovery_prefix: discovery_prefix.into(),
            exclude: Vec::new(),
        }
    }

    /// Compile glob exclude patterns, failing on the first invalid one
    pub fn with_excludes<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        for p in patterns {
            let pattern = glob::Pattern::new(p.as_ref()).map_err(|e| CleanerError::Pattern {
                pattern: p.as_ref().to_string(),
                message: e.to_string(),
            })?;
            self.exclude.push(pattern);
        }
        Ok(self)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.exclude.iter().any(|p| p.matches_path(path))
    }
}

/// Builds the application inventory from the registry and the filesystem
pub struct Scanner {
    registry: Arc<dyn AppRegistry>,
    layout: ScanLayout,
}

impl Scanner {
    pub fn new(registry: Arc<dyn AppRegistry>, layout: ScanLayout) -> Self {
        Scanner { registry, layout }
    }

    pub fn layout(&self) -> &ScanLayout {
        &self.layout
    }

    /// Produce a fresh store. Read-only with respect to the filesystem.
    pub fn scan(&self) -> EntryStore {
        let start = Instant::now();
        let mut store = EntryStore::new();

        // 1. Registry apps with explicit candidate paths
        self.scan_known(&mut store);

        // 2. Apps found by directory naming convention
        for category in Category::ALL {
            self.discover(category, &mut store);
        }

        // 3. Installed state, title and icon
        self.enrich(&mut store);

        let totals = store.recalculate_totals();
        info!(
            entries = store.len(),
            unused = totals.unused_apps_count,
            bytes = totals.grand_total(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "scan finished"
        );
        store
    }

    fn scan_known(&self, store: &mut EntryStore) {
        let apps = self.registry.known_apps();

        // Measure in parallel; collect keeps registry order
        let measured: Vec<(String, Entry)> = apps
            .par_iter()
            .map(|app| (app.name.clone(), known_entry(app)))
            .collect();

        let mut seen = HashSet::new();
        for (name, entry) in measured {
            if !seen.insert(name.clone()) {
                warn!("Duplicate registry entry '{}' ignored", name);
                continue;
            }
            if entry.exists() {
                debug!("Found a known app '{}'", name);
                store.insert(name, entry);
            }
        }
    }

    fn discover(&self, category: Category, store: &mut EntryStore) {
        let root = self.layout.roots.get(category);
        let read_dir = match std::fs::read_dir(root) {
            Ok(rd) => rd,
            Err(e) => {
                debug!("Skipping discovery in '{}': {}", root.display(), e);
                return;
            }
        };

        let mut dirs: Vec<(String, PathBuf)> = read_dir
            .filter_map(|e| e.ok())
            // Symlinked app dirs count too; they measure as the link alone
            .filter(|e| e.path().is_dir())
            .filter_map(|e| {
                let name = e.file_name().to_str()?.to_string();
                name.starts_with(&self.layout.discovery_prefix)
                    .then(|| (name, e.path()))
            })
            .filter(|(_, path)| !self.layout.is_excluded(path))
            .collect();
        dirs.sort();

        let sizes: Vec<u64> = dirs.par_iter().map(|(_, path)| measure(path)).collect();

        for ((name, path), size) in dirs.into_iter().zip(sizes) {
            if !store.contains(&name) {
                debug!("Found a discovered app '{}'", name);
            }
            // Discovery owns exactly one path per category
            *store.entry_or_default(&name).category_mut(category) = CategoryData {
                paths: vec![path],
                size,
            };
        }
    }

    fn enrich(&self, store: &mut EntryStore) {
        let names: Vec<String> = store.names().to_vec();
        for name in names {
            let Some(descriptor) = desktop::find_descriptor(&self.layout.application_dirs, &name)
            else {
                continue;
            };
            let Some(entry) = store.get_mut(&name) else {
                continue;
            };
            entry.installed = true;

            let desktop = match DesktopEntry::load(&descriptor) {
                Ok(d) => d,
                Err(e) => {
                    warn!("Unreadable descriptor for '{}': {}", name, e);
                    continue;
                }
            };
            entry.title = desktop.name.unwrap_or_default();
            let icon_name = desktop.icon.unwrap_or_else(|| name.clone());
            entry.icon = desktop::resolve_icon(&self.layout.icon_templates, &icon_name);
        }
    }
}

/// Accumulate every existing candidate path of a registry app
fn known_entry(app: &KnownApp) -> Entry {
    let mut entry = Entry::default();
    collect_known_paths(&mut entry.config, &app.config);
    collect_known_paths(&mut entry.cache, &app.cache);
    collect_known_paths(&mut entry.local_data, &app.local_data);
    entry
}

fn collect_known_paths(data: &mut CategoryData, candidates: &[PathBuf]) {
    for p in candidates {
        if p.exists() {
            data.paths.push(p.clone());
            data.size += measure(p);
        }
    }
}
