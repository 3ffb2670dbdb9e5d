//! The observable application inventory.
//!
//! `EntryStore` keeps entries in insertion order (the only defined row order)
//! and caches store-wide [`Totals`] that are recomputed wholesale, never patched.

pub mod entry;

pub use entry::{Category, CategoryData, CategorySet, Entry};

use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Store-wide sums and counts, refreshed as a unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_config_size: u64,
    pub total_cache_size: u64,
    pub total_local_data_size: u64,
    pub unused_apps_count: usize,
    pub unused_config_size: u64,
    pub unused_cache_size: u64,
    pub unused_local_data_size: u64,
}

impl Totals {
    pub fn compute<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Self {
        let mut totals = Totals::default();
        for e in entries {
            totals.total_config_size += e.config.size;
            totals.total_cache_size += e.cache.size;
            totals.total_local_data_size += e.local_data.size;
            if !e.installed {
                totals.unused_apps_count += 1;
                totals.unused_config_size += e.config.size;
                totals.unused_cache_size += e.cache.size;
                totals.unused_local_data_size += e.local_data.size;
            }
        }
        totals
    }

    pub fn total(&self, category: Category) -> u64 {
        match category {
            Category::Config => self.total_config_size,
            Category::Cache => self.total_cache_size,
            Category::LocalData => self.total_local_data_size,
        }
    }

    pub fn unused(&self, category: Category) -> u64 {
        match category {
            Category::Config => self.unused_config_size,
            Category::Cache => self.unused_cache_size,
            Category::LocalData => self.unused_local_data_size,
        }
    }

    pub fn grand_total(&self) -> u64 {
        self.total_config_size + self.total_cache_size + self.total_local_data_size
    }

    pub fn unused_total(&self) -> u64 {
        self.unused_config_size + self.unused_cache_size + self.unused_local_data_size
    }
}

/// Read model of one entry as the presentation layer sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub name: String,
    /// Display title, already falling back to the name
    pub title: String,
    pub icon: Option<PathBuf>,
    pub installed: bool,
    pub config_size: u64,
    pub cache_size: u64,
    pub local_data_size: u64,
}

impl Row {
    fn new(name: &str, entry: &Entry) -> Self {
        Row {
            name: name.to_string(),
            title: entry.display_title(name).to_string(),
            icon: entry.icon.clone(),
            installed: entry.installed,
            config_size: entry.config.size,
            cache_size: entry.cache.size,
            local_data_size: entry.local_data.size,
        }
    }

    /// Ascending key: unused apps first, then by display title.
    pub fn sort_key(&self) -> String {
        let mut key = String::with_capacity(self.title.len() + 1);
        key.push(if self.installed { '1' } else { '0' });
        key.push_str(&self.title);
        key
    }

    pub fn total_size(&self) -> u64 {
        self.config_size + self.cache_size + self.local_data_size
    }
}

/// Name-keyed, insertion-ordered collection of entries plus aggregate totals
#[derive(Debug, Clone, Default)]
pub struct EntryStore {
    names: Vec<String>,
    entries: HashMap<String, Entry>,
    totals: Totals,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Entry> {
        self.entries.get_mut(name)
    }

    /// Row index of `name`, if present
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Names in row order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Iterate `(name, entry)` pairs in row order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.names
            .iter()
            .filter_map(|n| self.entries.get(n).map(|e| (n.as_str(), e)))
    }

    /// Append a new entry. Returns false (and changes nothing) if the name is taken.
    pub fn insert(&mut self, name: impl Into<String>, entry: Entry) -> bool {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return false;
        }
        self.names.push(name.clone());
        self.entries.insert(name, entry);
        true
    }

    /// Existing entry for `name`, or a fresh default one appended at the end
    pub fn entry_or_default(&mut self, name: &str) -> &mut Entry {
        if !self.entries.contains_key(name) {
            self.names.push(name.to_string());
        }
        self.entries.entry(name.to_string()).or_default()
    }

    /// Replace the entry stored under an existing name, keeping its row
    pub fn replace(&mut self, name: &str, entry: Entry) -> Option<Entry> {
        self.entries
            .get_mut(name)
            .map(|slot| std::mem::replace(slot, entry))
    }

    /// Remove an entry, returning its former row index
    pub fn remove(&mut self, name: &str) -> Option<(usize, Entry)> {
        let row = self.index_of(name)?;
        self.names.remove(row);
        self.entries.remove(name).map(|e| (row, e))
    }

    /// Names of entries with `installed == false`, in row order
    pub fn unused_names(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, e)| !e.installed)
            .map(|(n, _)| n.to_string())
            .collect()
    }

    pub fn row(&self, index: usize) -> Option<Row> {
        let name = self.names.get(index)?;
        self.entries.get(name).map(|e| Row::new(name, e))
    }

    pub fn rows(&self) -> Vec<Row> {
        self.iter().map(|(n, e)| Row::new(n, e)).collect()
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    /// Recompute all aggregates from scratch
    pub fn recalculate_totals(&mut self) -> Totals {
        self.totals = Totals::compute(self.entries.values());
        self.totals
    }
}
