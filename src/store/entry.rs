use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Classification of application-owned data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Config,
    Cache,
    LocalData,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Config, Category::Cache, Category::LocalData];

    const fn bit(self) -> u8 {
        match self {
            Category::Config => 0b001,
            Category::Cache => 0b010,
            Category::LocalData => 0b100,
        }
    }

    /// Name of the row field carrying this category's size
    pub const fn size_field(self) -> &'static str {
        match self {
            Category::Config => "configSize",
            Category::Cache => "cacheSize",
            Category::LocalData => "localDataSize",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Config => write!(f, "config"),
            Category::Cache => write!(f, "cache"),
            Category::LocalData => write!(f, "local data"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "config" | "configuration" => Ok(Category::Config),
            "cache" => Ok(Category::Cache),
            "data" | "local_data" | "local-data" | "localdata" => Ok(Category::LocalData),
            other => Err(format!("unknown category '{}'", other)),
        }
    }
}

/// A subset of {config, cache, local-data}, stored as a bitmask
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CategorySet(u8);

impl CategorySet {
    pub const EMPTY: CategorySet = CategorySet(0);
    pub const ALL: CategorySet = CategorySet(0b111);

    pub const fn only(category: Category) -> Self {
        CategorySet(category.bit())
    }

    pub fn insert(&mut self, category: Category) {
        self.0 |= category.bit();
    }

    pub const fn contains(self, category: Category) -> bool {
        self.0 & category.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Category> {
        Category::ALL.into_iter().filter(move |c| self.contains(*c))
    }

    /// Row field names for the categories in this set
    pub fn field_names(self) -> Vec<&'static str> {
        self.iter().map(Category::size_field).collect()
    }
}

impl std::fmt::Debug for CategorySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Category> for CategorySet {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        let mut set = CategorySet::EMPTY;
        for c in iter {
            set.insert(c);
        }
        set
    }
}

impl FromStr for CategorySet {
    type Err = String;

    /// Parses a comma-separated list such as `config,cache`; `all` selects everything.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategorySet::ALL);
        }
        s.split(',')
            .filter(|part| !part.trim().is_empty())
            .map(Category::from_str)
            .collect()
    }
}

/// Paths owned by one application in one category, with their cached size
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryData {
    pub paths: Vec<PathBuf>,
    pub size: u64,
}

impl CategoryData {
    /// Forget all paths after they have been removed from disk
    pub fn clear(&mut self) {
        self.paths.clear();
        self.size = 0;
    }
}

/// Per-application record of display metadata, installed status and disk usage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Empty when no descriptor supplied one
    pub title: String,
    pub icon: Option<PathBuf>,
    pub installed: bool,
    pub config: CategoryData,
    pub cache: CategoryData,
    pub local_data: CategoryData,
}

impl Entry {
    /// True while there is still data on disk to account for
    pub fn exists(&self) -> bool {
        self.config.size > 0 || self.cache.size > 0 || self.local_data.size > 0
    }

    pub fn category(&self, category: Category) -> &CategoryData {
        match category {
            Category::Config => &self.config,
            Category::Cache => &self.cache,
            Category::LocalData => &self.local_data,
        }
    }

    pub fn category_mut(&mut self, category: Category) -> &mut CategoryData {
        match category {
            Category::Config => &mut self.config,
            Category::Cache => &mut self.cache,
            Category::LocalData => &mut self.local_data,
        }
    }

    pub fn size(&self, category: Category) -> u64 {
        self.category(category).size
    }

    pub fn total_size(&self) -> u64 {
        self.config.size + self.cache.size + self.local_data.size
    }

    pub fn display_title<'a>(&'a self, name: &'a str) -> &'a str {
        if self.title.is_empty() {
            name
        } else {
            &self.title
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exists_requires_positive_size() {
        let mut entry = Entry::default();
        assert!(!entry.exists());

        entry.cache.paths.push(PathBuf::from("/tmp/empty"));
        assert!(!entry.exists());

        entry.cache.size = 1;
        assert!(entry.exists());
    }

    #[test]
    fn test_display_title_falls_back_to_name() {
        let mut entry = Entry::default();
        assert_eq!(entry.display_title("harbour-foo"), "harbour-foo");
        entry.title = "Foo".to_string();
        assert_eq!(entry.display_title("harbour-foo"), "Foo");
    }

    #[test]
    fn test_category_set_ops() {
        let mut set = CategorySet::EMPTY;
        assert!(set.is_empty());
        set.insert(Category::Cache);
        assert!(set.contains(Category::Cache));
        assert!(!set.contains(Category::Config));
        assert_eq!(set.len(), 1);
        assert_eq!(CategorySet::ALL.len(), 3);
        assert_eq!(
            CategorySet::ALL.iter().collect::<Vec<_>>(),
            Category::ALL.to_vec()
        );
    }

    #[test]
    fn test_category_set_parse() {
        let set: CategorySet = "config, data".parse().unwrap();
        assert!(set.contains(Category::Config));
        assert!(set.contains(Category::LocalData));
        assert!(!set.contains(Category::Cache));

        assert_eq!("all".parse::<CategorySet>().unwrap(), CategorySet::ALL);
        assert!("config,bogus".parse::<CategorySet>().is_err());
    }

    #[test]
    fn test_field_names() {
        let set: CategorySet = [Category::LocalData, Category::Config].into_iter().collect();
        assert_eq!(set.field_names(), vec!["configSize", "localDataSize"]);
    }
}
