use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use appdata_cleaner::scanner::registry::{KnownApp, StaticRegistry};
use appdata_cleaner::scanner::{measure, CategoryRoots, ScanLayout, Scanner};
use appdata_cleaner::store::{Category, Row};

/// Config/cache/data roots plus descriptor and icon dirs under one temp dir
struct Fixture {
    tmp: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        for dir in ["config", "cache", "data", "applications", "icons", "known"] {
            std::fs::create_dir_all(tmp.path().join(dir)).unwrap();
        }
        Fixture { tmp }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.tmp.path().join(rel)
    }

    fn roots(&self) -> CategoryRoots {
        CategoryRoots {
            config: self.path("config"),
            cache: self.path("cache"),
            local_data: self.path("data"),
        }
    }

    fn layout(&self) -> ScanLayout {
        let mut layout = ScanLayout::new(self.roots(), "harbour-");
        layout.application_dirs = vec![self.path("applications")];
        layout.icon_templates = vec![format!("{}/{{icon}}.png", self.path("icons").display())];
        layout
    }

    fn write(&self, rel: &str, len: usize) -> PathBuf {
        let p = self.path(rel);
        std::fs::create_dir_all(p.parent().unwrap()).unwrap();
        std::fs::write(&p, vec![b'x'; len]).unwrap();
        p
    }

    fn desktop(&self, name: &str, contents: &str) {
        std::fs::write(
            self.path("applications").join(format!("{}.desktop", name)),
            contents,
        )
        .unwrap();
    }

    fn scanner(&self, apps: Vec<KnownApp>, layout: ScanLayout) -> Scanner {
        Scanner::new(Arc::new(StaticRegistry::new(apps)), layout)
    }
}

fn file_sum(dir: &Path) -> u64 {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| measure(e.path()))
        .sum()
}

// ─── SizeProbe ────────────────────────────────────────────────────────────────

#[test]
fn test_dir_size_is_sum_of_files() {
    let fx = Fixture::new();
    fx.write("config/harbour-a/one", 10);
    fx.write("config/harbour-a/.hidden", 20);
    fx.write("config/harbour-a/deep/er/two", 30);

    let dir = fx.path("config/harbour-a");
    assert_eq!(measure(&dir), 60);
    assert_eq!(measure(&dir), file_sum(&dir));
    assert_eq!(measure(&fx.path("config/harbour-missing")), 0);
}

// ─── Known pass ───────────────────────────────────────────────────────────────

#[test]
fn test_known_app_single_config_path() {
    let fx = Fixture::new();
    let conf = fx.write("known/foo.conf", 500);

    let scanner = fx.scanner(vec![KnownApp::new("foo").with_config(&conf)], fx.layout());
    let store = scanner.scan();

    let foo = store.get("foo").expect("foo registered");
    assert_eq!(foo.config.size, 500);
    assert_eq!(foo.cache.size, 0);
    assert_eq!(foo.local_data.size, 0);
    assert_eq!(foo.config.paths, vec![conf]);
    assert!(!foo.installed);

    fx.desktop("foo", "[Desktop Entry]\nName=Foo\n");
    let store = scanner.scan();
    assert!(store.get("foo").unwrap().installed);
}

#[test]
fn test_known_app_accumulates_candidates() {
    let fx = Fixture::new();
    let a = fx.write("known/cache-a/blob", 100);
    let b = fx.write("known/cache-b", 50);

    let app = KnownApp::new("sailfish-browser")
        .with_cache(a.parent().unwrap())
        .with_cache(&b)
        .with_cache(fx.path("known/not-there"));
    let store = fx.scanner(vec![app], fx.layout()).scan();

    let entry = store.get("sailfish-browser").unwrap();
    assert_eq!(entry.cache.paths.len(), 2);
    assert_eq!(entry.cache.size, 150);
}

#[test]
fn test_registry_order_is_row_order() {
    let fx = Fixture::new();
    let z = fx.write("known/z", 1);
    let a = fx.write("known/a", 1);

    let store = fx
        .scanner(
            vec![
                KnownApp::new("zeta").with_config(&z),
                KnownApp::new("alpha").with_config(&a),
            ],
            fx.layout(),
        )
        .scan();
    assert_eq!(store.names(), &["zeta".to_string(), "alpha".to_string()]);
}

// ─── Discovery pass ───────────────────────────────────────────────────────────

#[test]
fn test_discovery_creates_entries_per_category() {
    let fx = Fixture::new();
    fx.write("config/harbour-foo/settings.ini", 10);
    fx.write("cache/harbour-foo/qml/cache.bin", 200);
    fx.write("data/harbour-bar/db.sqlite", 3000);
    fx.write("data/not-harbour/db.sqlite", 999);

    let store = fx.scanner(vec![], fx.layout()).scan();
    assert_eq!(store.len(), 2);

    let foo = store.get("harbour-foo").unwrap();
    assert_eq!(foo.config.size, 10);
    assert_eq!(foo.cache.size, 200);
    assert_eq!(foo.cache.paths, vec![fx.path("cache/harbour-foo")]);
    assert_eq!(foo.local_data.size, 0);

    let bar = store.get("harbour-bar").unwrap();
    assert_eq!(bar.local_data.size, 3000);
}

#[test]
fn test_discovery_overwrites_only_touched_category() {
    let fx = Fixture::new();
    let known_cfg = fx.write("known/harbour-foo.conf", 7);
    let known_cache = fx.write("known/harbour-foo.cache", 11);
    fx.write("cache/harbour-foo/blob", 40);

    let app = KnownApp::new("harbour-foo")
        .with_config(&known_cfg)
        .with_cache(&known_cache);
    let store = fx.scanner(vec![app], fx.layout()).scan();

    let foo = store.get("harbour-foo").unwrap();
    // config untouched by discovery
    assert_eq!(foo.config.paths, vec![known_cfg]);
    assert_eq!(foo.config.size, 7);
    // cache replaced by the single discovered dir
    assert_eq!(foo.cache.paths, vec![fx.path("cache/harbour-foo")]);
    assert_eq!(foo.cache.size, 40);
    assert_eq!(store.len(), 1);
}

#[cfg(unix)]
#[test]
fn test_symlinked_app_dir_is_discovered_without_target_bytes() {
    let fx = Fixture::new();
    fx.write("known/elsewhere/blob", 5000);
    let link = |target: &str, name: &str| {
        std::os::unix::fs::symlink(fx.path(target), fx.path("cache").join(name)).unwrap();
    };
    link("known/elsewhere", "harbour-linked");
    link("known/missing", "harbour-dangling");

    let store = fx.scanner(vec![], fx.layout()).scan();
    assert_eq!(store.names(), &["harbour-linked".to_string()]);

    let linked = store.get("harbour-linked").unwrap();
    assert_eq!(linked.cache.paths, vec![fx.path("cache/harbour-linked")]);
    assert_eq!(linked.cache.size, 0);
}

#[test]
fn test_exclude_patterns_skip_directories() {
    let fx = Fixture::new();
    fx.write("config/harbour-keep/a", 5);
    fx.write("config/harbour-skip/a", 5);
    fx.write("cache/harbour-skip/a", 5);

    let layout = fx.layout().with_excludes(&["*/harbour-skip"]).unwrap();
    let store = fx.scanner(vec![], layout).scan();
    assert_eq!(store.names(), &["harbour-keep".to_string()]);
}

#[test]
fn test_missing_roots_are_tolerated() {
    let fx = Fixture::new();
    let mut layout = fx.layout();
    layout.roots.cache = fx.path("does/not/exist");
    fx.write("config/harbour-x/a", 1);

    let store = fx.scanner(vec![], layout).scan();
    assert_eq!(store.len(), 1);
}

// ─── Metadata enrichment ──────────────────────────────────────────────────────

#[test]
fn test_descriptor_sets_title_and_icon() {
    let fx = Fixture::new();
    fx.write("config/harbour-foo/a", 1);
    fx.write("icons/foo-icon.png", 4);
    fx.desktop(
        "harbour-foo",
        "[Desktop Entry]\nType=Application\nName=Foo Reader\nIcon=foo-icon\n",
    );

    let store = fx.scanner(vec![], fx.layout()).scan();
    let foo = store.get("harbour-foo").unwrap();
    assert!(foo.installed);
    assert_eq!(foo.title, "Foo Reader");
    assert_eq!(foo.icon, Some(fx.path("icons/foo-icon.png")));
}

#[test]
fn test_icon_defaults_to_entry_name() {
    let fx = Fixture::new();
    fx.write("cache/harbour-foo/a", 1);
    fx.write("icons/harbour-foo.png", 4);
    fx.desktop("harbour-foo", "[Desktop Entry]\nName=Foo\n");

    let store = fx.scanner(vec![], fx.layout()).scan();
    assert_eq!(
        store.get("harbour-foo").unwrap().icon,
        Some(fx.path("icons/harbour-foo.png"))
    );
}

#[test]
fn test_no_descriptor_means_unused() {
    let fx = Fixture::new();
    fx.write("data/harbour-gone/a", 1);

    let store = fx.scanner(vec![], fx.layout()).scan();
    let gone = store.get("harbour-gone").unwrap();
    assert!(!gone.installed);
    assert!(gone.title.is_empty());
    assert!(gone.icon.is_none());
    assert_eq!(store.row(0).unwrap().title, "harbour-gone");
}

// ─── Aggregates ───────────────────────────────────────────────────────────────

#[test]
fn test_totals_match_entries_after_scan() {
    let fx = Fixture::new();
    fx.write("config/harbour-a/x", 10);
    fx.write("cache/harbour-a/x", 20);
    fx.write("data/harbour-b/x", 30);
    fx.write("cache/harbour-c/x", 40);
    fx.desktop("harbour-a", "[Desktop Entry]\nName=A\n");

    let store = fx.scanner(vec![], fx.layout()).scan();
    let totals = store.totals();

    for category in Category::ALL {
        let sum: u64 = store.iter().map(|(_, e)| e.size(category)).sum();
        let unused: u64 = store
            .iter()
            .filter(|(_, e)| !e.installed)
            .map(|(_, e)| e.size(category))
            .sum();
        assert_eq!(totals.total(category), sum);
        assert_eq!(totals.unused(category), unused);
    }
    assert_eq!(totals.unused_apps_count, 2);
    assert_eq!(totals.total_config_size, 10);
    assert_eq!(totals.total_local_data_size, 30);
}

#[test]
fn test_sort_key_unused_before_installed() {
    let fx = Fixture::new();
    fx.write("config/harbour-a/x", 1);
    fx.write("config/harbour-b/x", 1);
    fx.desktop("harbour-a", "[Desktop Entry]\n");

    let store = fx.scanner(vec![], fx.layout()).scan();
    let mut rows = store.rows();
    rows.sort_by_key(Row::sort_key);
    let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["harbour-b", "harbour-a"]);
}
