use std::path::{Path, PathBuf};

use crate::common::errors::{CleanerError, Result};

const DESKTOP_SECTION: &str = "Desktop Entry";
const ICON_PLACEHOLDER: &str = "{icon}";

/// The fields of a `.desktop` descriptor the scanner cares about
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesktopEntry {
    pub name: Option<String>,
    pub icon: Option<String>,
}

impl DesktopEntry {
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| CleanerError::io(path, e))?;
        Ok(Self::parse(&contents))
    }

    /// Read `Name` and `Icon` from the `[Desktop Entry]` group.
    /// Localized keys such as `Name[de]` are ignored.
    pub fn parse(contents: &str) -> Self {
        let mut entry = DesktopEntry::default();
        let mut in_section = false;

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(group) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                in_section = group == DESKTOP_SECTION;
                continue;
            }
            if !in_section {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.trim() {
                "Name" if entry.name.is_none() => entry.name = Some(unescape(value)),
                "Icon" if entry.icon.is_none() => entry.icon = Some(unescape(value)),
                _ => {}
            }
        }

        entry
    }
}

/// Expand the `\s`, `\n`, `\t`, `\r` and `\\` escapes of desktop-entry
/// string values. Unknown escapes are kept as written.
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// First `<dir>/<name>.desktop` that is a regular file
pub fn find_descriptor(application_dirs: &[PathBuf], name: &str) -> Option<PathBuf> {
    application_dirs
        .iter()
        .map(|dir| dir.join(format!("{}.desktop", name)))
        .find(|p| p.is_file())
}

/// Resolve an icon identifier to the first existing icon file.
///
/// An absolute identifier that points at a file wins outright; otherwise each
/// template has `{icon}` substituted and is tried in order.
pub fn resolve_icon(templates: &[String], icon: &str) -> Option<PathBuf> {
    let direct = Path::new(icon);
    if direct.is_absolute() && direct.is_file() {
        return Some(direct.to_path_buf());
    }

    templates
        .iter()
        .map(|tmpl| PathBuf::from(tmpl.replace(ICON_PLACEHOLDER, icon)))
        .find(|p| p.is_file())
}
