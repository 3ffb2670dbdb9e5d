use colored::*;
use std::path::Path;

const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

/// Sizes at or above this are highlighted as worth cleaning
const LARGE: u64 = 1024 * 1024 * 1024;
const NOTABLE: u64 = 100 * 1024 * 1024;

/// Human-readable size using binary units ("512 B", "1.5 KB", "2.00 GB")
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{:.1} {}", value, UNITS[unit])
    } else {
        format!("{:.2} {}", value, UNITS[unit])
    }
}

/// Size colored by how much it matters: dimmed when empty, red past a gigabyte
pub fn format_size_colored(bytes: u64) -> ColoredString {
    let s = format_size(bytes);
    match bytes {
        0 => s.dimmed(),
        b if b >= LARGE => s.red().bold(),
        b if b >= NOTABLE => s.yellow(),
        _ => s.white(),
    }
}

/// Table cell: a size, or "-" for a category with no data
pub fn format_size_or_dash(bytes: u64) -> String {
    if bytes == 0 {
        "-".to_string()
    } else {
        format_size(bytes)
    }
}

/// Share of `part` in `whole` as a whole percentage
pub fn format_percent(part: u64, whole: u64) -> String {
    if whole == 0 {
        return "0%".to_string();
    }
    format!("{:.0}%", part as f64 * 100.0 / whole as f64)
}

pub fn format_app_count(count: usize) -> String {
    match count {
        1 => "1 app".to_string(),
        n => format!("{} apps", n),
    }
}

/// Path with the home directory shown as ~
pub fn format_path(path: &Path) -> String {
    dirs::home_dir()
        .and_then(|home| path.strip_prefix(&home).ok().map(|p| p.to_path_buf()))
        .map(|rest| format!("~/{}", rest.display()))
        .unwrap_or_else(|| path.display().to_string())
}

/// Scan duration: milliseconds under a second, then seconds, then minutes
pub fn format_duration(secs: f64) -> String {
    if secs < 1.0 {
        return format!("{:.0}ms", secs * 1000.0);
    }
    if secs < 60.0 {
        return format!("{:.1}s", secs);
    }
    let mins = (secs / 60.0).floor();
    format!("{}m {:.0}s", mins as u64, secs - mins * 60.0)
}

pub fn print_header(title: &str) {
    println!();
    println!("{}", title.bold().underline());
    println!();
}

pub fn print_kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Shorten to `max_len` characters, ending in "..." when cut.
/// Counts chars, so multi-byte titles never split mid-character.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return ".".repeat(max_len);
    }
    let head: String = s.chars().take(max_len - 3).collect();
    format!("{}...", head)
}
