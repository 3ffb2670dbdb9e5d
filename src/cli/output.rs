use colored::*;

use crate::cleaner::RemovalMode;
use crate::common::config::Config;
use crate::common::format::{self, format_path, format_size, format_size_colored};
use crate::coordinator::OperationOutcome;
use crate::store::{Category, CategorySet, EntryStore, Row, Totals};

/// Print the application table in human-readable format
pub fn print_entries(store: &EntryStore, rows: &[Row], detailed: bool, scan_secs: f64) {
    let totals = store.totals();

    println!();
    println!("{}  Application Data", "🧹");
    println!("{}", "─".repeat(78).dimmed());
    println!(
        "  Scanned in {}  •  {} in use  •  {} reclaimable from {}",
        format::format_duration(scan_secs).cyan(),
        format_size_colored(totals.grand_total()),
        format_size_colored(totals.unused_total()),
        format::format_app_count(totals.unused_apps_count).dimmed()
    );
    println!("{}", "─".repeat(78).dimmed());
    println!();

    if rows.is_empty() {
        println!("  {} No application data found.", "✨");
        println!();
        return;
    }

    println!(
        "  {:<3} {:<34} {:>10} {:>10} {:>10} {:>10}",
        "".dimmed(),
        "Application".dimmed(),
        "Config".dimmed(),
        "Cache".dimmed(),
        "Data".dimmed(),
        "Total".dimmed(),
    );
    println!("  {}", "─".repeat(76).dimmed());

    for row in rows {
        let marker = if row.installed {
            "●".green()
        } else {
            "○".yellow()
        };
        println!(
            "  {:<3} {:<34} {:>10} {:>10} {:>10} {:>10}",
            marker,
            format::truncate(&row.title, 34),
            format::format_size_or_dash(row.config_size),
            format::format_size_or_dash(row.cache_size),
            format::format_size_or_dash(row.local_data_size),
            format_size_colored(row.total_size()),
        );

        if detailed {
            if row.title != row.name {
                println!("      {} {}", "↳".dimmed(), row.name.dimmed());
            }
            if let Some(entry) = store.get(&row.name) {
                for category in Category::ALL {
                    for path in &entry.category(category).paths {
                        println!(
                            "      {} {} {}",
                            "↳".dimmed(),
                            format!("[{}]", category).dimmed(),
                            format_path(path).dimmed()
                        );
                    }
                }
            }
        }
    }

    println!();
    println!(
        "  {} installed   {} not installed",
        "●".green(),
        "○".yellow()
    );
    println!();
}

/// Print rows and totals as JSON
pub fn print_entries_json(store: &EntryStore, rows: &[Row]) {
    let json = serde_json::json!({
        "scanned_at": chrono::Utc::now().to_rfc3339(),
        "entries": rows.iter().map(|row| {
            let entry = store.get(&row.name);
            serde_json::json!({
                "row": row,
                "paths": entry.map(|e| serde_json::json!({
                    "config": e.config.paths,
                    "cache": e.cache.paths,
                    "local_data": e.local_data.paths,
                })),
            })
        }).collect::<Vec<_>>(),
        "totals": store.totals(),
    });
    print_json(&json);
}

/// One name per line
pub fn print_entries_quiet(rows: &[Row]) {
    for row in rows {
        println!("{}\t{}", row.name, row.total_size());
    }
}

/// Print aggregate totals
pub fn print_totals(totals: &Totals) {
    format::print_header("Totals");
    for category in Category::ALL {
        format::print_kv(
            &format!("{:<11}", category.to_string()),
            &format!(
                "{:>10}  ({} unused, {})",
                format_size(totals.total(category)),
                format_size(totals.unused(category)),
                format::format_percent(totals.unused(category), totals.total(category))
            ),
        );
    }
    println!();
    format::print_kv(
        "All data   ",
        &format_size_colored(totals.grand_total()).to_string(),
    );
    format::print_kv(
        "Unused apps",
        &format!(
            "{} holding {}",
            totals.unused_apps_count,
            format_size_colored(totals.unused_total())
        ),
    );
    println!();
}

pub fn print_totals_json(totals: &Totals) {
    print_json(&serde_json::json!({
        "scanned_at": chrono::Utc::now().to_rfc3339(),
        "totals": totals,
    }));
}

/// Show what a deletion is about to touch
pub fn print_deletion_plan(store: &EntryStore, names: &[String], categories: CategorySet) {
    println!();
    let mut total = 0u64;
    for name in names {
        let Some(entry) = store.get(name) else {
            continue;
        };
        let selected: u64 = categories.iter().map(|c| entry.size(c)).sum();
        if selected == 0 {
            continue;
        }
        total += selected;
        println!(
            "  {} {:<40} {:>10}",
            "✗".red(),
            format::truncate(entry.display_title(name), 40),
            format_size(selected)
        );
        for category in categories.iter() {
            for path in &entry.category(category).paths {
                println!("      {} {}", "↳".dimmed(), format_path(path).dimmed());
            }
        }
    }
    println!("  {}", "─".repeat(54).dimmed());
    println!("  {:<42} {:>10}", "Total", format_size_colored(total));
}

/// Print the result of a delete operation
pub fn print_deletion_outcome(outcome: &OperationOutcome, mode: RemovalMode) {
    println!();
    let (icon, label) = match mode {
        RemovalMode::DryRun => ("ℹ️", "Dry run: would free"),
        RemovalMode::Delete => ("✓", "Freed"),
    };
    println!(
        "  {} {} {}",
        icon,
        label.bold(),
        format_size_colored(outcome.bytes_freed)
    );
    if !outcome.removed_entries.is_empty() {
        println!(
            "  {} {} no longer have any data",
            "•".dimmed(),
            format::format_app_count(outcome.removed_entries.len())
        );
    }

    if !outcome.failed_paths.is_empty() {
        println!();
        for path in &outcome.failed_paths {
            println!(
                "    {} could not delete {}",
                "⚠".yellow(),
                format_path(path).dimmed()
            );
        }
    }
    println!();
}

pub fn print_deletion_json(outcome: &OperationOutcome, mode: RemovalMode, totals: &Totals) {
    print_json(&serde_json::json!({
        "mode": mode,
        "bytes_freed": outcome.bytes_freed,
        "removed_entries": outcome.removed_entries,
        "failed_paths": outcome.failed_paths,
        "remaining_entries": outcome.entries,
        "totals": totals,
    }));
}

/// Print the effective configuration
pub fn print_config(config: &Config) {
    format::print_header("Configuration");
    let roots = config.roots();
    format::print_kv("Config root ", &format_path(&roots.config));
    format::print_kv("Cache root  ", &format_path(&roots.cache));
    format::print_kv("Data root   ", &format_path(&roots.local_data));
    format::print_kv("Prefix      ", &config.discovery_prefix);
    format::print_kv(
        "Mode        ",
        &if config.dry_run {
            "dry run".yellow().to_string()
        } else {
            "delete".to_string()
        },
    );
    format::print_kv("Known apps  ", &config.known_apps.len().to_string());
    for dir in &config.application_dirs {
        format::print_kv("Descriptors ", &format_path(dir));
    }
    for pattern in &config.exclude_patterns {
        format::print_kv("Exclude     ", pattern);
    }
    println!();
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Error serializing: {}", e),
    }
}
