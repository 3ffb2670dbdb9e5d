use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

use appdata_cleaner::cleaner::{PathRemover, RemovalMode};
use appdata_cleaner::cli::args::{
    category_set, CategoryArg, Cli, Commands, ConfigAction, EntrySort, OutputFormat,
};
use appdata_cleaner::cli::output;
use appdata_cleaner::common::config::Config;
use appdata_cleaner::common::format;
use appdata_cleaner::coordinator::Coordinator;
use appdata_cleaner::store::{CategorySet, EntryStore, Row};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let filter = if cli.verbose {
        "appdata_cleaner=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::List {
            sort,
            unused,
            detailed,
        } => cmd_list(&cli, sort, unused, detailed),

        Commands::Totals => cmd_totals(&cli),

        Commands::Delete {
            ref name,
            ref categories,
            dry_run,
            yes,
        } => cmd_delete(&cli, name, categories, dry_run, yes),

        Commands::DeleteUnused {
            ref categories,
            dry_run,
            yes,
        } => cmd_delete_unused(&cli, categories, dry_run, yes),

        Commands::Config { ref action } => cmd_config(&cli, action),

        Commands::Completions { ref shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            let shell = match shell {
                appdata_cleaner::cli::args::CompletionShell::Bash => clap_complete::Shell::Bash,
                appdata_cleaner::cli::args::CompletionShell::Zsh => clap_complete::Shell::Zsh,
                appdata_cleaner::cli::args::CompletionShell::Fish => clap_complete::Shell::Fish,
            };
            clap_complete::generate(shell, &mut cmd, "appdata-cleaner", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    match cli.config {
        Some(ref path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn start(config: &Config, mode: RemovalMode) -> Result<Coordinator> {
    Ok(Coordinator::spawn(
        config.scanner()?,
        PathRemover::new(mode),
    )?)
}

/// Run a full scan, with a spinner in interactive human mode
fn scan(cli: &Cli, coordinator: &Coordinator) -> Result<f64> {
    let started = Instant::now();
    let spinner = if !cli.quiet && matches!(cli.format, OutputFormat::Human) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Scanning application data...");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    coordinator.reset().wait()?;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    Ok(started.elapsed().as_secs_f64())
}

// ─── List ─────────────────────────────────────────────────────────────────────

fn cmd_list(cli: &Cli, sort: EntrySort, unused: bool, detailed: bool) -> Result<()> {
    let config = load_config(cli)?;
    let coordinator = start(&config, config.removal_mode())?;
    let scan_secs = scan(cli, &coordinator)?;

    let store = coordinator.snapshot();
    let mut rows: Vec<Row> = store
        .rows()
        .into_iter()
        .filter(|r| !unused || !r.installed)
        .collect();
    match sort {
        EntrySort::Usage => rows.sort_by_key(Row::sort_key),
        EntrySort::Name => rows.sort_by(|a, b| a.name.cmp(&b.name)),
        EntrySort::Size => rows.sort_by(|a, b| b.total_size().cmp(&a.total_size())),
    }

    match cli.format {
        OutputFormat::Human => output::print_entries(&store, &rows, detailed, scan_secs),
        OutputFormat::Json => output::print_entries_json(&store, &rows),
        OutputFormat::Quiet => output::print_entries_quiet(&rows),
    }
    Ok(())
}

// ─── Totals ───────────────────────────────────────────────────────────────────

fn cmd_totals(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let coordinator = start(&config, config.removal_mode())?;
    scan(cli, &coordinator)?;

    let totals = coordinator.totals();
    match cli.format {
        OutputFormat::Human => output::print_totals(&totals),
        OutputFormat::Json => output::print_totals_json(&totals),
        OutputFormat::Quiet => println!("{}\t{}", totals.grand_total(), totals.unused_total()),
    }
    Ok(())
}

// ─── Delete ───────────────────────────────────────────────────────────────────

fn cmd_delete(
    cli: &Cli,
    name: &str,
    categories: &[CategoryArg],
    dry_run: bool,
    yes: bool,
) -> Result<()> {
    let config = load_config(cli)?;
    let mode = if dry_run {
        RemovalMode::DryRun
    } else {
        config.removal_mode()
    };
    let coordinator = start(&config, mode)?;
    scan(cli, &coordinator)?;

    let store = coordinator.snapshot();
    if !store.contains(name) {
        anyhow::bail!("No data found for '{}'", name);
    }

    let set = category_set(categories);
    let targets = vec![name.to_string()];
    if !confirm(cli, &store, &targets, set, mode, yes)? {
        return Ok(());
    }

    let outcome = coordinator.delete_data(name, set).wait()?;
    report(cli, &coordinator, &outcome, mode);
    Ok(())
}

fn cmd_delete_unused(cli: &Cli, categories: &[CategoryArg], dry_run: bool, yes: bool) -> Result<()> {
    let config = load_config(cli)?;
    let mode = if dry_run {
        RemovalMode::DryRun
    } else {
        config.removal_mode()
    };
    let coordinator = start(&config, mode)?;
    scan(cli, &coordinator)?;

    let store = coordinator.snapshot();
    let set = category_set(categories);
    let targets = store.unused_names();
    if !confirm(cli, &store, &targets, set, mode, yes)? {
        return Ok(());
    }

    let outcome = coordinator.delete_unused_data(set).wait()?;
    report(cli, &coordinator, &outcome, mode);
    Ok(())
}

/// Show the plan and ask before deleting. Returns false when there is nothing
/// to do or the user declined.
fn confirm(
    cli: &Cli,
    store: &EntryStore,
    names: &[String],
    categories: CategorySet,
    mode: RemovalMode,
    yes: bool,
) -> Result<bool> {
    let selected: u64 = names
        .iter()
        .filter_map(|n| store.get(n))
        .map(|e| categories.iter().map(|c| e.size(c)).sum::<u64>())
        .sum();

    let human = matches!(cli.format, OutputFormat::Human);
    if selected == 0 {
        if human && !cli.quiet {
            println!("  {} Nothing to delete!", "✨");
        }
        return Ok(false);
    }

    if human && !cli.quiet {
        output::print_deletion_plan(store, names, categories);
    }

    if yes || mode == RemovalMode::DryRun {
        return Ok(true);
    }

    print!(
        "\n  {} PERMANENTLY DELETE {} of data? [y/N] ",
        "❓",
        format::format_size(selected)
    );
    use std::io::Write;
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    if !input.trim().eq_ignore_ascii_case("y") {
        println!("  {} Cancelled", "✗".red());
        return Ok(false);
    }
    Ok(true)
}

fn report(
    cli: &Cli,
    coordinator: &Coordinator,
    outcome: &appdata_cleaner::coordinator::OperationOutcome,
    mode: RemovalMode,
) {
    match cli.format {
        OutputFormat::Human => output::print_deletion_outcome(outcome, mode),
        OutputFormat::Json => output::print_deletion_json(outcome, mode, &coordinator.totals()),
        OutputFormat::Quiet => println!("{}", outcome.bytes_freed),
    }
}

// ─── Config ───────────────────────────────────────────────────────────────────

fn cmd_config(cli: &Cli, action: &ConfigAction) -> Result<()> {
    let path = cli.config.clone().unwrap_or_else(Config::config_path);
    match action {
        ConfigAction::Show => {
            let config = load_config(cli)?;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
                _ => output::print_config(&config),
            }
        }
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Init => {
            if path.exists() {
                println!(
                    "  {} Config already exists at {}",
                    "ℹ️",
                    format::format_path(&path)
                );
            } else {
                Config::default().save_to(&path)?;
                println!(
                    "  {} Wrote default config to {}",
                    "✓".green(),
                    format::format_path(&path)
                );
            }
        }
    }
    Ok(())
}
