// src/commands.rs

use crate::auth::AdminAuth;
use crate::cli::ExportFormat;
use crate::config::Config;
use crate::db::{self, StoreKind};
use crate::error::{Result, WorklogError};
use crate::export;
use crate::import;
use crate::ledger::Ledger;
use crate::models::{FilterSpec, LogEntry, NewEntry};
use crate::roster;
use crate::server::{self, AppState};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Opens the configured store and wraps it in a ledger.
pub fn open_ledger(kind: StoreKind, path: &Path) -> Result<Ledger> {
    Ok(Ledger::new(db::open_store(kind, path)?))
}

/// Handles 'init'
pub fn handle_init(kind: StoreKind, path: &Path) -> Result<()> {
    let mut store = db::open_store(kind, path)?;
    let count = store.load_all()?.len();
    if !path.exists() {
        store.replace_all(&[])?;
    }
    println!("✓ Store ready at: {} ({} entries)", path.display(), count);
    Ok(())
}

/// Handles 'add'
pub fn handle_add(ledger: &Ledger, draft: NewEntry) -> Result<()> {
    let entry = ledger.record(draft)?;
    println!("✓ Entry #{} recorded.", entry.id);
    Ok(())
}

/// Today's date in canonical form, used when 'add' gets no --date.
pub fn today() -> String {
    chrono::Local::now().format("%d/%m/%Y").to_string()
}

fn print_entries(entries: &[LogEntry]) {
    for e in entries {
        println!(
            "[{}] {} | {} | {} | {} | {:.2}h",
            e.id, e.date, e.operator, e.machine, e.line, e.hours
        );
        println!("{}", e.description.trim_end());
        println!("{}", "─".repeat(40));
    }
}

/// Handles 'search'
pub fn handle_search(ledger: &Ledger, spec: &FilterSpec, json: bool) -> Result<()> {
    let entries = ledger.search(spec)?;

    if json {
        let out = serde_json::json!({ "entries": entries });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No entries found.");
        return Ok(());
    }
    print_entries(&entries);
    let total: f64 = entries.iter().map(|e| e.hours).sum();
    println!("{} entries, {:.2} hours", entries.len(), total);
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} (y/N): ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Handles 'del'
pub fn handle_del(ledger: &Ledger, id: i64) -> Result<()> {
    ledger.delete_by_id(id)?;
    println!("✓ Entry #{} deleted.", id);
    Ok(())
}

/// Handles 'del-filtered'
pub fn handle_del_filtered(ledger: &Ledger, spec: &FilterSpec, yes: bool) -> Result<()> {
    let matches = ledger.search(spec)?;
    if matches.is_empty() {
        println!("No entries match these filters.");
        return Ok(());
    }

    if !yes {
        println!("Found {} entries to delete:", matches.len());
        print_entries(&matches);
        if !confirm("Confirm deletion?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let count = ledger.delete_filtered(spec)?;
    println!("✓ Successfully deleted {} entr{}.", count, if count == 1 { "y" } else { "ies" });
    Ok(())
}

/// Handles 'del-all'
pub fn handle_del_all(ledger: &Ledger, yes: bool) -> Result<()> {
    if !yes && !confirm("Permanently delete ALL entries?")? {
        println!("Cancelled.");
        return Ok(());
    }
    let count = ledger.delete_all()?;
    println!("✓ Deleted {} entries.", count);
    Ok(())
}

/// Handles 'export'
pub fn handle_export(
    ledger: &Ledger,
    spec: &FilterSpec,
    format: ExportFormat,
    out: Option<PathBuf>,
) -> Result<()> {
    let entries = ledger.search(spec)?;
    match (format, out) {
        (ExportFormat::Csv, Some(path)) => {
            let file = std::fs::File::create(&path)?;
            let count = export::export_csv(&entries, io::BufWriter::new(file))?;
            eprintln!("✓ Exported {} entries to {}", count, path.display());
        }
        (ExportFormat::Csv, None) => {
            export::export_csv(&entries, io::stdout().lock())?;
        }
        (ExportFormat::Xlsx, Some(path)) => {
            std::fs::write(&path, export::export_xlsx(&entries)?)?;
            eprintln!("✓ Exported {} entries to {}", entries.len(), path.display());
        }
        (ExportFormat::Xlsx, None) => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&export::export_xlsx(&entries)?)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Handles 'import'
pub fn handle_import(ledger: &Ledger, file: &Path) -> Result<()> {
    if !file.exists() {
        return Err(WorklogError::Validation(format!(
            "File not found: {}",
            file.display()
        )));
    }
    let reader = io::BufReader::new(std::fs::File::open(file)?);
    let drafts = import::read_drafts(reader)?;
    let report = ledger.import(drafts)?;
    println!("✓ Import complete: {}/{}", report.imported, report.total);
    Ok(())
}

/// Handles 'operators'
pub fn handle_operators(cfg: &Config) -> Result<()> {
    let Some(path) = &cfg.operators_file else {
        println!("No operator roster configured (WORKLOG_OPERATORS_FILE).");
        return Ok(());
    };
    for name in roster::load_roster(path)? {
        println!("{}", name);
    }
    Ok(())
}

/// Handles 'serve'
pub fn handle_serve(cfg: &Config, ledger: Ledger) -> Result<()> {
    let state = AppState {
        ledger: Arc::new(ledger),
        auth: Arc::new(AdminAuth::new(
            cfg.admin_user.clone(),
            cfg.admin_password.clone(),
        )),
        operators_file: cfg.operators_file.clone(),
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::serve(cfg, state))
}
