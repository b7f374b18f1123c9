use crate::db::migrate::applied_versions;
use crate::db::store::DocumentStore;
use crate::errors::AppResult;
use crate::models::Collection;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(store: &DocumentStore, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) DOCUMENTS PER COLLECTION
    //
    println!("{}• Documents:{}", CYAN, RESET);
    for c in Collection::ALL {
        let n = store.count(c)?;
        let color = if n > 0 { GREEN } else { GREY };
        println!("    {:<18} {}{}{}", c.name(), color, n, RESET);
    }

    //
    // 3) LAST WRITE
    //
    let last: Option<String> = store
        .conn()
        .query_row(
            "SELECT updated_at FROM documents ORDER BY updated_at DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;
    println!(
        "{}• Last write:{} {}",
        CYAN,
        RESET,
        last.unwrap_or_else(|| format!("{GREY}--{RESET}"))
    );

    //
    // 4) SCHEMA VERSION
    //
    let versions = applied_versions(store.conn())?;
    println!(
        "{}• Schema:{} {} migration(s), latest {}",
        CYAN,
        RESET,
        versions.len(),
        versions.last().map(String::as_str).unwrap_or("--")
    );

    Ok(())
}

/// Run `PRAGMA integrity_check` and return the problems found (empty = ok).
pub fn integrity_problems(store: &DocumentStore) -> AppResult<Vec<String>> {
    let mut stmt = store.conn().prepare("PRAGMA integrity_check")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        let line = r?;
        if line != "ok" {
            out.push(line);
        }
    }
    Ok(out)
}
