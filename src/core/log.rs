use crate::db::store::DocumentStore;
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;
use std::sync::OnceLock;

const OP_WIDTH_LIMIT: usize = 48;

fn ansi_pattern() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\x1B\[[0-9;]*[mK]").ok()).as_ref()
}

pub fn strip_ansi(s: &str) -> String {
    match ansi_pattern() {
        Some(re) => re.replace_all(s, "").into_owned(),
        None => s.to_string(),
    }
}

/// Colour by the kind of operation: `<collection>_add`, `person_del`, ...
fn color_for_operation(op: &str) -> Colour {
    match op {
        "migration_applied" => Colour::Purple,
        "backup" | "export" | "import" => Colour::Blue,
        "init" => Colour::RGB(255, 153, 51),
        "login" | "logout" => Colour::Cyan,
        "push_send" => Colour::RGB(102, 178, 255),
        o if o.ends_with("_add") => Colour::Green,
        o if o.ends_with("_del") => Colour::Red,
        o if o.ends_with("_edit") || o.ends_with("_photo") => Colour::Yellow,
        _ => Colour::White,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

pub struct LogLogic;

impl LogLogic {
    /// Log lines in insertion order, optionally limited to operations
    /// starting with `operation` and to the last `limit` lines.
    pub fn entries(
        store: &DocumentStore,
        operation: Option<&str>,
        limit: Option<usize>,
    ) -> AppResult<Vec<LogEntry>> {
        let mut stmt = store.conn().prepare_cached(
            "SELECT id, date, operation, COALESCE(target, ''), message
             FROM log
             WHERE ?1 IS NULL OR operation LIKE ?1 || '%'
             ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([operation], |row| {
            Ok(LogEntry {
                id: row.get(0)?,
                date: row.get(1)?,
                operation: row.get(2)?,
                target: row.get(3)?,
                message: row.get(4)?,
            })
        })?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }

        if let Some(n) = limit
            && out.len() > n
        {
            out.drain(..out.len() - n);
        }
        Ok(out)
    }

    pub fn print_log(
        store: &DocumentStore,
        operation: Option<&str>,
        limit: Option<usize>,
    ) -> AppResult<()> {
        let entries = Self::entries(store, operation, limit)?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let id_w = entries.iter().map(|e| e.id.to_string().len()).max().unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);
        let op_w = entries
            .iter()
            .map(|e| op_target(e).chars().count())
            .max()
            .unwrap_or(10)
            .min(OP_WIDTH_LIMIT);

        println!("📜 Internal log:\n");

        for e in &entries {
            let color = color_for_operation(&e.operation);

            let mut visible = op_target(e);
            if visible.chars().count() > OP_WIDTH_LIMIT {
                visible = visible.chars().take(OP_WIDTH_LIMIT - 1).collect::<String>() + "…";
            }

            // only the operation word is coloured
            let painted = match visible.split_once(' ') {
                Some((op, rest)) => format!("{} {}", color.paint(op), rest),
                None => color.paint(visible.as_str()).to_string(),
            };
            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&painted).chars().count()));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                e.id,
                e.date,
                painted,
                padding,
                e.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}

fn op_target(e: &LogEntry) -> String {
    if e.target.is_empty() {
        e.operation.clone()
    } else {
        format!("{} ({})", e.operation, e.target)
    }
}
