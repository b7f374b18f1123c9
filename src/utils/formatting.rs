//! Formatting utilities used for CLI and export outputs.

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

/// Short form of a document id for tables ("3f2a9c1e-…" → "3f2a9c1e").
pub fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

/// Render an optional text field, "--" when empty.
pub fn or_dash(value: &Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.clone(),
        _ => "--".to_string(),
    }
}

/// Human-readable size of an inline photo without printing its payload.
pub fn describe_photo(photo: &Option<String>) -> String {
    match photo {
        Some(p) if !p.is_empty() => format!("inline image, {} bytes encoded", p.len()),
        _ => "none".to_string(),
    }
}
