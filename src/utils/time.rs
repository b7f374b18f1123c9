//! Time utilities: parsing and normalizing HH:MM slots.

use crate::errors::{AppError, AppResult};
use chrono::NaiveTime;

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), "%H:%M").ok()
}

/// Parse "H:MM" or "HH:MM" and return the zero-padded "HH:MM" form,
/// so that lexicographic comparison matches chronological order.
pub fn normalize_time(t: &str) -> AppResult<String> {
    let parsed = parse_time(t).ok_or_else(|| AppError::InvalidTime(t.to_string()))?;
    Ok(parsed.format("%H:%M").to_string())
}

/// Validate a start/end pair and return both normalized.
pub fn normalize_slot(start: &str, end: &str) -> AppResult<(String, String)> {
    let s = normalize_time(start)?;
    let e = normalize_time(end)?;

    if e <= s {
        return Err(AppError::InvalidInput(format!(
            "end time {} must be after start time {}",
            e, s
        )));
    }

    Ok((s, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_single_digit_hours() {
        assert_eq!(normalize_time("9:05").unwrap(), "09:05");
        assert_eq!(normalize_time("19:30").unwrap(), "19:30");
    }

    #[test]
    fn rejects_garbage_and_inverted_slots() {
        assert!(matches!(normalize_time("25:00"), Err(AppError::InvalidTime(_))));
        assert!(matches!(
            normalize_slot("10:00", "09:00"),
            Err(AppError::InvalidInput(_))
        ));
    }
}
