use chrono::{Datelike, Local, NaiveDate};

/// Weekday labels indexed 0=Sunday..6=Saturday.
pub const WEEKDAY_LABELS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Today's weekday index, 0=Sunday.
pub fn today_weekday() -> u8 {
    today().weekday().num_days_from_sunday() as u8
}

pub fn weekday_label(index: u8) -> Option<&'static str> {
    WEEKDAY_LABELS.get(index as usize).copied()
}

/// Accept either an index ("3") or an English/Spanish day name ("wed", "miercoles").
pub fn parse_weekday(s: &str) -> Option<u8> {
    if let Ok(n) = s.trim().parse::<u8>() {
        return (n < 7).then_some(n);
    }

    let lower = s.trim().to_lowercase();
    let idx = match lower.as_str() {
        "sun" | "sunday" | "dom" | "domingo" => 0,
        "mon" | "monday" | "lun" | "lunes" => 1,
        "tue" | "tuesday" | "mar" | "martes" => 2,
        "wed" | "wednesday" | "mie" | "miercoles" | "miércoles" => 3,
        "thu" | "thursday" | "jue" | "jueves" => 4,
        "fri" | "friday" | "vie" | "viernes" => 5,
        "sat" | "saturday" | "sab" | "sabado" | "sábado" => 6,
        _ => return None,
    };
    Some(idx)
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Dates shown to congregants use the local DD/MM/YYYY form.
pub fn parse_display_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%d/%m/%Y").ok()
}

pub fn to_display_date(d: &NaiveDate) -> String {
    d.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_names_and_indexes() {
        assert_eq!(parse_weekday("3"), Some(3));
        assert_eq!(parse_weekday("7"), None);
        assert_eq!(parse_weekday("Viernes"), Some(5));
        assert_eq!(parse_weekday("sun"), Some(0));
        assert_eq!(weekday_label(6), Some("Saturday"));
        assert_eq!(weekday_label(9), None);
    }

    #[test]
    fn display_dates() {
        let d = parse_date("2025-03-07").unwrap();
        assert_eq!(to_display_date(&d), "07/03/2025");
        assert_eq!(parse_display_date("07/03/2025"), Some(d));
    }
}
