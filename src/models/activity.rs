use crate::models::{Collection, Record};
use crate::utils::date::{parse_display_date, to_display_date};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const RANGE_SEPARATOR: &str = " - ";

/// A dated, non-recurring event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneTimeActivity {
    #[serde(rename = "Nombre")]
    pub name: String,
    #[serde(rename = "Lugar", default)]
    pub place: String,
    /// "DD/MM/YYYY - DD/MM/YYYY", or a single date
    #[serde(rename = "Fecha")]
    pub dates: String,
}

impl Record for OneTimeActivity {
    const COLLECTION: Collection = Collection::Actividades;
}

impl OneTimeActivity {
    pub fn new(name: &str, place: &str, start: NaiveDate, end: NaiveDate) -> Self {
        let dates = if start == end {
            to_display_date(&start)
        } else {
            format!(
                "{}{}{}",
                to_display_date(&start),
                RANGE_SEPARATOR,
                to_display_date(&end)
            )
        };

        Self {
            name: name.to_string(),
            place: place.to_string(),
            dates,
        }
    }

    /// Start date parsed out of the stored string; None when unreadable.
    pub fn start_date(&self) -> Option<NaiveDate> {
        let first = self
            .dates
            .split(RANGE_SEPARATOR)
            .next()
            .unwrap_or(&self.dates);
        parse_display_date(first)
    }

    /// Sort key: readable dates ascending, unreadable ones after (stable sort
    /// keeps their input order).
    pub fn start_key(&self) -> (bool, Option<NaiveDate>) {
        let d = self.start_date();
        (d.is_none(), d)
    }
}
