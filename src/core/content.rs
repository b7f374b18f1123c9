//! Listings and edits for the congregation-facing collections: schedules,
//! one-time events, news, audio, social links, contacts and devotionals.

use crate::core::schedule::{DayBucket, DayOrder, aggregate};
use crate::db::log::audit;
use crate::db::store::DocumentStore;
use crate::errors::{AppError, AppResult};
use crate::models::activity::OneTimeActivity;
use crate::models::audio::{AudioCategory, AudioResource};
use crate::models::devotional::Devotional;
use crate::models::news::NewsItem;
use crate::models::schedule::{ScheduleActivity, ScheduleKind};
use crate::models::{Collection, Record, Stored};
use crate::utils::time::normalize_slot;
use chrono::{Datelike, NaiveDate};

pub const DEFAULT_COLOR: &str = "#3B82F6";

fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

pub struct ContentLogic;

impl ContentLogic {
    /// Insert a record into `collection` and write the audit line.
    pub fn add<T: Record>(
        store: &mut DocumentStore,
        collection: Collection,
        record: &T,
        summary: &str,
    ) -> AppResult<String> {
        let id = store.insert_as(collection, record)?;
        audit(store.conn(), &format!("{}_add", collection), &id, summary);
        Ok(id)
    }

    /// Delete by id or unique id prefix. Returns the full id.
    pub fn delete(
        store: &mut DocumentStore,
        collection: Collection,
        key: &str,
    ) -> AppResult<String> {
        let id = store.resolve_id(collection, key)?;
        store.delete(collection, &id)?;
        audit(store.conn(), &format!("{}_del", collection), &id, "deleted");
        Ok(id)
    }

    // ---------------------------
    // Weekly schedules
    // ---------------------------

    pub fn add_schedule(
        store: &mut DocumentStore,
        kind: ScheduleKind,
        weekday: u8,
        subject: &str,
        start: &str,
        end: &str,
        color: Option<&str>,
    ) -> AppResult<String> {
        if weekday > 6 {
            return Err(AppError::InvalidInput(format!(
                "weekday must be 0 (Sunday) to 6 (Saturday), got {}",
                weekday
            )));
        }
        if subject.trim().is_empty() {
            return Err(AppError::InvalidInput("subject is required".into()));
        }

        let (start, end) = normalize_slot(start, end)?;

        let color = color.unwrap_or(DEFAULT_COLOR).trim().to_string();
        if !is_hex_color(&color) {
            return Err(AppError::InvalidInput(format!(
                "color must look like #RRGGBB, got {}",
                color
            )));
        }

        let slot = ScheduleActivity {
            weekday: i64::from(weekday),
            subject: subject.trim().to_string(),
            start,
            end,
            color,
        };
        let summary = format!("{} {}-{} {}", weekday, slot.start, slot.end, slot.subject);
        Self::add(store, kind.collection(), &slot, &summary)
    }

    pub fn week(
        store: &mut DocumentStore,
        kind: ScheduleKind,
        order: DayOrder,
    ) -> AppResult<Vec<DayBucket<Stored<ScheduleActivity>>>> {
        let slots = store.list_as::<ScheduleActivity>(kind.collection())?;
        Ok(aggregate(&slots, order))
    }

    // ---------------------------
    // Dated content
    // ---------------------------

    /// One-time events by start date, unreadable dates last.
    pub fn events(store: &mut DocumentStore) -> AppResult<Vec<Stored<OneTimeActivity>>> {
        let mut items = store.list::<OneTimeActivity>()?;
        items.sort_by_key(|a| a.data.start_key());
        Ok(items)
    }

    /// Events that have not started before `from`.
    pub fn upcoming_events(
        store: &mut DocumentStore,
        from: NaiveDate,
    ) -> AppResult<Vec<Stored<OneTimeActivity>>> {
        Ok(Self::events(store)?
            .into_iter()
            .filter(|a| a.data.start_date().is_none_or(|d| d >= from))
            .collect())
    }

    /// News, newest first.
    pub fn news(store: &mut DocumentStore) -> AppResult<Vec<Stored<NewsItem>>> {
        let mut items = store.list::<NewsItem>()?;
        items.sort_by(|a, b| b.data.date.cmp(&a.data.date));
        Ok(items)
    }

    pub fn audios(
        store: &mut DocumentStore,
        category: Option<AudioCategory>,
    ) -> AppResult<Vec<Stored<AudioResource>>> {
        let mut items: Vec<_> = store
            .list::<AudioResource>()?
            .into_iter()
            .filter(|a| category.is_none_or(|c| a.data.category == c))
            .collect();
        items.sort_by(|a, b| b.data.uploaded_at.cmp(&a.data.uploaded_at));
        Ok(items)
    }

    // ---------------------------
    // Devotionals
    // ---------------------------

    pub fn add_devotional(store: &mut DocumentStore, d: &Devotional) -> AppResult<String> {
        if NaiveDate::from_ymd_opt(2024, d.month, d.day).is_none() {
            return Err(AppError::InvalidDate(format!("{}/{}", d.day, d.month)));
        }
        if d.title.trim().is_empty() || d.body_es.trim().is_empty() {
            return Err(AppError::InvalidInput("title and text are required".into()));
        }
        let summary = format!("{:02}/{:02} {}", d.day, d.month, d.title);
        Self::add(store, Collection::Mensajes, d, &summary)
    }

    /// The message for `date`'s day and month, if any (year is ignored).
    pub fn devotional_for(
        store: &mut DocumentStore,
        date: NaiveDate,
    ) -> AppResult<Option<Stored<Devotional>>> {
        Ok(store
            .list::<Devotional>()?
            .into_iter()
            .find(|m| m.data.day == date.day() && m.data.month == date.month()))
    }

    /// All messages in calendar order.
    pub fn devotionals(store: &mut DocumentStore) -> AppResult<Vec<Stored<Devotional>>> {
        let mut items = store.list::<Devotional>()?;
        items.sort_by_key(|m| (m.data.month, m.data.day));
        Ok(items)
    }
}
