use crate::models::{Collection, Record};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One recurring weekly time slot.
///
/// `weekday` is kept as the raw stored integer: documents written by other
/// clients may carry values outside 0..=6, and the aggregator has to see them
/// to drop them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleActivity {
    #[serde(rename = "Dia")]
    pub weekday: i64,
    #[serde(rename = "Asunto")]
    pub subject: String,
    #[serde(rename = "HoraInicio")]
    pub start: String,
    #[serde(rename = "HoraFin")]
    pub end: String,
    #[serde(rename = "Color", default)]
    pub color: String,
}

impl Record for ScheduleActivity {
    const COLLECTION: Collection = Collection::Horarios;
}

/// Which of the two independent schedules a slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScheduleKind {
    /// General activities and counseling
    Activity,
    /// Worship services
    Service,
}

impl ScheduleKind {
    pub fn collection(&self) -> Collection {
        match self {
            ScheduleKind::Activity => Collection::Horarios,
            ScheduleKind::Service => Collection::HorariosCulto,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScheduleKind::Activity => "activities",
            ScheduleKind::Service => "worship services",
        }
    }
}
