use crate::models::{Collection, Record};
use serde::{Deserialize, Serialize};

/// Daily devotional message, keyed by day and month (no year) so it recurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Devotional {
    #[serde(rename = "Titulo")]
    pub title: String,
    #[serde(rename = "CitaEs")]
    pub reference_es: String,
    #[serde(rename = "CitaEn", default)]
    pub reference_en: String,
    #[serde(rename = "TextoEs")]
    pub body_es: String,
    #[serde(rename = "TextoEn", default)]
    pub body_en: String,
    #[serde(rename = "Dia")]
    pub day: u32,
    #[serde(rename = "Mes")]
    pub month: u32,
}

impl Record for Devotional {
    const COLLECTION: Collection = Collection::Mensajes;
}
