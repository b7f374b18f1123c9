use crate::models::{Collection, Record};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum AudioCategory {
    #[serde(rename = "Predicas")]
    Sermons,
    #[serde(rename = "Musica")]
    Music,
    #[serde(rename = "Jovenes")]
    Youth,
}

impl AudioCategory {
    pub fn label(&self) -> &'static str {
        match self {
            AudioCategory::Sermons => "Sermons",
            AudioCategory::Music => "Music",
            AudioCategory::Youth => "Youth",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioResource {
    #[serde(rename = "Nombre")]
    pub name: String,
    #[serde(rename = "Descripcion", default)]
    pub description: String,
    #[serde(rename = "Categoria")]
    pub category: AudioCategory,
    #[serde(rename = "Url")]
    pub url: String,
    #[serde(rename = "FechaSubida")]
    pub uploaded_at: String,
}

impl Record for AudioResource {
    const COLLECTION: Collection = Collection::Audios;
}
