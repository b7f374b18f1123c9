use crate::models::{Collection, Record};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    #[serde(rename = "Titulo")]
    pub title: String,
    #[serde(rename = "Descripcion", default)]
    pub description: String,
    /// YYYY-MM-DD
    #[serde(rename = "Fecha")]
    pub date: String,
    #[serde(rename = "Foto", default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl Record for NewsItem {
    const COLLECTION: Collection = Collection::Noticias;
}
