use crate::models::{Collection, Record};
use serde::{Deserialize, Serialize};

/// Staff contact shown in the congregant app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(rename = "Nombre")]
    pub name: String,
    #[serde(rename = "Cargo", default)]
    pub position: String,
    #[serde(rename = "Telefono", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "Email", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Record for Contact {
    const COLLECTION: Collection = Collection::Contactos;
}
