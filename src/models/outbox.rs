use crate::models::{Collection, Record};
use serde::{Deserialize, Serialize};

/// A mail queued for the external relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboxMail {
    #[serde(rename = "De")]
    pub from: String,
    #[serde(rename = "Para")]
    pub to: String,
    #[serde(rename = "Asunto")]
    pub subject: String,
    #[serde(rename = "Html")]
    pub html: String,
    /// "pendiente" until the relay picks it up
    #[serde(rename = "Estado")]
    pub status: String,
}

impl Record for OutboxMail {
    const COLLECTION: Collection = Collection::CorreosSalientes;
}
