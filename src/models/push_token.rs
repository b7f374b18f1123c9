use crate::models::{Collection, Record};
use serde::{Deserialize, Serialize};

/// One registered device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushToken {
    #[serde(rename = "Token")]
    pub token: String,
}

impl Record for PushToken {
    const COLLECTION: Collection = Collection::PushTokens;
}
