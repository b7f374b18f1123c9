//! Document shapes stored in the collections.
//! Field names on disk keep the keys used by the mobile apps.

pub mod activity;
pub mod audio;
pub mod collection;
pub mod contact;
pub mod devotional;
pub mod news;
pub mod outbox;
pub mod person;
pub mod push_token;
pub mod schedule;
pub mod social;

pub use collection::Collection;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A typed document and the collection it lives in by default.
pub trait Record: Serialize + DeserializeOwned {
    const COLLECTION: Collection;
}

/// A document as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stored<T> {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub data: T,
}

impl<T> Stored<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Stored<U> {
        Stored {
            id: self.id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            data: f(self.data),
        }
    }
}
