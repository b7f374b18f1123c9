//! In-process read-through cache for the document store.
//!
//! Entries are keyed by collection + document id. A collection listing is
//! cached as the ordered list of its ids. Every write that goes through the
//! store invalidates the touched entry and the listing of its collection,
//! then notifies subscribers, so every view reading through the same store
//! sees the change on its next read.

use crate::models::{Collection, Stored};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Updated,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub collection: Collection,
    pub id: String,
    pub kind: ChangeKind,
}

type Subscriber = Box<dyn FnMut(&Change)>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
}

#[derive(Default)]
pub struct DocumentCache {
    docs: HashMap<(Collection, String), Stored<Value>>,
    lists: HashMap<Collection, Vec<String>>,
    subscribers: Vec<(Option<Collection>, Subscriber)>,
    stats: CacheStats,
}

impl DocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn get(&mut self, collection: Collection, id: &str) -> Option<Stored<Value>> {
        match self.docs.get(&(collection, id.to_string())) {
            Some(doc) => {
                self.stats.hits += 1;
                Some(doc.clone())
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    pub fn get_all(&mut self, collection: Collection) -> Option<Vec<Stored<Value>>> {
        let Some(ids) = self.lists.get(&collection) else {
            self.stats.misses += 1;
            return None;
        };

        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            match self.docs.get(&(collection, id.clone())) {
                Some(doc) => out.push(doc.clone()),
                None => {
                    // listing outlived one of its documents: treat as a miss
                    self.lists.remove(&collection);
                    self.stats.misses += 1;
                    return None;
                }
            }
        }

        self.stats.hits += 1;
        Some(out)
    }

    pub fn put(&mut self, collection: Collection, doc: Stored<Value>) {
        self.docs.insert((collection, doc.id.clone()), doc);
    }

    pub fn put_all(&mut self, collection: Collection, docs: &[Stored<Value>]) {
        let ids = docs.iter().map(|d| d.id.clone()).collect();
        for d in docs {
            self.put(collection, d.clone());
        }
        self.lists.insert(collection, ids);
    }

    /// Drop what a write made stale and tell the subscribers.
    pub fn invalidate(&mut self, change: Change) {
        self.docs.remove(&(change.collection, change.id.clone()));
        self.lists.remove(&change.collection);
        self.stats.invalidations += 1;

        for (filter, callback) in self.subscribers.iter_mut() {
            if filter.is_none_or(|c| c == change.collection) {
                callback(&change);
            }
        }
    }

    /// Register a callback for writes to `collection` (or to any collection).
    pub fn subscribe(&mut self, collection: Option<Collection>, callback: Subscriber) {
        self.subscribers.push((collection, callback));
    }

    pub fn clear(&mut self) {
        self.docs.clear();
        self.lists.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn doc(id: &str) -> Stored<Value> {
        Stored {
            id: id.to_string(),
            created_at: "t".into(),
            updated_at: "t".into(),
            data: json!({"Titulo": id}),
        }
    }

    #[test]
    fn listing_is_dropped_when_a_member_changes() {
        let mut cache = DocumentCache::new();
        cache.put_all(Collection::Noticias, &[doc("a"), doc("b")]);
        assert_eq!(cache.get_all(Collection::Noticias).unwrap().len(), 2);

        cache.invalidate(Change {
            collection: Collection::Noticias,
            id: "a".into(),
            kind: ChangeKind::Updated,
        });

        assert!(cache.get_all(Collection::Noticias).is_none());
        assert!(cache.get(Collection::Noticias, "a").is_none());
        assert!(cache.get(Collection::Noticias, "b").is_some());
    }

    #[test]
    fn subscribers_only_see_their_collection() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut cache = DocumentCache::new();

        let sink = Rc::clone(&seen);
        cache.subscribe(
            Some(Collection::Personas),
            Box::new(move |c| sink.borrow_mut().push(c.id.clone())),
        );

        for (coll, id) in [(Collection::Noticias, "n1"), (Collection::Personas, "p1")] {
            cache.invalidate(Change {
                collection: coll,
                id: id.into(),
                kind: ChangeKind::Deleted,
            });
        }

        assert_eq!(*seen.borrow(), vec!["p1".to_string()]);
        assert_eq!(cache.stats().invalidations, 2);
    }
}
