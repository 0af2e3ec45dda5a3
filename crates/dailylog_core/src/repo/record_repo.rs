//! Generic repository shared by reports and knowledge entries.

use crate::model::knowledge::KnowledgeEntry;
use crate::model::report::Report;
use crate::model::{now_timestamp, Record, RecordId};
use crate::store::collection::{read_collection, save_collection, SCHEMA_VERSION};
use crate::store::{KeyValueStore, StoreError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository failure. Reads never fail; only persisting a mutation can.
#[derive(Debug)]
pub enum RepoError {
    Persist {
        key: &'static str,
        source: StoreError,
    },
    /// Stored data uses a newer schema; writing would destroy it.
    UnsupportedSchemaVersion {
        key: &'static str,
        found: u32,
        supported: u32,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Persist { key, source } => {
                write!(f, "failed to persist collection `{key}`: {source}")
            }
            Self::UnsupportedSchemaVersion {
                key,
                found,
                supported,
            } => write!(
                f,
                "collection `{key}` uses schema version {found}, newer than supported {supported}; refusing to overwrite"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persist { source, .. } => Some(source),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

/// Ordered collection of one record type backed by a key-value store.
pub struct Repository<'s, T: Record> {
    store: &'s dyn KeyValueStore,
    items: Vec<T>,
    /// Schema version of unreadable newer data; mutations are refused while set.
    newer_schema: Option<u32>,
}

pub type ReportRepository<'s> = Repository<'s, Report>;
pub type KnowledgeRepository<'s> = Repository<'s, KnowledgeEntry>;

impl<'s, T: Record> Repository<'s, T> {
    /// Loads the collection from `store`; corrupt data yields an empty one.
    ///
    /// Data written by a newer schema also yields an empty collection, and
    /// the repository becomes read-only so that data is never overwritten.
    pub fn load(store: &'s dyn KeyValueStore) -> Self {
        let loaded = read_collection::<T>(store, T::STORAGE_KEY);
        info!(
            "event=repo_load module=repo status={} kind={} count={}",
            if loaded.newer_schema.is_some() {
                "read_only"
            } else {
                "ok"
            },
            T::KIND,
            loaded.items.len()
        );
        Self {
            store,
            items: loaded.items,
            newer_schema: loaded.newer_schema,
        }
    }

    /// Creates a record from `draft`, appends it and persists the collection.
    ///
    /// Returns `Ok(None)` when the record type rejects the draft; nothing is
    /// appended or written in that case.
    pub fn add(&mut self, draft: T::Draft) -> RepoResult<Option<T>> {
        let Some(record) = T::from_draft(draft, self.fresh_id(), now_timestamp()) else {
            info!(
                "event=record_add module=repo status=rejected kind={}",
                T::KIND
            );
            return Ok(None);
        };

        let mut next = self.items.clone();
        next.push(record.clone());
        self.commit(next, "record_add")?;
        Ok(Some(record))
    }

    /// Removes the record with `id` and persists the result.
    ///
    /// Unknown ids are not an error; returns whether a record was removed.
    pub fn remove(&mut self, id: RecordId) -> RepoResult<bool> {
        let next = self
            .items
            .iter()
            .filter(|item| item.id() != id)
            .cloned()
            .collect::<Vec<_>>();
        let removed = next.len() != self.items.len();
        self.commit(next, "record_remove")?;
        Ok(removed)
    }

    /// Drops every record and persists the empty collection.
    ///
    /// Irreversible; callers are expected to confirm with the user first.
    pub fn clear(&mut self) -> RepoResult<()> {
        self.commit(Vec::new(), "collection_clear")
    }

    /// Records in insertion order.
    pub fn list(&self) -> &[T] {
        &self.items
    }

    /// Records newest first, the order lists are displayed in.
    pub fn list_recent(&self) -> impl Iterator<Item = &T> + '_ {
        self.items.iter().rev()
    }

    pub fn get(&self, id: RecordId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when stored data uses a newer schema and mutations are refused.
    pub fn is_read_only(&self) -> bool {
        self.newer_schema.is_some()
    }

    fn fresh_id(&self) -> RecordId {
        loop {
            let candidate = Uuid::new_v4();
            if self.get(candidate).is_none() {
                return candidate;
            }
        }
    }

    fn commit(&mut self, next: Vec<T>, event: &'static str) -> RepoResult<()> {
        if let Some(found) = self.newer_schema {
            error!(
                "event={event} module=repo status=error kind={} error_code=newer_schema schema_version={found}",
                T::KIND
            );
            return Err(RepoError::UnsupportedSchemaVersion {
                key: T::STORAGE_KEY,
                found,
                supported: SCHEMA_VERSION,
            });
        }

        if let Err(err) = save_collection(self.store, T::STORAGE_KEY, &next) {
            error!(
                "event={event} module=repo status=error kind={} error_code=persist_failed error={err}",
                T::KIND
            );
            return Err(RepoError::Persist {
                key: T::STORAGE_KEY,
                source: err,
            });
        }

        info!(
            "event={event} module=repo status=ok kind={} count={}",
            T::KIND,
            next.len()
        );
        self.items = next;
        Ok(())
    }
}
