//! In-memory record collections with write-through persistence.
//!
//! # Responsibility
//! - Own one ordered collection per record type.
//! - Assign identity and creation time on `add`.
//! - Persist the full collection after every mutation.
//!
//! # Invariants
//! - The in-memory sequence only changes after the store accepted the write.
//! - Collections stored under a newer schema version are never overwritten.
//! - Ids are unique within a collection.

pub mod record_repo;

pub use record_repo::{KnowledgeRepository, RepoError, RepoResult, ReportRepository, Repository};
