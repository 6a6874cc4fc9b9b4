//! Persistence collaborators consumed by the announcement service.
//!
//! Both collaborators are explicit dependencies handed to the service at
//! construction time, so tests can swap in the in-memory implementations
//! without a database. Identifier parsing belongs to the store: only it
//! knows what a well-formed key looks like.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{
    error::AnnouncementError,
    models::announcement::{AnnouncementChanges, AnnouncementRecord, StoredAnnouncement},
};

/// What the store reported back for a partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// A record with the given key existed.
    pub matched: bool,
    /// The write changed the record.
    pub modified: bool,
}

/// Answers whether an identity string names a known teacher.
#[async_trait]
pub trait TeacherDirectory: Send + Sync {
    async fn exists(&self, identity: &str) -> Result<bool, AnnouncementError>;
}

/// Keyed document store for announcements.
#[async_trait]
pub trait AnnouncementStore: Send + Sync {
    /// The store's native key. Projected to the public `id` via `ToString`.
    type Key: Send + Sync + ToString;

    /// Parse an opaque identifier into this store's key format.
    fn parse_key(&self, id: &str) -> Result<Self::Key, AnnouncementError>;

    /// Persist a new record; the store assigns and returns its key.
    async fn insert(&self, record: &AnnouncementRecord) -> Result<Self::Key, AnnouncementError>;

    async fn get(
        &self,
        key: &Self::Key,
    ) -> Result<Option<StoredAnnouncement<Self::Key>>, AnnouncementError>;

    /// Apply the supplied field changes; fields left `None` keep their
    /// stored values.
    async fn update(
        &self,
        key: &Self::Key,
        changes: &AnnouncementChanges,
    ) -> Result<UpdateOutcome, AnnouncementError>;

    /// Returns whether a record was actually removed.
    async fn delete(&self, key: &Self::Key) -> Result<bool, AnnouncementError>;

    /// Fetch records in store iteration order. `active_on = Some(date)`
    /// restricts to `is_active` records not yet expired on that date; the
    /// start-date refinement is the caller's job.
    async fn scan(
        &self,
        active_on: Option<NaiveDate>,
    ) -> Result<Vec<StoredAnnouncement<Self::Key>>, AnnouncementError>;
}
