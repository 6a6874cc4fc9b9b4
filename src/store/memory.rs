use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    error::AnnouncementError,
    models::announcement::{AnnouncementChanges, AnnouncementRecord, StoredAnnouncement},
    store::{AnnouncementStore, TeacherDirectory, UpdateOutcome},
};

/// In-process announcement store, insertion-ordered. Same observable
/// contract as [`super::postgres::PgAnnouncementStore`]; used by the test
/// suites and handy for running the service without a database.
#[derive(Default)]
pub struct MemoryAnnouncementStore {
    records: Mutex<Vec<(Uuid, AnnouncementRecord)>>,
}

impl MemoryAnnouncementStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnnouncementStore for MemoryAnnouncementStore {
    type Key = Uuid;

    fn parse_key(&self, id: &str) -> Result<Uuid, AnnouncementError> {
        Uuid::parse_str(id)
            .map_err(|_| AnnouncementError::invalid_input("Invalid announcement ID"))
    }

    async fn insert(&self, record: &AnnouncementRecord) -> Result<Uuid, AnnouncementError> {
        let key = Uuid::new_v4();
        let mut records = self.records.lock().unwrap();
        records.push((key, record.clone()));
        Ok(key)
    }

    async fn get(
        &self,
        key: &Uuid,
    ) -> Result<Option<StoredAnnouncement<Uuid>>, AnnouncementError> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|(id, _)| id == key).map(|(id, record)| {
            StoredAnnouncement {
                key: *id,
                record: record.clone(),
            }
        }))
    }

    async fn update(
        &self,
        key: &Uuid,
        changes: &AnnouncementChanges,
    ) -> Result<UpdateOutcome, AnnouncementError> {
        let mut records = self.records.lock().unwrap();
        let Some((_, record)) = records.iter_mut().find(|(id, _)| id == key) else {
            return Ok(UpdateOutcome {
                matched: false,
                modified: false,
            });
        };

        if let Some(message) = &changes.message {
            record.message = message.clone();
        }
        if let Some(start_date) = changes.start_date {
            record.start_date = Some(start_date);
        }
        if let Some(expiration_date) = changes.expiration_date {
            record.expiration_date = expiration_date;
        }
        if let Some(is_active) = changes.is_active {
            record.is_active = is_active;
        }

        Ok(UpdateOutcome {
            matched: true,
            modified: !changes.is_empty(),
        })
    }

    async fn delete(&self, key: &Uuid) -> Result<bool, AnnouncementError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|(id, _)| id != key);
        Ok(records.len() < before)
    }

    async fn scan(
        &self,
        active_on: Option<NaiveDate>,
    ) -> Result<Vec<StoredAnnouncement<Uuid>>, AnnouncementError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|(_, record)| match active_on {
                Some(date) => record.is_active && record.expiration_date >= date,
                None => true,
            })
            .map(|(id, record)| StoredAnnouncement {
                key: *id,
                record: record.clone(),
            })
            .collect())
    }
}

/// In-process teacher directory: a fixed set of known identities.
#[derive(Default)]
pub struct MemoryTeacherDirectory {
    teachers: HashSet<String>,
}

impl MemoryTeacherDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_teachers<I, S>(teachers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            teachers: teachers.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl TeacherDirectory for MemoryTeacherDirectory {
    async fn exists(&self, identity: &str) -> Result<bool, AnnouncementError> {
        Ok(self.teachers.contains(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(expiration: &str) -> AnnouncementRecord {
        AnnouncementRecord {
            message: "Picture day".to_string(),
            start_date: None,
            expiration_date: NaiveDate::parse_from_str(expiration, "%Y-%m-%d").unwrap(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_parse_key_rejects_garbage() {
        let store = MemoryAnnouncementStore::new();
        assert!(store.parse_key("not-a-uuid").is_err());
        let key = store.insert(&record("2025-10-01")).await.unwrap();
        assert_eq!(store.parse_key(&key.to_string()).unwrap(), key);
    }

    #[tokio::test]
    async fn test_update_unknown_key_matches_nothing() {
        let store = MemoryAnnouncementStore::new();
        let outcome = store
            .update(&Uuid::new_v4(), &AnnouncementChanges::default())
            .await
            .unwrap();
        assert!(!outcome.matched);
        assert!(!outcome.modified);
    }

    #[tokio::test]
    async fn test_scan_predicate_drops_expired_and_inactive() {
        let store = MemoryAnnouncementStore::new();
        store.insert(&record("2025-09-01")).await.unwrap();
        store.insert(&record("2025-09-30")).await.unwrap();
        let mut inactive = record("2025-09-30");
        inactive.is_active = false;
        store.insert(&inactive).await.unwrap();

        let reference = NaiveDate::parse_from_str("2025-09-15", "%Y-%m-%d").unwrap();
        let active = store.scan(Some(reference)).await.unwrap();
        assert_eq!(active.len(), 1);

        let all = store.scan(None).await.unwrap();
        assert_eq!(all.len(), 3);
    }
}
