use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// An announcement as returned to callers: the store key projected to an
/// opaque `id` string plus the business fields, never any internal key type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Announcement {
    pub id: String,
    pub message: String,
    pub start_date: Option<NaiveDate>,
    pub expiration_date: NaiveDate,
    pub is_active: bool,
}

/// The persisted business fields of an announcement, without its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementRecord {
    pub message: String,
    pub start_date: Option<NaiveDate>,
    pub expiration_date: NaiveDate,
    pub is_active: bool,
}

/// A record together with the key the store filed it under.
#[derive(Debug, Clone)]
pub struct StoredAnnouncement<K> {
    pub key: K,
    pub record: AnnouncementRecord,
}

impl Announcement {
    /// Project a stored record into the public shape.
    pub fn from_stored<K: ToString>(stored: StoredAnnouncement<K>) -> Self {
        let StoredAnnouncement { key, record } = stored;
        Self {
            id: key.to_string(),
            message: record.message,
            start_date: record.start_date,
            expiration_date: record.expiration_date,
            is_active: record.is_active,
        }
    }
}

/// Body for POST /announcements.
///
/// Dates arrive as strings and are parsed by the service, not by serde:
/// the teacher check must run before any date is looked at, and a malformed
/// date must come back as the service's own input error.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAnnouncementRequest {
    pub message: String,
    pub start_date: Option<String>,
    pub expiration_date: String,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

fn default_is_active() -> bool {
    true
}

/// One field of a partial update: either left alone or set to a new value.
///
/// Deserializes through `Option`, so a missing key and an explicit JSON null
/// both mean `Keep`. There is no way to clear a field through an update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Keep,
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_set(&self) -> bool {
        matches!(self, Patch::Set(_))
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Set(value),
            None => Patch::Keep,
        })
    }
}

/// Body for PUT /announcements/{id}. Only `Set` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAnnouncementRequest {
    #[serde(default)]
    pub message: Patch<String>,
    #[serde(default)]
    pub start_date: Patch<String>,
    #[serde(default)]
    pub expiration_date: Patch<String>,
    #[serde(default)]
    pub is_active: Patch<bool>,
}

impl UpdateAnnouncementRequest {
    /// True when no field is supplied at all; such a request skips date
    /// re-validation and writes nothing.
    pub fn is_empty(&self) -> bool {
        !self.message.is_set()
            && !self.start_date.is_set()
            && !self.expiration_date.is_set()
            && !self.is_active.is_set()
    }
}

/// The validated field changes handed to the store. `None` means the stored
/// value is kept; dates are parsed by the time they get here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnouncementChanges {
    pub message: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

impl AnnouncementChanges {
    pub fn is_empty(&self) -> bool {
        self.message.is_none()
            && self.start_date.is_none()
            && self.expiration_date.is_none()
            && self.is_active.is_none()
    }
}
