use chrono::{Local, NaiveDate};

use crate::{
    error::AnnouncementError,
    models::announcement::{
        Announcement, AnnouncementChanges, AnnouncementRecord, CreateAnnouncementRequest,
        Patch, UpdateAnnouncementRequest,
    },
    store::{AnnouncementStore, TeacherDirectory},
};

const DATE_FORMAT: &str = "%Y-%m-%d";

fn parse_date(value: &str) -> Result<NaiveDate, AnnouncementError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| AnnouncementError::invalid_input("Invalid date format. Use YYYY-MM-DD"))
}

/// Owns every announcement lifecycle rule: visibility by date window,
/// validation ordering on create and update, and partial-update merging.
/// The store and teacher directory are injected so callers and tests choose
/// their own backends.
pub struct AnnouncementService<S, D> {
    store: S,
    directory: D,
}

impl<S, D> AnnouncementService<S, D>
where
    S: AnnouncementStore,
    D: TeacherDirectory,
{
    pub fn new(store: S, directory: D) -> Self {
        Self { store, directory }
    }

    async fn authenticate(&self, teacher: &str) -> Result<(), AnnouncementError> {
        if self.directory.exists(teacher).await? {
            Ok(())
        } else {
            Err(AnnouncementError::Unauthorized)
        }
    }

    /// List announcements visible on today's local calendar date.
    pub async fn list(&self, active_only: bool) -> Result<Vec<Announcement>, AnnouncementError> {
        self.list_as_of(active_only, Local::now().date_naive()).await
    }

    /// List announcements against an explicit reference date.
    ///
    /// With `active_only`, a record is visible when it is active, has not
    /// expired (inclusive), and has either no start date or one on or before
    /// the reference date (inclusive). Without it, every record comes back
    /// unfiltered: that listing is the admin view.
    pub async fn list_as_of(
        &self,
        active_only: bool,
        reference: NaiveDate,
    ) -> Result<Vec<Announcement>, AnnouncementError> {
        let filter = if active_only { Some(reference) } else { None };
        let stored = self.store.scan(filter).await?;

        Ok(stored
            .into_iter()
            .filter(|s| !active_only || started_by(&s.record, reference))
            .map(Announcement::from_stored)
            .collect())
    }

    /// Create an announcement dated against today's local calendar date.
    pub async fn create(
        &self,
        req: &CreateAnnouncementRequest,
        teacher: &str,
    ) -> Result<Announcement, AnnouncementError> {
        self.create_as_of(req, teacher, Local::now().date_naive()).await
    }

    /// Create an announcement, validating against an explicit "today".
    ///
    /// Order matters: the teacher check runs before any date is parsed, and
    /// the expiration is checked against today before the start date is
    /// looked at.
    pub async fn create_as_of(
        &self,
        req: &CreateAnnouncementRequest,
        teacher: &str,
        today: NaiveDate,
    ) -> Result<Announcement, AnnouncementError> {
        self.authenticate(teacher).await?;

        let expiration_date = parse_date(&req.expiration_date)?;
        if expiration_date < today {
            return Err(AnnouncementError::invalid_input(
                "Expiration date cannot be in the past",
            ));
        }

        let start_date = match &req.start_date {
            Some(value) => {
                let start = parse_date(value)?;
                if start > expiration_date {
                    return Err(AnnouncementError::invalid_input(
                        "Start date cannot be after expiration date",
                    ));
                }
                Some(start)
            }
            None => None,
        };

        let record = AnnouncementRecord {
            message: req.message.clone(),
            start_date,
            expiration_date,
            is_active: req.is_active,
        };
        let key = self.store.insert(&record).await?;
        tracing::info!(id = %key.to_string(), "announcement created");

        Ok(Announcement {
            id: key.to_string(),
            message: record.message,
            start_date: record.start_date,
            expiration_date: record.expiration_date,
            is_active: record.is_active,
        })
    }

    /// Apply a partial update. Only `Set` fields change; the date invariant
    /// is re-validated on the effective (request-or-stored) values. Unlike
    /// create, there is no past-expiration check here.
    pub async fn update(
        &self,
        id: &str,
        req: &UpdateAnnouncementRequest,
        teacher: &str,
    ) -> Result<Announcement, AnnouncementError> {
        self.authenticate(teacher).await?;

        let key = self.store.parse_key(id)?;
        let existing = self
            .store
            .get(&key)
            .await?
            .ok_or(AnnouncementError::NotFound)?;

        let mut changes = AnnouncementChanges::default();
        if let Patch::Set(message) = &req.message {
            changes.message = Some(message.clone());
        }
        if let Patch::Set(is_active) = &req.is_active {
            changes.is_active = Some(*is_active);
        }

        // An empty request skips date re-validation entirely and becomes a
        // no-op write against the existing record.
        if !req.is_empty() {
            let expiration_date = match &req.expiration_date {
                Patch::Set(value) => parse_date(value)?,
                Patch::Keep => existing.record.expiration_date,
            };
            let start_date = match &req.start_date {
                Patch::Set(value) => Some(parse_date(value)?),
                Patch::Keep => existing.record.start_date,
            };
            if let Some(start) = start_date {
                if start > expiration_date {
                    return Err(AnnouncementError::invalid_input(
                        "Start date cannot be after expiration date",
                    ));
                }
            }

            if req.expiration_date.is_set() {
                changes.expiration_date = Some(expiration_date);
            }
            if req.start_date.is_set() {
                changes.start_date = start_date;
            }
        }

        let outcome = self.store.update(&key, &changes).await?;
        if !outcome.matched && !outcome.modified {
            return Err(AnnouncementError::storage("Failed to update announcement"));
        }

        let updated = self
            .store
            .get(&key)
            .await?
            .ok_or_else(|| AnnouncementError::storage("Failed to update announcement"))?;
        Ok(Announcement::from_stored(updated))
    }

    /// Remove an announcement permanently.
    pub async fn delete(&self, id: &str, teacher: &str) -> Result<(), AnnouncementError> {
        self.authenticate(teacher).await?;

        let key = self.store.parse_key(id)?;
        if !self.store.delete(&key).await? {
            return Err(AnnouncementError::NotFound);
        }
        tracing::info!(%id, "announcement deleted");
        Ok(())
    }
}

/// Inclusive lower bound of the date window: no start date means visible
/// from creation onward.
fn started_by(record: &AnnouncementRecord, reference: NaiveDate) -> bool {
    match record.start_date {
        Some(start) => start <= reference,
        None => true,
    }
}
