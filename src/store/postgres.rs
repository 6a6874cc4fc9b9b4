use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::{
    error::AnnouncementError,
    models::announcement::{AnnouncementChanges, AnnouncementRecord, StoredAnnouncement},
    store::{AnnouncementStore, TeacherDirectory, UpdateOutcome},
};

const ANNOUNCEMENT_COLUMNS: &str = "id, message, start_date, expiration_date, is_active";

#[derive(Debug, FromRow)]
struct AnnouncementRow {
    id: Uuid,
    message: String,
    start_date: Option<NaiveDate>,
    expiration_date: NaiveDate,
    is_active: bool,
}

impl From<AnnouncementRow> for StoredAnnouncement<Uuid> {
    fn from(row: AnnouncementRow) -> Self {
        StoredAnnouncement {
            key: row.id,
            record: AnnouncementRecord {
                message: row.message,
                start_date: row.start_date,
                expiration_date: row.expiration_date,
                is_active: row.is_active,
            },
        }
    }
}

/// Announcement store backed by the `announcements` table.
#[derive(Clone)]
pub struct PgAnnouncementStore {
    pool: PgPool,
}

impl PgAnnouncementStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnnouncementStore for PgAnnouncementStore {
    type Key = Uuid;

    fn parse_key(&self, id: &str) -> Result<Uuid, AnnouncementError> {
        Uuid::parse_str(id)
            .map_err(|_| AnnouncementError::invalid_input("Invalid announcement ID"))
    }

    async fn insert(&self, record: &AnnouncementRecord) -> Result<Uuid, AnnouncementError> {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO announcements (message, start_date, expiration_date, is_active)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(&record.message)
        .bind(record.start_date)
        .bind(record.expiration_date)
        .bind(record.is_active)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn get(
        &self,
        key: &Uuid,
    ) -> Result<Option<StoredAnnouncement<Uuid>>, AnnouncementError> {
        let row = sqlx::query_as::<_, AnnouncementRow>(&format!(
            "SELECT {ANNOUNCEMENT_COLUMNS} FROM announcements WHERE id = $1"
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn update(
        &self,
        key: &Uuid,
        changes: &AnnouncementChanges,
    ) -> Result<UpdateOutcome, AnnouncementError> {
        let result = sqlx::query(
            "UPDATE announcements
             SET message         = COALESCE($1, message),
                 start_date      = COALESCE($2, start_date),
                 expiration_date = COALESCE($3, expiration_date),
                 is_active       = COALESCE($4, is_active),
                 updated_at      = NOW()
             WHERE id = $5",
        )
        .bind(&changes.message)
        .bind(changes.start_date)
        .bind(changes.expiration_date)
        .bind(changes.is_active)
        .bind(key)
        .execute(&self.pool)
        .await?;

        let matched = result.rows_affected() > 0;
        Ok(UpdateOutcome {
            matched,
            modified: matched && !changes.is_empty(),
        })
    }

    async fn delete(&self, key: &Uuid) -> Result<bool, AnnouncementError> {
        let result = sqlx::query("DELETE FROM announcements WHERE id = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn scan(
        &self,
        active_on: Option<NaiveDate>,
    ) -> Result<Vec<StoredAnnouncement<Uuid>>, AnnouncementError> {
        let rows = match active_on {
            Some(date) => {
                sqlx::query_as::<_, AnnouncementRow>(&format!(
                    "SELECT {ANNOUNCEMENT_COLUMNS} FROM announcements
                     WHERE is_active = TRUE AND expiration_date >= $1"
                ))
                .bind(date)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, AnnouncementRow>(&format!(
                    "SELECT {ANNOUNCEMENT_COLUMNS} FROM announcements"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Teacher directory backed by the `teachers` table.
#[derive(Clone)]
pub struct PgTeacherDirectory {
    pool: PgPool,
}

impl PgTeacherDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeacherDirectory for PgTeacherDirectory {
    async fn exists(&self, identity: &str) -> Result<bool, AnnouncementError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM teachers WHERE username = $1)")
                .bind(identity)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}
