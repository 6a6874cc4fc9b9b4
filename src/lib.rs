// Library exports for the api binary and tests
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;

use sqlx::PgPool;

use services::announcements::AnnouncementService;
use store::postgres::{PgAnnouncementStore, PgTeacherDirectory};

/// The service as wired for production: Postgres store + Postgres directory.
pub type Announcements = AnnouncementService<PgAnnouncementStore, PgTeacherDirectory>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub announcements: Arc<Announcements>,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let announcements = AnnouncementService::new(
            PgAnnouncementStore::new(pool.clone()),
            PgTeacherDirectory::new(pool.clone()),
        );
        Self {
            db: pool,
            announcements: Arc::new(announcements),
        }
    }
}
