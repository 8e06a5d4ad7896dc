//! SQLite sample data service.
//!
//! Two tables stand in for a remote service: announcements, paged and sorted
//! by the database, and common code details, loaded whole and reordered by
//! dragging.

mod announcement;
mod code;

pub use announcement::{Announcement, AnnouncementSource, sort_column};
pub use code::{CodeDetail, CodeSource, CodeUpdater};

use std::path::Path;

use async_sqlite::Client;
use grid_engine::error::{SourceError, UpdateError};
use log::info;
use thiserror::Error;

/// Sample data errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] async_sqlite::Error),
}

impl From<StoreError> for SourceError {
    fn from(err: StoreError) -> Self {
        SourceError::Other(Box::new(err))
    }
}

impl From<StoreError> for UpdateError {
    fn from(err: StoreError) -> Self {
        UpdateError::Other(Box::new(err))
    }
}

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS announcement (
        ntt_id INTEGER PRIMARY KEY,
        ntt_sj TEXT NOT NULL,
        ntcr_nm TEXT NOT NULL,
        ntce_at TEXT NOT NULL DEFAULT 'N',
        rdcnt INTEGER NOT NULL DEFAULT 0,
        frst_regist_pnttm TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS code_detail (
        code_id TEXT NOT NULL,
        code TEXT NOT NULL,
        code_nm TEXT NOT NULL,
        code_dc TEXT,
        use_at TEXT NOT NULL DEFAULT 'Y',
        code_order INTEGER NOT NULL,
        last_updt_pnttm TEXT,
        PRIMARY KEY (code_id, code)
    );
";

/// Code group shown on the code detail screen.
pub const DEMO_CODE_ID: &str = "COM001";

const ANNOUNCEMENT_COUNT: i64 = 47;

const CODE_DETAILS: &[(&str, &str, &str)] = &[
    ("REG", "Registered", "Received, not yet reviewed"),
    ("REV", "In review", "Assigned to a reviewer"),
    ("HLD", "On hold", "Waiting for more information"),
    ("APR", "Approved", "Accepted by the reviewer"),
    ("REJ", "Rejected", "Declined by the reviewer"),
    ("PUB", "Published", "Visible to all users"),
    ("ARC", "Archived", "Hidden from default lists"),
    ("DEL", "Deleted", "Pending removal"),
];

/// Handle to the sample database.
#[derive(Clone)]
pub struct Store {
    client: Client,
}

impl Store {
    /// Open (creating and seeding if new) the database at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let client = async_sqlite::ClientBuilder::new().path(path).open().await?;
        client.conn(|conn| conn.execute_batch(SCHEMA)).await?;

        let store = Self { client };
        store.seed().await?;
        Ok(store)
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    async fn seed(&self) -> Result<(), StoreError> {
        let seeded = self
            .client
            .conn(|conn| {
                let announcements: i64 = conn.query_row("SELECT COUNT(*) FROM announcement", [], |row| row.get(0))?;
                if announcements == 0 {
                    let mut stmt = conn.prepare(
                        "INSERT INTO announcement (ntt_id, ntt_sj, ntcr_nm, ntce_at, rdcnt, frst_regist_pnttm)
                         VALUES (?, ?, ?, ?, ?, ?)",
                    )?;
                    for id in 1..=ANNOUNCEMENT_COUNT {
                        let registered = format!("2024-{:02}-{:02} 09:{:02}:00", 1 + id % 12, 1 + id % 28, id % 60);
                        stmt.execute(rusqlite::params![
                            id,
                            format!("Announcement #{}", id),
                            ["admin", "editor", "support"][(id % 3) as usize],
                            if id % 10 == 0 { "Y" } else { "N" },
                            (id * 37) % 500,
                            registered,
                        ])?;
                    }
                }

                let codes: i64 = conn.query_row("SELECT COUNT(*) FROM code_detail", [], |row| row.get(0))?;
                if codes == 0 {
                    let mut stmt = conn.prepare(
                        "INSERT INTO code_detail (code_id, code, code_nm, code_dc, code_order) VALUES (?, ?, ?, ?, ?)",
                    )?;
                    for (index, (code, name, description)) in CODE_DETAILS.iter().enumerate() {
                        stmt.execute(rusqlite::params![DEMO_CODE_ID, code, name, description, index as i64 + 1])?;
                    }
                }
                Ok(announcements == 0 || codes == 0)
            })
            .await?;

        if seeded {
            info!("seeded sample data");
        }
        Ok(())
    }
}
