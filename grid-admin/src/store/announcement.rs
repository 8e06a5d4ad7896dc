//! Announcement list: paged and sorted by the database.

use async_trait::async_trait;
use grid_engine::error::SourceError;
use grid_engine::source::{RowPage, RowQuery, RowSource};
use grid_engine::{GridRow, SortDirection};
use log::{debug, warn};

use super::{Store, StoreError};

/// One announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub ntt_id: i64,
    pub subject: String,
    pub writer: String,
    pub notice: bool,
    pub views: i64,
    pub registered_at: String,
}

impl GridRow for Announcement {
    fn id(&self) -> String {
        self.ntt_id.to_string()
    }
}

/// Sortable fields and their columns. Anything else sorts by registration.
const SORT_FIELDS: &[(&str, &str)] = &[
    ("NTT_ID", "ntt_id"),
    ("NTT_SJ", "ntt_sj"),
    ("NTCR_NM", "ntcr_nm"),
    ("NTCE_AT", "ntce_at"),
    ("RDCNT", "rdcnt"),
    ("FRST_REGIST_PNTTM", "frst_regist_pnttm"),
];

const DEFAULT_SORT_COLUMN: &str = "frst_regist_pnttm";

/// SQL column for a sort field, matched case-insensitively.
pub fn sort_column(field: Option<&str>) -> &'static str {
    let Some(field) = field else {
        return DEFAULT_SORT_COLUMN;
    };
    match SORT_FIELDS.iter().find(|(name, _)| name.eq_ignore_ascii_case(field)) {
        Some((_, column)) => column,
        None => {
            warn!("sort field {} not allowed, using {}", field, DEFAULT_SORT_COLUMN);
            DEFAULT_SORT_COLUMN
        }
    }
}

/// Serves announcement pages.
#[derive(Clone)]
pub struct AnnouncementSource {
    store: Store,
}

impl AnnouncementSource {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RowSource<Announcement> for AnnouncementSource {
    async fn fetch(&self, query: &RowQuery) -> Result<RowPage<Announcement>, SourceError> {
        let column = sort_column(query.sort_field.as_deref());
        let direction = match query.sort_direction {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        };
        let pattern = format!("%{}%", query.filter.as_deref().unwrap_or(""));
        let limit = query.page_size.map_or(-1, |size| size as i64);
        let offset = query.offset() as i64;
        debug!("fetch announcements: {:?}", query);

        let sql = format!(
            "SELECT ntt_id, ntt_sj, ntcr_nm, ntce_at, rdcnt, frst_regist_pnttm FROM announcement
             WHERE ntt_sj LIKE ?1
             ORDER BY {column} {direction}, ntt_id {direction}
             LIMIT ?2 OFFSET ?3"
        );

        let (rows, total) = self
            .store
            .client()
            .conn(move |conn| {
                let total: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM announcement WHERE ntt_sj LIKE ?1",
                    [&pattern],
                    |row| row.get(0),
                )?;
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(rusqlite::params![&pattern, limit, offset], |row| {
                    Ok(Announcement {
                        ntt_id: row.get(0)?,
                        subject: row.get(1)?,
                        writer: row.get(2)?,
                        notice: row.get::<_, String>(3)? == "Y",
                        views: row.get(4)?,
                        registered_at: row.get(5)?,
                    })
                })?;
                Ok((rows.collect::<Result<Vec<_>, _>>()?, total))
            })
            .await
            .map_err(StoreError::from)?;

        Ok(RowPage::new(rows).with_total_count(usize::try_from(total).unwrap_or(0)))
    }
}
