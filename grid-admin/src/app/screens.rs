//! The two grid screens.

use std::sync::{Arc, Mutex, PoisonError};

use grid_engine::prelude::*;
use log::debug;
use tokio::sync::mpsc::UnboundedSender;

use crate::settings::GridPreferences;
use crate::store::{Announcement, AnnouncementSource, CodeDetail, CodeSource, CodeUpdater};

use super::Message;

/// Events a grid emitted since they were last drained.
#[derive(Clone, Default)]
pub struct EventQueue(Arc<Mutex<Vec<GridEvent>>>);

impl EventQueue {
    pub fn sink(&self) -> impl EventSink + 'static {
        let queue = Arc::clone(&self.0);
        move |event: GridEvent| queue.lock().unwrap_or_else(PoisonError::into_inner).push(event)
    }

    pub fn drain(&self) -> Vec<GridEvent> {
        std::mem::take(&mut *self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// A page the announcement screen asks its source for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
}

/// Fold a grid event into the next page to fetch.
pub fn next_request(event: &GridEvent, current: PageRequest) -> Option<PageRequest> {
    match event {
        GridEvent::SortChanged { .. } | GridEvent::FilterChanged(_) => Some(PageRequest { page: 1, ..current }),
        GridEvent::PageChanged(page) => Some(PageRequest { page: *page, ..current }),
        GridEvent::PageSizeChanged(size) => Some(PageRequest {
            page: 1,
            page_size: *size,
        }),
        GridEvent::RowsReordered { .. } => None,
    }
}

/// Cursor position after the visible rows changed to `len` rows.
pub fn clamp_cursor(cursor: usize, len: usize) -> usize {
    cursor.min(len.saturating_sub(1))
}

// =============================================================================
// Announcements
// =============================================================================

pub const ANNOUNCEMENTS: &str = "announcements";

pub struct AnnouncementScreen {
    pub grid: Grid<Announcement>,
    pub events: EventQueue,
    pub cursor: usize,
    source: AnnouncementSource,
    /// Sequence number of the latest fetch; older results are dropped.
    seq: u64,
}

impl AnnouncementScreen {
    pub fn new(
        source: AnnouncementSource,
        config: GridConfig,
        prefs: Option<GridPreferences>,
    ) -> Result<Self, GridError> {
        let events = EventQueue::default();
        let (config, sort) = match prefs {
            Some(prefs) if prefs.page_size > 0 => (config.with_page_size(prefs.page_size), prefs.sort()),
            _ => (config, SortState::new("FRST_REGIST_PNTTM", SortDirection::Desc)),
        };
        let grid = Grid::builder(announcement_columns())
            .delegated()
            .config(config)
            .initial_sort(sort)
            .on_event(events.sink())
            .build()?;
        Ok(Self {
            grid,
            events,
            cursor: 0,
            source,
            seq: 0,
        })
    }

    /// The page currently requested from the source.
    pub fn current_request(&self) -> PageRequest {
        let query = self.grid.query();
        PageRequest {
            page: query.page,
            page_size: query.page_size.unwrap_or_else(|| self.grid.page_size()),
        }
    }

    /// Turn drained grid events into at most one fetch.
    pub fn pending_request(&self) -> Option<PageRequest> {
        let current = self.current_request();
        self.events
            .drain()
            .iter()
            .fold(None, |pending, event| next_request(event, pending.unwrap_or(current)).or(pending))
    }

    pub fn fetch(&mut self, request: PageRequest, tx: &UnboundedSender<Message>) {
        self.seq += 1;
        let seq = self.seq;
        let mut query = self.grid.query();
        query.page = request.page;
        query.page_size = Some(request.page_size);
        debug!("announcements fetch #{}: {:?}", seq, query);

        self.grid.set_loading(true);
        let source = self.source.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = source.fetch(&query).await;
            let _ = tx.send(Message::Announcements { seq, request, result });
        });
    }

    /// Install a fetch result. Returns false when it was superseded.
    pub fn loaded(&mut self, seq: u64, request: PageRequest, page: RowPage<Announcement>) -> bool {
        if seq != self.seq {
            debug!("dropping stale announcements fetch #{}", seq);
            return false;
        }
        self.grid
            .set_page_info(page.total_count(), request.page, request.page_size);
        self.grid.load_page(page);
        self.cursor = clamp_cursor(self.cursor, self.grid.visible_rows().len());
        true
    }

    pub fn failed(&mut self, seq: u64) -> bool {
        if seq != self.seq {
            return false;
        }
        self.grid.set_loading(false);
        true
    }

    pub fn preferences(&self) -> GridPreferences {
        GridPreferences::new(self.grid.page_size(), &self.grid.sort_state())
    }
}

fn announcement_columns() -> Vec<Column<Announcement>> {
    vec![
        Column::row_number("NO", "No", 4),
        Column::new("NTT_SJ", "Subject", 24, |row: &Announcement, _| row.subject.as_str().into()),
        Column::new("NTCR_NM", "Writer", 8, |row: &Announcement, _| row.writer.as_str().into()),
        Column::new("NTCE_AT", "Notice", 6, |row: &Announcement, _| {
            if row.notice { "Y".into() } else { Cell::empty() }
        })
        .align(Alignment::Center),
        Column::new("RDCNT", "Views", 6, |row: &Announcement, _| row.views.to_string().into())
            .align(Alignment::Right),
        Column::new("FRST_REGIST_PNTTM", "Registered", 19, |row: &Announcement, _| {
            row.registered_at.as_str().into()
        }),
    ]
}

// =============================================================================
// Codes
// =============================================================================

pub const CODES: &str = "codes";

pub struct CodeScreen {
    pub grid: Grid<CodeDetail>,
    pub events: EventQueue,
    pub cursor: usize,
    source: Arc<CodeSource>,
    coordinator: ReorderCoordinator<CodeDetail>,
}

impl CodeScreen {
    pub fn new(
        source: CodeSource,
        updater: CodeUpdater,
        config: GridConfig,
        prefs: Option<GridPreferences>,
        tx: &UnboundedSender<Message>,
    ) -> Result<Self, GridError> {
        let events = EventQueue::default();
        let (config, sort) = match prefs {
            Some(prefs) if prefs.page_size > 0 => (config.with_page_size(prefs.page_size), prefs.sort()),
            _ => (config, SortState::unsorted()),
        };
        let grid = Grid::builder(code_columns())
            .local()
            .config(config)
            .initial_sort(sort)
            .on_event(events.sink())
            .build()?;

        let source = Arc::new(source);
        let notices = tx.clone();
        let coordinator = ReorderCoordinator::new(grid.clone(), Arc::new(updater), source.clone())
            .with_notifier(move |notice: Notice| {
                let _ = notices.send(Message::Notice(notice));
            });

        Ok(Self {
            grid,
            events,
            cursor: 0,
            source,
            coordinator,
        })
    }

    /// Whether drained grid events call for a reload.
    pub fn needs_reload(&self) -> bool {
        self.events
            .drain()
            .iter()
            .any(|event| matches!(event, GridEvent::FilterChanged(_)))
    }

    pub fn fetch(&self, tx: &UnboundedSender<Message>) {
        let query = self.grid.query();
        self.grid.set_loading(true);
        let source = Arc::clone(&self.source);
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = source.fetch(&query).await;
            let _ = tx.send(Message::Codes(result));
        });
    }

    pub fn loaded(&mut self, page: RowPage<CodeDetail>) {
        self.grid.load_page(page);
        self.cursor = clamp_cursor(self.cursor, self.grid.visible_rows().len());
    }

    /// Row id under the cursor.
    pub fn cursor_row(&self) -> Option<String> {
        self.grid.visible_rows().get(self.cursor).map(GridRow::id)
    }

    /// Pick up the row under the cursor, or drop the picked row onto it.
    ///
    /// Returns false when there was nothing to do.
    pub fn pick_or_drop(&self, tx: &UnboundedSender<Message>) -> bool {
        let Some(target) = self.cursor_row() else {
            return false;
        };
        let Some(picked) = self.grid.dragging() else {
            return self.grid.begin_drag(&target);
        };
        let coordinator = self.coordinator.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = coordinator.handle_drop(&picked, &target).await;
            let _ = tx.send(Message::Reordered(outcome));
        });
        true
    }

    pub fn preferences(&self) -> GridPreferences {
        GridPreferences::new(self.grid.page_size(), &self.grid.sort_state())
    }
}

fn code_columns() -> Vec<Column<CodeDetail>> {
    vec![
        Column::row_number("NO", "No", 3),
        Column::new("CODE", "Code", 5, |row: &CodeDetail, _| row.code.as_str().into())
            .sort_by(|a: &CodeDetail, b: &CodeDetail| a.code.cmp(&b.code)),
        Column::new("CODE_NM", "Name", 12, |row: &CodeDetail, _| row.name.as_str().into())
            .sort_by(|a: &CodeDetail, b: &CodeDetail| a.name.cmp(&b.name)),
        Column::new("CODE_DC", "Description", 30, |row: &CodeDetail, _| {
            row.description.as_deref().unwrap_or("").into()
        })
        .unsortable(),
        Column::new("USE_AT", "Use", 3, |row: &CodeDetail, _| {
            if row.in_use { "Y".into() } else { "N".into() }
        })
        .align(Alignment::Center)
        .unsortable(),
        Column::new("CODE_ORDER", "Order", 5, |row: &CodeDetail, _| row.order.to_string().into())
            .align(Alignment::Right)
            .sort_by(|a: &CodeDetail, b: &CodeDetail| a.order.cmp(&b.order)),
    ]
}
