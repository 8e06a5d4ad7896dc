#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use grid_engine::prelude::*;

/// A code detail row: code, name and persisted display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
    pub code: String,
    pub name: String,
    pub order: u32,
}

impl GridRow for Code {
    fn id(&self) -> String {
        self.code.clone()
    }
}

impl RankedRow for Code {
    fn rank(&self) -> u32 {
        self.order
    }

    fn set_rank(&mut self, rank: u32) {
        self.order = rank;
    }
}

/// `n` codes `C01..` ranked 1..=n.
pub fn codes(n: u32) -> Vec<Code> {
    (1..=n)
        .map(|i| Code {
            code: format!("C{:02}", i),
            name: format!("Name {}", i),
            order: i,
        })
        .collect()
}

pub fn ids(rows: &[Code]) -> Vec<String> {
    rows.iter().map(|row| row.code.clone()).collect()
}

pub fn columns() -> Vec<Column<Code>> {
    vec![
        Column::row_number("no", "No", 4),
        Column::new("CODE", "Code", 6, |row: &Code, _| row.code.as_str().into())
            .sort_by(|a: &Code, b: &Code| a.code.cmp(&b.code)),
        Column::new("CODE_NM", "Name", 12, |row: &Code, _| row.name.as_str().into())
            .sort_by(|a: &Code, b: &Code| a.name.cmp(&b.name)),
        Column::new("CODE_ORDER", "Order", 5, |row: &Code, _| row.order.to_string().into())
            .align(Alignment::Right),
        Column::new("NOTE", "Note", 10, |_: &Code, _| Cell::empty()).unsortable(),
    ]
}

/// Collects every event a grid emits.
pub fn recorder() -> (impl EventSink + 'static, Arc<Mutex<Vec<GridEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = {
        let events = Arc::clone(&events);
        move |event: GridEvent| events.lock().unwrap().push(event)
    };
    (sink, events)
}

/// Collects every notice raised.
pub fn notices() -> (impl Notifier + 'static, Arc<Mutex<Vec<Notice>>>) {
    let notices = Arc::new(Mutex::new(Vec::new()));
    let notifier = {
        let notices = Arc::clone(&notices);
        move |notice: Notice| notices.lock().unwrap().push(notice)
    };
    (notifier, notices)
}

/// In-memory code table serving as both row source and item updater.
#[derive(Default)]
pub struct Backend {
    pub rows: Mutex<Vec<Code>>,
    /// `(code, rank)` per update call, in call order.
    pub calls: Mutex<Vec<(String, u32)>>,
    /// Fail the nth update call (1-based).
    pub fail_on_call: Option<usize>,
    pub fail_fetch: bool,
    pub delay: Option<Duration>,
}

impl Backend {
    pub fn with_rows(rows: Vec<Code>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ItemUpdater<Code> for Backend {
    async fn update_rank(&self, row: &Code, rank: u32) -> Result<(), UpdateError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((row.code.clone(), rank));
            calls.len()
        };
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_on_call == Some(call) {
            return Err(UpdateError::rejected(&row.code, "order locked"));
        }
        if let Some(stored) = self.rows.lock().unwrap().iter_mut().find(|r| r.code == row.code) {
            stored.order = rank;
        }
        Ok(())
    }
}

#[async_trait]
impl RowSource<Code> for Backend {
    async fn fetch(&self, query: &RowQuery) -> Result<RowPage<Code>, SourceError> {
        if self.fail_fetch {
            return Err(SourceError::Unavailable("connection reset".into()));
        }
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by_key(|row| row.order);
        let total = rows.len();
        let rows = match query.page_size {
            Some(size) => rows.into_iter().skip(query.offset()).take(size).collect(),
            None => rows,
        };
        Ok(RowPage::new(rows).with_total_count(total))
    }
}
