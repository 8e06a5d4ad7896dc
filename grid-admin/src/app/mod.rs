//! The terminal application.

mod draw;
mod keys;
mod screens;
mod terminal;
mod toast;

pub use keys::{Action, action};
pub use screens::{PageRequest, clamp_cursor, next_request};

use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind};
use futures::StreamExt;
use grid_engine::error::SourceError;
use grid_engine::notify::Notice;
use grid_engine::render::layout_lines;
use grid_engine::source::RowPage;
use grid_engine::{ReorderOutcome, SortState};
use log::{info, warn};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::settings::Preferences;
use crate::store::{
    Announcement, AnnouncementSource, CodeDetail, CodeSource, CodeUpdater, DEMO_CODE_ID, Store,
};

use draw::{Frame, body_line, draw};
use screens::{ANNOUNCEMENTS, AnnouncementScreen, CODES, CodeScreen};
use terminal::TerminalGuard;
use toast::Toasts;

/// Whether the code grid is sorted by something other than its display order.
fn sorted_off_rank(sort: &SortState) -> bool {
    sort.field().is_some_and(|field| !field.eq_ignore_ascii_case("CODE_ORDER"))
        || (sort.is_sorted() && !sort.direction().is_ascending())
}

/// Results delivered back to the event loop by spawned tasks.
pub enum Message {
    Announcements {
        seq: u64,
        request: PageRequest,
        result: Result<RowPage<Announcement>, SourceError>,
    },
    Codes(Result<RowPage<CodeDetail>, SourceError>),
    Notice(Notice),
    Reordered(ReorderOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Announcements,
    Codes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct App {
    config: AppConfig,
    prefs: Preferences,
    tab: Tab,
    announcements: AnnouncementScreen,
    codes: CodeScreen,
    toasts: Toasts,
    /// Text being typed after `/`.
    filter_input: Option<String>,
    tx: UnboundedSender<Message>,
    dirty: bool,
}

impl App {
    /// Build both screens. Spawned work reports back through `tx`.
    pub async fn new(
        config: AppConfig,
        store: Store,
        prefs: Preferences,
        tx: UnboundedSender<Message>,
    ) -> Result<Self, AppError> {
        let announcements = AnnouncementScreen::new(
            AnnouncementSource::new(store.clone()),
            config.announcements.clone(),
            prefs.grid(ANNOUNCEMENTS).await?,
        )?;
        let codes = CodeScreen::new(
            CodeSource::new(store.clone(), DEMO_CODE_ID),
            CodeUpdater::new(store).with_failures(config.fail_every),
            config.codes.clone(),
            prefs.grid(CODES).await?,
            &tx,
        )?;

        Ok(Self {
            config,
            prefs,
            tab: Tab::Announcements,
            announcements,
            codes,
            toasts: Toasts::default(),
            filter_input: None,
            tx,
            dirty: true,
        })
    }

    /// Run until quit. `rx` is the receiving end of the sender given to [`App::new`].
    pub async fn run(mut self, mut rx: UnboundedReceiver<Message>) -> Result<(), AppError> {
        let mut guard = TerminalGuard::new()?;
        let mut events = EventStream::new();
        let mut tick = tokio::time::interval(Duration::from_millis(250));

        let first = self.announcements.current_request();
        self.announcements.fetch(first, &self.tx);
        self.codes.fetch(&self.tx);

        loop {
            if self.needs_redraw() {
                let (width, height) = crossterm::terminal::size()?;
                let frame = self.frame();
                draw(guard.stdout(), &frame, width, height)?;
                self.announcements.grid.clear_dirty();
                self.codes.grid.clear_dirty();
                self.dirty = false;
            }

            tokio::select! {
                event = events.next() => match event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if self.on_key(key) == Flow::Quit {
                            break;
                        }
                    }
                    Some(Ok(Event::Resize(..))) => self.dirty = true,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => return Err(err.into()),
                    None => break,
                },
                Some(message) = rx.recv() => self.on_message(message),
                _ = tick.tick() => {
                    if self.toasts.expire(Instant::now()) {
                        self.dirty = true;
                    }
                }
            }

            self.flush_grid_events();
        }

        self.shutdown().await;
        Ok(())
    }

    fn needs_redraw(&self) -> bool {
        self.dirty || self.announcements.grid.is_dirty() || self.codes.grid.is_dirty()
    }

    fn frame(&self) -> Frame<'_> {
        let (view, cursor) = match self.tab {
            Tab::Announcements => (self.announcements.grid.view(), self.announcements.cursor),
            Tab::Codes => (self.codes.grid.view(), self.codes.cursor),
        };
        let has_rows = matches!(view.body, grid_engine::render::Body::Rows(_));
        let mut title = match self.tab {
            Tab::Announcements => "[Announcements]  Codes".to_string(),
            Tab::Codes => " Announcements  [Codes]".to_string(),
        };
        if view.busy {
            title.push_str("  saving order...");
        }
        let status = match &self.filter_input {
            Some(text) => format!("filter: {}_", text),
            None => keys::HELP.to_string(),
        };
        Frame {
            title,
            lines: layout_lines(&view),
            cursor: has_rows.then(|| body_line(cursor)),
            status,
            toasts: &self.toasts,
        }
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    fn on_key(&mut self, key: KeyEvent) -> Flow {
        self.dirty = true;
        if self.filter_input.is_some() {
            self.on_filter_key(key);
            return Flow::Continue;
        }
        let Some(action) = action(key) else {
            return Flow::Continue;
        };
        match action {
            Action::Quit => return Flow::Quit,
            Action::SwitchTab => {
                self.tab = match self.tab {
                    Tab::Announcements => Tab::Codes,
                    Tab::Codes => Tab::Announcements,
                };
            }
            Action::CursorUp => self.move_cursor(-1),
            Action::CursorDown => self.move_cursor(1),
            Action::Page(nav) => match self.tab {
                Tab::Announcements => self.announcements.grid.navigate(nav),
                Tab::Codes => self.codes.grid.navigate(nav),
            },
            Action::Sort(index) => self.toggle_sort(index),
            Action::PageSize(step) => self.step_page_size(step),
            Action::StartFilter => {
                let current = match self.tab {
                    Tab::Announcements => self.announcements.grid.filter(),
                    Tab::Codes => self.codes.grid.filter(),
                };
                self.filter_input = Some(current.unwrap_or_default());
            }
            Action::PickOrDrop => self.pick_or_drop(),
            Action::Cancel => self.codes.grid.cancel_drag(),
            Action::Reload => match self.tab {
                Tab::Announcements => {
                    let request = self.announcements.current_request();
                    self.announcements.fetch(request, &self.tx);
                }
                Tab::Codes => self.codes.fetch(&self.tx),
            },
        }
        Flow::Continue
    }

    fn on_filter_key(&mut self, key: KeyEvent) {
        let Some(text) = self.filter_input.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Char(c) => text.push(c),
            KeyCode::Backspace => {
                text.pop();
            }
            KeyCode::Enter => {
                let filter = self.filter_input.take();
                match self.tab {
                    Tab::Announcements => self.announcements.grid.set_filter(filter),
                    Tab::Codes => self.codes.grid.set_filter(filter),
                }
            }
            KeyCode::Esc => self.filter_input = None,
            _ => {}
        }
    }

    fn move_cursor(&mut self, step: isize) {
        let (cursor, len) = match self.tab {
            Tab::Announcements => (&mut self.announcements.cursor, self.announcements.grid.visible_rows().len()),
            Tab::Codes => (&mut self.codes.cursor, self.codes.grid.visible_rows().len()),
        };
        *cursor = clamp_cursor(cursor.saturating_add_signed(step), len);
    }

    fn toggle_sort(&mut self, index: usize) {
        let column = match self.tab {
            Tab::Announcements => self
                .announcements
                .grid
                .columns()
                .get(index)
                .map(|column| (column.id().to_string(), column.header())),
            Tab::Codes => self
                .codes
                .grid
                .columns()
                .get(index)
                .map(|column| (column.id().to_string(), column.header())),
        };
        let Some((column_id, header)) = column else {
            return;
        };
        let toggled = match self.tab {
            Tab::Announcements => self.announcements.grid.toggle_sort(&column_id),
            Tab::Codes => self.codes.grid.toggle_sort(&column_id),
        };
        if toggled.is_none() {
            self.toasts.push(
                Notice::info(format!("{} is not sortable", header)),
                Instant::now(),
            );
        }
    }

    fn step_page_size(&mut self, step: isize) {
        match self.tab {
            Tab::Announcements => {
                let grid = &self.announcements.grid;
                let size = self.config.announcements.step_page_size(grid.page_size(), step);
                grid.on_page_size_change(size);
            }
            Tab::Codes => {
                let grid = &self.codes.grid;
                if !grid.config().paginate {
                    return;
                }
                let size = self.config.codes.step_page_size(grid.page_size(), step);
                grid.on_page_size_change(size);
                self.codes.cursor = 0;
            }
        }
    }

    fn pick_or_drop(&mut self) {
        if self.tab != Tab::Codes {
            return;
        }
        if !self.codes.grid.config().enable_drag {
            self.toasts.push(Notice::info("Reordering is disabled"), Instant::now());
            return;
        }
        self.codes.pick_or_drop(&self.tx);
    }

    // -------------------------------------------------------------------------
    // Results
    // -------------------------------------------------------------------------

    fn on_message(&mut self, message: Message) {
        self.dirty = true;
        let now = Instant::now();
        match message {
            Message::Announcements { seq, request, result } => match result {
                Ok(page) => {
                    self.announcements.loaded(seq, request, page);
                }
                Err(err) => {
                    if self.announcements.failed(seq) {
                        warn!("announcement fetch failed: {}", err);
                        self.toasts.push(
                            Notice::error("Failed to load announcements").with_body(err.to_string()),
                            now,
                        );
                    }
                }
            },
            Message::Codes(result) => match result {
                Ok(page) => self.codes.loaded(page),
                Err(err) => {
                    warn!("code fetch failed: {}", err);
                    self.codes.grid.set_loading(false);
                    self.toasts
                        .push(Notice::error("Failed to load codes").with_body(err.to_string()), now);
                }
            },
            Message::Notice(notice) => self.toasts.push(notice, now),
            Message::Reordered(outcome) => {
                info!("reorder finished: {:?}", outcome);
                match outcome {
                    ReorderOutcome::Busy => {
                        self.toasts.push(Notice::warning("Still saving the previous order"), now);
                    }
                    ReorderOutcome::Unchanged if sorted_off_rank(&self.codes.grid.sort_state()) => {
                        self.toasts.push(Notice::info("Sort by Order to reorder"), now);
                    }
                    _ => {}
                }
            }
        }
    }

    /// Act on events the grids raised while handling input.
    fn flush_grid_events(&mut self) {
        if let Some(request) = self.announcements.pending_request() {
            self.announcements.fetch(request, &self.tx);
        }
        if self.codes.needs_reload() {
            self.codes.fetch(&self.tx);
        }
    }

    async fn shutdown(self) {
        self.announcements.grid.teardown();
        self.codes.grid.teardown();

        let saved = [
            (ANNOUNCEMENTS, self.announcements.preferences()),
            (CODES, self.codes.preferences()),
        ];
        for (name, prefs) in saved {
            if let Err(err) = self.prefs.save_grid(name, &prefs).await {
                warn!("failed to save {} preferences: {}", name, err);
            }
        }
        info!("shutdown complete");
    }
}
