use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};

use crate::assets;
use crate::config::{StudyConfig, Timings};
use crate::export::CsvExport;
use crate::flow::{Effect, EntryContext, ExportStatus, Input, Outcome, Page, Route};
use crate::presenters::Position;
use crate::runtime::StudyEvent;
use crate::store::{Applied, RunId, SessionStore};

/// Owns the session store and the active page and applies outcomes.
#[derive(Debug)]
pub struct App {
    pub store: SessionStore,
    pub page: Page,
    pub timings: Timings,
    pub export_dir: PathBuf,
    pub banners: Vec<&'static str>,
    last_placement: Option<Position>,
    should_quit: bool,
}

impl App {
    pub fn new(config: &StudyConfig, export_dir: PathBuf) -> Self {
        Self::with_store(SessionStore::new(), config, export_dir)
    }

    pub fn with_store(store: SessionStore, config: &StudyConfig, export_dir: PathBuf) -> Self {
        Self {
            store,
            page: Page::Start,
            timings: config.timings(),
            export_dir,
            banners: assets::banners(),
            last_placement: None,
            should_quit: false,
        }
    }

    pub fn route(&self) -> Route {
        self.page.route()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn last_placement(&self) -> Option<Position> {
        self.last_placement
    }

    /// Replaces the active page. The outgoing page and its timers are dropped.
    pub fn navigate(&mut self, route: Route) {
        if let Some(pos) = self.page.placement() {
            self.last_placement = Some(pos);
        }
        let (page, commands) = {
            let ctx = EntryContext {
                store: &self.store,
                timings: &self.timings,
                placement: self.last_placement,
                slide_count: self.banners.len(),
            };
            Page::enter(route, &ctx)
        };
        tracing::debug!(from = %self.page.route(), to = %page.route(), "navigate");
        self.page = page;
        self.apply_commands(commands);
    }

    pub fn handle(&mut self, input: Input) {
        let outcome = self.page.handle(&input, &self.store);
        self.apply(outcome);
    }

    pub fn advance(&mut self, dt: Duration) {
        let outcome = self.page.advance(dt);
        self.apply(outcome);
    }

    /// Translates a terminal event into page input.
    pub fn on_event(&mut self, event: StudyEvent) {
        match event {
            StudyEvent::Key(key) => self.on_key(key),
            StudyEvent::Mouse(mouse) => {
                let pos = Position::new(mouse.column, mouse.row);
                match mouse.kind {
                    MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                        self.handle(Input::PointerMove(pos))
                    }
                    MouseEventKind::Down(MouseButton::Left) => self.handle(Input::Click(pos)),
                    _ => {}
                }
            }
            StudyEvent::Resize | StudyEvent::Tick => {}
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        self.handle(Input::Key(key));
    }

    fn apply(&mut self, outcome: Outcome) {
        self.apply_commands(outcome.commands);
        match outcome.effect {
            Some(Effect::Quit) => self.should_quit = true,
            Some(Effect::ExportCsv(id)) => self.export(id),
            None => {}
        }
        if let Some(route) = outcome.next {
            self.navigate(route);
        }
    }

    fn apply_commands(&mut self, commands: Vec<crate::store::StoreCommand>) {
        for cmd in commands {
            if let Applied::Missing(id) = self.store.apply(cmd) {
                tracing::warn!(run = %id, "command addressed a missing run");
            }
        }
    }

    fn export(&mut self, id: RunId) {
        let status = match self
            .store
            .run(id)
            .ok_or_else(|| crate::error::StudyError::NoData(id.to_string()))
            .and_then(CsvExport::for_run)
            .and_then(|export| export.write_to(&self.export_dir))
        {
            Ok(path) => {
                tracing::info!(run = %id, path = %path.display(), "exported run");
                ExportStatus::Written(path)
            }
            Err(e) => {
                tracing::error!(run = %id, error = %e, "export failed");
                ExportStatus::Failed(e.to_string())
            }
        };
        if let Page::TestDetail { status: slot, .. } = &mut self.page {
            *slot = Some(status);
        }
    }
}
