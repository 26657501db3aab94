//! Page navigation.
//!
//! Each [`Page`] owns the state it needs while it is on screen, timers
//! included. Inputs produce an [`Outcome`]: store commands to apply, an
//! optional side effect for the app, and an optional next route. Replacing
//! the page drops its timers, so nothing scheduled by a page can outlive it.

pub mod calibration;
pub mod forms;
pub mod route;

use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use serde_json::{json, Value};

pub use calibration::{Calibration, Corner};
pub use forms::{AuthField, AuthForm, TextField};
pub use route::Route;

use crate::config::Timings;
use crate::presenters::{PlacementPhase, PlacementTask, Position, SlideEvent, Slideshow};
use crate::store::{DataRecord, RunId, SessionStore, StoreCommand};

/// Value written for every run that reaches the final page
pub const PLACEHOLDER_MARKER: &str = "test";

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Key(KeyEvent),
    PointerMove(Position),
    Click(Position),
}

/// Work the app performs outside the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ExportCsv(RunId),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outcome {
    pub commands: Vec<StoreCommand>,
    pub effect: Option<Effect>,
    pub next: Option<Route>,
}

impl Outcome {
    pub fn stay() -> Self {
        Self::default()
    }

    pub fn go(route: Route) -> Self {
        Self {
            next: Some(route),
            ..Self::default()
        }
    }

    pub fn effect(effect: Effect) -> Self {
        Self {
            effect: Some(effect),
            ..Self::default()
        }
    }

    pub fn with_command(mut self, cmd: StoreCommand) -> Self {
        self.commands.push(cmd);
        self
    }

    pub fn is_stay(&self) -> bool {
        self.commands.is_empty() && self.effect.is_none() && self.next.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ResultsVariant {
    Map,
    Saccade,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportStatus {
    Written(PathBuf),
    Failed(String),
}

/// What the app hands a page when entering it
pub struct EntryContext<'a> {
    pub store: &'a SessionStore,
    pub timings: &'a Timings,
    /// Frozen button position from the most recent placement task
    pub placement: Option<Position>,
    /// Number of banner slides available to the slideshow
    pub slide_count: usize,
}

#[derive(Debug, Clone)]
pub enum Page {
    Start,
    EnterName(TextField),
    Calibration(Calibration),
    TaskHub {
        is_first_task: bool,
    },
    Task1 {
        is_first_task: bool,
        task: PlacementTask,
    },
    Task2 {
        is_first_task: bool,
        show: Slideshow,
    },
    Final,
    Results(ResultsVariant),
    Auth(AuthForm),
    TestList {
        selected: usize,
    },
    TestDetail {
        id: RunId,
        status: Option<ExportStatus>,
    },
}

fn is_forward(code: KeyCode) -> bool {
    matches!(code, KeyCode::Right | KeyCode::Enter)
}

fn is_back(code: KeyCode) -> bool {
    matches!(code, KeyCode::Left | KeyCode::Esc)
}

/// Record stored on the current run when the participant reaches the end
pub fn placeholder_record(placement: Option<Position>) -> DataRecord {
    let mut record = DataRecord::new();
    record.insert("marker".into(), json!(PLACEHOLDER_MARKER));
    record.insert(
        "placement_x".into(),
        placement.map_or(Value::Null, |p| json!(p.x)),
    );
    record.insert(
        "placement_y".into(),
        placement.map_or(Value::Null, |p| json!(p.y)),
    );
    record.insert("recorded_at".into(), json!(Local::now().to_rfc3339()));
    record
}

impl Page {
    /// Builds the page for `route`, plus any commands its entry implies.
    pub fn enter(route: Route, ctx: &EntryContext<'_>) -> (Page, Vec<StoreCommand>) {
        let page = match route {
            Route::Start => Page::Start,
            Route::EnterName => Page::EnterName(TextField::default()),
            Route::Calibration => {
                Page::Calibration(Calibration::new(ctx.timings.calibration_lockout))
            }
            Route::TaskHub { is_first_task } => Page::TaskHub { is_first_task },
            Route::Task1 { is_first_task } => Page::Task1 {
                is_first_task,
                task: PlacementTask::new(ctx.timings.placement_secs),
            },
            Route::Task2 { is_first_task } => Page::Task2 {
                is_first_task,
                show: Slideshow::new(ctx.slide_count, ctx.timings.slide_period),
            },
            Route::Final => {
                let commands = match ctx.store.current_run_id() {
                    Some(id) => vec![StoreCommand::ReplaceData {
                        id,
                        records: vec![placeholder_record(ctx.placement)],
                    }],
                    None => {
                        tracing::warn!("final page reached without a current run");
                        vec![]
                    }
                };
                return (Page::Final, commands);
            }
            Route::Results => Page::Results(ResultsVariant::Map),
            Route::Auth => Page::Auth(AuthForm::default()),
            Route::TestList => Page::TestList { selected: 0 },
            Route::TestDetail(id) => {
                if ctx.store.run(id).is_none() {
                    tracing::warn!(run = %id, "detail requested for a missing run");
                    return Page::enter(Route::TestList, ctx);
                }
                Page::TestDetail { id, status: None }
            }
        };
        (page, vec![])
    }

    pub fn route(&self) -> Route {
        match self {
            Page::Start => Route::Start,
            Page::EnterName(_) => Route::EnterName,
            Page::Calibration(_) => Route::Calibration,
            Page::TaskHub { is_first_task } => Route::TaskHub {
                is_first_task: *is_first_task,
            },
            Page::Task1 { is_first_task, .. } => Route::Task1 {
                is_first_task: *is_first_task,
            },
            Page::Task2 { is_first_task, .. } => Route::Task2 {
                is_first_task: *is_first_task,
            },
            Page::Final => Route::Final,
            Page::Results(_) => Route::Results,
            Page::Auth(_) => Route::Auth,
            Page::TestList { .. } => Route::TestList,
            Page::TestDetail { id, .. } => Route::TestDetail(*id),
        }
    }

    pub fn handle(&mut self, input: &Input, store: &SessionStore) -> Outcome {
        match input {
            Input::Key(key) => self.on_key(key, store),
            Input::PointerMove(pos) => {
                if let Page::Task1 { task, .. } = self {
                    task.on_pointer_move(*pos);
                }
                Outcome::stay()
            }
            Input::Click(_) => {
                if let Page::Calibration(calibration) = self {
                    calibration.on_click();
                }
                Outcome::stay()
            }
        }
    }

    fn on_key(&mut self, key: &KeyEvent, store: &SessionStore) -> Outcome {
        let code = key.code;
        match self {
            Page::Start => match code {
                KeyCode::Char('p') => {
                    if store.is_authenticated() {
                        Outcome::go(Route::TestList)
                    } else {
                        Outcome::go(Route::Auth)
                    }
                }
                KeyCode::Enter | KeyCode::Right => Outcome::go(Route::EnterName),
                KeyCode::Esc => Outcome::effect(Effect::Quit),
                _ => Outcome::stay(),
            },

            Page::EnterName(field) => match code {
                KeyCode::Esc => Outcome::go(Route::Start),
                KeyCode::Enter => {
                    if field.is_blank() {
                        return Outcome::stay();
                    }
                    let name = field.value().to_string();
                    let outcome = Outcome::go(Route::Calibration);
                    match store.current_run_id() {
                        Some(id) => outcome.with_command(StoreCommand::RenameRun { id, name }),
                        None => outcome
                            .with_command(StoreCommand::CreateRun { name })
                            .with_command(StoreCommand::SetCurrentRun(Some(store.next_run_id()))),
                    }
                }
                _ => {
                    field.on_key(key);
                    Outcome::stay()
                }
            },

            Page::Calibration(calibration) => match calibration.on_key(code) {
                Some(route) => Outcome::go(route),
                None => Outcome::stay(),
            },

            Page::TaskHub { is_first_task } => {
                let is_first_task = *is_first_task;
                if is_forward(code) {
                    if is_first_task {
                        Outcome::go(Route::Task1 { is_first_task })
                    } else {
                        Outcome::go(Route::Task2 { is_first_task })
                    }
                } else if is_back(code) && is_first_task {
                    Outcome::go(Route::Calibration)
                } else {
                    Outcome::stay()
                }
            }

            Page::Task1 { task, .. } => {
                match task.phase() {
                    PlacementPhase::NotStarted => {
                        if matches!(code, KeyCode::Enter | KeyCode::Char('s')) {
                            task.start();
                        }
                    }
                    PlacementPhase::Running => match code {
                        KeyCode::Left => task.nudge(-1, 0),
                        KeyCode::Right => task.nudge(1, 0),
                        KeyCode::Up => task.nudge(0, -1),
                        KeyCode::Down => task.nudge(0, 1),
                        _ => {}
                    },
                    PlacementPhase::Finished => {
                        if is_forward(code) {
                            return Outcome::go(Route::TaskHub {
                                is_first_task: false,
                            });
                        }
                    }
                }
                Outcome::stay()
            }

            Page::Task2 { .. } => Outcome::stay(),

            Page::Final => match code {
                KeyCode::Left | KeyCode::Esc | KeyCode::Char('a') => Outcome::go(Route::Start),
                KeyCode::Right | KeyCode::Enter | KeyCode::Char('r') => {
                    Outcome::go(Route::Results)
                }
                _ => Outcome::stay(),
            },

            Page::Results(variant) => {
                if !has_current_data(store) {
                    return Outcome::stay();
                }
                match (*variant, code) {
                    (ResultsVariant::Map, c) if is_forward(c) => {
                        *variant = ResultsVariant::Saccade;
                        Outcome::stay()
                    }
                    (ResultsVariant::Saccade, c) if is_back(c) => {
                        *variant = ResultsVariant::Map;
                        Outcome::stay()
                    }
                    (ResultsVariant::Map, c) if is_back(c) => Outcome::go(Route::Final),
                    _ => Outcome::stay(),
                }
            }

            Page::Auth(form) => match code {
                KeyCode::Esc => Outcome::go(Route::Start),
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                    form.toggle_focus();
                    Outcome::stay()
                }
                KeyCode::F(2) => {
                    form.show_password = !form.show_password;
                    Outcome::stay()
                }
                KeyCode::Enter => {
                    if !form.can_submit() {
                        return Outcome::stay();
                    }
                    let login = form.login.value().to_string();
                    let password = form.password.value().to_string();
                    if store.credentials().matches(&login, &password) {
                        Outcome::go(Route::TestList)
                            .with_command(StoreCommand::Login { login, password })
                    } else {
                        form.failed = true;
                        Outcome::stay()
                    }
                }
                _ => {
                    form.focused_mut().on_key(key);
                    Outcome::stay()
                }
            },

            Page::TestList { selected } => {
                if !store.is_authenticated() {
                    return Outcome::stay();
                }
                let runs = store.runs();
                *selected = (*selected).min(runs.len().saturating_sub(1));
                match code {
                    KeyCode::Up => {
                        *selected = selected.saturating_sub(1);
                        Outcome::stay()
                    }
                    KeyCode::Down => {
                        if *selected + 1 < runs.len() {
                            *selected += 1;
                        }
                        Outcome::stay()
                    }
                    KeyCode::Char('c') => {
                        let id = store.next_run_id();
                        Outcome::go(Route::Start)
                            .with_command(StoreCommand::CreateRun {
                                name: format!("Тест {}", id),
                            })
                            .with_command(StoreCommand::SetCurrentRun(Some(id)))
                    }
                    KeyCode::Char('d') | KeyCode::Delete => match runs.get(*selected) {
                        Some(run) => Outcome::stay().with_command(StoreCommand::DeleteRun(run.id)),
                        None => Outcome::stay(),
                    },
                    KeyCode::Enter | KeyCode::Right => match runs.get(*selected) {
                        Some(run) => Outcome::go(Route::TestDetail(run.id)),
                        None => Outcome::stay(),
                    },
                    KeyCode::Char('l') => {
                        Outcome::go(Route::Auth).with_command(StoreCommand::Logout)
                    }
                    _ => Outcome::stay(),
                }
            }

            Page::TestDetail { id, .. } => match code {
                c if is_back(c) => Outcome::go(Route::TestList),
                KeyCode::Char('e') | KeyCode::Enter => {
                    if store.run(*id).is_some_and(|run| run.has_data()) {
                        Outcome::effect(Effect::ExportCsv(*id))
                    } else {
                        Outcome::stay()
                    }
                }
                _ => Outcome::stay(),
            },
        }
    }

    /// Feeds elapsed time to whatever timers the page owns.
    pub fn advance(&mut self, dt: Duration) -> Outcome {
        match self {
            Page::Calibration(calibration) => {
                calibration.advance(dt);
                Outcome::stay()
            }
            Page::Task1 { task, .. } => {
                task.advance(dt);
                Outcome::stay()
            }
            Page::Task2 { show, .. } => match show.advance(dt) {
                Some(SlideEvent::Finished) => Outcome::go(Route::Final),
                Some(SlideEvent::Advanced(index)) => {
                    tracing::debug!(slide = index, "banner advanced");
                    Outcome::stay()
                }
                None => Outcome::stay(),
            },
            _ => Outcome::stay(),
        }
    }

    /// Frozen placement if this is a finished placement task
    pub fn placement(&self) -> Option<Position> {
        match self {
            Page::Task1 { task, .. } => task.frozen(),
            _ => None,
        }
    }
}

/// Whether the results page has anything to show
pub fn has_current_data(store: &SessionStore) -> bool {
    store.current_run().is_some_and(|run| run.has_data())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> Input {
        Input::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn enter(route: Route, store: &SessionStore) -> Page {
        let timings = Timings::default();
        let ctx = EntryContext {
            store,
            timings: &timings,
            placement: None,
            slide_count: 3,
        };
        Page::enter(route, &ctx).0
    }

    #[test]
    fn test_start_profile_depends_on_auth() {
        let mut store = SessionStore::new();
        let mut page = Page::Start;
        assert_eq!(page.handle(&key(KeyCode::Char('p')), &store).next, Some(Route::Auth));
        store.login("admin", "admin");
        assert_eq!(
            page.handle(&key(KeyCode::Char('p')), &store).next,
            Some(Route::TestList)
        );
    }

    #[test]
    fn test_start_escape_quits() {
        let store = SessionStore::new();
        let mut page = Page::Start;
        assert_eq!(page.handle(&key(KeyCode::Esc), &store).effect, Some(Effect::Quit));
    }

    #[test]
    fn test_enter_name_blank_is_disabled() {
        let store = SessionStore::new();
        let mut page = enter(Route::EnterName, &store);
        page.handle(&key(KeyCode::Char(' ')), &store);
        assert!(page.handle(&key(KeyCode::Enter), &store).is_stay());
    }

    #[test]
    fn test_enter_name_creates_run_when_none_current() {
        let store = SessionStore::new();
        let mut page = enter(Route::EnterName, &store);
        for c in "Ann".chars() {
            page.handle(&key(KeyCode::Char(c)), &store);
        }
        let outcome = page.handle(&key(KeyCode::Enter), &store);
        assert_eq!(outcome.next, Some(Route::Calibration));
        assert_eq!(
            outcome.commands,
            vec![
                StoreCommand::CreateRun { name: "Ann".into() },
                StoreCommand::SetCurrentRun(Some(RunId(1))),
            ]
        );
    }

    #[test]
    fn test_enter_name_renames_current_run() {
        let mut store = SessionStore::new();
        let id = store.create_run("Тест 1");
        store.set_current_run(Some(id));
        let mut page = enter(Route::EnterName, &store);
        page.handle(&key(KeyCode::Char('B')), &store);
        let outcome = page.handle(&key(KeyCode::Enter), &store);
        assert_eq!(
            outcome.commands,
            vec![StoreCommand::RenameRun { id, name: "B".into() }]
        );
    }

    #[test]
    fn test_task_hub_back_only_for_first_task() {
        let store = SessionStore::new();
        let mut first = Page::TaskHub { is_first_task: true };
        let mut second = Page::TaskHub { is_first_task: false };
        assert_eq!(first.handle(&key(KeyCode::Esc), &store).next, Some(Route::Calibration));
        assert!(second.handle(&key(KeyCode::Esc), &store).is_stay());
        assert_eq!(
            first.handle(&key(KeyCode::Enter), &store).next,
            Some(Route::Task1 { is_first_task: true })
        );
        assert_eq!(
            second.handle(&key(KeyCode::Enter), &store).next,
            Some(Route::Task2 { is_first_task: false })
        );
    }

    #[test]
    fn test_task1_forward_only_when_finished() {
        let store = SessionStore::new();
        let mut page = enter(Route::Task1 { is_first_task: true }, &store);
        assert!(page.handle(&key(KeyCode::Right), &store).is_stay());

        page.handle(&key(KeyCode::Char('s')), &store);
        page.handle(&Input::PointerMove(Position::new(40, 12)), &store);
        page.advance(Duration::from_secs(5));
        assert_eq!(page.placement(), Some(Position::new(40, 12)));
        assert_eq!(
            page.handle(&key(KeyCode::Right), &store).next,
            Some(Route::TaskHub { is_first_task: false })
        );
    }

    #[test]
    fn test_task2_goes_to_final_after_last_slide() {
        let store = SessionStore::new();
        let mut page = enter(Route::Task2 { is_first_task: false }, &store);
        let five = Duration::from_secs(5);
        assert!(page.advance(five).is_stay());
        assert!(page.advance(five).is_stay());
        assert_eq!(page.advance(five).next, Some(Route::Final));
        assert!(page.handle(&key(KeyCode::Esc), &store).is_stay());
    }

    #[test]
    fn test_final_entry_replaces_current_data() {
        let mut store = SessionStore::new();
        let id = store.create_run("a");
        store.set_current_run(Some(id));
        let timings = Timings::default();
        let ctx = EntryContext {
            store: &store,
            timings: &timings,
            placement: Some(Position::new(5, 6)),
            slide_count: 3,
        };
        let (page, commands) = Page::enter(Route::Final, &ctx);
        assert_matches!(page, Page::Final);
        assert_matches!(
            commands.as_slice(),
            [StoreCommand::ReplaceData { id: target, records }]
                if *target == id && records.len() == 1
                    && records[0]["marker"] == json!("test")
                    && records[0]["placement_x"] == json!(5)
        );
    }

    #[test]
    fn test_final_entry_without_current_run() {
        let store = SessionStore::new();
        let timings = Timings::default();
        let ctx = EntryContext {
            store: &store,
            timings: &timings,
            placement: None,
            slide_count: 3,
        };
        let (_, commands) = Page::enter(Route::Final, &ctx);
        assert!(commands.is_empty());
    }

    #[test]
    fn test_results_without_data_ignores_input() {
        let store = SessionStore::new();
        let mut page = enter(Route::Results, &store);
        assert!(page.handle(&key(KeyCode::Esc), &store).is_stay());
        assert!(page.handle(&key(KeyCode::Right), &store).is_stay());
        assert_matches!(page, Page::Results(ResultsVariant::Map));
    }

    #[test]
    fn test_results_variant_switching() {
        let mut store = SessionStore::new();
        let id = store.create_run("a");
        store.set_current_run(Some(id));
        store.append_data(id, placeholder_record(None));

        let mut page = enter(Route::Results, &store);
        page.handle(&key(KeyCode::Right), &store);
        assert_matches!(page, Page::Results(ResultsVariant::Saccade));
        page.handle(&key(KeyCode::Left), &store);
        assert_matches!(page, Page::Results(ResultsVariant::Map));
        assert_eq!(page.handle(&key(KeyCode::Left), &store).next, Some(Route::Final));
    }

    #[test]
    fn test_auth_failure_stays_with_message() {
        let store = SessionStore::new();
        let mut page = enter(Route::Auth, &store);
        page.handle(&key(KeyCode::Char('x')), &store);
        page.handle(&key(KeyCode::Tab), &store);
        page.handle(&key(KeyCode::Char('y')), &store);
        assert!(page.handle(&key(KeyCode::Enter), &store).is_stay());
        assert_matches!(page, Page::Auth(AuthForm { failed: true, .. }));
    }

    #[test]
    fn test_auth_success_emits_login() {
        let store = SessionStore::new();
        let mut page = enter(Route::Auth, &store);
        for c in " a d min".chars() {
            page.handle(&key(KeyCode::Char(c)), &store);
        }
        page.handle(&key(KeyCode::Tab), &store);
        for c in "ad min".chars() {
            page.handle(&key(KeyCode::Char(c)), &store);
        }
        let outcome = page.handle(&key(KeyCode::Enter), &store);
        assert_eq!(outcome.next, Some(Route::TestList));
        assert_matches!(outcome.commands.as_slice(), [StoreCommand::Login { .. }]);
    }

    #[test]
    fn test_locked_list_ignores_input() {
        let store = SessionStore::new();
        let mut page = enter(Route::TestList, &store);
        assert!(page.handle(&key(KeyCode::Char('c')), &store).is_stay());
    }

    #[test]
    fn test_list_create_names_next_test() {
        let mut store = SessionStore::new();
        store.login("admin", "admin");
        store.create_run("x");
        let mut page = enter(Route::TestList, &store);
        let outcome = page.handle(&key(KeyCode::Char('c')), &store);
        assert_eq!(outcome.next, Some(Route::Start));
        assert_eq!(
            outcome.commands,
            vec![
                StoreCommand::CreateRun { name: "Тест 2".into() },
                StoreCommand::SetCurrentRun(Some(RunId(2))),
            ]
        );
    }

    #[test]
    fn test_list_delete_and_view_use_selection() {
        let mut store = SessionStore::new();
        store.login("admin", "admin");
        store.create_run("a");
        store.create_run("b");
        let mut page = enter(Route::TestList, &store);
        page.handle(&key(KeyCode::Down), &store);
        assert_eq!(
            page.handle(&key(KeyCode::Enter), &store).next,
            Some(Route::TestDetail(RunId(2)))
        );
        assert_eq!(
            page.handle(&key(KeyCode::Char('d')), &store).commands,
            vec![StoreCommand::DeleteRun(RunId(2))]
        );
    }

    #[test]
    fn test_list_logout() {
        let mut store = SessionStore::new();
        store.login("admin", "admin");
        let mut page = enter(Route::TestList, &store);
        let outcome = page.handle(&key(KeyCode::Char('l')), &store);
        assert_eq!(outcome.next, Some(Route::Auth));
        assert_eq!(outcome.commands, vec![StoreCommand::Logout]);
    }

    #[test]
    fn test_detail_for_missing_run_redirects_to_list() {
        let store = SessionStore::new();
        let page = enter(Route::TestDetail(RunId(4)), &store);
        assert_eq!(page.route(), Route::TestList);
    }

    #[test]
    fn test_detail_export_only_with_data() {
        let mut store = SessionStore::new();
        let id = store.create_run("a");
        let mut page = enter(Route::TestDetail(id), &store);
        assert!(page.handle(&key(KeyCode::Char('e')), &store).is_stay());

        store.append_data(id, placeholder_record(None));
        assert_eq!(
            page.handle(&key(KeyCode::Char('e')), &store).effect,
            Some(Effect::ExportCsv(id))
        );
        assert_eq!(page.handle(&key(KeyCode::Esc), &store).next, Some(Route::TestList));
    }

    #[test]
    fn test_page_route_matches_entered_route() {
        let mut store = SessionStore::new();
        let id = store.create_run("a");
        for route in [
            Route::Start,
            Route::EnterName,
            Route::Calibration,
            Route::TaskHub { is_first_task: false },
            Route::Task1 { is_first_task: true },
            Route::Task2 { is_first_task: false },
            Route::Results,
            Route::Auth,
            Route::TestList,
            Route::TestDetail(id),
        ] {
            assert_eq!(enter(route, &store).route(), route);
        }
    }
}
