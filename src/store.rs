use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One recorded sample. Keys iterate in sorted order.
pub type DataRecord = serde_json::Map<String, serde_json::Value>;

const DEFAULT_LOGIN: &str = "admin";
const DEFAULT_PASSWORD: &str = "admin";

/// Identifier of a test run, assigned as `count + 1` at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunId(pub u32);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The experimenter's fixed login pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            login: DEFAULT_LOGIN.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

impl Credentials {
    /// Compares after removing every space from the entered values.
    pub fn matches(&self, login: &str, password: &str) -> bool {
        strip_spaces(login) == self.login && strip_spaces(password) == self.password
    }
}

pub fn strip_spaces(s: &str) -> String {
    s.replace(' ', "")
}

/// One participant session
#[derive(Debug, Clone, PartialEq)]
pub struct TestRun {
    pub id: RunId,
    pub name: String,
    pub data: Vec<DataRecord>,
    pub created_at: DateTime<Local>,
}

impl TestRun {
    pub fn has_data(&self) -> bool {
        !self.data.is_empty()
    }
}

/// Every mutation the flow controller may request
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCommand {
    Login { login: String, password: String },
    Logout,
    CreateRun { name: String },
    RenameRun { id: RunId, name: String },
    DeleteRun(RunId),
    SetCurrentRun(Option<RunId>),
    AppendData { id: RunId, record: DataRecord },
    ReplaceData { id: RunId, records: Vec<DataRecord> },
}

/// What a command did to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Done,
    Created(RunId),
    Authenticated(bool),
    /// The addressed run does not exist
    Missing(RunId),
}

/// In-memory session state shared by every page.
///
/// There is exactly one writer (the app loop); pages only read it and hand
/// back [`StoreCommand`]s which the app applies in order.
#[derive(Debug, Default)]
pub struct SessionStore {
    credentials: Credentials,
    authenticated: bool,
    runs: Vec<TestRun>,
    current_run: Option<RunId>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            credentials,
            ..Self::default()
        }
    }

    pub fn apply(&mut self, cmd: StoreCommand) -> Applied {
        match cmd {
            StoreCommand::Login { login, password } => {
                Applied::Authenticated(self.login(&login, &password))
            }
            StoreCommand::Logout => {
                self.logout();
                Applied::Done
            }
            StoreCommand::CreateRun { name } => Applied::Created(self.create_run(name)),
            StoreCommand::RenameRun { id, name } => {
                if self.rename_run(id, name) {
                    Applied::Done
                } else {
                    Applied::Missing(id)
                }
            }
            StoreCommand::DeleteRun(id) => {
                self.delete_run(id);
                Applied::Done
            }
            StoreCommand::SetCurrentRun(id) => {
                self.set_current_run(id);
                Applied::Done
            }
            StoreCommand::AppendData { id, record } => {
                if self.append_data(id, record) {
                    Applied::Done
                } else {
                    Applied::Missing(id)
                }
            }
            StoreCommand::ReplaceData { id, records } => {
                if self.replace_data(id, records) {
                    Applied::Done
                } else {
                    Applied::Missing(id)
                }
            }
        }
    }

    pub fn login(&mut self, login: &str, password: &str) -> bool {
        let ok = self.credentials.matches(login, password);
        if ok {
            self.authenticated = true;
            tracing::info!("experimenter authenticated");
        } else {
            tracing::info!("rejected login attempt");
        }
        ok
    }

    pub fn logout(&mut self) {
        self.authenticated = false;
        tracing::info!("experimenter logged out");
    }

    pub fn create_run(&mut self, name: impl Into<String>) -> RunId {
        let id = self.next_run_id();
        let name = name.into();
        tracing::info!(run = %id, %name, "created run");
        self.runs.push(TestRun {
            id,
            name,
            data: Vec::new(),
            created_at: Local::now(),
        });
        id
    }

    pub fn rename_run(&mut self, id: RunId, name: impl Into<String>) -> bool {
        match self.run_mut(id) {
            Some(run) => {
                run.name = name.into();
                tracing::debug!(run = %id, name = %run.name, "renamed run");
                true
            }
            None => {
                tracing::warn!(run = %id, "rename addressed a missing run");
                false
            }
        }
    }

    /// Removes every run carrying `id` and clears the current run, whether
    /// or not `id` was current.
    pub fn delete_run(&mut self, id: RunId) {
        let before = self.runs.len();
        self.runs.retain(|run| run.id != id);
        self.current_run = None;
        tracing::info!(run = %id, removed = before - self.runs.len(), "deleted run");
    }

    pub fn set_current_run(&mut self, id: Option<RunId>) {
        self.current_run = id;
    }

    pub fn append_data(&mut self, id: RunId, record: DataRecord) -> bool {
        match self.run_mut(id) {
            Some(run) => {
                run.data.push(record);
                true
            }
            None => {
                tracing::warn!(run = %id, "data recorded for a missing run");
                false
            }
        }
    }

    pub fn replace_data(&mut self, id: RunId, records: Vec<DataRecord>) -> bool {
        match self.run_mut(id) {
            Some(run) => {
                run.data = records;
                true
            }
            None => {
                tracing::warn!(run = %id, "data recorded for a missing run");
                false
            }
        }
    }

    pub fn runs(&self) -> &[TestRun] {
        &self.runs
    }

    pub fn run(&self, id: RunId) -> Option<&TestRun> {
        self.runs.iter().find(|run| run.id == id)
    }

    fn run_mut(&mut self, id: RunId) -> Option<&mut TestRun> {
        self.runs.iter_mut().find(|run| run.id == id)
    }

    pub fn current_run_id(&self) -> Option<RunId> {
        self.current_run
    }

    pub fn current_run(&self) -> Option<&TestRun> {
        self.current_run.and_then(|id| self.run(id))
    }

    pub fn next_run_id(&self) -> RunId {
        RunId(self.runs.len() as u32 + 1)
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}
