// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod assets;
pub mod config;
pub mod error;
pub mod export;
pub mod flow;
pub mod logging;
pub mod presenters;
pub mod runtime;
pub mod store;
pub mod timer;
pub mod ui;

pub use app::App;
pub use error::{Result, StudyError};
