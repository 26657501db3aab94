use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

use uxstudy::{
    app::App,
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore, StudyConfig},
    flow::Route,
    logging,
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    ui,
};

const TICK_RATE_MS: u64 = 100;

/// guided ux-research session in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Walks a participant through calibration, a banner placement task and a timed slideshow, and lets the experimenter browse and export the recorded runs as CSV."
)]
pub struct Cli {
    /// route to open first, e.g. /tasks/true or /list
    #[clap(long, default_value = "/")]
    start_at: Route,

    /// directory CSV exports are written to
    #[clap(long)]
    export_dir: Option<PathBuf>,

    /// JSON file with timing overrides
    #[clap(long)]
    config: Option<PathBuf>,

    /// write the default timings to the --config file and exit
    #[clap(long, requires = "config")]
    init_config: bool,

    /// append logs to this file
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// log filter directive
    #[clap(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn study_config(&self) -> StudyConfig {
        self.config
            .as_ref()
            .map(|path| FileConfigStore::with_path(path).load())
            .unwrap_or_default()
    }

    fn resolve_export_dir(&self, config: &StudyConfig) -> PathBuf {
        self.export_dir
            .clone()
            .or_else(|| config.export_dir.clone())
            .unwrap_or_else(AppDirs::export_dir)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        logging::init_file_logging(path, &cli.log_level)?;
    }

    if cli.init_config {
        if let Some(path) = &cli.config {
            FileConfigStore::with_path(path).save(&StudyConfig::default())?;
            println!("wrote {}", path.display());
        }
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config = cli.study_config();
    let export_dir = cli.resolve_export_dir(&config);
    tracing::info!(start_at = %cli.start_at, export_dir = %export_dir.display(), "starting session");

    let mut app = App::new(&config, export_dir);
    app.navigate(cli.start_at);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "session aborted");
    }
    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker(Duration::from_millis(TICK_RATE_MS)),
    );

    while !app.should_quit() {
        terminal.draw(|f| ui::draw(app, f))?;

        let step = runner.step();
        app.advance(step.elapsed);
        app.on_event(step.event);
    }

    tracing::info!("session finished");
    Ok(())
}
