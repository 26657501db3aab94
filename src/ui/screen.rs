use ratatui::Frame;

use super::{experimenter, participant};
use crate::app::App;
use crate::flow::Page;

/// A UI Screen boundary: responsible for rendering one page
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Screen backed by a plain render function
pub struct FnScreen(fn(&App, &mut Frame));

impl Screen for FnScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        (self.0)(app, f)
    }
}

/// Helper to construct the appropriate screen for the current page
pub fn current_screen(page: &Page) -> Box<dyn Screen> {
    let render: fn(&App, &mut Frame) = match page {
        Page::Start => participant::render_start,
        Page::EnterName(_) => participant::render_enter_name,
        Page::Calibration(_) => participant::render_calibration,
        Page::TaskHub { .. } => participant::render_task_hub,
        Page::Task1 { .. } => participant::render_task1,
        Page::Task2 { .. } => participant::render_task2,
        Page::Final => participant::render_final,
        Page::Results(_) => participant::render_results,
        Page::Auth(_) => experimenter::render_auth,
        Page::TestList { .. } => experimenter::render_test_list,
        Page::TestDetail { .. } => experimenter::render_test_detail,
    };
    Box::new(FnScreen(render))
}
