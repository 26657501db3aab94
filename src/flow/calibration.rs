use std::time::Duration;

use crossterm::event::KeyCode;

use super::Route;
use crate::timer::Lockout;

pub const INTRO_STEP: u8 = 0;
pub const COMPLETION_STEP: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Calibration walk: intro, four corner targets, completion.
#[derive(Debug, Clone)]
pub struct Calibration {
    step: u8,
    lockout: Lockout,
}

impl Calibration {
    pub fn new(lockout: Duration) -> Self {
        Self {
            step: INTRO_STEP,
            lockout: Lockout::new(lockout),
        }
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn is_locked(&self) -> bool {
        self.lockout.is_active()
    }

    pub fn corner(&self) -> Option<Corner> {
        match self.step {
            1 => Some(Corner::TopLeft),
            2 => Some(Corner::TopRight),
            3 => Some(Corner::BottomLeft),
            4 => Some(Corner::BottomRight),
            _ => None,
        }
    }

    fn on_target(&self) -> bool {
        self.step > INTRO_STEP && self.step < COMPLETION_STEP
    }

    /// Applies a key and returns a route when the key leaves calibration.
    ///
    /// Every key move engages the lockout, and no key is accepted while it
    /// is active, including the ones that would leave calibration.
    pub fn on_key(&mut self, code: KeyCode) -> Option<Route> {
        if self.lockout.is_active() {
            return None;
        }
        match (self.step, code) {
            (INTRO_STEP, KeyCode::Left | KeyCode::Esc) => Some(Route::EnterName),
            (COMPLETION_STEP, KeyCode::Right | KeyCode::Enter) => Some(Route::TaskHub {
                is_first_task: true,
            }),
            (INTRO_STEP, KeyCode::Right | KeyCode::Enter) => self.move_to(1),
            (COMPLETION_STEP, KeyCode::Left | KeyCode::Esc) => self.move_to(INTRO_STEP),
            (step, KeyCode::Right | KeyCode::Char(' ')) if self.on_target() => {
                self.move_to(step + 1)
            }
            (step, KeyCode::Left) if self.on_target() => self.move_to(step - 1),
            _ => None,
        }
    }

    fn move_to(&mut self, step: u8) -> Option<Route> {
        self.step = step;
        self.lockout.engage();
        None
    }

    /// Clicks advance corner targets without engaging the lockout.
    pub fn on_click(&mut self) {
        if self.on_target() {
            self.step += 1;
        }
    }

    pub fn advance(&mut self, dt: Duration) {
        self.lockout.advance(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCKOUT: Duration = Duration::from_millis(1500);

    fn calibration() -> Calibration {
        Calibration::new(LOCKOUT)
    }

    /// Calibration sitting on `step` with the lockout already expired
    fn at_step(step: u8) -> Calibration {
        let mut c = calibration();
        if step > INTRO_STEP {
            c.on_key(KeyCode::Enter);
            for _ in 1..step {
                c.on_click();
            }
        }
        c.advance(LOCKOUT);
        c
    }

    #[test]
    fn test_intro_navigation() {
        let mut c = calibration();
        assert_eq!(c.on_key(KeyCode::Esc), Some(Route::EnterName));
        assert_eq!(c.on_key(KeyCode::Right), None);
        assert_eq!(c.step(), 1);
        assert_eq!(c.corner(), Some(Corner::TopLeft));
    }

    #[test]
    fn test_keys_inside_lockout_are_ignored() {
        let mut c = at_step(1);

        c.on_key(KeyCode::Right);
        c.advance(Duration::from_millis(1000));
        c.on_key(KeyCode::Char(' '));
        assert_eq!(c.step(), 2);

        c.advance(Duration::from_millis(500));
        c.on_key(KeyCode::Char(' '));
        assert_eq!(c.step(), 3);
    }

    #[test]
    fn test_intro_advance_engages_lockout() {
        let mut c = calibration();
        c.on_key(KeyCode::Right);
        c.on_key(KeyCode::Right);
        assert_eq!(c.step(), 1);
        assert!(c.is_locked());
    }

    #[test]
    fn test_left_retreats_with_lockout() {
        let mut c = at_step(2);

        c.on_key(KeyCode::Left);
        c.on_key(KeyCode::Left);
        assert_eq!(c.step(), 1);
        assert!(c.is_locked());
    }

    #[test]
    fn test_step_one_left_returns_to_intro() {
        let mut c = at_step(1);
        c.on_key(KeyCode::Left);
        assert_eq!(c.step(), INTRO_STEP);
    }

    #[test]
    fn test_double_left_from_first_corner_stays() {
        let mut c = at_step(1);
        assert_eq!(c.on_key(KeyCode::Left), None);
        assert_eq!(c.on_key(KeyCode::Left), None);
        assert_eq!(c.step(), INTRO_STEP);

        c.advance(LOCKOUT);
        assert_eq!(c.on_key(KeyCode::Left), Some(Route::EnterName));
    }

    #[test]
    fn test_double_right_from_last_corner_stays() {
        let mut c = at_step(4);
        assert_eq!(c.on_key(KeyCode::Right), None);
        assert_eq!(c.on_key(KeyCode::Right), None);
        assert_eq!(c.step(), COMPLETION_STEP);

        c.advance(Duration::from_millis(1499));
        assert_eq!(c.on_key(KeyCode::Enter), None);
        c.advance(Duration::from_millis(1));
        assert_eq!(
            c.on_key(KeyCode::Enter),
            Some(Route::TaskHub { is_first_task: true })
        );
    }

    #[test]
    fn test_clicks_skip_lockout() {
        let mut c = at_step(1);
        c.on_key(KeyCode::Right);
        assert!(c.is_locked());
        c.on_click();
        c.on_click();
        c.on_click();
        assert_eq!(c.step(), COMPLETION_STEP);
        c.on_click();
        assert_eq!(c.step(), COMPLETION_STEP);
    }

    #[test]
    fn test_completion_routes() {
        let mut c = at_step(COMPLETION_STEP);
        assert_eq!(c.on_key(KeyCode::Left), None);
        assert_eq!(c.step(), INTRO_STEP);
        assert!(c.is_locked());

        let mut c = at_step(COMPLETION_STEP);
        assert_eq!(
            c.on_key(KeyCode::Enter),
            Some(Route::TaskHub { is_first_task: true })
        );
    }

    #[test]
    fn test_corner_order() {
        let mut c = calibration();
        c.on_key(KeyCode::Enter);
        let mut corners = vec![];
        while let Some(corner) = c.corner() {
            corners.push(corner);
            c.on_click();
        }
        assert_eq!(
            corners,
            vec![
                Corner::TopLeft,
                Corner::TopRight,
                Corner::BottomLeft,
                Corner::BottomRight
            ]
        );
    }
}
