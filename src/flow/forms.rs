use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::store::strip_spaces;

/// Single-line text input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    value: String,
}

impl TextField {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_blank(&self) -> bool {
        strip_spaces(&self.value).is_empty()
    }

    /// Returns true if the key edited the field.
    pub fn on_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.value.push(c);
                true
            }
            KeyCode::Backspace => self.value.pop().is_some(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Login,
    Password,
}

#[derive(Debug, Clone)]
pub struct AuthForm {
    pub login: TextField,
    pub password: TextField,
    pub focus: AuthField,
    pub show_password: bool,
    pub failed: bool,
}

impl Default for AuthForm {
    fn default() -> Self {
        Self {
            login: TextField::default(),
            password: TextField::default(),
            focus: AuthField::Login,
            show_password: false,
            failed: false,
        }
    }
}

impl AuthForm {
    pub fn can_submit(&self) -> bool {
        !self.login.is_blank() && !self.password.is_blank()
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            AuthField::Login => AuthField::Password,
            AuthField::Password => AuthField::Login,
        };
    }

    pub fn focused_mut(&mut self) -> &mut TextField {
        match self.focus {
            AuthField::Login => &mut self.login,
            AuthField::Password => &mut self.password,
        }
    }

    /// Login as displayed: spaces never show up in the field
    pub fn login_display(&self) -> String {
        strip_spaces(self.login.value())
    }

    pub fn password_display(&self) -> String {
        let shown = strip_spaces(self.password.value());
        if self.show_password {
            shown
        } else {
            "•".repeat(shown.chars().count())
        }
    }
}
