//! Terminal implementations of the navigation and alert capabilities

use std::sync::{Arc, Mutex, PoisonError};

use pinlock_core::{Alert, AlertPresenter, Navigator, PinField};

/// Keypad screen currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Nothing started yet
    #[default]
    Idle,
    SetPin,
    SetPinConfirm,
    Pin,
}

impl Screen {
    /// Buffer the keypad types into on this screen
    pub fn field(&self) -> Option<PinField> {
        match self {
            Screen::Idle => None,
            Screen::SetPin => Some(PinField::NewPin),
            Screen::SetPinConfirm => Some(PinField::PinVerify),
            Screen::Pin => Some(PinField::Pin),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Idle => "Welcome",
            Screen::SetPin => "Set PIN",
            Screen::SetPinConfirm => "Confirm PIN",
            Screen::Pin => "Enter PIN",
        }
    }
}

/// Navigator that announces screen changes on stdout
///
/// Clones share the current screen so the event loop can see where the
/// controller sent the user.
#[derive(Clone, Default)]
pub struct ConsoleNavigator {
    screen: Arc<Mutex<Screen>>,
}

impl ConsoleNavigator {
    pub fn current(&self) -> Screen {
        *self.screen.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn show(&mut self, screen: Screen) {
        *self.screen.lock().unwrap_or_else(PoisonError::into_inner) = screen;
        println!("-- {} --", screen.title());
    }
}

impl Navigator for ConsoleNavigator {
    fn go_set_pin(&mut self) {
        self.show(Screen::SetPin);
    }

    fn go_pin(&mut self) {
        self.show(Screen::Pin);
    }

    fn go_set_pin_confirm(&mut self) {
        self.show(Screen::SetPinConfirm);
    }
}

/// Alert presenter writing to stderr
#[derive(Clone, Copy, Default)]
pub struct ConsoleAlerts;

impl AlertPresenter for ConsoleAlerts {
    fn alert(&mut self, alert: &Alert) {
        match &alert.message {
            Some(message) => eprintln!("[!] {}: {}", alert.title, message),
            None => eprintln!("[!] {}", alert.title),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigator_tracks_screen() {
        let nav = ConsoleNavigator::default();
        let mut handle = nav.clone();
        assert_eq!(nav.current(), Screen::Idle);

        handle.go_set_pin_confirm();
        assert_eq!(nav.current(), Screen::SetPinConfirm);
        assert_eq!(nav.current().field(), Some(PinField::PinVerify));
    }

    #[test]
    fn test_idle_has_no_buffer() {
        assert_eq!(Screen::Idle.field(), None);
        assert_eq!(Screen::Pin.field(), Some(PinField::Pin));
    }
}
