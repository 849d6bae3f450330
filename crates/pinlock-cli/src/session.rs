//! Line-driven keypad session

use std::str::FromStr;

use anyhow::Result;
use pinlock_core::memory::{MemorySecureStore, RecordingWallet, ScriptedBiometrics};
use pinlock_core::{AuthController, Digit, FingerprintOutcome, PinCheck, PinField};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use crate::console::{ConsoleAlerts, ConsoleNavigator, Screen};

/// Controller wired to the terminal
pub type ConsoleController = AuthController<
    ConsoleNavigator,
    MemorySecureStore,
    ScriptedBiometrics,
    ConsoleAlerts,
    RecordingWallet,
>;

/// One line of user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Setup,
    Unlock,
    Digit(Digit),
    Delete,
    Submit,
    Fingerprint,
    Status,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let cmd = match s {
            "setup" => Command::Setup,
            "unlock" => Command::Unlock,
            "del" | "delete" | "back" => Command::Delete,
            "ok" | "enter" => Command::Submit,
            "finger" | "fingerprint" => Command::Fingerprint,
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => {
                        Command::Digit(Digit::try_from(c).map_err(|e| e.to_string())?)
                    }
                    _ => return Err(format!("Unknown command: {}", s)),
                }
            }
        };
        Ok(cmd)
    }
}

const HELP: &str = "\
Commands:
  setup        start PIN setup
  unlock       start PIN unlock
  0-9          press a keypad digit
  del          remove the last digit
  ok           submit the current PIN
  finger       unlock with fingerprint
  status       show the current screen and buffers
  quit         exit";

/// Keypad session over a controller
pub struct Session {
    ctl: ConsoleController,
    nav: ConsoleNavigator,
    wallet: RecordingWallet,
}

impl Session {
    pub fn new(ctl: ConsoleController, nav: ConsoleNavigator, wallet: RecordingWallet) -> Self {
        Self { ctl, nav, wallet }
    }

    /// Read commands from stdin until `quit` or end of input
    pub async fn run(&mut self) -> Result<()> {
        println!("{}", HELP);
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(cmd) => self.handle(cmd).await,
                Err(e) => eprintln!("{}", e),
            }
        }

        info!("Session finished");
        Ok(())
    }

    /// Apply one command
    pub async fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Setup => self.ctl.init_set_pin(),
            Command::Unlock => self.ctl.init_pin(),
            Command::Digit(digit) => match self.nav.current().field() {
                Some(field) => self.ctl.push_pin_digit(digit, field),
                None => eprintln!("Run `setup` or `unlock` first"),
            },
            Command::Delete => {
                if let Some(field) = self.nav.current().field() {
                    self.ctl.pop_pin_digit(field);
                }
            }
            Command::Submit => self.submit().await,
            Command::Fingerprint => match self.ctl.try_fingerprint().await {
                Ok(FingerprintOutcome::Unlocked) => println!("Wallet unlocked"),
                Ok(FingerprintOutcome::Failed) => println!("Fingerprint not recognised"),
                Ok(FingerprintOutcome::Unavailable) => println!("No fingerprint sensor"),
                Err(e) => error!("Fingerprint unlock failed: {}", e),
            },
            Command::Status => println!("{}", self.status()),
            Command::Help => println!("{}", HELP),
            Command::Quit => {}
        }
    }

    async fn submit(&mut self) {
        match self.nav.current() {
            Screen::SetPinConfirm => match self.ctl.check_new_pin().await {
                Ok(PinCheck::Accepted) => println!("PIN set, wallet created"),
                Ok(PinCheck::Rejected) => self.ctl.init_set_pin(),
                Err(e) => error!("PIN setup failed: {}", e),
            },
            Screen::Pin => match self.ctl.check_pin().await {
                Ok(PinCheck::Accepted) => println!("Wallet unlocked"),
                Ok(PinCheck::Rejected) => self.ctl.init_pin(),
                Err(e) => error!("Unlock failed: {}", e),
            },
            Screen::SetPin => eprintln!("Enter all digits first"),
            Screen::Idle => eprintln!("Run `setup` or `unlock` first"),
        }
    }

    /// Human readable summary with masked buffers
    pub fn status(&self) -> String {
        let len = self.ctl.pin_length();
        let auth = &self.ctl.store().auth;
        let mask = |field: PinField| {
            let filled = auth.buffer(field).len();
            format!("{}{}", "*".repeat(filled), "_".repeat(len.saturating_sub(filled)))
        };
        format!(
            "screen: {}\npin: {}\nnew pin: {}\nconfirm: {}\nwallet: {}",
            self.nav.current().title(),
            mask(PinField::Pin),
            mask(PinField::NewPin),
            mask(PinField::PinVerify),
            if self.wallet.is_unlocked() { "unlocked" } else { "locked" },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinlock_core::{AuthConfig, CredentialKey, Store};

    fn session(secure: MemorySecureStore) -> Session {
        let nav = ConsoleNavigator::default();
        let wallet = RecordingWallet::new();
        let ctl = AuthController::new(
            Store::new(),
            AuthConfig::default(),
            nav.clone(),
            secure,
            ScriptedBiometrics::unavailable(),
            ConsoleAlerts,
            wallet.clone(),
        )
        .unwrap();
        Session::new(ctl, nav, wallet)
    }

    async fn type_line(session: &mut Session, line: &str) {
        for c in line.chars() {
            let cmd = c.to_string().parse::<Command>().unwrap();
            session.handle(cmd).await;
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("setup".parse::<Command>(), Ok(Command::Setup));
        assert_eq!(" ok ".parse::<Command>(), Ok(Command::Submit));
        assert_eq!(
            "7".parse::<Command>(),
            Ok(Command::Digit(Digit::new(7).unwrap()))
        );
        assert!("x".parse::<Command>().is_err());
        assert!("12".parse::<Command>().is_err());
    }

    #[tokio::test]
    async fn test_setup_flow() {
        let secure = MemorySecureStore::new();
        let mut s = session(secure.clone());

        s.handle(Command::Setup).await;
        type_line(&mut s, "246810").await;
        assert_eq!(s.nav.current(), Screen::SetPinConfirm);
        type_line(&mut s, "246810").await;
        s.handle(Command::Submit).await;

        assert_eq!(secure.get(CredentialKey::DevicePin).as_deref(), Some("246810"));
        assert!(s.wallet.is_unlocked());
    }

    #[tokio::test]
    async fn test_rejected_pin_restarts_entry() {
        let secure = MemorySecureStore::new().with_item(CredentialKey::DevicePin, "000000");
        let mut s = session(secure);

        s.handle(Command::Unlock).await;
        type_line(&mut s, "123456").await;
        s.handle(Command::Submit).await;

        assert_eq!(s.nav.current(), Screen::Pin);
        assert_eq!(s.ctl.store().auth.pin, "");
        assert!(!s.wallet.is_unlocked());
    }

    #[tokio::test]
    async fn test_status_masks_digits() {
        let mut s = session(MemorySecureStore::new());
        s.handle(Command::Unlock).await;
        type_line(&mut s, "42").await;

        let status = s.status();
        assert!(status.contains("pin: **____"));
        assert!(!status.contains("42"));
        assert!(status.contains("wallet: locked"));
    }
}
