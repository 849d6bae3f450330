//! Capabilities the controller depends on
//!
//! Every platform service the controller talks to is a trait here. The
//! embedding application supplies real implementations; [`crate::memory`]
//! supplies in-memory ones.

use async_trait::async_trait;

use crate::error::{BiometricError, StoreError, WalletError};
use crate::state::{CredentialKey, WalletState};

/// Screen navigation
pub trait Navigator: Send {
    /// Show the first PIN entry screen of setup
    fn go_set_pin(&mut self);

    /// Show the unlock PIN screen
    fn go_pin(&mut self);

    /// Show the PIN confirmation screen of setup
    fn go_set_pin_confirm(&mut self);
}

/// Encrypted on-device key-value store
#[async_trait]
pub trait SecureStore: Send + Sync {
    /// Read a value, `None` if the key has never been written
    async fn get_item(&self, key: CredentialKey) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one
    async fn set_item(&self, key: CredentialKey, value: &str) -> Result<(), StoreError>;
}

/// Outcome of a biometric challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiometricResult {
    /// Whether the user was recognised
    pub success: bool,
}

/// Biometric (fingerprint) API
#[async_trait]
pub trait BiometricChallenger: Send + Sync {
    /// Whether the device has usable biometric hardware
    async fn has_hardware(&self) -> Result<bool, BiometricError>;

    /// Prompt the user and run the challenge
    async fn authenticate(&self, prompt: &str) -> Result<BiometricResult, BiometricError>;
}

/// User-facing alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: Option<String>,
}

impl Alert {
    /// Alert with a title only
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: None,
        }
    }

    /// Attach a message body
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Presents alerts to the user
pub trait AlertPresenter: Send {
    fn alert(&mut self, alert: &Alert);
}

/// Wallet component that validates passwords
///
/// The controller only invokes these; whether the wallet accepts the
/// password is the wallet's business.
#[async_trait]
pub trait WalletCredentialChecker: Send + Sync {
    /// Create a wallet with `wallet.new_password`
    async fn check_new_password(&self, wallet: &WalletState) -> Result<(), WalletError>;

    /// Unlock the wallet with `wallet.password`
    async fn check_password(&self, wallet: &WalletState) -> Result<(), WalletError>;
}
