//! pinlock - PIN and fingerprint unlock for mobile wallets
//!
//! This library holds the authentication controller that sits between a
//! wallet app's keypad screens and the platform services it relies on:
//! navigation, an encrypted key-value store, the fingerprint API, alerts and
//! the wallet itself.
//!
//! # Flow
//!
//! - First run: the user enters a PIN twice. A matching PIN is stored under
//!   `DevicePin` and a random 256-bit wallet password is generated, stored
//!   under `WalletPassword` and handed to the wallet.
//! - Later runs: the entered PIN (or a fingerprint) releases the stored
//!   wallet password to the wallet.
//!
//! Platform services are traits in [`ports`]; [`memory`] has in-memory
//! implementations for tests and demos.

pub mod config;
pub mod controller;
pub mod error;
pub mod memory;
pub mod password;
pub mod ports;
pub mod state;

pub use config::AuthConfig;
pub use controller::{AuthController, FingerprintOutcome, PinCheck};
pub use error::{AuthError, BiometricError, Result, StoreError, WalletError};
pub use ports::{
    Alert, AlertPresenter, BiometricChallenger, BiometricResult, Navigator, SecureStore,
    WalletCredentialChecker,
};
pub use state::{AuthState, CredentialKey, Digit, PinField, Store, WalletState};
