//! Error types for the unlock controller

use thiserror::Error;

/// Result type alias for controller operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors raised by a secure store backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Backend could not be reached (locked keychain, missing entitlement)
    #[error("Secure store unavailable: {0}")]
    Unavailable(String),

    /// Backend reported a failure while reading or writing a key
    #[error("Secure store failure: {0}")]
    Backend(String),
}

/// Errors raised by the biometric API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BiometricError {
    #[error("Biometric API unavailable: {0}")]
    Unavailable(String),

    #[error("Biometric prompt was cancelled")]
    Cancelled,
}

/// Errors raised by the wallet credential checker
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    #[error("Wallet rejected credential: {0}")]
    Rejected(String),
}

/// Controller error
#[derive(Debug, Error)]
pub enum AuthError {
    /// Secure store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Biometric API failure
    #[error(transparent)]
    Biometric(#[from] BiometricError),

    /// Wallet checker failure
    #[error(transparent)]
    Wallet(#[from] WalletError),

    /// Keypad delivered something other than 0-9
    #[error("Not a PIN digit: {0:?}")]
    InvalidDigit(char),

    /// Configuration could not be loaded or is out of range
    #[error("Configuration error: {0}")]
    Config(String),
}
