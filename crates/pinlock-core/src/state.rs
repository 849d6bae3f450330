//! Application store owned by the controller
//!
//! The store holds the keypad buffers and the wallet password fields the
//! controller mutates in place. Buffers only ever hold ASCII digits because
//! the only way in is [`Digit`].

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::AuthError;

/// Keys of the credential record in the secure store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKey {
    /// PIN chosen during setup
    DevicePin,
    /// Generated wallet password
    WalletPassword,
}

impl CredentialKey {
    /// Key string used by the secure store
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialKey::DevicePin => "DevicePin",
            CredentialKey::WalletPassword => "WalletPassword",
        }
    }
}

impl fmt::Display for CredentialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single keypad digit (0-9)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Digit(u8);

impl Digit {
    /// Create a digit from its numeric value
    pub fn new(value: u8) -> Option<Self> {
        (value <= 9).then_some(Self(value))
    }

    /// Numeric value
    pub fn value(&self) -> u8 {
        self.0
    }

    /// ASCII character for this digit
    pub fn as_char(&self) -> char {
        char::from(b'0' + self.0)
    }
}

impl TryFrom<char> for Digit {
    type Error = AuthError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        c.to_digit(10)
            .map(|d| Self(d as u8))
            .ok_or(AuthError::InvalidDigit(c))
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which keypad buffer an event targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinField {
    /// Unlock PIN
    Pin,
    /// PIN being set during setup
    NewPin,
    /// Confirmation of the PIN being set
    PinVerify,
}

/// Keypad buffers
#[derive(Default, Zeroize, ZeroizeOnDrop)]
pub struct AuthState {
    /// Unlock PIN
    pub pin: String,
    /// PIN being set
    pub new_pin: String,
    /// Confirmation buffer
    pub pin_verify: String,
}

impl AuthState {
    /// Borrow a buffer
    pub fn buffer(&self, field: PinField) -> &str {
        match field {
            PinField::Pin => &self.pin,
            PinField::NewPin => &self.new_pin,
            PinField::PinVerify => &self.pin_verify,
        }
    }

    fn buffer_mut(&mut self, field: PinField) -> &mut String {
        match field {
            PinField::Pin => &mut self.pin,
            PinField::NewPin => &mut self.new_pin,
            PinField::PinVerify => &mut self.pin_verify,
        }
    }

    /// Set a buffer from a string of digits
    ///
    /// Anything that is not a digit is rejected and the buffer is left as is.
    pub fn set(&mut self, field: PinField, digits: &str) -> Result<(), AuthError> {
        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_digit()) {
            return Err(AuthError::InvalidDigit(bad));
        }
        let buf = self.buffer_mut(field);
        buf.zeroize();
        buf.push_str(digits);
        Ok(())
    }

    /// Clear a buffer
    pub fn clear(&mut self, field: PinField) {
        self.buffer_mut(field).zeroize();
    }

    /// Append a digit unless the buffer already holds `max_len` digits
    ///
    /// Returns the new length, or `None` if the buffer was full.
    pub fn push(&mut self, field: PinField, digit: Digit, max_len: usize) -> Option<usize> {
        let buf = self.buffer_mut(field);
        if buf.len() >= max_len {
            return None;
        }
        buf.push(digit.as_char());
        Some(buf.len())
    }

    /// Remove the last digit
    ///
    /// Returns the new length, or `None` if the buffer was already empty.
    pub fn pop(&mut self, field: PinField) -> Option<usize> {
        let buf = self.buffer_mut(field);
        buf.pop().map(|_| buf.len())
    }
}

impl fmt::Debug for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthState")
            .field("pin_len", &self.pin.len())
            .field("new_pin_len", &self.new_pin.len())
            .field("pin_verify_len", &self.pin_verify.len())
            .finish()
    }
}

/// Wallet password fields
#[derive(Default, Zeroize, ZeroizeOnDrop)]
pub struct WalletState {
    /// Password handed to the wallet when it is first created
    pub new_password: String,
    /// Confirmation of `new_password`
    pub password_verify: String,
    /// Password used to unlock an existing wallet
    pub password: String,
}

impl fmt::Debug for WalletState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletState")
            .field("new_password", &redacted(&self.new_password))
            .field("password_verify", &redacted(&self.password_verify))
            .field("password", &redacted(&self.password))
            .finish()
    }
}

fn redacted(value: &str) -> &'static str {
    if value.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}

/// Application store
#[derive(Debug, Default)]
pub struct Store {
    /// Keypad buffers
    pub auth: AuthState,
    /// Wallet password fields
    pub wallet: WalletState,
}

impl Store {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(c: char) -> Digit {
        Digit::try_from(c).unwrap()
    }

    #[test]
    fn test_digit_conversion() {
        assert_eq!(d('7').value(), 7);
        assert_eq!(d('0').as_char(), '0');
        assert!(Digit::new(10).is_none());
        assert!(matches!(
            Digit::try_from('a'),
            Err(AuthError::InvalidDigit('a'))
        ));
    }

    #[test]
    fn test_push_stops_at_max_len() {
        let mut auth = AuthState::default();
        assert_eq!(auth.push(PinField::Pin, d('1'), 2), Some(1));
        assert_eq!(auth.push(PinField::Pin, d('2'), 2), Some(2));
        assert_eq!(auth.push(PinField::Pin, d('3'), 2), None);
        assert_eq!(auth.pin, "12");
    }

    #[test]
    fn test_pop_empty_buffer() {
        let mut auth = AuthState::default();
        assert_eq!(auth.pop(PinField::NewPin), None);
        auth.set(PinField::NewPin, "12").unwrap();
        assert_eq!(auth.pop(PinField::NewPin), Some(1));
        assert_eq!(auth.new_pin, "1");
    }

    #[test]
    fn test_set_rejects_non_digits() {
        let mut auth = AuthState::default();
        auth.set(PinField::PinVerify, "123").unwrap();
        assert!(auth.set(PinField::PinVerify, "12x").is_err());
        assert_eq!(auth.pin_verify, "123");
    }

    #[test]
    fn test_debug_output_hides_secrets() {
        let mut store = Store::new();
        store.auth.set(PinField::Pin, "123456").unwrap();
        store.wallet.password = "hunter2".to_string();

        let out = format!("{:?}", store);
        assert!(!out.contains("123456"));
        assert!(!out.contains("hunter2"));
        assert!(out.contains("<redacted>"));
    }

    #[test]
    fn test_credential_key_names() {
        assert_eq!(CredentialKey::DevicePin.as_str(), "DevicePin");
        assert_eq!(CredentialKey::WalletPassword.to_string(), "WalletPassword");
    }
}
