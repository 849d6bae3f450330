//! PIN and biometric unlock controller
//!
//! Each method handles one user action from start to finish: mutate the
//! store, call the capability it needs, then navigate or alert. Validation
//! failures become an alert and leave storage untouched. Capability failures
//! are logged and returned to the caller; nothing is retried.

use std::fmt::Display;

use subtle::ConstantTimeEq;
use tracing::{debug, error, info, warn};
use zeroize::{Zeroize, Zeroizing};

use crate::config::AuthConfig;
use crate::error::Result;
use crate::password;
use crate::ports::{AlertPresenter, BiometricChallenger, Navigator, SecureStore, WalletCredentialChecker};
use crate::state::{CredentialKey, Digit, PinField, Store};

/// Result of a PIN comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinCheck {
    /// PINs matched and the follow-up step ran
    Accepted,
    /// PINs did not match; the user has been alerted
    Rejected,
}

/// Result of a fingerprint unlock attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FingerprintOutcome {
    /// No biometric hardware, nothing happened
    Unavailable,
    /// The challenge did not succeed, nothing happened
    Failed,
    /// The challenge succeeded and the wallet unlock ran
    Unlocked,
}

/// Unlock controller
///
/// Owns the application [`Store`] and is generic over the platform
/// capabilities so tests can swap in the [`crate::memory`] implementations.
pub struct AuthController<N, S, B, A, W> {
    store: Store,
    config: AuthConfig,
    navigator: N,
    secure_store: S,
    biometrics: B,
    alerts: A,
    wallet: W,
}

impl<N, S, B, A, W> AuthController<N, S, B, A, W>
where
    N: Navigator,
    S: SecureStore,
    B: BiometricChallenger,
    A: AlertPresenter,
    W: WalletCredentialChecker,
{
    /// Create a controller over `store`
    ///
    /// Fails if `config` does not pass [`AuthConfig::validate`].
    pub fn new(
        store: Store,
        config: AuthConfig,
        navigator: N,
        secure_store: S,
        biometrics: B,
        alerts: A,
        wallet: W,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            navigator,
            secure_store,
            biometrics,
            alerts,
            wallet,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Number of digits in a complete PIN
    pub fn pin_length(&self) -> usize {
        self.config.pin_length
    }

    // -------------------------------------------------------------------------
    // Keypad buffers
    // -------------------------------------------------------------------------

    /// Start PIN setup: clear both setup buffers and show the first entry screen
    pub fn init_set_pin(&mut self) {
        self.store.auth.clear(PinField::NewPin);
        self.store.auth.clear(PinField::PinVerify);
        debug!("Starting PIN setup");
        self.navigator.go_set_pin();
    }

    /// Start unlock: clear the PIN buffer and show the PIN screen
    pub fn init_pin(&mut self) {
        self.store.auth.clear(PinField::Pin);
        debug!("Starting PIN unlock");
        self.navigator.go_pin();
    }

    /// Append a digit to `field`
    ///
    /// A full buffer ignores the digit. Completing `NewPin` moves on to the
    /// confirmation screen.
    pub fn push_pin_digit(&mut self, digit: Digit, field: PinField) {
        let max = self.config.pin_length;
        match self.store.auth.push(field, digit, max) {
            None => debug!(?field, "Buffer full, digit ignored"),
            Some(len) => {
                debug!(?field, len, "Digit entered");
                if field == PinField::NewPin && len == max {
                    self.navigator.go_set_pin_confirm();
                }
            }
        }
    }

    /// Remove the last digit from `field`
    ///
    /// Backing out of an empty confirmation buffer returns to the first
    /// setup screen.
    pub fn pop_pin_digit(&mut self, field: PinField) {
        let remaining = self.store.auth.pop(field);
        debug!(?field, ?remaining, "Digit removed");
        if field == PinField::PinVerify && self.store.auth.pin_verify.is_empty() {
            self.navigator.go_set_pin();
        }
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Compare the setup PIN with its confirmation
    ///
    /// On a match the PIN is stored and a wallet password is generated. The
    /// password is only generated once the PIN write succeeded.
    pub async fn check_new_pin(&mut self) -> Result<PinCheck> {
        let auth = &self.store.auth;
        let len = self.config.pin_length;
        let complete = auth.new_pin.len() == len && auth.pin_verify.len() == len;

        if !complete || !pins_match(&auth.new_pin, &auth.pin_verify) {
            warn!(complete, "New PIN rejected");
            let alert = self.config.alerts.pin_mismatch.to_alert();
            self.alerts.alert(&alert);
            return Ok(PinCheck::Rejected);
        }

        self.secure_store
            .set_item(CredentialKey::DevicePin, &self.store.auth.new_pin)
            .await
            .map_err(logged("Failed to store device PIN"))?;
        info!("Device PIN stored");

        self.generate_wallet_password().await?;
        Ok(PinCheck::Accepted)
    }

    /// Compare the entered PIN with the stored one and unlock on a match
    ///
    /// A device without a stored PIN is treated as a mismatch.
    pub async fn check_pin(&mut self) -> Result<PinCheck> {
        let stored = self
            .secure_store
            .get_item(CredentialKey::DevicePin)
            .await
            .map_err(logged("Failed to read device PIN"))?
            .map(Zeroizing::new);

        let matched = match &stored {
            Some(stored) => pins_match(&self.store.auth.pin, stored),
            None => {
                warn!("No device PIN stored");
                false
            }
        };

        if !matched {
            warn!("Incorrect PIN entered");
            let alert = self.config.alerts.incorrect_pin.to_alert();
            self.alerts.alert(&alert);
            return Ok(PinCheck::Rejected);
        }

        self.unlock_wallet().await?;
        Ok(PinCheck::Accepted)
    }

    // -------------------------------------------------------------------------
    // Wallet password
    // -------------------------------------------------------------------------

    /// Generate a fresh 64 character hex wallet password
    pub fn random_password(&self) -> Zeroizing<String> {
        password::random_password()
    }

    /// Generate, store and hand a new wallet password to the wallet
    pub async fn generate_wallet_password(&mut self) -> Result<()> {
        let password = self.random_password();

        self.secure_store
            .set_item(CredentialKey::WalletPassword, &password)
            .await
            .map_err(logged("Failed to store wallet password"))?;

        let wallet = &mut self.store.wallet;
        wallet.new_password.zeroize();
        wallet.new_password.push_str(&password);
        wallet.password_verify.zeroize();
        wallet.password_verify.push_str(&password);
        info!("Wallet password generated");

        self.wallet
            .check_new_password(&self.store.wallet)
            .await
            .map_err(logged("Wallet rejected new password"))?;
        Ok(())
    }

    /// Load the stored wallet password and hand it to the wallet
    ///
    /// No local validation happens here; the wallet decides.
    pub async fn unlock_wallet(&mut self) -> Result<()> {
        let password = self
            .secure_store
            .get_item(CredentialKey::WalletPassword)
            .await
            .map_err(logged("Failed to read wallet password"))?;

        if password.is_none() {
            warn!("No wallet password stored");
        }

        let wallet = &mut self.store.wallet;
        wallet.password.zeroize();
        wallet.password = password.unwrap_or_default();

        self.wallet
            .check_password(&self.store.wallet)
            .await
            .map_err(logged("Wallet rejected password"))?;
        info!("Wallet unlocked");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Biometrics
    // -------------------------------------------------------------------------

    /// Unlock with a fingerprint if the device supports it
    pub async fn try_fingerprint(&mut self) -> Result<FingerprintOutcome> {
        let available = self
            .biometrics
            .has_hardware()
            .await
            .map_err(logged("Biometric hardware query failed"))?;
        if !available {
            debug!("No biometric hardware");
            return Ok(FingerprintOutcome::Unavailable);
        }

        let result = self
            .biometrics
            .authenticate(&self.config.fingerprint_prompt)
            .await
            .map_err(logged("Biometric challenge failed"))?;
        if !result.success {
            debug!("Fingerprint not recognised");
            return Ok(FingerprintOutcome::Failed);
        }

        self.unlock_wallet().await?;
        Ok(FingerprintOutcome::Unlocked)
    }
}

/// Compare two PINs in constant time
fn pins_match(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

fn logged<E: Display>(context: &'static str) -> impl Fn(E) -> E {
    move |e| {
        error!("{}: {}", context, e);
        e
    }
}
