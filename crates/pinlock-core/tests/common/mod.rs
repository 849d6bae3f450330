//! Shared fixtures for the integration tests

#![allow(dead_code)]

use pinlock_core::memory::{
    MemorySecureStore, RecordingAlerts, RecordingNavigator, RecordingWallet, ScriptedBiometrics,
};
use pinlock_core::{AuthConfig, AuthController, Digit, PinField, Store};

pub type MemoryController = AuthController<
    RecordingNavigator,
    MemorySecureStore,
    ScriptedBiometrics,
    RecordingAlerts,
    RecordingWallet,
>;

/// Controller plus handles onto every capability it owns
pub struct Fixture {
    pub ctl: MemoryController,
    pub nav: RecordingNavigator,
    pub secure: MemorySecureStore,
    pub bio: ScriptedBiometrics,
    pub alerts: RecordingAlerts,
    pub wallet: RecordingWallet,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with(MemorySecureStore::new(), ScriptedBiometrics::unavailable())
    }

    pub fn with(secure: MemorySecureStore, bio: ScriptedBiometrics) -> Self {
        Self::with_config(secure, bio, AuthConfig::default())
    }

    pub fn with_config(
        secure: MemorySecureStore,
        bio: ScriptedBiometrics,
        config: AuthConfig,
    ) -> Self {
        let nav = RecordingNavigator::new();
        let alerts = RecordingAlerts::new();
        let wallet = RecordingWallet::new();
        let ctl = AuthController::new(
            Store::new(),
            config,
            nav.clone(),
            secure.clone(),
            bio.clone(),
            alerts.clone(),
            wallet.clone(),
        )
        .expect("fixture config is valid");
        Self {
            ctl,
            nav,
            secure,
            bio,
            alerts,
            wallet,
        }
    }

    /// Type `digits` into `field` one key at a time
    pub fn type_digits(&mut self, digits: &str, field: PinField) {
        for c in digits.chars() {
            let digit = Digit::try_from(c).expect("test input is digits");
            self.ctl.push_pin_digit(digit, field);
        }
    }
}
