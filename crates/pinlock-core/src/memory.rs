//! In-memory implementations of the controller capabilities
//!
//! Used by the test suite and by the terminal front-end. Nothing here is a
//! secure store: values live in a plain map for the lifetime of the process.
//!
//! Every type is a cheap clone over shared state, so a caller can hand one
//! clone to the controller and keep another to inspect what happened.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::error::{BiometricError, StoreError, WalletError};
use crate::ports::{
    Alert, AlertPresenter, BiometricChallenger, BiometricResult, Navigator, SecureStore,
    WalletCredentialChecker,
};
use crate::state::{CredentialKey, WalletState};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Secure store
// =============================================================================

#[derive(Default)]
struct SecureStoreInner {
    items: HashMap<CredentialKey, String>,
    reads: Vec<CredentialKey>,
    writes: Vec<(CredentialKey, String)>,
    failure: Option<StoreError>,
    key_failures: HashMap<CredentialKey, StoreError>,
}

impl SecureStoreInner {
    fn check(&self, key: CredentialKey) -> Result<(), StoreError> {
        match self.failure.as_ref().or_else(|| self.key_failures.get(&key)) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

/// Map-backed secure store that records every access
#[derive(Clone, Default)]
pub struct MemorySecureStore {
    inner: Arc<Mutex<SecureStoreInner>>,
}

impl MemorySecureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value without recording a write
    pub fn with_item(self, key: CredentialKey, value: impl Into<String>) -> Self {
        lock(&self.inner).items.insert(key, value.into());
        self
    }

    /// Current value of a key
    pub fn get(&self, key: CredentialKey) -> Option<String> {
        lock(&self.inner).items.get(&key).cloned()
    }

    /// Keys read so far, in order
    pub fn reads(&self) -> Vec<CredentialKey> {
        lock(&self.inner).reads.clone()
    }

    /// Writes so far, in order
    pub fn writes(&self) -> Vec<(CredentialKey, String)> {
        lock(&self.inner).writes.clone()
    }

    /// Make every following access fail with `error` (`None` to heal)
    pub fn set_failure(&self, error: Option<StoreError>) {
        lock(&self.inner).failure = error;
    }

    /// Make every following access to `key` fail with a backend error
    pub fn fail_key(&self, key: CredentialKey, reason: impl Into<String>) {
        lock(&self.inner)
            .key_failures
            .insert(key, StoreError::Backend(reason.into()));
    }

    /// Undo [`MemorySecureStore::fail_key`]
    pub fn heal_key(&self, key: CredentialKey) {
        lock(&self.inner).key_failures.remove(&key);
    }
}

#[async_trait]
impl SecureStore for MemorySecureStore {
    async fn get_item(&self, key: CredentialKey) -> Result<Option<String>, StoreError> {
        let mut inner = lock(&self.inner);
        inner.reads.push(key);
        inner.check(key)?;
        Ok(inner.items.get(&key).cloned())
    }

    async fn set_item(&self, key: CredentialKey, value: &str) -> Result<(), StoreError> {
        let mut inner = lock(&self.inner);
        inner.check(key)?;
        inner.writes.push((key, value.to_string()));
        inner.items.insert(key, value.to_string());
        Ok(())
    }
}

// =============================================================================
// Navigator
// =============================================================================

/// Screens the controller can navigate to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    SetPin,
    SetPinConfirm,
    Pin,
}

/// Navigator that records the routes it was asked to show
#[derive(Clone, Default)]
pub struct RecordingNavigator {
    routes: Arc<Mutex<Vec<Route>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// All routes, oldest first
    pub fn routes(&self) -> Vec<Route> {
        lock(&self.routes).clone()
    }

    /// Most recent route
    pub fn current(&self) -> Option<Route> {
        lock(&self.routes).last().copied()
    }

    /// How many times `route` was shown
    pub fn count(&self, route: Route) -> usize {
        lock(&self.routes).iter().filter(|r| **r == route).count()
    }

    fn push(&self, route: Route) {
        lock(&self.routes).push(route);
    }
}

impl Navigator for RecordingNavigator {
    fn go_set_pin(&mut self) {
        self.push(Route::SetPin);
    }

    fn go_pin(&mut self) {
        self.push(Route::Pin);
    }

    fn go_set_pin_confirm(&mut self) {
        self.push(Route::SetPinConfirm);
    }
}

// =============================================================================
// Alerts
// =============================================================================

/// Alert presenter that collects alerts
#[derive(Clone, Default)]
pub struct RecordingAlerts {
    alerts: Arc<Mutex<Vec<Alert>>>,
}

impl RecordingAlerts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        lock(&self.alerts).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.alerts).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.alerts).is_empty()
    }
}

impl AlertPresenter for RecordingAlerts {
    fn alert(&mut self, alert: &Alert) {
        lock(&self.alerts).push(alert.clone());
    }
}

// =============================================================================
// Biometrics
// =============================================================================

struct BiometricsInner {
    hardware: Result<bool, BiometricError>,
    results: VecDeque<Result<BiometricResult, BiometricError>>,
    fallback: BiometricResult,
    hardware_checks: usize,
    prompts: Vec<String>,
}

/// Biometric API with scripted answers
///
/// Challenge results are taken from a queue; once it is empty every
/// challenge returns the fallback result.
#[derive(Clone)]
pub struct ScriptedBiometrics {
    inner: Arc<Mutex<BiometricsInner>>,
}

impl ScriptedBiometrics {
    fn with(hardware: Result<bool, BiometricError>, success: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BiometricsInner {
                hardware,
                results: VecDeque::new(),
                fallback: BiometricResult { success },
                hardware_checks: 0,
                prompts: Vec::new(),
            })),
        }
    }

    /// Device without a fingerprint sensor
    pub fn unavailable() -> Self {
        Self::with(Ok(false), false)
    }

    /// Sensor present, every challenge succeeds
    pub fn accepting() -> Self {
        Self::with(Ok(true), true)
    }

    /// Sensor present, every challenge fails
    pub fn rejecting() -> Self {
        Self::with(Ok(true), false)
    }

    /// The hardware query itself fails
    pub fn broken(error: BiometricError) -> Self {
        Self::with(Err(error), false)
    }

    /// Queue the result of the next challenge
    pub fn push_result(&self, result: Result<BiometricResult, BiometricError>) {
        lock(&self.inner).results.push_back(result);
    }

    pub fn hardware_checks(&self) -> usize {
        lock(&self.inner).hardware_checks
    }

    /// Number of challenges run
    pub fn challenges(&self) -> usize {
        lock(&self.inner).prompts.len()
    }

    /// Prompt texts of every challenge run
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.inner).prompts.clone()
    }
}

#[async_trait]
impl BiometricChallenger for ScriptedBiometrics {
    async fn has_hardware(&self) -> Result<bool, BiometricError> {
        let mut inner = lock(&self.inner);
        inner.hardware_checks += 1;
        inner.hardware.clone()
    }

    async fn authenticate(&self, prompt: &str) -> Result<BiometricResult, BiometricError> {
        let mut inner = lock(&self.inner);
        inner.prompts.push(prompt.to_string());
        let fallback = inner.fallback;
        inner.results.pop_front().unwrap_or(Ok(fallback))
    }
}

// =============================================================================
// Wallet
// =============================================================================

#[derive(Default)]
struct WalletInner {
    new_passwords: Vec<String>,
    passwords: Vec<String>,
    failure: Option<WalletError>,
    unlocked: bool,
}

/// Wallet checker that records the passwords it was handed
#[derive(Clone, Default)]
pub struct RecordingWallet {
    inner: Arc<Mutex<WalletInner>>,
}

impl RecordingWallet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Passwords passed to `check_new_password`
    pub fn new_password_checks(&self) -> Vec<String> {
        lock(&self.inner).new_passwords.clone()
    }

    /// Passwords passed to `check_password`
    pub fn password_checks(&self) -> Vec<String> {
        lock(&self.inner).passwords.clone()
    }

    /// Whether the last check succeeded
    pub fn is_unlocked(&self) -> bool {
        lock(&self.inner).unlocked
    }

    /// Reject every following check with `error` (`None` to accept again)
    pub fn set_failure(&self, error: Option<WalletError>) {
        lock(&self.inner).failure = error;
    }

    fn finish(inner: &mut WalletInner) -> Result<(), WalletError> {
        match &inner.failure {
            Some(err) => {
                inner.unlocked = false;
                Err(err.clone())
            }
            None => {
                inner.unlocked = true;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl WalletCredentialChecker for RecordingWallet {
    async fn check_new_password(&self, wallet: &WalletState) -> Result<(), WalletError> {
        let mut inner = lock(&self.inner);
        inner.new_passwords.push(wallet.new_password.clone());
        Self::finish(&mut inner)
    }

    async fn check_password(&self, wallet: &WalletState) -> Result<(), WalletError> {
        let mut inner = lock(&self.inner);
        inner.passwords.push(wallet.password.clone());
        Self::finish(&mut inner)
    }
}
