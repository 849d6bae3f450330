//! pinlock - terminal keypad for the wallet unlock controller
//!
//! Drives the PIN setup, PIN unlock and fingerprint flows from stdin. Secure
//! storage, biometrics and the wallet are in-memory stand-ins, so nothing
//! survives the process.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use pinlock_core::memory::{MemorySecureStore, RecordingWallet, ScriptedBiometrics};
use pinlock_core::{AuthConfig, AuthController, Store};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod console;
mod session;

use console::{ConsoleAlerts, ConsoleNavigator};
use session::Session;

/// Simulated fingerprint sensor behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BiometricMode {
    /// No sensor present
    None,
    /// Sensor present, never recognises the finger
    Fail,
    /// Sensor present, always recognises the finger
    Pass,
}

impl BiometricMode {
    fn challenger(self) -> ScriptedBiometrics {
        match self {
            BiometricMode::None => ScriptedBiometrics::unavailable(),
            BiometricMode::Fail => ScriptedBiometrics::rejecting(),
            BiometricMode::Pass => ScriptedBiometrics::accepting(),
        }
    }
}

#[derive(Parser)]
#[command(name = "pinlock")]
#[command(about = "Keypad simulator for PIN and fingerprint wallet unlock", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to $PINLOCK_CONFIG or the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fingerprint sensor behaviour
    #[arg(short, long, value_enum, default_value_t = BiometricMode::None)]
    biometric: BiometricMode,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "pinlock_cli=debug,pinlock_core=debug"
    } else {
        "pinlock_cli=info,pinlock_core=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    info!("Starting pinlock v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => AuthConfig::load(path)?,
        None => AuthConfig::load_or_default(None),
    };

    let nav = ConsoleNavigator::default();
    let wallet = RecordingWallet::new();
    let ctl = AuthController::new(
        Store::new(),
        config,
        nav.clone(),
        MemorySecureStore::new(),
        cli.biometric.challenger(),
        ConsoleAlerts,
        wallet.clone(),
    )?;

    Session::new(ctl, nav, wallet).run().await
}
