//! Error types reported by the engine-facing trait interfaces.
//!
//! Organized by subsystem: process setup, plugin loading, world
//! loading, and the sensor subsystem. The bridge decides per the
//! lifecycle contract which of these are fatal (world load), absorbed
//! (setup, per-step sensor failures), or merely logged (plugins).

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Engine process setup failed.
///
/// Setup is process-wide and idempotent; the bridge logs this and
/// proceeds on the assumption that a prior setup already succeeded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetupError {
    /// Human-readable description of the failure.
    pub reason: String,
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "engine setup failed: {}", self.reason)
    }
}

impl Error for SetupError {}

/// A plugin file could not be loaded into the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PluginError {
    /// Path of the plugin that failed to load.
    pub path: PathBuf,
    /// Human-readable description of the failure.
    pub reason: String,
}

impl fmt::Display for PluginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not load plugin {}: {}",
            self.path.display(),
            self.reason
        )
    }
}

impl Error for PluginError {}

/// The world description failed to load.
///
/// Fatal to configuration: the bridge stays unconfigured.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldLoadError {
    /// Path of the world description that failed to load.
    pub path: PathBuf,
    /// Human-readable description of the failure.
    pub reason: String,
}

impl fmt::Display for WorldLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not load world {}: {}",
            self.path.display(),
            self.reason
        )
    }
}

impl Error for WorldLoadError {}

/// Errors from the sensor subsystem's bring-up operations.
///
/// Per-step failures are logged and absorbed by the sensor tracker;
/// the simulation loop never stops for a sensor fault.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SensorError {
    /// The sensor subsystem could not be loaded.
    Load {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The sensor subsystem could not be initialized.
    Init {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load { reason } => write!(f, "unable to load sensors: {reason}"),
            Self::Init { reason } => write!(f, "unable to initialize sensors: {reason}"),
        }
    }
}

impl Error for SensorError {}
