//! Tether: a lifecycle bridge between a periodic real-time control
//! task and an embedded, free-running simulation engine.
//!
//! The engine runs its step loop on a dedicated thread; the control
//! task ticks on a scheduler-owned thread. Tether provides the
//! synchronization protocol between the two: a configure/start/update/
//! stop/cleanup state machine, a single-slot lockstep gate coupling at
//! most one simulation step to each control tick, and per-step sensor
//! lifecycle tracking for worlds whose sensor population changes as
//! the world mutates.
//!
//! # Quick start
//!
//! ```ignore
//! use tether::prelude::*;
//!
//! // `engine` implements tether::types::SimulationEngine.
//! let mut bridge = SimBridge::new(engine, BridgeConfig {
//!     world_path: "worlds/arm.world".into(),
//!     lockstep: true,
//!     ..BridgeConfig::default()
//! });
//!
//! bridge.configure()?;
//! bridge.start()?;
//! // From the periodic control task:
//! bridge.update_hook(); // releases one simulation step
//! // ...
//! bridge.stop()?;
//! bridge.cleanup()?;
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tether-core` | Engine-facing traits and error types |
//! | [`engine`] | `tether-engine` | Bridge, driver, gate, sensors, peers |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Engine-facing traits and error types (`tether-core`).
///
/// The [`types::SimulationEngine`], [`types::World`], and
/// [`types::SensorSubsystem`] traits are the seams an embedding
/// implements to put a concrete simulation behind the bridge.
pub use tether_core as types;

/// The bridge itself (`tether-engine`).
///
/// [`engine::SimBridge`] is the lifecycle controller;
/// [`engine::BridgeConfig`] its configuration.
pub use tether_engine as engine;

/// Common imports for typical Tether usage.
///
/// ```rust
/// use tether::prelude::*;
/// ```
pub mod prelude {
    // Traits an engine embedding implements.
    pub use tether_core::{Gravity, SensorSubsystem, SimulationEngine, World};

    // Errors.
    pub use tether_core::{PluginError, SensorError, SetupError, WorldLoadError};
    pub use tether_engine::{CleanupError, ConfigureError, LifecycleError, TeardownError};

    // The bridge.
    pub use tether_engine::{
        BridgeConfig, RunState, SimBridge, StepPeer, TeardownReport,
    };
}
