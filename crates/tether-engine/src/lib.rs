//! Lifecycle bridge between a periodic control task and an embedded
//! simulation loop.
//!
//! The simulation engine free-runs on its own dedicated thread; the
//! control task ticks at a fixed or variable period on a thread owned
//! by an external scheduler. This crate provides the synchronization
//! protocol between them: the [`SimBridge`] lifecycle state machine,
//! the [`SimulationDriver`] step loop, the single-slot lockstep gate,
//! and the per-step sensor lifecycle tracker.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bridge;
pub mod config;
pub mod driver;
pub mod gate;
pub mod peers;
pub mod sensors;

pub use bridge::{CleanupError, ConfigureError, LifecycleError, RunState, SimBridge};
pub use config::BridgeConfig;
pub use driver::{SimulationDriver, TeardownError, TeardownReport};
pub use gate::{StepSignal, StepWait};
pub use peers::{PeerRegistry, StepPeer};
pub use sensors::SensorTracker;
