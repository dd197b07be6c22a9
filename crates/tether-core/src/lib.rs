//! Core traits and error types for the Tether simulation bridge.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the narrow query/command interfaces through which the bridge drives
//! an embedded simulation engine — process setup, world loading, pause
//! broadcasting, and sensor subsystem management — plus the error
//! types those interfaces report.
//!
//! The simulation itself (physics, world-file parsing, sensor
//! internals) lives behind these traits and is never owned by this
//! workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod traits;

pub use error::{PluginError, SensorError, SetupError, WorldLoadError};
pub use traits::{Gravity, SensorSubsystem, SimulationEngine, World};
