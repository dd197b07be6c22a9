//! Bridge configuration.
//!
//! [`BridgeConfig`] collects the settings that must be in place before
//! the configure hook runs. The lockstep flag is immutable after
//! configuration; the world path can still be replaced up front via
//! [`SimBridge::set_world_path`](crate::bridge::SimBridge::set_world_path),
//! which validates that the file exists.

use std::path::PathBuf;

/// Configuration inputs for [`SimBridge`](crate::bridge::SimBridge).
#[derive(Clone, Debug)]
pub struct BridgeConfig {
    /// Path to the world description file.
    pub world_path: PathBuf,
    /// Extra startup arguments forwarded to the engine's process setup.
    pub engine_args: Vec<String>,
    /// Couple one control tick to at most one simulation step.
    ///
    /// When enabled, the simulation thread blocks at end-of-step until
    /// the control task's update tick releases the gate; the control
    /// task's period then paces the simulation. When disabled the
    /// simulation free-runs at the engine's own pace.
    pub lockstep: bool,
    /// Plugin files loaded into the engine during configuration.
    pub plugins: Vec<PathBuf>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            world_path: PathBuf::from("worlds/empty.world"),
            engine_args: Vec::new(),
            lockstep: false,
            plugins: Vec::new(),
        }
    }
}
