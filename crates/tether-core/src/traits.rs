//! Narrow interfaces onto the external simulation engine.
//!
//! The bridge drives the engine exclusively through these traits; it
//! never reaches into simulation internals. All methods take `&self`:
//! implementations are responsible for their own internal thread
//! safety, because the control thread and the simulation thread both
//! issue calls (pause broadcasts, gravity reads, model queries) against
//! the same handles.

use std::path::Path;
use std::sync::Arc;

use crate::error::{PluginError, SensorError, SetupError, WorldLoadError};

/// Gravity vector reported by a loaded world, in m/s².
///
/// Snapshotted once at configuration time and immutable thereafter.
pub type Gravity = [f64; 3];

/// The embedded simulation engine's process-level surface.
pub trait SimulationEngine: Send + Sync {
    /// Process-wide engine setup with the given startup arguments.
    ///
    /// Idempotent: implementations guard with an internal
    /// already-initialized flag, so a repeated call is a no-op. A
    /// failing repeat is tolerated by callers (logged, not fatal) on
    /// the assumption that a prior setup in this process succeeded.
    fn setup(&self, args: &[String]) -> Result<(), SetupError>;

    /// Load a plugin file into the engine.
    fn add_plugin(&self, path: &Path) -> Result<(), PluginError>;

    /// Load the named world description and return a handle to it.
    fn load_world(&self, path: &Path) -> Result<Arc<dyn World>, WorldLoadError>;

    /// Broadcast a pause-state change into the engine's internal pause
    /// event. Non-blocking; while paused the engine stops advancing
    /// worlds, so step callbacks cease being reached.
    fn set_paused(&self, paused: bool);

    /// Current pause state as last broadcast.
    fn is_paused(&self) -> bool;

    /// Request global engine shutdown. Must only be issued once no
    /// thread can still be blocked inside an engine wait.
    fn request_shutdown(&self);

    /// The engine's sensor subsystem.
    fn sensors(&self) -> &dyn SensorSubsystem;
}

/// Handle to a loaded simulation world.
///
/// Valid from successful load until [`finalize`](World::finalize).
pub trait World: Send + Sync {
    /// The world's gravity vector.
    fn gravity(&self) -> Gravity;

    /// Per-model sensor counts for all live models, in model order.
    ///
    /// Recomputed fresh on every call; the caller sums them. The set of
    /// models may change between steps as the world mutates.
    fn model_sensor_counts(&self) -> Vec<usize>;

    /// Advance the world by one step.
    ///
    /// Must be a no-op after [`finalize`](World::finalize).
    fn step(&self);

    /// Finalize the world, releasing engine-side resources.
    fn finalize(&self);

    /// Whether a model with the given instance name is present.
    fn has_model(&self, instance: &str) -> bool;

    /// Ask the engine to insert a model into the running world.
    ///
    /// Non-blocking request; completion is observed via
    /// [`has_model`](World::has_model). If the insert never completes,
    /// the engine is responsible for discarding the expired request and
    /// leaving the world unchanged.
    fn request_model_insert(&self, instance: &str, model: &str);

    /// Activate or deactivate dynamics simulation.
    ///
    /// Returns `false` if the engine rejected the change.
    fn set_dynamics_enabled(&self, activate: bool) -> bool;

    /// Reset the whole world: time, poses, and internal state.
    fn reset(&self);

    /// Reset all model poses without touching simulation time.
    fn reset_model_poses(&self);
}

/// The engine's sensor polling facility.
///
/// The bridge only triggers bring-up and polling; sensor internals,
/// including any background worker threads, are owned by the engine.
/// The subsystem supports incremental addition of sensors but not
/// dynamic removal.
pub trait SensorSubsystem: Send + Sync {
    /// Load the sensor subsystem.
    fn load(&self) -> Result<(), SensorError>;

    /// Initialize the sensor subsystem after a successful load.
    fn init(&self) -> Result<(), SensorError>;

    /// Run one synchronous poll pass over all sensors.
    ///
    /// With `blocking = true` the pass waits for every sensor to update
    /// (used once right after initialization).
    fn poll_once(&self, blocking: bool);

    /// Start the subsystem's background polling threads. Idempotent:
    /// repeated calls after sensors were added must not spawn duplicate
    /// workers.
    fn start_workers(&self);
}
