//! Per-step sensor lifecycle tracking.
//!
//! Runs at begin-of-step on the simulation thread. The engine's sensor
//! subsystem supports incremental addition but not dynamic removal, so
//! the policy is asymmetric: (re)initialize only when the aggregate
//! count across all models grows, tolerate shrinkage by just recording
//! the new count, and poll once per step while any sensors are live.
//!
//! Bring-up failures are logged and absorbed — the simulation loop
//! never stops for a sensor fault. On failure the recorded count is
//! left unchanged, so the next step retries while the live count still
//! exceeds it.

use log::error;
use tether_core::{SensorSubsystem, World};

/// Tracks the aggregate sensor count across simulation steps and
/// drives the sensor subsystem's bring-up and polling.
pub struct SensorTracker {
    recorded: usize,
}

impl SensorTracker {
    /// New tracker with a zero baseline; the first step with sensors
    /// present performs the initial bring-up through the normal
    /// increase path.
    pub fn new() -> Self {
        Self { recorded: 0 }
    }

    /// The sensor count recorded after the most recent step.
    pub fn recorded_count(&self) -> usize {
        self.recorded
    }

    /// Begin-of-step hook.
    ///
    /// Recomputes the aggregate sensor count, brings the subsystem up
    /// if the count grew (load → init → one blocking poll → background
    /// workers), then runs the per-step synchronous poll if any sensors
    /// are recorded.
    pub fn observe_step(&mut self, world: &dyn World, sensors: &dyn SensorSubsystem) {
        let current: usize = world.model_sensor_counts().iter().sum();

        if current > self.recorded {
            if let Err(e) = self.bring_up(sensors) {
                error!("{e}");
            } else {
                self.recorded = current;
            }
        } else {
            // Same count: nothing to do. Lower: a model was removed;
            // the subsystem has no teardown path, so just stop
            // counting its sensors.
            self.recorded = current;
        }

        if self.recorded > 0 {
            sensors.poll_once(false);
        }
    }

    fn bring_up(&self, sensors: &dyn SensorSubsystem) -> Result<(), tether_core::SensorError> {
        sensors.load()?;
        sensors.init()?;
        sensors.poll_once(true);
        sensors.start_workers();
        Ok(())
    }
}

impl Default for SensorTracker {
    fn default() -> Self {
        Self::new()
    }
}
