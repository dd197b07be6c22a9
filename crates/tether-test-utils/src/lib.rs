//! Test doubles for the Tether bridge.
//!
//! Provides fake implementations of the engine-facing traits
//! ([`SimulationEngine`], [`World`], [`SensorSubsystem`]) that record
//! every interaction into one shared, ordered [`Event`] log. Configure
//! failure toggles and insert latency before handing the engine to the
//! code under test, then assert on counters and event order.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tether_core::{
    Gravity, PluginError, SensorError, SensorSubsystem, SetupError, SimulationEngine, World,
    WorldLoadError,
};

/// One recorded interaction with the fake engine, world, or sensors.
///
/// All three fakes share a single log, so cross-component ordering
/// (e.g. finalize-before-shutdown) is directly assertable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Setup,
    PluginAdded(PathBuf),
    WorldLoaded,
    Paused(bool),
    ShutdownRequested,
    Step,
    Finalize,
    ModelInsertRequested(String),
    DynamicsToggled(bool),
    WorldReset,
    PosesReset,
    SensorLoad,
    SensorInit,
    SensorPollBlocking,
    SensorPoll,
    SensorWorkersStarted,
}

type EventLog = Arc<Mutex<Vec<Event>>>;

// ── FakeSensors ──────────────────────────────────────────────────

/// Sensor subsystem double with failure toggles and call counters.
pub struct FakeSensors {
    log: EventLog,
    pub fail_load: AtomicBool,
    pub fail_init: AtomicBool,
    pub loads: AtomicUsize,
    pub inits: AtomicUsize,
    pub polls: AtomicUsize,
    pub blocking_polls: AtomicUsize,
    pub worker_starts: AtomicUsize,
}

impl FakeSensors {
    fn new(log: EventLog) -> Self {
        Self {
            log,
            fail_load: AtomicBool::new(false),
            fail_init: AtomicBool::new(false),
            loads: AtomicUsize::new(0),
            inits: AtomicUsize::new(0),
            polls: AtomicUsize::new(0),
            blocking_polls: AtomicUsize::new(0),
            worker_starts: AtomicUsize::new(0),
        }
    }

    fn record(&self, event: Event) {
        self.log.lock().unwrap().push(event);
    }
}

impl SensorSubsystem for FakeSensors {
    fn load(&self) -> Result<(), SensorError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.record(Event::SensorLoad);
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(SensorError::Load {
                reason: "fake load failure".into(),
            });
        }
        Ok(())
    }

    fn init(&self) -> Result<(), SensorError> {
        self.inits.fetch_add(1, Ordering::SeqCst);
        self.record(Event::SensorInit);
        if self.fail_init.load(Ordering::SeqCst) {
            return Err(SensorError::Init {
                reason: "fake init failure".into(),
            });
        }
        Ok(())
    }

    fn poll_once(&self, blocking: bool) {
        if blocking {
            self.blocking_polls.fetch_add(1, Ordering::SeqCst);
            self.record(Event::SensorPollBlocking);
        } else {
            self.polls.fetch_add(1, Ordering::SeqCst);
            self.record(Event::SensorPoll);
        }
    }

    fn start_workers(&self) {
        self.worker_starts.fetch_add(1, Ordering::SeqCst);
        self.record(Event::SensorWorkersStarted);
    }
}

// ── FakeWorld ────────────────────────────────────────────────────

/// World handle double.
///
/// Model inserts requested via [`World::request_model_insert`] become
/// visible after the configured latency (checked on each `has_model`
/// poll); a latency of `None` means inserts never complete, which
/// exercises the spawn timeout path.
pub struct FakeWorld {
    log: EventLog,
    gravity: Gravity,
    pub steps: AtomicUsize,
    pub finalized: AtomicBool,
    sensor_counts: Mutex<Vec<usize>>,
    models: Mutex<Vec<String>>,
    pending: Mutex<Vec<(String, Instant)>>,
    insert_latency: Mutex<Option<Duration>>,
    pub dynamics_enabled: AtomicBool,
    pub fail_dynamics: AtomicBool,
    pub resets: AtomicUsize,
    pub pose_resets: AtomicUsize,
}

impl FakeWorld {
    fn new(log: EventLog, gravity: Gravity) -> Self {
        Self {
            log,
            gravity,
            steps: AtomicUsize::new(0),
            finalized: AtomicBool::new(false),
            sensor_counts: Mutex::new(Vec::new()),
            models: Mutex::new(Vec::new()),
            pending: Mutex::new(Vec::new()),
            insert_latency: Mutex::new(Some(Duration::ZERO)),
            dynamics_enabled: AtomicBool::new(true),
            fail_dynamics: AtomicBool::new(false),
            resets: AtomicUsize::new(0),
            pose_resets: AtomicUsize::new(0),
        }
    }

    /// Replace the per-model sensor counts returned to the tracker.
    pub fn set_sensor_counts(&self, counts: Vec<usize>) {
        *self.sensor_counts.lock().unwrap() = counts;
    }

    /// Configure how long a model insert takes to become visible.
    /// `None` means requested inserts never complete.
    pub fn set_insert_latency(&self, latency: Option<Duration>) {
        *self.insert_latency.lock().unwrap() = latency;
    }

    /// Number of steps executed so far.
    pub fn step_count(&self) -> usize {
        self.steps.load(Ordering::SeqCst)
    }

    /// Move due pending inserts into the live model list.
    fn promote_pending(&self) {
        let now = Instant::now();
        let mut pending = self.pending.lock().unwrap();
        let mut models = self.models.lock().unwrap();
        pending.retain(|(name, due)| {
            if *due <= now {
                models.push(name.clone());
                false
            } else {
                true
            }
        });
    }
}

impl World for FakeWorld {
    fn gravity(&self) -> Gravity {
        self.gravity
    }

    fn model_sensor_counts(&self) -> Vec<usize> {
        self.sensor_counts.lock().unwrap().clone()
    }

    fn step(&self) {
        if self.finalized.load(Ordering::SeqCst) {
            return;
        }
        self.steps.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(Event::Step);
    }

    fn finalize(&self) {
        self.finalized.store(true, Ordering::SeqCst);
        self.log.lock().unwrap().push(Event::Finalize);
    }

    fn has_model(&self, instance: &str) -> bool {
        self.promote_pending();
        self.models.lock().unwrap().iter().any(|m| m == instance)
    }

    fn request_model_insert(&self, instance: &str, _model: &str) {
        self.log
            .lock()
            .unwrap()
            .push(Event::ModelInsertRequested(instance.to_string()));
        if let Some(latency) = *self.insert_latency.lock().unwrap() {
            self.pending
                .lock()
                .unwrap()
                .push((instance.to_string(), Instant::now() + latency));
        }
    }

    fn set_dynamics_enabled(&self, activate: bool) -> bool {
        if self.fail_dynamics.load(Ordering::SeqCst) {
            return false;
        }
        self.dynamics_enabled.store(activate, Ordering::SeqCst);
        self.log
            .lock()
            .unwrap()
            .push(Event::DynamicsToggled(activate));
        true
    }

    fn reset(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(Event::WorldReset);
    }

    fn reset_model_poses(&self) {
        self.pose_resets.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(Event::PosesReset);
    }
}

// ── FakeEngine ───────────────────────────────────────────────────

/// Simulation engine double.
///
/// Owns the shared event log, a [`FakeWorld`] returned by `load_world`,
/// and [`FakeSensors`]. Pause state is a plain atomic observed by the
/// step loop exactly as a real engine's pause event would be.
pub struct FakeEngine {
    log: EventLog,
    pub world: Arc<FakeWorld>,
    pub sensors: FakeSensors,
    pub fail_setup: AtomicBool,
    pub fail_world_load: AtomicBool,
    pub fail_plugins: AtomicBool,
    pub setup_calls: AtomicUsize,
    paused: AtomicBool,
    pub shutdown_requested: AtomicBool,
}

impl FakeEngine {
    /// Engine with the default gravity of `[0.0, 0.0, -9.81]`.
    pub fn new() -> Self {
        Self::with_gravity([0.0, 0.0, -9.81])
    }

    /// Engine whose world reports the given gravity vector.
    pub fn with_gravity(gravity: Gravity) -> Self {
        let log: EventLog = Arc::new(Mutex::new(Vec::new()));
        Self {
            world: Arc::new(FakeWorld::new(Arc::clone(&log), gravity)),
            sensors: FakeSensors::new(Arc::clone(&log)),
            log,
            fail_setup: AtomicBool::new(false),
            fail_world_load: AtomicBool::new(false),
            fail_plugins: AtomicBool::new(false),
            setup_calls: AtomicUsize::new(0),
            paused: AtomicBool::new(false),
            shutdown_requested: AtomicBool::new(false),
        }
    }

    /// Snapshot of the ordered interaction log.
    pub fn events(&self) -> Vec<Event> {
        self.log.lock().unwrap().clone()
    }

    /// All pause-state transitions broadcast so far, in order.
    pub fn pause_transitions(&self) -> Vec<bool> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Paused(p) => Some(p),
                _ => None,
            })
            .collect()
    }
}

impl Default for FakeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationEngine for FakeEngine {
    fn setup(&self, _args: &[String]) -> Result<(), SetupError> {
        self.setup_calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(Event::Setup);
        if self.fail_setup.load(Ordering::SeqCst) {
            return Err(SetupError {
                reason: "fake setup failure".into(),
            });
        }
        Ok(())
    }

    fn add_plugin(&self, path: &Path) -> Result<(), PluginError> {
        if self.fail_plugins.load(Ordering::SeqCst) {
            return Err(PluginError {
                path: path.to_path_buf(),
                reason: "fake plugin failure".into(),
            });
        }
        self.log
            .lock()
            .unwrap()
            .push(Event::PluginAdded(path.to_path_buf()));
        Ok(())
    }

    fn load_world(&self, path: &Path) -> Result<Arc<dyn World>, WorldLoadError> {
        if self.fail_world_load.load(Ordering::SeqCst) {
            return Err(WorldLoadError {
                path: path.to_path_buf(),
                reason: "fake world load failure".into(),
            });
        }
        self.log.lock().unwrap().push(Event::WorldLoaded);
        Ok(Arc::clone(&self.world) as Arc<dyn World>)
    }

    fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::SeqCst);
        self.log.lock().unwrap().push(Event::Paused(paused));
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    fn request_shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::SeqCst);
        self.log.lock().unwrap().push(Event::ShutdownRequested);
    }

    fn sensors(&self) -> &dyn SensorSubsystem {
        &self.sensors
    }
}
