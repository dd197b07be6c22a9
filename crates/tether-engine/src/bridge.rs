//! The lifecycle controller bridging framework hooks to the driver.
//!
//! [`SimBridge`] owns the run-state machine
//! `Unconfigured → Configured → Running ⇄ Stopped → CleanedUp` and
//! coordinates the driver, the lockstep gate, the sensor tracker
//! (via the driver's step loop), and the peer registry. The framework
//! calls the hooks ([`configure`](SimBridge::configure),
//! [`start`](SimBridge::start), [`update_hook`](SimBridge::update_hook),
//! [`stop`](SimBridge::stop), [`cleanup`](SimBridge::cleanup)) from the
//! control thread; the only state shared with the simulation thread is
//! the gate and the engine's own pause flag.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{error, info, warn};
use tether_core::{Gravity, SimulationEngine, World, WorldLoadError};

use crate::config::BridgeConfig;
use crate::driver::{SimulationDriver, TeardownError, TeardownReport};
use crate::gate::{step_gate, StepSignal};
use crate::peers::{PeerRegistry, StepPeer};

/// Poll interval while waiting for a spawned model to appear.
const SPAWN_POLL: Duration = Duration::from_millis(10);

// ── RunState ─────────────────────────────────────────────────────

/// Lifecycle state owned exclusively by the bridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// No world loaded yet.
    Unconfigured,
    /// World loaded, simulation thread not running.
    Configured,
    /// Simulation thread running (possibly gated).
    Running,
    /// Stopped by the framework; the thread still exists and may be
    /// paused, ready to resume on the next start.
    Stopped,
    /// Terminal: world finalized, simulation thread joined.
    CleanedUp,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unconfigured => "unconfigured",
            Self::Configured => "configured",
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::CleanedUp => "cleaned up",
        };
        write!(f, "{s}")
    }
}

// ── Errors ───────────────────────────────────────────────────────

/// Error from [`SimBridge::configure`].
#[derive(Debug)]
pub enum ConfigureError {
    /// configure() called outside the `Unconfigured` state.
    InvalidState {
        /// The state the bridge was in.
        state: RunState,
    },
    /// The world description failed to load; the bridge stays
    /// unconfigured.
    WorldLoad(WorldLoadError),
}

impl std::fmt::Display for ConfigureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidState { state } => {
                write!(f, "cannot configure while {state}")
            }
            Self::WorldLoad(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ConfigureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::WorldLoad(e) => Some(e),
            Self::InvalidState { .. } => None,
        }
    }
}

/// A hook was invoked in a state that does not permit it.
#[derive(Debug, PartialEq, Eq)]
pub struct LifecycleError {
    /// The hook that was invoked.
    pub operation: &'static str,
    /// The state the bridge was in.
    pub state: RunState,
}

impl std::fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cannot {} while {}", self.operation, self.state)
    }
}

impl std::error::Error for LifecycleError {}

/// Error from [`SimBridge::cleanup`].
#[derive(Debug)]
pub enum CleanupError {
    /// cleanup() called outside `Running`/`Stopped`.
    InvalidState {
        /// The state the bridge was in.
        state: RunState,
    },
    /// The simulation thread could not be joined.
    SimThread(TeardownError),
}

impl std::fmt::Display for CleanupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidState { state } => write!(f, "cannot clean up while {state}"),
            Self::SimThread(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CleanupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SimThread(e) => Some(e),
            Self::InvalidState { .. } => None,
        }
    }
}

// ── SimBridge ────────────────────────────────────────────────────

/// Lifecycle bridge between the periodic control task and the
/// embedded simulation engine.
///
/// Construct with an engine and a [`BridgeConfig`], then drive the
/// hooks from the framework's scheduler. All hooks run on the control
/// thread and return promptly; the simulation itself advances on the
/// driver's dedicated thread.
pub struct SimBridge {
    engine: Arc<dyn SimulationEngine>,
    config: BridgeConfig,
    state: RunState,
    world: Option<Arc<dyn World>>,
    gravity: Option<Gravity>,
    driver: Option<SimulationDriver>,
    /// Producer half of the lockstep gate; `Some` exactly while
    /// lockstep is configured and teardown has not opened the gate.
    gate_signal: Option<StepSignal>,
    peers: PeerRegistry,
}

impl SimBridge {
    /// New bridge in the `Unconfigured` state.
    pub fn new(engine: Arc<dyn SimulationEngine>, config: BridgeConfig) -> Self {
        Self {
            engine,
            config,
            state: RunState::Unconfigured,
            world: None,
            gravity: None,
            driver: None,
            gate_signal: None,
            peers: PeerRegistry::new(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Gravity vector snapshotted at configuration; `None` before a
    /// successful configure.
    pub fn gravity(&self) -> Option<Gravity> {
        self.gravity
    }

    /// Replace the world description path before configuration.
    ///
    /// The file must exist and be readable; otherwise the command is
    /// rejected and the previously set path is retained.
    pub fn set_world_path(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if path.is_file() {
            self.config.world_path = path;
        } else {
            error!("file {} does not exist", path.display());
        }
    }

    /// Load a plugin file into the engine.
    ///
    /// Before configuration the plugin is queued and loaded during
    /// [`configure`](SimBridge::configure); afterwards it is forwarded
    /// to the engine immediately. Returns `false` if the engine
    /// rejected the plugin.
    pub fn add_plugin(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if self.state == RunState::Unconfigured {
            self.config.plugins.push(path);
            return true;
        }
        match self.engine.add_plugin(&path) {
            Ok(()) => true,
            Err(e) => {
                error!("{e}");
                false
            }
        }
    }

    /// Configure hook: `Unconfigured → Configured`.
    ///
    /// Runs the (idempotent, failure-tolerant) engine process setup,
    /// loads queued plugins, loads the world, snapshots gravity, and
    /// builds the driver with a zero sensor baseline. On world-load
    /// failure the bridge stays `Unconfigured`.
    pub fn configure(&mut self) -> Result<(), ConfigureError> {
        if self.state != RunState::Unconfigured {
            return Err(ConfigureError::InvalidState { state: self.state });
        }

        info!("loading world from {}", self.config.world_path.display());

        if let Err(e) = self.engine.setup(&self.config.engine_args) {
            // Tolerated: a prior setup in this process already succeeded.
            warn!("{e}");
        }

        for plugin in &self.config.plugins {
            if let Err(e) = self.engine.add_plugin(plugin) {
                warn!("{e}");
            }
        }

        let world = self
            .engine
            .load_world(&self.config.world_path)
            .map_err(ConfigureError::WorldLoad)?;

        self.gravity = Some(world.gravity());

        let gate_wait = if self.config.lockstep {
            let (signal, wait) = step_gate();
            self.gate_signal = Some(signal);
            Some(wait)
        } else {
            None
        };

        self.driver = Some(SimulationDriver::new(
            Arc::clone(&self.engine),
            Arc::clone(&world),
            gate_wait,
            self.config.lockstep,
        ));
        self.world = Some(world);
        self.state = RunState::Configured;
        Ok(())
    }

    /// Start hook: `Configured/Stopped → Running`.
    ///
    /// The first start spawns the simulation thread; any later start
    /// (including a repeated start without an intervening stop) acts
    /// as an unpause of the existing run.
    pub fn start(&mut self) -> Result<(), LifecycleError> {
        match self.state {
            RunState::Configured | RunState::Stopped | RunState::Running => {
                if let Some(driver) = &mut self.driver {
                    driver.start();
                }
                self.state = RunState::Running;
                Ok(())
            }
            state => Err(LifecycleError {
                operation: "start",
                state,
            }),
        }
    }

    /// Periodic update hook, called by the framework's scheduler.
    ///
    /// Prunes broken peer connections and, in lockstep mode, releases
    /// the gate exactly once. Never blocks, whatever the gate state.
    pub fn update_hook(&mut self) {
        self.peers.prune();
        if let Some(signal) = &self.gate_signal {
            signal.signal();
        }
    }

    /// Stop hook: `Running → Stopped`.
    ///
    /// Outside lockstep the simulation is paused; in lockstep it keeps
    /// running and the now-silent gate throttles it.
    pub fn stop(&mut self) -> Result<(), LifecycleError> {
        match self.state {
            RunState::Running => {
                if let Some(driver) = &self.driver {
                    driver.stop();
                }
                self.state = RunState::Stopped;
                Ok(())
            }
            state => Err(LifecycleError {
                operation: "stop",
                state,
            }),
        }
    }

    /// Cleanup hook: `Running/Stopped → CleanedUp` (terminal).
    ///
    /// Opens the gate first — the simulation thread may be blocked at
    /// end-of-step, and shutdown must never be requested while it
    /// could still be waiting there — then hands over to the driver's
    /// teardown sequence, which joins the thread unconditionally.
    pub fn cleanup(&mut self) -> Result<TeardownReport, CleanupError> {
        match self.state {
            RunState::Running | RunState::Stopped => {}
            state => return Err(CleanupError::InvalidState { state }),
        }

        // Gate open: any end-of-step wait returns immediately from
        // here on, so the join below cannot deadlock.
        self.gate_signal.take();

        let report = match self.driver.take() {
            Some(driver) => driver.cleanup().map_err(CleanupError::SimThread)?,
            None => TeardownReport {
                total_ms: 0,
                drain_ms: 0,
                thread_joined: false,
            },
        };
        self.state = RunState::CleanedUp;
        Ok(report)
    }

    // ── Exposed commands ─────────────────────────────────────

    /// Dynamically insert a model into the running world, waiting up
    /// to `timeout` for it to appear in the model list.
    pub fn spawn_model(&self, instance: &str, model: &str, timeout: Duration) -> bool {
        let Some(world) = &self.world else {
            error!("cannot spawn model {instance}: no world configured");
            return false;
        };
        world.request_model_insert(instance, model);

        let deadline = Instant::now() + timeout;
        loop {
            if world.has_model(instance) {
                info!("model {instance} spawned");
                return true;
            }
            if Instant::now() >= deadline {
                error!("model {instance} did not appear within {timeout:?}");
                return false;
            }
            thread::sleep(SPAWN_POLL);
        }
    }

    /// Activate or deactivate dynamics simulation.
    pub fn toggle_dynamics(&self, activate: bool) -> bool {
        match &self.world {
            Some(world) => world.set_dynamics_enabled(activate),
            None => {
                error!("cannot toggle dynamics: no world configured");
                false
            }
        }
    }

    /// Reset the whole world: time, poses, and internal state.
    pub fn reset_world(&self) -> bool {
        match &self.world {
            Some(world) => {
                world.reset();
                true
            }
            None => false,
        }
    }

    /// Reset all model poses without touching simulation time.
    pub fn reset_model_poses(&self) -> bool {
        match &self.world {
            Some(world) => {
                world.reset_model_poses();
                true
            }
            None => false,
        }
    }

    // ── Peers ────────────────────────────────────────────────

    /// Register a cooperating component's begin/end step operations.
    pub fn register_peer(&mut self, name: &str, peer: Arc<dyn StepPeer>) {
        self.peers.register(name, peer);
    }

    /// Number of currently registered peers.
    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    /// Whether the simulation thread has been spawned.
    pub fn sim_thread_spawned(&self) -> bool {
        self.driver
            .as_ref()
            .is_some_and(SimulationDriver::thread_spawned)
    }
}

impl Drop for SimBridge {
    fn drop(&mut self) {
        if matches!(self.state, RunState::Running | RunState::Stopped) {
            if let Err(e) = self.cleanup() {
                error!("teardown on drop failed: {e}");
            }
        }
    }
}

impl std::fmt::Debug for SimBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimBridge")
            .field("state", &self.state)
            .field("world_path", &self.config.world_path)
            .field("lockstep", &self.config.lockstep)
            .field("peers", &self.peers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tether_test_utils::{Event, FakeEngine};

    fn bridge_with(engine: &Arc<FakeEngine>, config: BridgeConfig) -> SimBridge {
        SimBridge::new(Arc::clone(engine) as Arc<dyn SimulationEngine>, config)
    }

    fn wait_until(deadline_ms: u64, mut cond: impl FnMut() -> bool, what: &str) {
        let deadline = Instant::now() + Duration::from_millis(deadline_ms);
        while !cond() {
            if Instant::now() > deadline {
                panic!("timed out waiting for {what}");
            }
            thread::sleep(Duration::from_millis(2));
        }
    }

    // ── Configure ────────────────────────────────────────────

    #[test]
    fn configure_snapshots_gravity() {
        let engine = Arc::new(FakeEngine::with_gravity([0.5, -0.5, -9.6]));
        let mut bridge = bridge_with(&engine, BridgeConfig::default());

        assert_eq!(bridge.gravity(), None);
        bridge.configure().expect("configure failed");
        assert_eq!(bridge.state(), RunState::Configured);
        assert_eq!(bridge.gravity(), Some([0.5, -0.5, -9.6]));
    }

    #[test]
    fn world_load_failure_stays_unconfigured() {
        let engine = Arc::new(FakeEngine::new());
        engine.fail_world_load.store(true, Ordering::SeqCst);
        let mut bridge = bridge_with(&engine, BridgeConfig::default());

        let err = bridge.configure().expect_err("configure should fail");
        assert!(matches!(err, ConfigureError::WorldLoad(_)));
        assert_eq!(bridge.state(), RunState::Unconfigured);
        assert_eq!(bridge.gravity(), None);
    }

    #[test]
    fn setup_failure_is_swallowed() {
        let engine = Arc::new(FakeEngine::new());
        engine.fail_setup.store(true, Ordering::SeqCst);
        let mut bridge = bridge_with(&engine, BridgeConfig::default());

        bridge.configure().expect("configure must tolerate setup failure");
        assert_eq!(bridge.state(), RunState::Configured);
    }

    #[test]
    fn configure_twice_is_invalid() {
        let engine = Arc::new(FakeEngine::new());
        let mut bridge = bridge_with(&engine, BridgeConfig::default());
        bridge.configure().expect("configure failed");
        let err = bridge.configure().expect_err("second configure must fail");
        assert!(matches!(
            err,
            ConfigureError::InvalidState {
                state: RunState::Configured
            }
        ));
    }

    #[test]
    fn queued_plugins_load_before_world() {
        let engine = Arc::new(FakeEngine::new());
        let config = BridgeConfig {
            plugins: vec!["libfoo.so".into()],
            ..BridgeConfig::default()
        };
        let mut bridge = bridge_with(&engine, config);
        bridge.configure().expect("configure failed");

        let events = engine.events();
        let plugin = events
            .iter()
            .position(|e| matches!(e, Event::PluginAdded(_)))
            .expect("plugin not loaded");
        let world = events
            .iter()
            .position(|e| *e == Event::WorldLoaded)
            .expect("world not loaded");
        assert!(plugin < world);
    }

    #[test]
    fn add_plugin_before_configure_queues() {
        let engine = Arc::new(FakeEngine::new());
        let mut bridge = bridge_with(&engine, BridgeConfig::default());
        assert!(bridge.add_plugin("libbar.so"));
        // Not forwarded yet.
        assert!(engine.events().is_empty());
        bridge.configure().expect("configure failed");
        assert!(engine
            .events()
            .contains(&Event::PluginAdded("libbar.so".into())));
    }

    #[test]
    fn add_plugin_after_configure_forwards() {
        let engine = Arc::new(FakeEngine::new());
        let mut bridge = bridge_with(&engine, BridgeConfig::default());
        bridge.configure().expect("configure failed");
        assert!(bridge.add_plugin("liblate.so"));
        assert!(engine
            .events()
            .contains(&Event::PluginAdded("liblate.so".into())));

        engine.fail_plugins.store(true, Ordering::SeqCst);
        assert!(!bridge.add_plugin("libbroken.so"));
    }

    #[test]
    fn set_world_path_retains_prior_on_missing_file() {
        let engine = Arc::new(FakeEngine::new());
        let mut bridge = bridge_with(&engine, BridgeConfig::default());

        bridge.set_world_path("/no/such/file.world");
        assert_eq!(
            bridge.config.world_path,
            PathBuf::from("worlds/empty.world")
        );

        // Any file guaranteed to exist works for the happy path.
        let existing = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
        bridge.set_world_path(&existing);
        assert_eq!(bridge.config.world_path, existing);
    }

    // ── Start / stop ─────────────────────────────────────────

    #[test]
    fn start_before_configure_is_invalid() {
        let engine = Arc::new(FakeEngine::new());
        let mut bridge = bridge_with(&engine, BridgeConfig::default());
        let err = bridge.start().expect_err("start must fail");
        assert_eq!(err.state, RunState::Unconfigured);
    }

    #[test]
    fn start_twice_spawns_one_thread_and_unpauses() {
        let engine = Arc::new(FakeEngine::new());
        let mut bridge = bridge_with(&engine, BridgeConfig::default());
        bridge.configure().expect("configure failed");

        bridge.start().expect("first start failed");
        assert!(bridge.sim_thread_spawned());
        wait_until(2000, || engine.world.step_count() >= 1, "first step");

        bridge.start().expect("second start failed");
        assert_eq!(bridge.state(), RunState::Running);
        // The second start only broadcast an unpause.
        assert_eq!(engine.pause_transitions(), vec![false]);

        bridge.cleanup().expect("cleanup failed");
    }

    #[test]
    fn stop_pauses_and_start_resumes() {
        let engine = Arc::new(FakeEngine::new());
        let mut bridge = bridge_with(&engine, BridgeConfig::default());
        bridge.configure().expect("configure failed");
        bridge.start().expect("start failed");
        wait_until(2000, || engine.world.step_count() >= 1, "first step");

        bridge.stop().expect("stop failed");
        assert_eq!(bridge.state(), RunState::Stopped);
        assert!(engine.is_paused());

        bridge.start().expect("restart failed");
        assert_eq!(bridge.state(), RunState::Running);
        assert!(!engine.is_paused());

        bridge.cleanup().expect("cleanup failed");
    }

    #[test]
    fn stop_while_stopped_is_invalid() {
        let engine = Arc::new(FakeEngine::new());
        let mut bridge = bridge_with(&engine, BridgeConfig::default());
        bridge.configure().expect("configure failed");
        bridge.start().expect("start failed");
        bridge.stop().expect("stop failed");
        let err = bridge.stop().expect_err("second stop must fail");
        assert_eq!(err.state, RunState::Stopped);
        bridge.cleanup().expect("cleanup failed");
    }

    // ── Cleanup ──────────────────────────────────────────────

    #[test]
    fn cleanup_from_stopped_terminates() {
        let engine = Arc::new(FakeEngine::new());
        let mut bridge = bridge_with(&engine, BridgeConfig::default());
        bridge.configure().expect("configure failed");
        bridge.start().expect("start failed");
        wait_until(2000, || engine.world.step_count() >= 1, "first step");
        bridge.stop().expect("stop failed");

        let report = bridge.cleanup().expect("cleanup failed");
        assert!(report.thread_joined);
        assert_eq!(bridge.state(), RunState::CleanedUp);
        assert!(engine.world.finalized.load(Ordering::SeqCst));
    }

    #[test]
    fn cleanup_twice_is_invalid() {
        let engine = Arc::new(FakeEngine::new());
        let mut bridge = bridge_with(&engine, BridgeConfig::default());
        bridge.configure().expect("configure failed");
        bridge.start().expect("start failed");
        bridge.cleanup().expect("cleanup failed");

        let err = bridge.cleanup().expect_err("second cleanup must fail");
        assert!(matches!(
            err,
            CleanupError::InvalidState {
                state: RunState::CleanedUp
            }
        ));
    }

    #[test]
    fn drop_while_running_tears_down() {
        let engine = Arc::new(FakeEngine::new());
        {
            let mut bridge = bridge_with(&engine, BridgeConfig::default());
            bridge.configure().expect("configure failed");
            bridge.start().expect("start failed");
            wait_until(2000, || engine.world.step_count() >= 1, "first step");
        }
        // If drop didn't join, the fake would never see the request.
        assert!(engine.shutdown_requested.load(Ordering::SeqCst));
        assert!(engine.world.finalized.load(Ordering::SeqCst));
    }

    // ── Exposed commands ─────────────────────────────────────

    #[test]
    fn spawn_model_succeeds_within_timeout() {
        let engine = Arc::new(FakeEngine::new());
        let mut bridge = bridge_with(&engine, BridgeConfig::default());
        bridge.configure().expect("configure failed");

        engine
            .world
            .set_insert_latency(Some(Duration::from_millis(20)));
        assert!(bridge.spawn_model("box1", "box", Duration::from_secs(2)));
        assert!(engine.world.has_model("box1"));
    }

    #[test]
    fn spawn_model_times_out_when_insert_never_completes() {
        let engine = Arc::new(FakeEngine::new());
        let mut bridge = bridge_with(&engine, BridgeConfig::default());
        bridge.configure().expect("configure failed");

        engine.world.set_insert_latency(None);
        let start = Instant::now();
        assert!(!bridge.spawn_model("ghost", "box", Duration::from_millis(60)));
        assert!(start.elapsed() >= Duration::from_millis(60));
        assert!(!engine.world.has_model("ghost"));
    }

    #[test]
    fn spawn_model_unconfigured_fails_fast() {
        let engine = Arc::new(FakeEngine::new());
        let bridge = bridge_with(&engine, BridgeConfig::default());
        assert!(!bridge.spawn_model("box1", "box", Duration::from_secs(1)));
    }

    #[test]
    fn toggle_dynamics_forwards_to_world() {
        let engine = Arc::new(FakeEngine::new());
        let mut bridge = bridge_with(&engine, BridgeConfig::default());
        assert!(!bridge.toggle_dynamics(false), "no world yet");

        bridge.configure().expect("configure failed");
        assert!(bridge.toggle_dynamics(false));
        assert!(!engine.world.dynamics_enabled.load(Ordering::SeqCst));

        engine.world.fail_dynamics.store(true, Ordering::SeqCst);
        assert!(!bridge.toggle_dynamics(true));
    }

    #[test]
    fn resets_forward_to_world() {
        let engine = Arc::new(FakeEngine::new());
        let mut bridge = bridge_with(&engine, BridgeConfig::default());
        assert!(!bridge.reset_world());
        assert!(!bridge.reset_model_poses());

        bridge.configure().expect("configure failed");
        assert!(bridge.reset_world());
        assert!(bridge.reset_model_poses());
        assert_eq!(engine.world.resets.load(Ordering::SeqCst), 1);
        assert_eq!(engine.world.pose_resets.load(Ordering::SeqCst), 1);
    }

    // ── Peers ────────────────────────────────────────────────

    struct FlakyPeer {
        responsive: AtomicBool,
    }

    impl StepPeer for FlakyPeer {
        fn begin_ready(&self) -> bool {
            self.responsive.load(Ordering::SeqCst)
        }
        fn end_ready(&self) -> bool {
            self.responsive.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn update_hook_prunes_broken_peers() {
        let engine = Arc::new(FakeEngine::new());
        let mut bridge = bridge_with(&engine, BridgeConfig::default());
        let peer = Arc::new(FlakyPeer {
            responsive: AtomicBool::new(true),
        });
        bridge.register_peer("gripper", Arc::clone(&peer) as Arc<dyn StepPeer>);
        assert_eq!(bridge.peer_count(), 1);

        bridge.update_hook();
        assert_eq!(bridge.peer_count(), 1);

        peer.responsive.store(false, Ordering::SeqCst);
        bridge.update_hook();
        assert_eq!(bridge.peer_count(), 0);
    }

    #[test]
    fn update_hook_without_lockstep_is_inert() {
        let engine = Arc::new(FakeEngine::new());
        let mut bridge = bridge_with(&engine, BridgeConfig::default());
        bridge.configure().expect("configure failed");
        // No gate exists; this must be a cheap no-op.
        bridge.update_hook();
        assert!(bridge.gate_signal.is_none());
    }
}
