//! Simulation driver: the world handle and its dedicated thread.
//!
//! The driver owns the loaded world and runs the engine's step loop on
//! a named background thread. Instead of registering callbacks with
//! the engine, the loop is an explicit dispatch with two fixed phases
//! per iteration: the begin phase runs the [`SensorTracker`], the world
//! advances one step, and the end phase blocks on the lockstep gate
//! when one is installed.
//!
//! # Teardown ordering
//!
//! [`cleanup`](SimulationDriver::cleanup) preserves the ordering the
//! deadlock-free shutdown depends on: unpause (the loop may be parked
//! on the pause flag), one extra drain step, world finalize, engine
//! shutdown request, then an unconditional join. The caller must open
//! the gate *before* calling cleanup — with the gate still armed the
//! simulation thread could be blocked at end-of-step and the join
//! would never complete.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::info;
use tether_core::{SimulationEngine, World};

use crate::gate::StepWait;
use crate::sensors::SensorTracker;

/// How long the loop parks while the engine reports paused.
/// `unpark()` on unpause or teardown wakes it earlier.
const PAUSE_PARK: Duration = Duration::from_millis(5);

// ── TeardownError ────────────────────────────────────────────────

/// Teardown failed in a way that must not be ignored.
#[derive(Debug, PartialEq, Eq)]
pub enum TeardownError {
    /// The simulation thread panicked and the join returned an error.
    /// Fatal to process shutdown: the engine's state is indeterminate.
    SimThreadPanicked,
}

impl std::fmt::Display for TeardownError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SimThreadPanicked => write!(f, "simulation thread panicked before join"),
        }
    }
}

impl std::error::Error for TeardownError {}

// ── TeardownReport ───────────────────────────────────────────────

/// Timing report from a completed teardown.
#[derive(Debug)]
pub struct TeardownReport {
    /// Total time spent in the teardown sequence.
    pub total_ms: u64,
    /// Time spent in the drain step and world finalize.
    pub drain_ms: u64,
    /// Whether a simulation thread existed and was joined.
    pub thread_joined: bool,
}

// ── SimulationDriver ─────────────────────────────────────────────

/// Owns the world handle and the simulation thread.
///
/// Created at configure time, started at most once: the first
/// [`start`](SimulationDriver::start) spawns the thread, every later
/// one unpauses the existing run. The framework's start/stop hooks may
/// fire many times across a pause/resume cycle and must never end up
/// with two step loops.
pub struct SimulationDriver {
    engine: Arc<dyn SimulationEngine>,
    world: Arc<dyn World>,
    shutdown: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
    /// Consumed by the first `start()`; the loop owns it afterwards.
    loop_parts: Option<LoopParts>,
    lockstep: bool,
}

/// State moved into the simulation thread on first start.
struct LoopParts {
    tracker: SensorTracker,
    gate: Option<StepWait>,
}

impl SimulationDriver {
    /// New driver for a freshly loaded world.
    ///
    /// `gate` must be `Some` exactly when `lockstep` is enabled; the
    /// loop only ever waits on a gate it was given.
    pub(crate) fn new(
        engine: Arc<dyn SimulationEngine>,
        world: Arc<dyn World>,
        gate: Option<StepWait>,
        lockstep: bool,
    ) -> Self {
        Self {
            engine,
            world,
            shutdown: Arc::new(AtomicBool::new(false)),
            thread: None,
            loop_parts: Some(LoopParts {
                tracker: SensorTracker::new(),
                gate,
            }),
            lockstep,
        }
    }

    /// Start or resume the simulation.
    ///
    /// The first call spawns the step-loop thread; it runs until
    /// teardown and never returns control on its own. Later calls
    /// unpause the existing run instead of spawning a second thread.
    pub fn start(&mut self) {
        match self.loop_parts.take() {
            Some(parts) => {
                let engine = Arc::clone(&self.engine);
                let world = Arc::clone(&self.world);
                let shutdown = Arc::clone(&self.shutdown);
                let handle = thread::Builder::new()
                    .name("tether-sim".into())
                    .spawn(move || run_step_loop(engine, world, parts, shutdown))
                    .expect("failed to spawn simulation thread");
                self.thread = Some(handle);
            }
            // Restart after a stop: the loop already exists, resume it.
            None => self.unpause(),
        }
    }

    /// Broadcast pause into the engine. Non-blocking; the loop stops
    /// reaching the step phases until unpaused.
    pub fn pause(&self) {
        info!("pausing simulation");
        self.engine.set_paused(true);
    }

    /// Broadcast unpause and wake the loop if it is parked.
    pub fn unpause(&self) {
        info!("unpausing simulation");
        self.engine.set_paused(false);
        if let Some(handle) = &self.thread {
            handle.thread().unpark();
        }
    }

    /// Stop hook policy: outside lockstep the simulation is paused;
    /// in lockstep it keeps running — the gate itself is the throttle.
    pub fn stop(&self) {
        if !self.lockstep {
            self.pause();
        }
    }

    /// Whether the step-loop thread has been spawned.
    pub fn thread_spawned(&self) -> bool {
        self.thread.is_some()
    }

    /// Tear the driver down, joining the simulation thread.
    ///
    /// See the module docs for the ordering contract. The join is
    /// unconditional: it blocks until the simulation thread actually
    /// exits, and a panicked thread is surfaced as an error rather
    /// than swallowed.
    pub fn cleanup(mut self) -> Result<TeardownReport, TeardownError> {
        let start = Instant::now();

        // The loop may be parked on the pause flag; wake it first.
        self.unpause();

        // One more step to drain pending engine state, then finalize.
        // The engine's own thread-safety guarantees cover the overlap
        // with a concurrently running loop iteration.
        self.world.step();
        self.world.finalize();
        let drain_ms = start.elapsed().as_millis() as u64;

        info!("stopping simulation");
        self.shutdown.store(true, Ordering::Release);
        self.engine.request_shutdown();

        let thread_joined = match self.thread.take() {
            Some(handle) => {
                handle.thread().unpark();
                handle
                    .join()
                    .map_err(|_| TeardownError::SimThreadPanicked)?;
                true
            }
            None => false,
        };

        Ok(TeardownReport {
            total_ms: start.elapsed().as_millis() as u64,
            drain_ms,
            thread_joined,
        })
    }
}

/// The simulation thread's step loop.
///
/// Phases per iteration, in order: shutdown check, pause park, begin
/// phase (sensor tracking), world step, end phase (gate wait). Begin
/// and end for a given step always run in that order on this thread.
fn run_step_loop(
    engine: Arc<dyn SimulationEngine>,
    world: Arc<dyn World>,
    mut parts: LoopParts,
    shutdown: Arc<AtomicBool>,
) {
    info!("simulation loop running");
    loop {
        if shutdown.load(Ordering::Acquire) {
            break;
        }
        if engine.is_paused() {
            // Step callbacks cease while paused.
            thread::park_timeout(PAUSE_PARK);
            continue;
        }

        parts.tracker.observe_step(world.as_ref(), engine.sensors());
        world.step();
        if let Some(gate) = &parts.gate {
            gate.wait();
        }
    }
    info!("simulation loop exiting");
}
