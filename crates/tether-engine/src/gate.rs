//! Single-slot step synchronization gate.
//!
//! In lockstep mode the simulation thread blocks at end-of-step until
//! the control task's update tick releases it, coupling at most one
//! simulation step to at most one control tick. The gate is a
//! `crossbeam_channel::bounded(1)` rendezvous split into two halves:
//! the producer never blocks (a signal arriving while the slot is full
//! is dropped, not queued), the consumer blocks for exactly one signal
//! per step.
//!
//! Dropping the [`StepSignal`] disconnects the channel, which makes
//! every subsequent [`StepWait::wait`] return immediately. Teardown
//! relies on this: the controller opens the gate before requesting
//! shutdown, so the simulation thread can never be left blocked at
//! end-of-step.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

/// Producer half of the gate, held by the lifecycle controller.
pub struct StepSignal {
    tx: Sender<()>,
}

/// Consumer half of the gate, moved into the simulation thread.
pub struct StepWait {
    rx: Receiver<()>,
}

/// Create a connected gate pair.
pub(crate) fn step_gate() -> (StepSignal, StepWait) {
    let (tx, rx) = bounded(1);
    (StepSignal { tx }, StepWait { rx })
}

impl StepSignal {
    /// Release one step. Never blocks.
    ///
    /// At most one signal is ever outstanding: if the slot is already
    /// full the signal is dropped, so a burst of control ticks during a
    /// slow step cannot bank releases for the simulation to race
    /// through afterwards. A disconnected consumer (simulation thread
    /// already gone) is equally ignored.
    pub fn signal(&self) {
        match self.tx.try_send(()) {
            Ok(()) => {}
            Err(TrySendError::Full(())) => {}
            Err(TrySendError::Disconnected(())) => {}
        }
    }
}

impl StepWait {
    /// Block until a signal is available, consuming exactly one.
    ///
    /// Returns immediately once the producer half has been dropped —
    /// the gate is then permanently open.
    pub fn wait(&self) {
        let _ = self.rx.recv();
    }
}
