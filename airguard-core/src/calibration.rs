//! Gas Sensor Calibration Lifecycle
//!
//! ## Background
//!
//! A metal-oxide gas sensor estimates eCO2/TVOC relative to an internal,
//! slowly adapting baseline. A fresh sensor (or one that lost power) needs
//! hours of clean-air exposure before that baseline means anything. Saving
//! the baseline and writing it back on the next boot skips the re-learning.
//!
//! ## States
//!
//! ```text
//!                     checkpoint loaded
//!   start ──────────────────────────────────────────────► Calibrated ──┐
//!     │                                                      ▲         │ persist on
//!     │ no checkpoint                          elapsed ≥ D   │         │ every tick
//!     ▼                  first tick, elapsed < D             │         │
//!   Uninitialized ─────────────────────────► WarmingUp ──────┘ ◄───────┘
//!     │                                                      ▲
//!     └──────────────────── elapsed ≥ D ─────────────────────┘ (to Calibrated)
//! ```
//!
//! Transitions only move forward; nothing returns to an uncalibrated state
//! within a process.
//!
//! ## Bootstrap Exit
//!
//! A process that started without a checkpoint stops right after its first
//! successful save ([`CalibrationOutcome::BootstrapComplete`]). The
//! supervisor restarts it and the new process begins `Calibrated`, with the
//! baseline restored into the sensor. This happens once per cold start; a
//! failed save keeps the process running and the next tick tries again.

use core::fmt;
use core::time::Duration;

use crate::errors::SensorError;
use crate::sensors::GasSensor;
use crate::store::{BaselineStore, CalibrationBaseline};
use crate::time::{self, Timestamp};

/// Default warm-up deadline for an uncalibrated sensor (12 hours)
pub const DEFAULT_WARM_UP: Duration = Duration::from_secs(12 * 60 * 60);

/// Whether the gas sensor's baseline can be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationState {
    /// No checkpoint found at startup, no baseline tick seen yet
    Uninitialized,
    /// Accumulating adaptation time until the warm-up deadline
    WarmingUp,
    /// Checkpoint restored or warm-up deadline passed
    Calibrated,
}

impl fmt::Display for CalibrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Uninitialized => "uninitialized",
            Self::WarmingUp => "warming up",
            Self::Calibrated => "calibrated",
        })
    }
}

/// Result of one baseline timer tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationOutcome {
    /// Still warming up, nothing saved
    WarmingUp {
        /// Time left until the warm-up deadline
        remaining: Duration,
    },
    /// Baseline saved
    Persisted,
    /// Save attempted and failed; retried next tick
    PersistFailed,
    /// First save of a cold-started process succeeded; the process should exit
    BootstrapComplete,
}

/// Tracks calibration state and decides when to persist
#[derive(Debug, Clone)]
pub struct CalibrationStateMachine {
    state: CalibrationState,
    started_at: Timestamp,
    warm_up: Duration,
    bootstrap_pending: bool,
}

impl CalibrationStateMachine {
    /// Load the checkpoint and, if there is one, restore it into the sensor
    ///
    /// The restore happens here, before any measurement, so the sensor never
    /// starts re-learning a baseline that was already known. A restore
    /// failure is a bus fault and is returned.
    pub fn initialize<S, G>(
        store: &S,
        gas: &mut G,
        started_at: Timestamp,
        warm_up: Duration,
    ) -> Result<Self, SensorError>
    where
        S: BaselineStore + ?Sized,
        G: GasSensor + ?Sized,
    {
        match store.load() {
            Some(baseline) => {
                gas.restore_baseline(&baseline)?;
                log::info!(
                    "loaded baseline eCO2={} TVOC={}; gas sensor calibrated",
                    baseline.eco2,
                    baseline.tvoc
                );
                Ok(Self::with_state(CalibrationState::Calibrated, started_at, warm_up))
            }
            None => {
                log::warn!(
                    "no baseline available; gas sensor not calibrated, warm-up {}s",
                    warm_up.as_secs()
                );
                Ok(Self::with_state(CalibrationState::Uninitialized, started_at, warm_up))
            }
        }
    }

    /// State machine starting in `state` without touching any store
    ///
    /// A machine starting anywhere but `Calibrated` is treated as a cold
    /// start and will request the bootstrap exit after its first save.
    pub fn with_state(state: CalibrationState, started_at: Timestamp, warm_up: Duration) -> Self {
        Self {
            state,
            started_at,
            warm_up,
            bootstrap_pending: state != CalibrationState::Calibrated,
        }
    }

    /// Current state
    pub fn state(&self) -> CalibrationState {
        self.state
    }

    /// True until a cold-started process has saved its first checkpoint
    pub fn is_bootstrapping(&self) -> bool {
        self.bootstrap_pending
    }

    /// Warm-up deadline
    pub fn warm_up(&self) -> Duration {
        self.warm_up
    }

    /// Handle one baseline timer tick with the sensor's latest baseline
    pub fn on_baseline_tick<S>(
        &mut self,
        now: Timestamp,
        baseline: &CalibrationBaseline,
        store: &mut S,
    ) -> CalibrationOutcome
    where
        S: BaselineStore + ?Sized,
    {
        if self.state != CalibrationState::Calibrated {
            let elapsed = time::elapsed(self.started_at, now);
            if elapsed < self.warm_up {
                if self.state == CalibrationState::Uninitialized {
                    self.transition(CalibrationState::WarmingUp);
                }
                let remaining = self.warm_up - elapsed;
                log::info!(
                    "gas sensor not calibrated; {}s remaining until calibration complete",
                    remaining.as_secs()
                );
                return CalibrationOutcome::WarmingUp { remaining };
            }
            self.transition(CalibrationState::Calibrated);
        }

        if let Err(e) = store.save(baseline) {
            log::error!(
                "failed to save baseline eCO2={} TVOC={}: {}",
                baseline.eco2,
                baseline.tvoc,
                e
            );
            return CalibrationOutcome::PersistFailed;
        }

        log::info!(
            "gas sensor calibrated; saved baseline eCO2={} TVOC={}",
            baseline.eco2,
            baseline.tvoc
        );

        if self.bootstrap_pending {
            self.bootstrap_pending = false;
            log::info!("initial calibration bootstrap complete, restart required");
            return CalibrationOutcome::BootstrapComplete;
        }
        CalibrationOutcome::Persisted
    }

    fn transition(&mut self, to: CalibrationState) {
        log::info!("calibration state {} -> {}", self.state, to);
        self.state = to;
    }
}
