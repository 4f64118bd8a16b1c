//! Power-state model.
//!
//! The sensor node spends nearly all of its time asleep. Exactly two
//! sleep windows exist, each owned by one component and one expected
//! wake source:
//!
//! ```text
//! ┌────────┐  conversion   ┌───────────────────┐  ADC complete
//! │ Active │──────────────▶│ AdcNoiseReduction │──────────────┐
//! └────────┘               └───────────────────┘              │
//!     ▲                                                       │
//!     │  heartbeat / reset  ┌───────────┐   duty cycle        │
//!     └─────────────────────│ PowerDown │◀────────────────────┘
//!        (wake)             └───────────┘   (after transmit)
//! ```
//!
//! The tracker is advisory: the window owners record transitions here
//! so the rest of the firmware (and the host tests) can observe where
//! the node believes it is. It does not gate hardware by itself.

use core::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PowerState {
    /// CPU running; the only state in which code executes.
    Active = 0,
    /// Conversion window: CPU suspended so the ADC sees quiet rails.
    /// Sole wake source: conversion complete.
    AdcNoiseReduction = 1,
    /// Duty-cycle window: deepest sleep the link allows.
    /// Wake sources: heartbeat timer or reset-request pin.
    PowerDown = 2,
}

static POWER_STATE: AtomicU8 = AtomicU8::new(PowerState::Active as u8);

/// State as last recorded by the owning component.
pub fn current() -> PowerState {
    state_from_u8(POWER_STATE.load(Ordering::Acquire))
}

/// Record entry into a sleep window. Called only by that window's owner,
/// immediately before the suspension point.
pub fn record_enter(state: PowerState) {
    POWER_STATE.store(state as u8, Ordering::Release);
}

/// Record the wake path back to `Active`.
pub fn record_wake() {
    POWER_STATE.store(PowerState::Active as u8, Ordering::Release);
}

fn state_from_u8(raw: u8) -> PowerState {
    match raw {
        1 => PowerState::AdcNoiseReduction,
        2 => PowerState::PowerDown,
        _ => PowerState::Active,
    }
}

/// Gate for every test that touches the process-wide tracker. The
/// harness runs test threads in parallel across modules, so sibling
/// modules whose operations record transitions here (see
/// `drivers::sampler`) must take the same gate.
#[cfg(test)]
pub(crate) fn test_lock() -> std::sync::MutexGuard<'static, ()> {
    static GATE: std::sync::Mutex<()> = std::sync::Mutex::new(());
    GATE.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}
