//! Reset-request monitor.
//!
//! An active-low line (internal pull-up) lets an operator or an
//! external supervisor demand a clean software reset. The GPIO edge
//! ISR only records that an edge happened; `reset_isr_handler()`
//! re-reads the level at escalation time (debounce by recheck, not by
//! waiting) and escalates only if the line is still held low.
//! A transient pulse, released by the time the handler looks, is
//! dropped with no side effects.
//!
//! The handler runs in two places, so a request is never deferred
//! behind a sleeping main loop: on the GPIO wake path when it ends a
//! power-down window, and at the next power-down entry when the edge
//! arrived while the node was awake.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::drivers::watchdog;
use crate::pins;

/// Set by the edge ISR, consumed at the next power-down entry.
static EDGE_SEEN: AtomicBool = AtomicBool::new(false);

/// Simulated line level; pull-up keeps the real line high when released.
#[cfg(not(target_os = "espidf"))]
static SIM_LINE_LOW: AtomicBool = AtomicBool::new(false);

/// Falling-edge ISR body. Lock-free record only; task-watchdog
/// reconfiguration is not legal from interrupt context, so escalation
/// waits for the handler.
pub fn record_edge_from_isr() {
    EDGE_SEEN.store(true, Ordering::Release);
}

/// Consume a recorded edge, if any.
pub fn take_pending_edge() -> bool {
    EDGE_SEEN.swap(false, Ordering::AcqRel)
}

/// Escalation point. Re-reads the line and requests the software
/// reset only if it is still asserted; does not return in that case.
/// Returning normally means the edge was a transient pulse.
pub fn reset_isr_handler() {
    if line_is_low() {
        watchdog::request_software_reset();
    }
}

#[cfg(target_os = "espidf")]
fn line_is_low() -> bool {
    !crate::drivers::hw_init::gpio_read(pins::RESET_REQ_GPIO)
}

#[cfg(not(target_os = "espidf"))]
fn line_is_low() -> bool {
    SIM_LINE_LOW.load(Ordering::Acquire)
}

/// Drive the simulated line: `true` = held low (asserted).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_line_low(low: bool) {
    SIM_LINE_LOW.store(low, Ordering::Release);
}

/// Current simulated line state, for the sim sleep path.
#[cfg(not(target_os = "espidf"))]
pub fn sim_line_is_low() -> bool {
    line_is_low()
}

/// Clear recorded edges and release the line. Test hygiene only.
#[cfg(not(target_os = "espidf"))]
pub fn sim_reset() {
    EDGE_SEEN.store(false, Ordering::SeqCst);
    SIM_LINE_LOW.store(false, Ordering::SeqCst);
}
