//! Port traits — the hexagonal boundary between node logic and hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SensorService / ReadoutService
//! ```
//!
//! Driven adapters implement these traits; the services consume them via
//! generics, so node logic never touches a peripheral directly and every
//! cycle runs unchanged against mocks on the host.

use crate::wire::Sample;

// ───────────────────────────────────────────────────────────────
// Sensor node ports
// ───────────────────────────────────────────────────────────────

/// Acquisition port: one blocking conversion per call.
pub trait SamplerPort {
    /// Run one conversion and return the sample. The node passes
    /// through the ADC noise-reduction window while this blocks; it is
    /// back in `Active` by the time the call returns.
    fn acquire(&mut self) -> Sample;
}

/// Transmit port: fire-and-forget bytes onto the link.
pub trait TxPort {
    /// Hand one byte to the transmitter. Blocks (busy-wait) until the
    /// hardware accepts it; never sleeps. Consecutive calls land on
    /// the wire in call order.
    fn send_byte(&mut self, byte: u8);
}

/// Power port: the duty-cycle sleep between transmissions.
pub trait PowerPort {
    /// Drain the transmitter, service any pending reset edge, then
    /// hold the node in its power-down window until the heartbeat or a
    /// reset request ends it. May not return at all: an asserted reset
    /// line escalates into the watchdog reset path.
    fn power_down(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Readout node ports
// ───────────────────────────────────────────────────────────────

/// Receive port: non-blocking drain of whatever has arrived.
pub trait RxPort {
    /// Fill `buf` with pending bytes; returns how many were written
    /// (zero when the line is quiet).
    fn read(&mut self, buf: &mut [u8]) -> usize;
}

/// Character display contract. Coordinates are `(col, row)`,
/// zero-based. The shipped adapter renders through the log sink; a
/// real display adapter implements the same three operations.
pub trait DisplayPort {
    /// One-time controller initialisation.
    fn init(&mut self);
    /// Park the cursor without writing.
    fn move_cursor(&mut self, col: u8, row: u8);
    /// Write `text` starting at `(col, row)`.
    fn write_text(&mut self, col: u8, row: u8, text: &str);
}
