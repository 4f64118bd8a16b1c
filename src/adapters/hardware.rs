//! Hardware adapters — bridge real peripherals to domain port traits.
//!
//! [`SensorNodeHardware`] owns the sampler, the transmit UART, and the
//! watchdog, exposing them through [`SamplerPort`], [`TxPort`], and
//! [`PowerPort`]; [`ReadoutNodeHardware`] wraps the receive UART behind
//! [`RxPort`]. These are the only modules in the system that touch
//! actual hardware. On non-espidf targets, the underlying drivers use
//! cfg-gated simulation stubs.

use crate::app::ports::{PowerPort, RxPort, SamplerPort, TxPort};
use crate::drivers::hw_init::{self, WakeCause};
use crate::drivers::reset_monitor;
use crate::drivers::sampler::AnalogSampler;
use crate::drivers::serial::{SerialRx, SerialTx};
use crate::drivers::watchdog::{self, Watchdog};
use crate::power::{self, PowerState};
use crate::wire::Sample;

/// Concrete adapter combining the sensor node's peripherals behind
/// port traits.
pub struct SensorNodeHardware {
    sampler: AnalogSampler,
    tx: SerialTx,
    watchdog: Watchdog,
    tx_drain_delay_ms: u32,
}

impl SensorNodeHardware {
    pub fn new(
        sampler: AnalogSampler,
        tx: SerialTx,
        watchdog: Watchdog,
        tx_drain_delay_ms: u32,
    ) -> Self {
        Self {
            sampler,
            tx,
            watchdog,
            tx_drain_delay_ms,
        }
    }
}

// ── SamplerPort implementation ────────────────────────────────

impl SamplerPort for SensorNodeHardware {
    fn acquire(&mut self) -> Sample {
        self.sampler.acquire()
    }
}

// ── TxPort implementation ─────────────────────────────────────

impl TxPort for SensorNodeHardware {
    fn send_byte(&mut self, byte: u8) {
        self.tx.send_byte(byte);
    }
}

// ── PowerPort implementation ──────────────────────────────────

impl PowerPort for SensorNodeHardware {
    fn power_down(&mut self) {
        // The UART shifter keeps clocking after the FIFO drains, so
        // hold off sleep until the last stop bit is on the line.
        self.tx.flush();
        drain_grace(self.tx_drain_delay_ms);

        // A reset edge seen while awake escalates here, not in the
        // ISR; the handler rechecks the line level first.
        if reset_monitor::take_pending_edge() {
            reset_monitor::reset_isr_handler();
        }

        self.watchdog.arm_sleep_wake();
        power::record_enter(PowerState::PowerDown);
        let cause = hw_init::light_sleep_until_wake();
        power::record_wake();
        self.watchdog.disarm_sleep_wake();

        match cause {
            WakeCause::Heartbeat => watchdog::heartbeat_isr(),
            WakeCause::ResetRequest => reset_monitor::reset_isr_handler(),
            WakeCause::Other => {}
        }
    }
}

#[cfg(target_os = "espidf")]
fn drain_grace(ms: u32) {
    esp_idf_hal::delay::FreeRtos::delay_ms(ms);
}

#[cfg(not(target_os = "espidf"))]
fn drain_grace(_ms: u32) {}

// ── Readout node ──────────────────────────────────────────────

/// Receive-side adapter: a thin port wrapper over the link UART.
pub struct ReadoutNodeHardware {
    rx: SerialRx,
}

impl ReadoutNodeHardware {
    pub fn new(rx: SerialRx) -> Self {
        Self { rx }
    }
}

impl RxPort for ReadoutNodeHardware {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        self.rx.read(buf)
    }
}
