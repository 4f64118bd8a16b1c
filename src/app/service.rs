//! Sampling scheduler — the sensor node's hexagonal core.
//!
//! [`SensorService`] owns the only thread of control on the node and
//! drives the fixed cycle below; everything it touches goes through
//! port traits injected at the call site, so the whole cycle runs
//! against mocks on the host.
//!
//! ```text
//!  SamplerPort ──▶ ┌───────────────────┐ ──▶ TxPort (hi, then lo)
//!                  │   SensorService   │
//!                  │  acquire·send·    │
//!                  │  power_down loop  │ ──▶ PowerPort (sleep window)
//!                  └───────────────────┘
//! ```
//!
//! There is no acknowledgment, no retry, and no terminal state: the
//! loop runs until power is cut or the watchdog resets the chip.

use log::{debug, info};

use crate::wire::Sample;

use super::ports::{PowerPort, SamplerPort, TxPort};

pub struct SensorService {
    cycles: u64,
}

impl SensorService {
    pub fn new() -> Self {
        Self { cycles: 0 }
    }

    /// Run one duty cycle: acquire → transmit pair → power down.
    ///
    /// The `hw` parameter satisfies all three node ports through a
    /// single mutable borrow. Returns the sample for observability;
    /// nothing downstream depends on it.
    pub fn cycle(&mut self, hw: &mut (impl SamplerPort + TxPort + PowerPort)) -> Sample {
        // 1. Acquire (blocking; ADC noise-reduction window inside).
        let sample = hw.acquire();
        debug!("sample {}", sample.value());

        // 2. Report: high byte first, low byte second, nothing else.
        hw.send_byte(sample.high_byte());
        hw.send_byte(sample.low_byte());

        // 3. Sleep out the rest of the duty cycle. May never return if
        //    a reset request ends the window.
        hw.power_down();

        self.cycles += 1;
        sample
    }

    /// The sensor node main loop.
    pub fn run(&mut self, hw: &mut (impl SamplerPort + TxPort + PowerPort)) -> ! {
        info!("sampling loop started");
        loop {
            self.cycle(hw);
        }
    }

    /// Completed duty cycles since startup.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal scripted hardware; the fuller recording mock lives in
    /// tests/sensor_node_integration.rs.
    struct ScriptedHw {
        raw: u16,
        sent: Vec<u8>,
        power_downs: u32,
    }

    impl SamplerPort for ScriptedHw {
        fn acquire(&mut self) -> Sample {
            Sample::from_adc(self.raw)
        }
    }

    impl TxPort for ScriptedHw {
        fn send_byte(&mut self, byte: u8) {
            self.sent.push(byte);
        }
    }

    impl PowerPort for ScriptedHw {
        fn power_down(&mut self) {
            self.power_downs += 1;
        }
    }

    #[test]
    fn cycle_emits_pair_and_sleeps_once() {
        let mut hw = ScriptedHw {
            raw: 0x03FF,
            sent: Vec::new(),
            power_downs: 0,
        };
        let mut svc = SensorService::new();

        let sample = svc.cycle(&mut hw);

        assert_eq!(sample.value(), 0x03FF);
        assert_eq!(hw.sent, vec![0x03, 0xFF]);
        assert_eq!(hw.power_downs, 1);
        assert_eq!(svc.cycles(), 1);
    }

    #[test]
    fn cycles_accumulate() {
        let mut hw = ScriptedHw {
            raw: 7,
            sent: Vec::new(),
            power_downs: 0,
        };
        let mut svc = SensorService::new();
        for _ in 0..3 {
            svc.cycle(&mut hw);
        }
        assert_eq!(svc.cycles(), 3);
        // Two bytes per cycle, in order, every cycle.
        assert_eq!(hw.sent, vec![0x00, 7, 0x00, 7, 0x00, 7]);
    }
}
