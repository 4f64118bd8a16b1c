//! Integration tests: SensorService → ports → simulated sensor-node hardware.

#![cfg(not(target_os = "espidf"))]

use voltlink::adapters::hardware::SensorNodeHardware;
use voltlink::app::ports::{PowerPort, SamplerPort, TxPort};
use voltlink::app::service::SensorService;
use voltlink::config::LinkConfig;
use voltlink::drivers::sampler::{self, AnalogSampler, SamplerState};
use voltlink::drivers::serial::{self, SerialTx};
use voltlink::drivers::watchdog::{self, Watchdog};
use voltlink::power::{self, PowerState};
use voltlink::wire::Sample;

// ── Mock implementation ───────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Acquire,
    Send(u8),
    PowerDown,
}

struct OrderedHw {
    raw: u16,
    calls: Vec<Call>,
}

impl OrderedHw {
    fn new(raw: u16) -> Self {
        Self {
            raw,
            calls: Vec::new(),
        }
    }
}

impl SamplerPort for OrderedHw {
    fn acquire(&mut self) -> Sample {
        self.calls.push(Call::Acquire);
        Sample::from_adc(self.raw)
    }
}

impl TxPort for OrderedHw {
    fn send_byte(&mut self, byte: u8) {
        self.calls.push(Call::Send(byte));
    }
}

impl PowerPort for OrderedHw {
    fn power_down(&mut self) {
        self.calls.push(Call::PowerDown);
    }
}

// ── Cycle ordering ────────────────────────────────────────────

#[test]
fn cycle_orders_acquire_transmit_sleep() {
    let mut hw = OrderedHw::new(0x03FF);
    let mut svc = SensorService::new();

    let sample = svc.cycle(&mut hw);

    assert_eq!(sample.value(), 0x03FF);
    assert_eq!(
        hw.calls,
        vec![
            Call::Acquire,
            Call::Send(0x03),
            Call::Send(0xFF),
            Call::PowerDown
        ],
        "high byte must precede low byte, sleep must come last"
    );
}

#[test]
fn every_cycle_sleeps_exactly_once() {
    let mut hw = OrderedHw::new(0x0155);
    let mut svc = SensorService::new();

    for _ in 0..5 {
        svc.cycle(&mut hw);
    }

    let sleeps = hw.calls.iter().filter(|c| **c == Call::PowerDown).count();
    assert_eq!(sleeps, 5);
    assert_eq!(svc.cycles(), 5);
}

// ── End-to-end through the simulated drivers ──────────────────
//
// One sequential test: the sim rings, sampler staging, power state,
// and watchdog mode are process-wide statics.

#[test]
fn duty_cycle_end_to_end() {
    let config = LinkConfig::default();

    let mut s = AnalogSampler::new(config.adc_channel);
    s.arm().unwrap();
    let tx = SerialTx::init(&config).unwrap();
    let wd = Watchdog::enable_heartbeat(&config);
    let mut hw = SensorNodeHardware::new(s, tx, wd, config.tx_drain_delay_ms);
    let mut svc = SensorService::new();
    let _ = serial::sim_take_tx();

    // Two firings before any conversion is in flight: two toggles,
    // sampler untouched.
    watchdog::heartbeat_isr();
    watchdog::heartbeat_isr();
    assert_eq!(watchdog::heartbeat_count(), 2);
    assert!(!watchdog::heartbeat_level(), "two toggles return to the idle level");
    assert_eq!(sampler::state(), SamplerState::Idle);

    // Cycle 1: full-scale conversion.
    sampler::sim_set_adc_raw(0x0FFF);
    sampler::adc_complete_isr();
    let sample = svc.cycle(&mut hw);

    assert_eq!(sample.value(), 0x03FF);
    assert_eq!(serial::sim_take_tx().as_slice(), &[0x03, 0xFF]);
    assert_eq!(watchdog::heartbeat_count(), 3, "timer wake fires the heartbeat");
    assert!(watchdog::heartbeat_level());
    assert_eq!(power::current(), PowerState::Active, "awake again after the window");
    assert_eq!(sampler::state(), SamplerState::Idle);
    assert!(!watchdog::sim_wake_armed(), "wake source disarmed while awake");

    // Cycle 2: quiet probe, heartbeat completes a full blink.
    sampler::sim_set_adc_raw(0);
    sampler::adc_complete_isr();
    svc.cycle(&mut hw);

    assert_eq!(serial::sim_take_tx().as_slice(), &[0x00, 0x00]);
    assert_eq!(watchdog::heartbeat_count(), 4);
    assert!(!watchdog::heartbeat_level());
    assert_eq!(svc.cycles(), 2);
}
