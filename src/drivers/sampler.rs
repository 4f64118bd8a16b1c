//! Duty-cycled analog probe sampler.
//!
//! One conversion per duty cycle. `acquire()` is written as a blocking
//! call whose suspension point is the conversion itself: the caller
//! sees arm → suspend → resume-with-result, with the completion
//! interrupt as the thing that resumes it.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: oneshot conversion on the configured ADC1 channel; the
//! driver powers the converter only for the conversion, and the chip's
//! 12-bit result is right-shifted into the link's 10-bit sample range.
//! On host/test: `sim_set_adc_raw` stages a result and
//! `adc_complete_isr()` plays the completion interrupt; the suspension
//! point is a bounded spin on that flag.

use core::sync::atomic::{AtomicU8, Ordering};
#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, AtomicU16};

use log::info;

use crate::error::InitError;
use crate::power::{self, PowerState};
use crate::wire::Sample;

/// Sampler lifecycle, observable from tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SamplerState {
    /// Between cycles; converter unpowered.
    Idle = 0,
    /// Inside the conversion window.
    Converting = 1,
}

static SAMPLER_STATE: AtomicU8 = AtomicU8::new(SamplerState::Idle as u8);

/// Current lifecycle state.
pub fn state() -> SamplerState {
    match SAMPLER_STATE.load(Ordering::Acquire) {
        1 => SamplerState::Converting,
        _ => SamplerState::Idle,
    }
}

fn set_state(s: SamplerState) {
    SAMPLER_STATE.store(s as u8, Ordering::Release);
}

// ── Host-sim conversion plumbing ──────────────────────────────

#[cfg(not(target_os = "espidf"))]
static SIM_ADC_RAW: AtomicU16 = AtomicU16::new(0);
#[cfg(not(target_os = "espidf"))]
static SIM_CONVERSION_DONE: AtomicBool = AtomicBool::new(false);

/// Bound on the simulated suspension. There is deliberately no timeout
/// in the model (a conversion that never completes hangs the node),
/// but a test that forgot to stage the completion should fail fast.
#[cfg(not(target_os = "espidf"))]
const SIM_SPIN_LIMIT: u32 = 1_000_000;

/// Stage the raw value the next conversion returns (12-bit, exactly as
/// the hardware would deliver it).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc_raw(raw: u16) {
    SIM_ADC_RAW.store(raw, Ordering::Relaxed);
}

/// Conversion-complete interrupt. Internal to the oneshot driver on
/// hardware; tests fire it (before or concurrently with `acquire`) to
/// resume the suspended conversion.
#[cfg(not(target_os = "espidf"))]
pub fn adc_complete_isr() {
    SIM_CONVERSION_DONE.store(true, Ordering::Release);
}

/// Clear staged sim state between tests.
#[cfg(not(target_os = "espidf"))]
pub fn sim_reset() {
    SIM_ADC_RAW.store(0, Ordering::Relaxed);
    SIM_CONVERSION_DONE.store(false, Ordering::Relaxed);
    set_state(SamplerState::Idle);
}

// ── Sampler ───────────────────────────────────────────────────

pub struct AnalogSampler {
    channel: u32,
    armed: bool,
}

impl AnalogSampler {
    pub fn new(channel: u32) -> Self {
        Self {
            channel,
            armed: false,
        }
    }

    /// One-time channel configuration: reference, attenuation, and the
    /// pad handover to the ADC mux. Call once before the first cycle.
    pub fn arm(&mut self) -> Result<(), InitError> {
        crate::drivers::hw_init::init_adc(self.channel)?;
        self.armed = true;
        info!("sampler: armed on ADC1 CH{}", self.channel);
        Ok(())
    }

    /// Run one conversion and return the sample.
    ///
    /// Blocking; the node sits in the ADC noise-reduction window for
    /// the duration and is back in `Active` before this returns.
    pub fn acquire(&mut self) -> Sample {
        assert!(self.armed, "acquire before arm");

        set_state(SamplerState::Converting);
        power::record_enter(PowerState::AdcNoiseReduction);

        let raw = self.convert();

        power::record_wake();
        set_state(SamplerState::Idle);

        // 12-bit conversion, 10-bit sample domain.
        Sample::from_adc(raw >> 2)
    }

    #[cfg(target_os = "espidf")]
    fn convert(&self) -> u16 {
        crate::drivers::hw_init::adc_read_raw(self.channel)
    }

    #[cfg(not(target_os = "espidf"))]
    fn convert(&self) -> u16 {
        // Suspension point: resumed by adc_complete_isr().
        let mut spins: u32 = 0;
        while !SIM_CONVERSION_DONE.swap(false, Ordering::Acquire) {
            spins += 1;
            assert!(spins < SIM_SPIN_LIMIT, "conversion never completed");
            std::thread::yield_now();
        }
        SIM_ADC_RAW.load(Ordering::Relaxed)
    }
}
