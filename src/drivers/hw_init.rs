//! One-shot hardware peripheral initialization.
//!
//! Configures the sensor node's GPIO directions, interrupt service,
//! ADC oneshot unit, and sleep wake sources using raw ESP-IDF sys
//! calls. Called once from `main()` before the sampling loop starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::error::InitError;
#[cfg(target_os = "espidf")]
use crate::pins;

/// Log why the chip came up. A task-watchdog reason here means the
/// one-way reset path fired on the previous run.
#[cfg(target_os = "espidf")]
pub fn log_reset_reason() {
    // SAFETY: esp_reset_reason is a plain status read.
    let reason = unsafe { esp_reset_reason() };
    let label = match reason {
        r if r == esp_reset_reason_t_ESP_RST_POWERON => "power-on",
        r if r == esp_reset_reason_t_ESP_RST_SW => "software",
        r if r == esp_reset_reason_t_ESP_RST_TASK_WDT => "task watchdog",
        r if r == esp_reset_reason_t_ESP_RST_PANIC => "panic",
        r if r == esp_reset_reason_t_ESP_RST_BROWNOUT => "brownout",
        _ => "other",
    };
    info!("boot: reset reason = {label}");
}

#[cfg(not(target_os = "espidf"))]
pub fn log_reset_reason() {
    log::info!("boot(sim): reset reason = power-on");
}

/// Why a power-down window ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeCause {
    /// Heartbeat timer expired (the normal ~1 Hz cadence).
    Heartbeat,
    /// Reset-request line pulled low.
    ResetRequest,
    /// Anything else (spurious source); callers resume the loop.
    Other,
}

#[cfg(target_os = "espidf")]
pub fn init_sensor_node() -> Result<(), InitError> {
    // SAFETY: Called once from main() before the sampling loop;
    // single-threaded at this point.
    unsafe {
        init_gpio_outputs()?;
        init_gpio_inputs()?;
        init_isr_service()?;
        init_sleep_wake()?;
    }
    info!("hw_init: sensor node peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_sensor_node() -> Result<(), InitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), InitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::HEARTBEAT_GPIO,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(InitError::Gpio(ret));
    }
    unsafe { gpio_set_level(pins::HEARTBEAT_GPIO, 0) };

    info!("hw_init: heartbeat output configured (GPIO{})", pins::HEARTBEAT_GPIO);
    Ok(())
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), InitError> {
    // Reset request: active-low, internal pull-up holds it released.
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::RESET_REQ_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_NEGEDGE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(InitError::Gpio(ret));
    }

    info!("hw_init: reset-request input configured (GPIO{})", pins::RESET_REQ_GPIO);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured pin; safe from any context.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    true
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin.
    unsafe {
        gpio_set_level(pin, if high { 1 } else { 0 });
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or
/// the sampling-loop read path. No concurrent access is possible
/// because `init_adc()` completes before the loop starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
pub fn init_adc(channel: u32) -> Result<(), InitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(InitError::Adc(ret));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: pins::PROBE_ADC_ATTEN,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    // SAFETY: handle written above; still single-threaded init context.
    let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
    if ret != ESP_OK as i32 {
        return Err(InitError::Adc(ret));
    }

    info!(
        "hw_init: ADC1 configured (CH{channel}=probe, GPIO{})",
        pins::PROBE_ADC_GPIO
    );
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_adc(_channel: u32) -> Result<(), InitError> {
    Ok(())
}

/// Blocking oneshot conversion. The oneshot driver powers the converter
/// up for exactly one conversion and back down, so duty-cycled use costs
/// nothing between reads. A failed read logs a warning and degrades to
/// 0, so the link keeps its cadence on a dead converter.
#[cfg(target_os = "espidf")]
pub fn adc_read_raw(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: ADC1_HANDLE is written once during init_adc() before this
    // function is called; single-threaded sampling-loop access.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        log::warn!("hw_init: adc read failed (rc={ret}); zero sample");
        return 0;
    }
    raw.max(0) as u16
}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe extern "C" fn reset_req_gpio_isr(_arg: *mut core::ffi::c_void) {
    crate::drivers::reset_monitor::record_edge_from_isr();
}

/// Install the per-pin GPIO ISR service and register the reset-request
/// edge handler. The handler only records the edge; escalation happens
/// outside ISR context where the task watchdog may be reconfigured.
#[cfg(target_os = "espidf")]
unsafe fn init_isr_service() -> Result<(), InitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable). The registered handler
    // is a static function that only stores to an atomic.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
            return Err(InitError::IsrService(ret));
        }

        let ret = gpio_isr_handler_add(
            pins::RESET_REQ_GPIO,
            Some(reset_req_gpio_isr),
            core::ptr::null_mut(),
        );
        if ret != ESP_OK as i32 {
            return Err(InitError::IsrService(ret));
        }
        let ret = gpio_intr_enable(pins::RESET_REQ_GPIO);
        if ret != ESP_OK as i32 {
            return Err(InitError::IsrService(ret));
        }

        info!("hw_init: ISR service installed (reset request)");
    }
    Ok(())
}

// ── Sleep wake sources ────────────────────────────────────────

/// Arm the GPIO side of light-sleep wake: a low level on the
/// reset-request line ends any power-down window immediately, so a
/// reset request is never deferred behind a sleeping main loop.
#[cfg(target_os = "espidf")]
unsafe fn init_sleep_wake() -> Result<(), InitError> {
    // SAFETY: pins configured above; these only write wake-enable bits.
    unsafe {
        let ret = gpio_wakeup_enable(pins::RESET_REQ_GPIO, gpio_int_type_t_GPIO_INTR_LOW_LEVEL);
        if ret != ESP_OK as i32 {
            return Err(InitError::SleepWake(ret));
        }
        let ret = esp_sleep_enable_gpio_wakeup();
        if ret != ESP_OK as i32 {
            return Err(InitError::SleepWake(ret));
        }
    }
    Ok(())
}

/// Enter light sleep until one of the armed wake sources fires, and
/// report which one it was. The heartbeat timer must have been armed
/// beforehand (`Watchdog::arm_sleep_wake`), otherwise only a reset
/// request can end the window.
#[cfg(target_os = "espidf")]
pub fn light_sleep_until_wake() -> WakeCause {
    // SAFETY: wake sources were armed during init; esp_light_sleep_start
    // suspends this (the only) task until a wake source fires.
    let ret = unsafe { esp_light_sleep_start() };
    if ret != ESP_OK as i32 {
        // Sleep rejected (e.g. no wake source armed); treat as spurious.
        return WakeCause::Other;
    }
    // SAFETY: plain status read after wake.
    let cause = unsafe { esp_sleep_get_wakeup_cause() };
    match cause {
        c if c == esp_sleep_source_t_ESP_SLEEP_WAKEUP_TIMER => WakeCause::Heartbeat,
        c if c == esp_sleep_source_t_ESP_SLEEP_WAKEUP_GPIO => WakeCause::ResetRequest,
        _ => WakeCause::Other,
    }
}

/// Host build: the window collapses to its wake event. A held-low
/// simulated reset line wins over the heartbeat, mirroring the
/// hardware's wake priority when the line is already asserted.
#[cfg(not(target_os = "espidf"))]
pub fn light_sleep_until_wake() -> WakeCause {
    if crate::drivers::reset_monitor::sim_line_is_low() {
        WakeCause::ResetRequest
    } else {
        WakeCause::Heartbeat
    }
}
