//! System clock and peripheral power gating.
//!
//! The sensor node runs slow on purpose: the CPU is scaled down to the
//! link frequency before any baud-dependent peripheral is programmed,
//! and clocks of modules this firmware never touches are gated off.
//! Both calls happen once at startup, before the sampling loop.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;
#[cfg(target_os = "espidf")]
use log::warn;

use crate::config::LinkConfig;
use crate::error::InitError;

/// Scale the CPU down to the configured link frequency.
///
/// Uses the power-management driver so light sleep and frequency
/// switching cooperate. A toolchain built without PM support rejects
/// the call with `ESP_ERR_NOT_SUPPORTED`; the node then runs at full
/// clock, functionally identical but over power budget.
#[cfg(target_os = "espidf")]
pub fn init_clock(config: &LinkConfig) -> Result<(), InitError> {
    let pm_cfg = esp_pm_config_t {
        max_freq_mhz: i32::from(config.cpu_freq_mhz),
        min_freq_mhz: i32::from(config.cpu_freq_mhz),
        light_sleep_enable: false,
    };
    // SAFETY: esp_pm_configure copies the config; the pointer only has
    // to live for the duration of the call.
    let ret = unsafe { esp_pm_configure((&raw const pm_cfg).cast()) };
    if ret == ESP_ERR_NOT_SUPPORTED as i32 {
        warn!("clock: PM support absent, staying at full frequency");
        return Ok(());
    }
    if ret != ESP_OK as i32 {
        return Err(InitError::PowerMgmt(ret));
    }
    info!("clock: CPU locked to {} MHz", config.cpu_freq_mhz);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_clock(config: &LinkConfig) -> Result<(), InitError> {
    info!("clock(sim): CPU frequency {} MHz", config.cpu_freq_mhz);
    Ok(())
}

/// Gate the clocks of peripherals this node never uses. Purely a power
/// measure; a gated module reads as zeros until re-enabled.
#[cfg(target_os = "espidf")]
pub fn disable_unused_peripherals() {
    const UNUSED: [periph_module_t; 4] = [
        periph_module_t_PERIPH_LEDC_MODULE,
        periph_module_t_PERIPH_RMT_MODULE,
        periph_module_t_PERIPH_I2S0_MODULE,
        periph_module_t_PERIPH_TWAI_MODULE,
    ];
    for module in UNUSED {
        // SAFETY: none of these modules has been initialised; gating an
        // unused module's clock has no observable effect on the rest.
        unsafe { periph_module_disable(module) };
    }
    info!("clock: unused peripheral clocks gated");
}

#[cfg(not(target_os = "espidf"))]
pub fn disable_unused_peripherals() {
    info!("clock(sim): unused peripheral clocks gated");
}
