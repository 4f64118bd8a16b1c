//! Watchdog / heartbeat subsystem.
//!
//! One watchdog, two jobs, strictly one-way:
//!
//! ```text
//! ┌──────────┐ enable_heartbeat ┌───────────┐ request_software_reset ┌──────────────┐
//! │ Disabled │─────────────────▶│ Heartbeat │───────────────────────▶│ ResetPending │
//! └──────────┘                  └───────────┘                        └──────────────┘
//!                                 ~1 Hz firings                       terminal; ends
//!                                 toggle the pin                      in a chip reset
//! ```
//!
//! In `Heartbeat` mode the periodic firing is the timer wake that ends
//! each power-down window; every firing toggles the indicator pin once,
//! so external monitors see a ~1 Hz blink while the node is alive. In
//! `ResetPending` the task watchdog is rearmed to its minimum timeout
//! and never fed again; the heartbeat pin freezes and the chip resets.
//! No code path leaves `ResetPending`; only the reset itself does.

use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::{info, warn};

use crate::config::LinkConfig;
use crate::pins;

/// Watchdog timeout once a reset has been requested. Driver-internal:
/// the shortest interval the task watchdog accepts, so the reset lands
/// well before the next heartbeat would have fired.
const RESET_TIMEOUT_MS: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WatchdogMode {
    /// Off; only during early startup.
    Disabled = 0,
    /// Periodic firing toggles the heartbeat pin and ends sleep windows.
    Heartbeat = 1,
    /// Reset armed and counting down. Terminal.
    ResetPending = 2,
}

static MODE: AtomicU8 = AtomicU8::new(WatchdogMode::Disabled as u8);
static HEARTBEAT_LEVEL: AtomicBool = AtomicBool::new(false);
static HEARTBEAT_COUNT: AtomicU32 = AtomicU32::new(0);
#[cfg(not(target_os = "espidf"))]
static SIM_WAKE_ARMED: AtomicBool = AtomicBool::new(false);

/// Current mode.
pub fn mode() -> WatchdogMode {
    match MODE.load(Ordering::Acquire) {
        1 => WatchdogMode::Heartbeat,
        2 => WatchdogMode::ResetPending,
        _ => WatchdogMode::Disabled,
    }
}

/// Guarded transition; fails if the current mode is not `from`.
/// `ResetPending` can therefore never be left, only entered.
fn try_set_mode(from: WatchdogMode, to: WatchdogMode) -> bool {
    MODE.compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
        .is_ok()
}

/// Firings since boot. Test observability; wraps at u32.
pub fn heartbeat_count() -> u32 {
    HEARTBEAT_COUNT.load(Ordering::Relaxed)
}

/// Last driven level of the heartbeat pin.
pub fn heartbeat_level() -> bool {
    HEARTBEAT_LEVEL.load(Ordering::Relaxed)
}

/// Heartbeat firing. On hardware this runs on the timer-wake path at
/// the end of each power-down window; tests fire it directly. Exactly
/// one pin toggle per firing, and none once a reset is pending, so
/// the blink dies with the node.
pub fn heartbeat_isr() {
    if mode() != WatchdogMode::Heartbeat {
        return;
    }
    let level = !HEARTBEAT_LEVEL.fetch_xor(true, Ordering::Relaxed);
    crate::drivers::hw_init::gpio_write(pins::HEARTBEAT_GPIO, level);
    HEARTBEAT_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub struct Watchdog {
    period_us: u64,
}

impl Watchdog {
    /// Enter `Heartbeat` mode. Called once at startup, after
    /// `disarm_boot_watchdog` and peripheral init.
    pub fn enable_heartbeat(config: &LinkConfig) -> Self {
        if try_set_mode(WatchdogMode::Disabled, WatchdogMode::Heartbeat) {
            info!(
                "watchdog: heartbeat enabled ({} ms period)",
                config.heartbeat_period_ms
            );
        } else {
            warn!("watchdog: heartbeat refused (mode={:?})", mode());
        }
        Self {
            period_us: u64::from(config.heartbeat_period_ms) * 1_000,
        }
    }

    /// Arm the heartbeat firing as a sleep wake source. Called on
    /// entry to each power-down window; the timer re-arms per window,
    /// which is what makes the firing periodic.
    pub fn arm_sleep_wake(&self) {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: plain wake-source register write.
            let ret = unsafe { esp_sleep_enable_timer_wakeup(self.period_us) };
            if ret != ESP_OK as i32 {
                warn!("watchdog: timer wake arm failed (rc={ret})");
            }
        }
        #[cfg(not(target_os = "espidf"))]
        SIM_WAKE_ARMED.store(true, Ordering::Release);
    }

    /// Disarm the heartbeat wake while the node is awake and touching
    /// the transmit path, so a firing cannot land mid-transmission.
    pub fn disarm_sleep_wake(&self) {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: removes the timer from the wake-source mask.
            let ret = unsafe {
                esp_sleep_disable_wakeup_source(esp_sleep_source_t_ESP_SLEEP_WAKEUP_TIMER)
            };
            if ret != ESP_OK as i32 {
                warn!("watchdog: timer wake disarm failed (rc={ret})");
            }
        }
        #[cfg(not(target_os = "espidf"))]
        SIM_WAKE_ARMED.store(false, Ordering::Release);
    }
}

/// Repurpose the watchdog from heartbeat to reset duty. One-way: the
/// mode becomes `ResetPending`, the task watchdog is rearmed to its
/// minimum timeout with panic-on-trigger, and this function never
/// feeds it. Does not return; the only exit is the chip resetting.
pub fn request_software_reset() -> ! {
    MODE.store(WatchdogMode::ResetPending as u8, Ordering::SeqCst);
    warn!("watchdog: software reset armed ({RESET_TIMEOUT_MS} ms)");

    #[cfg(target_os = "espidf")]
    {
        let cfg = esp_task_wdt_config_t {
            timeout_ms: RESET_TIMEOUT_MS,
            idle_core_mask: 0,
            trigger_panic: true,
        };
        // SAFETY: reconfigure + subscribe from task context; the panic
        // handler performs the actual reset when the timeout expires.
        // `disarm_boot_watchdog` leaves the TWDT deinitialized, in
        // which case reconfigure reports INVALID_STATE and the
        // instance must be created fresh.
        let ret = unsafe {
            let mut ret = esp_task_wdt_reconfigure(&cfg);
            if ret == ESP_ERR_INVALID_STATE as i32 {
                ret = esp_task_wdt_init(&cfg);
            }
            if ret == ESP_OK as i32 {
                ret = esp_task_wdt_add(core::ptr::null_mut());
            }
            ret
        };
        if ret != ESP_OK as i32 {
            // A requested reset must still complete if the TWDT cannot
            // be armed; starving a watchdog that is not running would
            // hang the node forever.
            log::error!("watchdog: reset arm failed (rc={ret}); restarting directly");
            // SAFETY: esp_restart is callable from task context.
            unsafe { esp_restart() };
        }
        // Starve the watchdog.
        loop {
            core::hint::spin_loop();
        }
    }

    #[cfg(not(target_os = "espidf"))]
    {
        // The host cannot reset anything; unwind so tests regain
        // control and can observe the terminal mode.
        panic!("watchdog reset");
    }
}

/// Explicit first step of startup: tear down whatever task-watchdog
/// configuration survived into this boot (the IDF default instance, or
/// the reset-pending one that caused the restart), so a stale watchdog
/// cannot loop-reset the node while init runs.
pub fn disarm_boot_watchdog() {
    #[cfg(target_os = "espidf")]
    {
        // SAFETY: nothing has subscribed yet in this image; deinit
        // fails harmlessly if the boot config had no watchdog.
        let ret = unsafe { esp_task_wdt_deinit() };
        if ret == ESP_OK as i32 {
            info!("watchdog: boot instance disarmed");
        } else {
            info!("watchdog: no boot instance active (rc={ret})");
        }
    }
    #[cfg(not(target_os = "espidf"))]
    info!("watchdog(sim): boot instance disarmed");
}

/// Model a completed reset: fresh-boot statics. Test hygiene only.
#[cfg(not(target_os = "espidf"))]
pub fn sim_reset_all() {
    MODE.store(WatchdogMode::Disabled as u8, Ordering::SeqCst);
    HEARTBEAT_LEVEL.store(false, Ordering::SeqCst);
    HEARTBEAT_COUNT.store(0, Ordering::SeqCst);
    SIM_WAKE_ARMED.store(false, Ordering::SeqCst);
}

/// Whether the heartbeat wake source is currently armed.
#[cfg(not(target_os = "espidf"))]
pub fn sim_wake_armed() -> bool {
    SIM_WAKE_ARMED.load(Ordering::Acquire)
}

#[cfg(test)]
mod tests {
    use super::*;

    // One sequential test: the mode machine is process-wide, so
    // parallel tests would fight over it. The reset-pending half of
    // the lifecycle lives in tests/reset_path.rs (own process).
    #[test]
    fn heartbeat_lifecycle() {
        sim_reset_all();

        // Firings in Disabled mode must not touch the pin.
        heartbeat_isr();
        assert_eq!(heartbeat_count(), 0);
        assert!(!heartbeat_level());

        let wd = Watchdog::enable_heartbeat(&LinkConfig::default());
        assert_eq!(mode(), WatchdogMode::Heartbeat);

        // Exactly one toggle per firing, alternating level.
        heartbeat_isr();
        assert_eq!(heartbeat_count(), 1);
        assert!(heartbeat_level());
        heartbeat_isr();
        assert_eq!(heartbeat_count(), 2);
        assert!(!heartbeat_level());

        // Wake arming tracks the transmit-adjacent toggling.
        wd.arm_sleep_wake();
        assert!(sim_wake_armed());
        wd.disarm_sleep_wake();
        assert!(!sim_wake_armed());

        // Second enable is refused but harmless.
        let _wd2 = Watchdog::enable_heartbeat(&LinkConfig::default());
        assert_eq!(mode(), WatchdogMode::Heartbeat);
    }

    #[test]
    fn reset_timeout_preempts_next_heartbeat() {
        let c = LinkConfig::default();
        assert!(RESET_TIMEOUT_MS < c.heartbeat_period_ms);
    }
}
