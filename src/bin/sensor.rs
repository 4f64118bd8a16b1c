//! VoltLink sensor node entry point.
//!
//! Hexagonal architecture with a duty-cycled measure/transmit/sleep loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                   │
//! │                                                            │
//! │  SensorNodeHardware                                        │
//! │  (SamplerPort + TxPort + PowerPort)                        │
//! │                                                            │
//! │  ──────────────── Port Trait Boundary ─────────────        │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────┐      │
//! │  │            SensorService (pure logic)            │      │
//! │  │  acquire · transmit pair · power down            │      │
//! │  └──────────────────────────────────────────────────┘      │
//! │                                                            │
//! │  Watchdog (heartbeat wake + one-way reset)                 │
//! └────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use log::info;

    use voltlink::adapters::hardware::SensorNodeHardware;
    use voltlink::app::service::SensorService;
    use voltlink::config::LinkConfig;
    use voltlink::drivers::sampler::AnalogSampler;
    use voltlink::drivers::serial::SerialTx;
    use voltlink::drivers::watchdog::{self, Watchdog};
    use voltlink::drivers::{clock, hw_init};
    use voltlink::error::InitError;

    /// Critical-init failure: log and park the node. The boot watchdog
    /// is already disarmed, so the halt is stable until a power cycle.
    fn halt(what: &str, e: InitError) -> ! {
        log::error!("{what} init failed: {e}, halting");
        loop {
            core::hint::spin_loop();
        }
    }

    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  VoltLink sensor v{}             ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Watchdog handover ──────────────────────────────────
    // First action after logging: tear down whatever watchdog
    // survived into this boot, before init can trip it.
    watchdog::disarm_boot_watchdog();
    hw_init::log_reset_reason();

    // ── 3. Configuration ──────────────────────────────────────
    let config = LinkConfig::default();
    config
        .validate()
        .map_err(|field| anyhow::anyhow!("config: invalid {field}"))?;

    // ── 4. Clock before baud-dependent peripherals ────────────
    clock::init_clock(&config).unwrap_or_else(|e| halt("clock", e));
    clock::disable_unused_peripherals();

    // ── 5. Peripherals ────────────────────────────────────────
    hw_init::init_sensor_node().unwrap_or_else(|e| halt("peripheral", e));
    let tx = SerialTx::init(&config).unwrap_or_else(|e| halt("link UART", e));
    let mut sampler = AnalogSampler::new(config.adc_channel);
    sampler.arm().unwrap_or_else(|e| halt("sampler", e));

    // ── 6. Heartbeat watchdog ─────────────────────────────────
    let wd = Watchdog::enable_heartbeat(&config);

    // ── 7. Run ────────────────────────────────────────────────
    let mut hw = SensorNodeHardware::new(sampler, tx, wd, config.tx_drain_delay_ms);
    info!("System ready. Entering measure/transmit/sleep cycle.");
    SensorService::new().run(&mut hw)
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    // Host builds exercise the library through `cargo test`; the node
    // binaries only run on the ESP-IDF target.
    eprintln!("voltlink-sensor runs on the ESP-IDF target only");
}
