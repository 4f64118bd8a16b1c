//! VoltLink readout node entry point.
//!
//! The mains-powered half of the link: drains the receive UART, pairs
//! bytes back into samples, and renders them through the display port.
//! No sleep discipline here; the node polls at a fixed interval.
#![deny(unused_must_use)]

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use esp_idf_hal::delay::FreeRtos;
    use log::info;

    use voltlink::adapters::display::ConsoleDisplay;
    use voltlink::adapters::hardware::ReadoutNodeHardware;
    use voltlink::app::readout::ReadoutService;
    use voltlink::config::LinkConfig;
    use voltlink::drivers::serial::SerialRx;
    use voltlink::error::InitError;

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
    info!("║  VoltLink readout v{}            ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = LinkConfig::default();
    config
        .validate()
        .map_err(|field| anyhow::anyhow!("config: invalid {field}"))?;

    // ── 3. Link + display ─────────────────────────────────────
    let rx = SerialRx::init(&config).unwrap_or_else(|e| halt("link UART", e));
    let mut link = ReadoutNodeHardware::new(rx);
    let mut display = ConsoleDisplay::new();

    // ── 4. Run ────────────────────────────────────────────────
    let mut readout = ReadoutService::new();
    readout.begin(&mut display);
    info!("System ready. Entering poll loop.");
    loop {
        readout.poll(&mut link, &mut display);
        FreeRtos::delay_ms(config.rx_poll_interval_ms);
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    // Host builds exercise the library through `cargo test`; the node
    // binaries only run on the ESP-IDF target.
    eprintln!("voltlink-readout runs on the ESP-IDF target only");
}
