//! Link configuration parameters
//!
//! All timing, channel, and rate constants for both nodes. Values are
//! fixed at build time; the firmware carries no runtime configuration
//! surface, so changing any of these means flashing a new image.

/// Build-time link configuration
#[derive(Debug, Clone)]
pub struct LinkConfig {
    // --- Sampling ---
    /// ADC1 channel carrying the probe divider
    pub adc_channel: u32,

    // --- Serial link ---
    /// UART baud rate, both nodes (8N1)
    pub baud_rate: u32,
    /// Wait after the last byte is queued before sleeping, so the
    /// transmit shift register drains (milliseconds)
    pub tx_drain_delay_ms: u32,

    // --- Heartbeat / duty cycle ---
    /// Heartbeat firing period; also the sampling period, since each
    /// power-down window ends at a heartbeat firing (milliseconds)
    pub heartbeat_period_ms: u32,

    // --- Clock ---
    /// CPU frequency while awake (MHz)
    pub cpu_freq_mhz: u16,

    // --- Readout node ---
    /// Receive poll interval of the readout loop (milliseconds)
    pub rx_poll_interval_ms: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            // Sampling: ADC1 channel 4 = GPIO5 (see pins.rs)
            adc_channel: 4,

            // Serial link
            baud_rate: 9600,
            tx_drain_delay_ms: 5,

            // Heartbeat: ~1 Hz, matching the external liveness probe
            heartbeat_period_ms: 1000,

            // Clock: lowest frequency the PM driver supports on the S3
            cpu_freq_mhz: 80,

            // Readout
            rx_poll_interval_ms: 10,
        }
    }
}

impl LinkConfig {
    /// Startup sanity check. Returns the offending field name.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.baud_rate == 0 {
            return Err("baud_rate");
        }
        if self.heartbeat_period_ms == 0 {
            return Err("heartbeat_period_ms");
        }
        if self.tx_drain_delay_ms >= self.heartbeat_period_ms {
            return Err("tx_drain_delay_ms");
        }
        if self.rx_poll_interval_ms == 0 {
            return Err("rx_poll_interval_ms");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = LinkConfig::default();
        assert!(c.baud_rate > 0);
        assert!(c.heartbeat_period_ms > 0);
        assert!(c.cpu_freq_mhz > 0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn timing_ratios_make_sense() {
        let c = LinkConfig::default();
        assert!(
            c.tx_drain_delay_ms < c.heartbeat_period_ms,
            "drain delay must fit inside one duty cycle"
        );
        assert!(
            c.rx_poll_interval_ms < c.heartbeat_period_ms,
            "readout must poll faster than samples arrive"
        );
    }

    #[test]
    fn drain_delay_covers_two_bytes() {
        let c = LinkConfig::default();
        // Two 10-bit UART frames at the configured baud rate.
        let two_frames_ms = (2u32 * 10 * 1000).div_ceil(c.baud_rate);
        assert!(c.tx_drain_delay_ms >= two_frames_ms);
    }

    #[test]
    fn validate_flags_zero_fields() {
        let mut c = LinkConfig::default();
        c.baud_rate = 0;
        assert_eq!(c.validate(), Err("baud_rate"));

        let mut c = LinkConfig::default();
        c.heartbeat_period_ms = 0;
        assert_eq!(c.validate(), Err("heartbeat_period_ms"));
    }

    #[test]
    fn validate_flags_drain_longer_than_cycle() {
        let mut c = LinkConfig::default();
        c.tx_drain_delay_ms = c.heartbeat_period_ms;
        assert_eq!(c.validate(), Err("tx_drain_delay_ms"));
    }
}
