//! GPIO / peripheral pin assignments for both VoltLink node boards.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Sensor node — analog probe (ADC1)
// ---------------------------------------------------------------------------

/// Battery divider tap — ADC1 channel 4 (GPIO 5 on ESP32-S3).
/// The channel number itself lives in `LinkConfig::adc_channel`.
pub const PROBE_ADC_GPIO: i32 = 5;
/// ADC attenuation for the probe divider (12 dB, full 0-3.1 V span).
pub const PROBE_ADC_ATTEN: u32 = 3; // adc_atten_t_ADC_ATTEN_DB_12

// ---------------------------------------------------------------------------
// Sensor node — heartbeat indicator
// ---------------------------------------------------------------------------

/// Digital output toggled once per watchdog heartbeat firing (~1 Hz).
/// External liveness monitors probe this line; a frozen level means the
/// node has locked up.
pub const HEARTBEAT_GPIO: i32 = 12;

// ---------------------------------------------------------------------------
// Sensor node — manual reset request (active-low, internal pull-up)
// ---------------------------------------------------------------------------

/// Falling edge requests a watchdog-backed software reset.
/// Must be an RTC-capable pad: it doubles as the GPIO sleep-wake source.
pub const RESET_REQ_GPIO: i32 = 9;

// ---------------------------------------------------------------------------
// Serial link (UART1, 8N1)
// ---------------------------------------------------------------------------

/// Sensor node transmit pin.
pub const LINK_TX_GPIO: i32 = 17;
/// Readout node receive pin.
pub const LINK_RX_GPIO: i32 = 18;
/// UART port number used on both nodes.
pub const LINK_UART_PORT: i32 = 1;
