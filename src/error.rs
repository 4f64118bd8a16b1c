//! Unified error types for the VoltLink firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping
//! error handling in the two node binaries uniform. All variants are
//! `Copy` so failures can cross init boundaries without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Peripheral initialisation failed.
    Init(InitError),
    /// Configuration is invalid (names the offending field).
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Config(field) => write!(f, "config: invalid {field}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Peripheral init errors
// ---------------------------------------------------------------------------

/// Initialisation failures carry the raw ESP-IDF return code so field
/// logs can be matched against `esp_err_t` tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// GPIO matrix / pad configuration rejected.
    Gpio(i32),
    /// GPIO interrupt service or handler registration failed.
    IsrService(i32),
    /// ADC oneshot unit or channel configuration failed.
    Adc(i32),
    /// UART driver install, parameter, or pin routing failed.
    Uart(i32),
    /// Power-management / frequency-scaling configuration rejected.
    PowerMgmt(i32),
    /// Sleep wakeup-source arming failed.
    SleepWake(i32),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpio(rc) => write!(f, "GPIO config failed (rc={rc})"),
            Self::IsrService(rc) => write!(f, "ISR service failed (rc={rc})"),
            Self::Adc(rc) => write!(f, "ADC config failed (rc={rc})"),
            Self::Uart(rc) => write!(f, "UART config failed (rc={rc})"),
            Self::PowerMgmt(rc) => write!(f, "PM config failed (rc={rc})"),
            Self::SleepWake(rc) => write!(f, "sleep wake arm failed (rc={rc})"),
        }
    }
}

impl From<InitError> for Error {
    fn from(e: InitError) -> Self {
        Self::Init(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_return_code() {
        let e = Error::from(InitError::Uart(-1));
        assert_eq!(e.to_string(), "init: UART config failed (rc=-1)");
    }

    #[test]
    fn config_error_names_field() {
        let e = Error::Config("baud_rate");
        assert_eq!(e.to_string(), "config: invalid baud_rate");
    }
}
