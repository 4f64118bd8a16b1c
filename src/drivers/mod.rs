//! Peripheral drivers, hardware initialisation, and sleep plumbing.

pub mod clock;
pub mod hw_init;
pub mod reset_monitor;
pub mod sampler;
pub mod serial;
pub mod watchdog;
