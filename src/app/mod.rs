//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for both VoltLink nodes:
//! the sensor-side measure/transmit/sleep cycle and the readout-side
//! decode/render loop. All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod ports;
pub mod readout;
pub mod service;
