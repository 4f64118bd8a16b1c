//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements  | Connects to              |
//! |------------|-------------|--------------------------|
//! | `hardware` | SamplerPort | ESP32-S3 ADC1 oneshot    |
//! |            | TxPort      | Link UART transmit       |
//! |            | PowerPort   | Light sleep + wake cause |
//! |            | RxPort      | Link UART receive        |
//! | `display`  | DisplayPort | Serial log output        |

pub mod display;
pub mod hardware;
