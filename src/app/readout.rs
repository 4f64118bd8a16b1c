//! Readout core — the receiver side of the link.
//!
//! Drains the receive port, recovers sample boundaries by pairwise
//! byte counting, and pushes right-aligned decimal strings at the
//! display port. Stateless beyond the half-pair the assembler may be
//! holding; there is no framing to resynchronise on, so a dropped
//! byte shifts every later pairing until the link restarts.

use core::fmt::Write;

use log::info;

use crate::wire::{PairAssembler, Sample};

use super::ports::{DisplayPort, RxPort};

/// Read chunk per drain pass; samples are two bytes at ~1 Hz, so even
/// a long poll gap fits comfortably.
const READ_CHUNK: usize = 32;

pub struct ReadoutService {
    assembler: PairAssembler,
    rendered: u32,
}

impl ReadoutService {
    pub fn new() -> Self {
        Self {
            assembler: PairAssembler::new(),
            rendered: 0,
        }
    }

    /// One-time display bring-up: initialise the controller and park
    /// the cursor at the value field.
    pub fn begin(&mut self, display: &mut impl DisplayPort) {
        display.init();
        display.move_cursor(0, 0);
        info!("readout started");
    }

    /// Drain everything currently readable and render each completed
    /// sample. Returns the number of samples rendered this pass.
    pub fn poll(&mut self, rx: &mut impl RxPort, display: &mut impl DisplayPort) -> usize {
        let mut buf = [0u8; READ_CHUNK];
        let mut completed = 0;
        loop {
            let n = rx.read(&mut buf);
            if n == 0 {
                break;
            }
            for &byte in &buf[..n] {
                if let Some(sample) = self.assembler.push(byte) {
                    self.render(sample, display);
                    completed += 1;
                }
            }
        }
        completed
    }

    fn render(&mut self, sample: Sample, display: &mut impl DisplayPort) {
        self.rendered = self.rendered.wrapping_add(1);
        // Four digits cover the 10-bit domain; wider values (possible
        // after a pairing slip) still fit the buffer.
        let mut text: heapless::String<8> = heapless::String::new();
        let _ = write!(text, "{:>4}", sample.value());
        display.write_text(0, 0, &text);
    }

    /// Samples rendered since startup.
    pub fn rendered(&self) -> u32 {
        self.rendered
    }
}
