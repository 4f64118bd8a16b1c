//! Sample wire format.
//!
//! Wire format:
//! ```text
//! ┌─────────────┬─────────────┐
//! │ High byte   │ Low byte    │
//! │ bits [9:8]  │ bits [7:0]  │
//! └─────────────┴─────────────┘
//! ```
//!
//! Two raw bytes per sample, high byte first. There is no framing and
//! no checksum; the receiver recovers sample boundaries purely by
//! counting bytes pairwise from link startup. A dropped byte therefore
//! flips the pairing parity of everything that follows until the link
//! is restarted.

/// Significant bits per conversion.
pub const SAMPLE_BITS: u16 = 10;

/// Largest representable sample (`2^10 - 1`).
pub const SAMPLE_MAX: u16 = (1 << SAMPLE_BITS) - 1;

/// One ADC conversion result.
///
/// Conceptually a value in `[0, 1023]`; carried as `u16` because the
/// result registers are read as a 16-bit pair. `from_bytes` is
/// deliberately not masked so the receiver reproduces the register
/// pair bit-for-bit, whatever arrived on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample(u16);

impl Sample {
    /// Build a sample from a raw conversion, masked to the 10-bit range.
    pub fn from_adc(raw: u16) -> Self {
        Self(raw & SAMPLE_MAX)
    }

    /// Recombine a transmitted byte pair: `(high << 8) | low`.
    pub fn from_bytes(high: u8, low: u8) -> Self {
        Self((u16::from(high) << 8) | u16::from(low))
    }

    pub fn value(self) -> u16 {
        self.0
    }

    /// Top two significant bits, transmitted first.
    pub fn high_byte(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Low eight bits, transmitted second.
    pub fn low_byte(self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

/// Which half of a pair the assembler expects next.
enum PairState {
    /// Next byte starts a new sample (high half).
    AwaitHigh,
    /// High half received, next byte completes the sample.
    AwaitLow { high: u8 },
}

/// Streaming byte-pair assembler (receiver side).
///
/// Feed bytes one at a time; every second byte completes a sample.
/// The assembler never skips or drops input; desynchronization after
/// a lost byte is a property of the link, not something this layer
/// can detect.
pub struct PairAssembler {
    state: PairState,
}

impl PairAssembler {
    pub fn new() -> Self {
        Self {
            state: PairState::AwaitHigh,
        }
    }

    /// Push one received byte.
    ///
    /// Returns `Some(Sample)` when this byte completes a pair.
    pub fn push(&mut self, byte: u8) -> Option<Sample> {
        match self.state {
            PairState::AwaitHigh => {
                self.state = PairState::AwaitLow { high: byte };
                None
            }
            PairState::AwaitLow { high } => {
                self.state = PairState::AwaitHigh;
                Some(Sample::from_bytes(high, byte))
            }
        }
    }

    /// True while a high byte is held waiting for its partner.
    pub fn mid_pair(&self) -> bool {
        matches!(self.state, PairState::AwaitLow { .. })
    }

    /// Drop any held half-pair (link restart).
    pub fn reset(&mut self) {
        self.state = PairState::AwaitHigh;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_scale_splits_high_then_low() {
        let s = Sample::from_adc(0x03FF);
        assert_eq!(s.high_byte(), 0x03);
        assert_eq!(s.low_byte(), 0xFF);
    }

    #[test]
    fn from_adc_masks_to_ten_bits() {
        assert_eq!(Sample::from_adc(0xFFFF).value(), SAMPLE_MAX);
        assert_eq!(Sample::from_adc(0x0400).value(), 0);
    }

    #[test]
    fn recombination_is_bit_exact() {
        for value in [0u16, 1, 0x00FF, 0x0100, 0x02AA, SAMPLE_MAX] {
            let s = Sample::from_adc(value);
            let back = Sample::from_bytes(s.high_byte(), s.low_byte());
            assert_eq!(back.value(), value);
        }
    }

    #[test]
    fn assembler_pairs_in_arrival_order() {
        let mut asm = PairAssembler::new();
        assert_eq!(asm.push(0x03), None);
        assert!(asm.mid_pair());
        assert_eq!(asm.push(0xFF), Some(Sample::from_bytes(0x03, 0xFF)));
        assert!(!asm.mid_pair());
    }

    #[test]
    fn dropped_byte_shifts_pairing() {
        // Sender emits (0x01, 0x02) (0x03, 0x04); the first byte is lost.
        let mut asm = PairAssembler::new();
        assert_eq!(asm.push(0x02), None);
        // 0x02 is now mistaken for a high byte.
        assert_eq!(asm.push(0x03), Some(Sample::from_bytes(0x02, 0x03)));
        assert_eq!(asm.push(0x04), None);
    }

    #[test]
    fn reset_discards_held_half() {
        let mut asm = PairAssembler::new();
        asm.push(0xAB);
        asm.reset();
        assert_eq!(asm.push(0x01), None);
        assert_eq!(asm.push(0x02), Some(Sample::from_bytes(0x01, 0x02)));
    }
}
