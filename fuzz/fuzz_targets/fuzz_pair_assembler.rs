//! Fuzz target: `PairAssembler::push`
//!
//! Drives arbitrary byte sequences into the pairwise decoder and
//! asserts that it never panics, yields exactly one sample per two
//! bytes, and recombines each pair bit-exactly.
//!
//! cargo fuzz run fuzz_pair_assembler

#![no_main]

use libfuzzer_sys::fuzz_target;
use voltlink::wire::{PairAssembler, Sample};

fuzz_target!(|data: &[u8]| {
    let mut assembler = PairAssembler::new();
    let mut completed = 0usize;

    for (i, &byte) in data.iter().enumerate() {
        match assembler.push(byte) {
            Some(sample) => {
                completed += 1;
                // Pairing is positional: this sample must be exactly the
                // previous byte and this one.
                assert_eq!(sample, Sample::from_bytes(data[i - 1], byte));
                assert!(!assembler.mid_pair());
            }
            None => assert!(assembler.mid_pair()),
        }
    }

    assert_eq!(completed, data.len() / 2);

    // After a reset the assembler must start a fresh pair.
    assembler.reset();
    assert!(!assembler.mid_pair());
    assert!(assembler.push(0xAB).is_none());
});
