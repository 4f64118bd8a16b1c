//! Fuzz target: `ReadoutService::poll`
//!
//! Feeds arbitrary byte streams through the whole readout path and
//! asserts it never panics and every rendered field stays within the
//! display bounds, even for pairings that slipped out of the 10-bit
//! domain.
//!
//! cargo fuzz run fuzz_readout_render

#![no_main]

use libfuzzer_sys::fuzz_target;
use voltlink::app::ports::{DisplayPort, RxPort};
use voltlink::app::readout::ReadoutService;

struct SliceRx<'a> {
    data: &'a [u8],
    pos: usize,
}

impl RxPort for SliceRx<'_> {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        let n = buf.len().min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        n
    }
}

struct BoundsCheck;

impl DisplayPort for BoundsCheck {
    fn init(&mut self) {}
    fn move_cursor(&mut self, _col: u8, _row: u8) {}
    fn write_text(&mut self, _col: u8, _row: u8, text: &str) {
        // 16-bit values render to at most five digits, padded to four.
        assert!((4..=5).contains(&text.len()));
        assert!(text.trim_start().bytes().all(|b| b.is_ascii_digit()));
    }
}

fuzz_target!(|data: &[u8]| {
    let mut rx = SliceRx { data, pos: 0 };
    let mut display = BoundsCheck;
    let mut svc = ReadoutService::new();

    let rendered = svc.poll(&mut rx, &mut display);
    assert_eq!(rendered, data.len() / 2);
    assert_eq!(svc.rendered() as usize, rendered);
});
