//! Log-based display adapter.
//!
//! Implements [`DisplayPort`] by writing display operations to the
//! ESP-IDF logger (which goes to UART / USB-CDC in production). A
//! future character-LCD or OLED adapter would implement the same
//! trait.

use log::info;

use crate::app::ports::DisplayPort;

/// Adapter that renders every display operation to the serial console.
pub struct ConsoleDisplay {
    cursor: (u8, u8),
}

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self { cursor: (0, 0) }
    }
}

impl DisplayPort for ConsoleDisplay {
    fn init(&mut self) {
        self.cursor = (0, 0);
        info!("DISP | ready");
    }

    fn move_cursor(&mut self, col: u8, row: u8) {
        self.cursor = (col, row);
    }

    fn write_text(&mut self, col: u8, row: u8, text: &str) {
        self.cursor = (col.saturating_add(text.len().min(255) as u8), row);
        info!("DISP | ({col},{row}) \"{text}\"");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_advances_past_written_text() {
        let mut d = ConsoleDisplay::new();
        d.init();
        d.write_text(2, 1, "1023");
        assert_eq!(d.cursor, (6, 1));
    }
}
