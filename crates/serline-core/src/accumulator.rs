/// Capacity of the line buffer, including the slot reserved for the
/// terminator. At most `LINE_CAPACITY - 1` payload bytes are emitted.
pub const LINE_CAPACITY: usize = 20;

/// End-of-line marker on the wire.
pub const LINE_TERMINATOR: u8 = b'\r';

/// Fixed-capacity accumulator for one in-progress line.
///
/// Bytes past the last payload slot do not grow the line: the cursor is
/// clamped so they overwrite that slot instead. This silently corrupts
/// overlong input (only the final overflow byte survives), but it is the
/// established wire behavior and callers depend on it.
pub struct LineAccumulator {
    buf: [u8; LINE_CAPACITY],
    cursor: usize,
    terminator: u8,
}

impl Default for LineAccumulator {
    fn default() -> Self {
        Self::new(LINE_TERMINATOR)
    }
}

impl LineAccumulator {
    pub fn new(terminator: u8) -> Self {
        Self {
            buf: [0; LINE_CAPACITY],
            cursor: 0,
            terminator,
        }
    }

    /// Feeds one byte. Returns the completed line when `byte` is the
    /// terminator, resetting the accumulator for the next line.
    pub fn push(&mut self, byte: u8) -> Option<Vec<u8>> {
        if byte == self.terminator {
            let line = self.buf[..self.cursor].to_vec();
            self.cursor = 0;
            return Some(line);
        }

        // Overflow overwrites the last payload slot; the final slot
        // stays reserved for the terminator.
        if self.cursor >= LINE_CAPACITY - 1 {
            self.cursor = LINE_CAPACITY - 2;
        }
        self.buf[self.cursor] = byte;
        self.cursor += 1;
        None
    }

    pub fn len(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }
}
