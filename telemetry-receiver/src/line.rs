/// Longest line accepted before the buffer is discarded.
const MAX_LINE_LEN: usize = 256;

/// Collects received bytes into newline terminated lines.
#[derive(Default)]
pub(crate) struct LineAssembler {
    buffer: Vec<u8>,
    overflowed: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Line {
    Complete(String),
    Overlong,
}

impl LineAssembler {
    /// Adds a byte, returning a line once its terminator arrives.
    pub(crate) fn push(&mut self, b: u8) -> Option<Line> {
        if b == b'\n' {
            let line = if self.overflowed {
                Line::Overlong
            } else {
                let text = String::from_utf8_lossy(&self.buffer);
                Line::Complete(text.trim_end_matches('\r').to_string())
            };

            self.buffer.clear();
            self.overflowed = false;

            return Some(line);
        }

        if self.buffer.len() < MAX_LINE_LEN {
            self.buffer.push(b);
        } else {
            self.overflowed = true;
        }

        None
    }
}
