use crate::error::IoError;

/// The serial link telemetry frames are transmitted on.
pub trait SerialOutput {
    /// Writes one complete, newline terminated line.
    fn write_line(&mut self, line: &str) -> Result<(), IoError>;
}

/// Best-effort diagnostic output.
///
/// Implementations must swallow their own failures.
pub trait ConsoleOutput {
    fn write_line(&mut self, line: &str);
}

/// No console attached.
impl ConsoleOutput for () {
    fn write_line(&mut self, _line: &str) {}
}
