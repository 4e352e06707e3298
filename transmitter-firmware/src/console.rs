use climate_transmitter_core::ConsoleOutput;
use defmt::info;

/// Diagnostic console carried over the debug probe.
pub(crate) struct DefmtConsole;

impl ConsoleOutput for DefmtConsole {
    fn write_line(&mut self, line: &str) {
        info!("{=str}", line.trim_end());
    }
}
