use super::TelemetryResources;
use climate_transmitter_core::{IoError, SerialOutput};
use defmt::debug;
use embassy_rp::uart::{Blocking, Config, UartTx};

pub(crate) const SERIAL_BAUD: u32 = 115_200;

/// Telemetry link on the UART transmit pin, 8N1.
pub(crate) struct UartSerial {
    tx: UartTx<'static, Blocking>,
}

impl UartSerial {
    pub(crate) fn new(r: TelemetryResources) -> Self {
        let mut config = Config::default();
        config.baudrate = SERIAL_BAUD;

        let tx = UartTx::new_blocking(r.uart, r.tx_pin, config);

        Self { tx }
    }
}

impl SerialOutput for UartSerial {
    fn write_line(&mut self, line: &str) -> Result<(), IoError> {
        self.tx.blocking_write(line.as_bytes()).map_err(|e| {
            debug!("UART write error: {}", e);
            IoError::WriteFailed
        })?;

        self.tx.blocking_flush().map_err(|e| {
            debug!("UART flush error: {}", e);
            IoError::FlushFailed
        })
    }
}
