use embedded_hal::i2c::{Error as I2cError, ErrorKind};

/// A transaction on the shared two-wire bus did not complete.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
pub enum BusError {
    #[error("Device did not acknowledge")]
    NoAcknowledge,

    #[error("Bus arbitration lost")]
    ArbitrationLoss,

    #[error("Bus error")]
    Bus,

    #[error("Bus overrun")]
    Overrun,

    #[error("Bus transaction failed")]
    Other,
}

impl BusError {
    /// Classifies any `embedded-hal` I2C error.
    pub fn from_i2c<E: I2cError>(e: E) -> Self {
        match e.kind() {
            ErrorKind::NoAcknowledge(_) => Self::NoAcknowledge,
            ErrorKind::ArbitrationLoss => Self::ArbitrationLoss,
            ErrorKind::Bus => Self::Bus,
            ErrorKind::Overrun => Self::Overrun,
            _ => Self::Other,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
pub enum SensorError {
    #[error("Bus transaction failed: {0}")]
    Bus(#[from] BusError),

    #[error("Sensor is still busy measuring")]
    Busy,

    #[error("Sensor reports it is not calibrated")]
    NotCalibrated,

    #[error("Checksum mismatch (expected {expected:#04x}, got {actual:#04x})")]
    ChecksumMismatch { expected: u8, actual: u8 },

    #[error("Unsupported device (id {id:#04x})")]
    UnsupportedDevice { id: u8 },
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
pub enum IoError {
    #[error("Serial write failed")]
    WriteFailed,

    #[error("Serial flush failed")]
    FlushFailed,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
pub enum EncodeError {
    #[error("Reading contains a value that is not a finite number")]
    NonFiniteValue,

    #[error("Frame does not fit in the output buffer")]
    Overflow,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
pub enum ParseError {
    #[error("Frame does not start with the temperature field")]
    MissingTemperature,

    #[error("Frame has no humidity field")]
    MissingHumidity,

    #[error("Field value is not a two decimal number")]
    InvalidNumber,
}
