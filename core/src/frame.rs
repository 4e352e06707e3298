//! Telemetry frame encoding and decoding.
//!
//! A frame is a single ASCII line of the form `TEMP:<t>;HUM:<h>\n`, where each value is
//! rendered with exactly two digits after the decimal point.

use crate::{
    error::{EncodeError, ParseError},
    sample::FusedReading,
};
use core::fmt::Write;
use heapless::String;

/// Maximum number of characters in a frame, including the terminating newline.
pub const MAX_FRAME_LEN: usize = 63;

const TEMPERATURE_TAG: &str = "TEMP:";
const HUMIDITY_TAG: &str = ";HUM:";

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
pub struct TelemetryFrame(String<MAX_FRAME_LEN>);

impl TelemetryFrame {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl core::fmt::Display for TelemetryFrame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders a reading as a frame.
///
/// Values that round to zero are always written as `0.00`, never `-0.00`.
pub fn encode(reading: &FusedReading) -> Result<TelemetryFrame, EncodeError> {
    let mut frame = String::new();

    frame
        .push_str(TEMPERATURE_TAG)
        .map_err(|_| EncodeError::Overflow)?;
    push_value(&mut frame, reading.temperature)?;
    frame
        .push_str(HUMIDITY_TAG)
        .map_err(|_| EncodeError::Overflow)?;
    push_value(&mut frame, reading.humidity)?;
    frame.push('\n').map_err(|_| EncodeError::Overflow)?;

    Ok(TelemetryFrame(frame))
}

fn push_value(frame: &mut String<MAX_FRAME_LEN>, value: f32) -> Result<(), EncodeError> {
    if !value.is_finite() {
        return Err(EncodeError::NonFiniteValue);
    }

    // f32::MAX needs 39 integer digits
    let mut digits: String<48> = String::new();
    write!(digits, "{:.2}", value).map_err(|_| EncodeError::Overflow)?;

    let rendered = match digits.strip_prefix('-') {
        Some(magnitude) if magnitude.bytes().all(|b| b == b'0' || b == b'.') => magnitude,
        _ => digits.as_str(),
    };

    frame.push_str(rendered).map_err(|_| EncodeError::Overflow)
}

/// Decodes a frame produced by [`encode`].
///
/// The trailing newline is optional so that line oriented readers can pass stripped lines.
pub fn parse(line: &str) -> Result<FusedReading, ParseError> {
    let line = line.strip_suffix('\n').unwrap_or(line);

    let fields = line
        .strip_prefix(TEMPERATURE_TAG)
        .ok_or(ParseError::MissingTemperature)?;

    let (temperature, humidity) = fields
        .split_once(HUMIDITY_TAG)
        .ok_or(ParseError::MissingHumidity)?;

    Ok(FusedReading {
        temperature: parse_value(temperature)?,
        humidity: parse_value(humidity)?,
    })
}

fn parse_value(field: &str) -> Result<f32, ParseError> {
    let (integer, fraction) = field.split_once('.').ok_or(ParseError::InvalidNumber)?;
    let integer = integer.strip_prefix('-').unwrap_or(integer);

    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(integer) || !is_digits(fraction) || fraction.len() != 2 {
        return Err(ParseError::InvalidNumber);
    }

    field.parse().map_err(|_| ParseError::InvalidNumber)
}
