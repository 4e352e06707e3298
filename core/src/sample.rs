//! Per-cycle values flowing from the sensors through fusion into the encoder.

/// Raw 20-bit register readings from the pressure/temperature sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
pub struct RawPressureSample {
    pub temperature: i32,
    pub pressure: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
pub struct PressureSample {
    /// Hundredths of a degree Celsius.
    pub temperature: i32,

    /// Pascal.
    pub pressure: i32,
}

impl PressureSample {
    pub fn temperature_celsius(&self) -> f32 {
        self.temperature as f32 / 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
pub struct HumiditySample {
    /// Degrees Celsius.
    pub temperature: f32,

    /// Percent relative humidity.
    pub humidity: f32,

    /// `false` when the read failed, in which case both values are the zero sentinel.
    pub valid: bool,
}

impl HumiditySample {
    /// Substituted for a failed humidity sensor read.
    pub const SENTINEL: Self = Self {
        temperature: 0.0,
        humidity: 0.0,
        valid: false,
    };

    pub fn new(temperature: f32, humidity: f32) -> Self {
        Self {
            temperature,
            humidity,
            valid: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
pub struct FusedReading {
    /// Degrees Celsius.
    pub temperature: f32,

    /// Percent relative humidity.
    pub humidity: f32,
}
