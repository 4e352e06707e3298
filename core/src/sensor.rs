//! Capabilities the acquisition loop needs from the two sensors.

use crate::{
    calibration::SensorCalibration,
    error::{BusError, SensorError},
    sample::{HumiditySample, PressureSample, RawPressureSample},
};

pub trait PressureTempSensor {
    /// Performs the bus transaction that fetches one pair of raw readings.
    fn read_raw(&mut self) -> Result<RawPressureSample, BusError>;

    /// Converts a raw temperature to hundredths of a degree Celsius.
    fn convert_temperature(&self, raw_temperature: i32, calibration: &SensorCalibration) -> i32;

    /// Converts a raw pressure, compensated with the raw temperature taken alongside it.
    fn convert_pressure(
        &self,
        raw_pressure: i32,
        raw_temperature: i32,
        calibration: &SensorCalibration,
    ) -> i32;

    /// Reads and converts a sample in one go.
    fn read(&mut self, calibration: &SensorCalibration) -> Result<PressureSample, BusError> {
        let raw = self.read_raw()?;

        Ok(PressureSample {
            temperature: self.convert_temperature(raw.temperature, calibration),
            pressure: self.convert_pressure(raw.pressure, raw.temperature, calibration),
        })
    }
}

pub trait HumidityTempSensor {
    fn read(&mut self) -> Result<HumiditySample, SensorError>;

    /// Reads a sample, substituting [`HumiditySample::SENTINEL`] on failure.
    fn read_or_sentinel(&mut self) -> (HumiditySample, Option<SensorError>) {
        match self.read() {
            Ok(sample) => (sample, None),
            Err(e) => (HumiditySample::SENTINEL, Some(e)),
        }
    }
}
