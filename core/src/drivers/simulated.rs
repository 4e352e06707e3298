//! Stand-in for the humidity sensor on boards where it is not fitted.

use crate::{error::SensorError, sample::HumiditySample, sensor::HumidityTempSensor};

const TEMPERATURE_RANGE: (f32, f32) = (24.0, 30.0);
const TEMPERATURE_STEP: f32 = 0.05;

const HUMIDITY_RANGE: (f32, f32) = (45.0, 70.0);
const HUMIDITY_STEP: f32 = 0.1;

/// Produces slowly drifting values that bounce between fixed limits.
#[derive(Debug, Clone)]
pub struct DriftingHumiditySensor {
    temperature: Drift,
    humidity: Drift,
}

impl Default for DriftingHumiditySensor {
    fn default() -> Self {
        Self {
            temperature: Drift::new(24.0, TEMPERATURE_STEP, TEMPERATURE_RANGE),
            humidity: Drift::new(55.0, HUMIDITY_STEP, HUMIDITY_RANGE),
        }
    }
}

impl HumidityTempSensor for DriftingHumiditySensor {
    fn read(&mut self) -> Result<HumiditySample, SensorError> {
        Ok(HumiditySample::new(
            self.temperature.advance(),
            self.humidity.advance(),
        ))
    }
}

#[derive(Debug, Clone)]
struct Drift {
    value: f32,
    step: f32,
    range: (f32, f32),
}

impl Drift {
    fn new(value: f32, step: f32, range: (f32, f32)) -> Self {
        Self { value, step, range }
    }

    /// Moves one step, reversing direction once the value has left the range.
    fn advance(&mut self) -> f32 {
        self.value += self.step;

        if self.value > self.range.1 || self.value < self.range.0 {
            self.step = -self.step;
        }

        self.value
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn first_reading_moves_one_step() {
        let mut sensor = DriftingHumiditySensor::default();
        let sample = sensor.read().unwrap();

        assert_eq!(sample.temperature, 24.0 + TEMPERATURE_STEP);
        assert_eq!(sample.humidity, 55.0 + HUMIDITY_STEP);
        assert!(sample.valid);
    }

    #[test]
    fn values_stay_near_their_range() {
        let mut sensor = DriftingHumiditySensor::default();

        for _ in 0..10_000 {
            let sample = sensor.read().unwrap();

            assert!(sample.temperature >= TEMPERATURE_RANGE.0 - TEMPERATURE_STEP * 1.5);
            assert!(sample.temperature <= TEMPERATURE_RANGE.1 + TEMPERATURE_STEP * 1.5);
            assert!(sample.humidity >= HUMIDITY_RANGE.0 - HUMIDITY_STEP * 1.5);
            assert!(sample.humidity <= HUMIDITY_RANGE.1 + HUMIDITY_STEP * 1.5);
        }
    }

    #[test]
    fn direction_reverses_at_upper_limit() {
        let mut drift = Drift::new(29.98, 0.05, TEMPERATURE_RANGE);

        let over = drift.advance();
        assert!(over > 30.0);

        let back = drift.advance();
        assert!(back < over);
    }
}
