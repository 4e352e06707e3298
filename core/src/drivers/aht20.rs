//! Aosong AHT20 humidity and temperature sensor.

use crate::{
    error::{BusError, SensorError},
    sample::HumiditySample,
    sensor::HumidityTempSensor,
};
#[cfg(feature = "no-std")]
use defmt::{debug, warn};
use embedded_hal::{delay::DelayNs, i2c::I2c};
#[cfg(feature = "std")]
use log::{debug, warn};

pub const ADDRESS: u8 = 0x38;

const CMD_INITIALISE: [u8; 3] = [0xbe, 0x08, 0x00];
const CMD_TRIGGER_MEASUREMENT: [u8; 3] = [0xac, 0x33, 0x00];
const CMD_SOFT_RESET: u8 = 0xba;

const STATUS_BUSY: u8 = 1 << 7;
const STATUS_CALIBRATED: u8 = 1 << 3;

const RESET_DELAY_MS: u32 = 20;
const INITIALISE_DELAY_MS: u32 = 10;
const MEASUREMENT_DELAY_MS: u32 = 80;

/// Full scale of the 20 bit humidity and temperature readings.
const FULL_SCALE: f32 = (1u32 << 20) as f32;

pub struct Aht20<I2C, D> {
    i2c: I2C,
    delay: D,
}

impl<I2C: I2c, D: DelayNs> Aht20<I2C, D> {
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self { i2c, delay }
    }

    pub fn reset(&mut self) -> Result<(), BusError> {
        self.i2c
            .write(ADDRESS, &[CMD_SOFT_RESET])
            .map_err(BusError::from_i2c)?;
        self.delay.delay_ms(RESET_DELAY_MS);
        Ok(())
    }

    /// Loads the factory calibration if the sensor does not report it as loaded already.
    pub fn init(&mut self) -> Result<(), SensorError> {
        if self.status()? & STATUS_CALIBRATED != 0 {
            return Ok(());
        }

        self.i2c
            .write(ADDRESS, &CMD_INITIALISE)
            .map_err(BusError::from_i2c)?;
        self.delay.delay_ms(INITIALISE_DELAY_MS);

        if self.status()? & STATUS_CALIBRATED == 0 {
            return Err(SensorError::NotCalibrated);
        }

        Ok(())
    }

    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn status(&mut self) -> Result<u8, BusError> {
        let mut status = [0u8];
        self.i2c
            .read(ADDRESS, &mut status)
            .map_err(BusError::from_i2c)?;
        debug!("Status: {}", status[0]);
        Ok(status[0])
    }
}

impl<I2C: I2c, D: DelayNs> HumidityTempSensor for Aht20<I2C, D> {
    fn read(&mut self) -> Result<HumiditySample, SensorError> {
        self.i2c
            .write(ADDRESS, &CMD_TRIGGER_MEASUREMENT)
            .map_err(BusError::from_i2c)?;

        self.delay.delay_ms(MEASUREMENT_DELAY_MS);

        let mut buffer = [0u8; 7];
        self.i2c
            .read(ADDRESS, &mut buffer)
            .map_err(BusError::from_i2c)?;

        let expected = crc8(&buffer[..6]);
        if buffer[6] != expected {
            warn!("Measurement checksum mismatch");
            return Err(SensorError::ChecksumMismatch {
                expected,
                actual: buffer[6],
            });
        }

        if buffer[0] & STATUS_BUSY != 0 {
            return Err(SensorError::Busy);
        }

        let raw_humidity = (u32::from(buffer[1]) << 12)
            | (u32::from(buffer[2]) << 4)
            | (u32::from(buffer[3]) >> 4);
        let raw_temperature = ((u32::from(buffer[3]) & 0x0f) << 16)
            | (u32::from(buffer[4]) << 8)
            | u32::from(buffer[5]);

        Ok(HumiditySample::new(
            raw_temperature as f32 * 200.0 / FULL_SCALE - 50.0,
            raw_humidity as f32 * 100.0 / FULL_SCALE,
        ))
    }
}

/// CRC-8, polynomial 0x31, initial value 0xff.
fn crc8(data: &[u8]) -> u8 {
    data.iter().fold(0xff, |crc, byte| {
        (0..8).fold(crc ^ byte, |crc, _| {
            if crc & 0x80 != 0 {
                (crc << 1) ^ 0x31
            } else {
                crc << 1
            }
        })
    })
}
