//! Bosch BMP280 pressure and temperature sensor.

use crate::{
    calibration::{SensorCalibration, CALIBRATION_BLOCK_LEN},
    error::{BusError, SensorError},
    sample::RawPressureSample,
    sensor::PressureTempSensor,
};
#[cfg(feature = "no-std")]
use defmt::{debug, info};
use embedded_hal::i2c::I2c;
#[cfg(feature = "std")]
use log::{debug, info};

/// Address with SDO tied low.
pub const DEFAULT_ADDRESS: u8 = 0x76;

/// Address with SDO tied high.
pub const ALTERNATE_ADDRESS: u8 = 0x77;

const CHIP_ID: u8 = 0x58;

const REG_CALIBRATION: u8 = 0x88;
const REG_CHIP_ID: u8 = 0xd0;
const REG_CTRL_MEAS: u8 = 0xf4;
const REG_CONFIG: u8 = 0xf5;
const REG_PRESSURE_MSB: u8 = 0xf7;

/// 500ms standby between conversions, IIR filter coefficient 16.
const CONFIG: u8 = (0x04 << 5) | (0x05 << 2);

/// Temperature oversampling x1, pressure oversampling x4, normal mode.
const CTRL_MEAS: u8 = (0x01 << 5) | (0x03 << 2) | 0x03;

pub struct Bmp280<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Bmp280<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Checks the chip identity and starts continuous conversion.
    pub fn init(&mut self) -> Result<(), SensorError> {
        let mut id = [0u8];
        self.i2c
            .write_read(self.address, &[REG_CHIP_ID], &mut id)
            .map_err(BusError::from_i2c)?;
        debug!("Chip ID: {}", id[0]);

        if id[0] != CHIP_ID {
            return Err(SensorError::UnsupportedDevice { id: id[0] });
        }

        self.write_register(REG_CONFIG, CONFIG)?;
        self.write_register(REG_CTRL_MEAS, CTRL_MEAS)?;

        info!("Pressure sensor initialised");

        Ok(())
    }

    pub fn read_calibration(&mut self) -> Result<SensorCalibration, BusError> {
        let mut block = [0u8; CALIBRATION_BLOCK_LEN];
        self.i2c
            .write_read(self.address, &[REG_CALIBRATION], &mut block)
            .map_err(BusError::from_i2c)?;

        Ok(SensorCalibration::from_registers(&block))
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), BusError> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(BusError::from_i2c)
    }
}

impl<I2C: I2c> PressureTempSensor for Bmp280<I2C> {
    fn read_raw(&mut self) -> Result<RawPressureSample, BusError> {
        let mut buffer = [0u8; 6];
        self.i2c
            .write_read(self.address, &[REG_PRESSURE_MSB], &mut buffer)
            .map_err(BusError::from_i2c)?;

        let twenty_bit =
            |b: &[u8]| (i32::from(b[0]) << 12) | (i32::from(b[1]) << 4) | (i32::from(b[2]) >> 4);

        Ok(RawPressureSample {
            pressure: twenty_bit(&buffer[0..3]),
            temperature: twenty_bit(&buffer[3..6]),
        })
    }

    fn convert_temperature(&self, raw_temperature: i32, calibration: &SensorCalibration) -> i32 {
        compensate_temperature(raw_temperature, calibration)
    }

    fn convert_pressure(
        &self,
        raw_pressure: i32,
        raw_temperature: i32,
        calibration: &SensorCalibration,
    ) -> i32 {
        compensate_pressure(raw_pressure, raw_temperature, calibration)
    }
}

/// Fine resolution temperature shared by both compensation formulas.
fn fine_temperature(raw_temperature: i32, c: &SensorCalibration) -> i32 {
    let t1 = i32::from(c.dig_t1);
    let t2 = i32::from(c.dig_t2);
    let t3 = i32::from(c.dig_t3);

    let var1 = ((raw_temperature >> 3) - (t1 << 1)).wrapping_mul(t2) >> 11;

    let delta = (raw_temperature >> 4) - t1;
    let var2 = ((delta.wrapping_mul(delta) >> 12).wrapping_mul(t3)) >> 14;

    var1.wrapping_add(var2)
}

/// Hundredths of a degree Celsius.
pub fn compensate_temperature(raw_temperature: i32, calibration: &SensorCalibration) -> i32 {
    let t_fine = fine_temperature(raw_temperature, calibration);
    (t_fine.wrapping_mul(5) + 128) >> 8
}

/// Pascal, using the 32 bit integer formula. Returns 0 for an unusable calibration.
pub fn compensate_pressure(
    raw_pressure: i32,
    raw_temperature: i32,
    c: &SensorCalibration,
) -> i32 {
    let t_fine = fine_temperature(raw_temperature, c);

    let mut var1 = (t_fine >> 1) - 64000;
    let quarter_squared = (var1 >> 2).wrapping_mul(var1 >> 2);

    let mut var2 = (quarter_squared >> 11).wrapping_mul(i32::from(c.dig_p6));
    var2 = var2.wrapping_add(var1.wrapping_mul(i32::from(c.dig_p5)) << 1);
    var2 = (var2 >> 2).wrapping_add(i32::from(c.dig_p4) << 16);

    var1 = (((i32::from(c.dig_p3).wrapping_mul(quarter_squared >> 13)) >> 3)
        .wrapping_add(i32::from(c.dig_p2).wrapping_mul(var1) >> 1))
        >> 18;
    var1 = (32768 + var1).wrapping_mul(i32::from(c.dig_p1)) >> 15;

    if var1 == 0 {
        return 0;
    }

    let mut p = ((1_048_576 - raw_pressure).wrapping_sub(var2 >> 12) as u32).wrapping_mul(3125);
    p = if p < 0x8000_0000 {
        (p << 1) / var1 as u32
    } else {
        (p / var1 as u32) * 2
    };

    let var1 = i32::from(c.dig_p9).wrapping_mul(((p >> 3).wrapping_mul(p >> 3) >> 13) as i32) >> 12;
    let var2 = ((p >> 2) as i32).wrapping_mul(i32::from(c.dig_p8)) >> 13;

    (p as i32).wrapping_add(var1.wrapping_add(var2).wrapping_add(i32::from(c.dig_p7)) >> 4)
}
