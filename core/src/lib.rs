#![cfg_attr(feature = "no-std", no_std)]

pub mod acquisition;
pub mod calibration;
pub mod config;
pub mod drivers;
pub mod error;
pub mod frame;
pub mod fusion;
pub mod output;
pub mod sample;
pub mod sensor;


pub use self::{
    acquisition::{Acquisition, CycleOutcome, CycleStatistics},
    calibration::SensorCalibration,
    config::AcquisitionConfig,
    error::{BusError, EncodeError, IoError, ParseError, SensorError},
    frame::{encode, parse, TelemetryFrame, MAX_FRAME_LEN},
    fusion::{fuse, fuse_with_policy, FusionPolicy},
    output::{ConsoleOutput, SerialOutput},
    sample::{FusedReading, HumiditySample, PressureSample, RawPressureSample},
    sensor::{HumidityTempSensor, PressureTempSensor},
};
