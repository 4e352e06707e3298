//! The acquisition, fusion and transmission loop.
//!
//! Each cycle runs strictly in order: read the pressure sensor, read the humidity sensor, fuse,
//! encode, transmit, then sleep for the configured period. Every step blocks until complete.
//!
//! Failure handling per cycle:
//! - pressure sensor bus failure: nothing is transmitted this cycle
//! - humidity sensor failure: the zero sentinel sample is fused and the cycle is reported as
//!   degraded
//! - encode or serial failure: the frame is dropped
//!
//! None of these stop the loop.

use crate::{
    calibration::SensorCalibration,
    config::AcquisitionConfig,
    error::{BusError, EncodeError, IoError, SensorError},
    frame::{encode, TelemetryFrame},
    fusion::fuse_with_policy,
    output::{ConsoleOutput, SerialOutput},
    sensor::{HumidityTempSensor, PressureTempSensor},
};
use core::fmt::Write;
#[cfg(feature = "no-std")]
use defmt::{debug, warn};
use embedded_hal::delay::DelayNs;
#[cfg(feature = "std")]
use log::{debug, warn};

/// Longest diagnostic line written to the console.
const DIAGNOSTIC_LINE_LEN: usize = 96;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
pub enum CycleOutcome {
    /// A frame was transmitted. `degraded` is set when the humidity sensor failed.
    Transmitted { frame: TelemetryFrame, degraded: bool },

    /// The pressure sensor could not be read, nothing was transmitted.
    PressureSensorFailed(BusError),

    /// The fused reading could not be encoded, nothing was transmitted.
    EncodeFailed(EncodeError),

    /// The serial link rejected the frame.
    TransmitFailed(IoError),
}

/// Running totals, all wrapping on overflow.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
pub struct CycleStatistics {
    /// Number of cycles run.
    pub cycles: u32,

    /// Number of frames accepted by the serial link.
    pub transmitted: u32,

    /// Number of cycles that used the humidity sentinel.
    pub degraded: u32,

    /// Number of cycles abandoned because the pressure sensor failed.
    pub skipped: u32,

    /// Number of frames that failed to encode or transmit.
    pub dropped: u32,
}

pub struct Acquisition<P, H, S, C, D> {
    pressure_sensor: P,
    humidity_sensor: H,
    serial: S,
    console: C,
    delay: D,

    calibration: SensorCalibration,
    config: AcquisitionConfig,

    statistics: CycleStatistics,
}

impl<P, H, S, C, D> Acquisition<P, H, S, C, D>
where
    P: PressureTempSensor,
    H: HumidityTempSensor,
    S: SerialOutput,
    C: ConsoleOutput,
    D: DelayNs,
{
    pub fn new(
        pressure_sensor: P,
        humidity_sensor: H,
        serial: S,
        console: C,
        delay: D,
        calibration: SensorCalibration,
        config: AcquisitionConfig,
    ) -> Self {
        Self {
            pressure_sensor,
            humidity_sensor,
            serial,
            console,
            delay,
            calibration,
            config,
            statistics: CycleStatistics::default(),
        }
    }

    pub fn statistics(&self) -> &CycleStatistics {
        &self.statistics
    }

    pub fn config(&self) -> &AcquisitionConfig {
        &self.config
    }

    /// Runs cycles forever.
    pub fn run(&mut self) -> ! {
        loop {
            self.step();
        }
    }

    /// Runs one cycle followed by the pacing delay.
    pub fn step(&mut self) -> CycleOutcome {
        let outcome = self.run_cycle();
        self.delay.delay_ms(self.config.period_ms);
        outcome
    }

    /// Runs one cycle without pacing.
    pub fn run_cycle(&mut self) -> CycleOutcome {
        self.statistics.cycles = self.statistics.cycles.wrapping_add(1);

        let pressure_sample = match self.pressure_sensor.read(&self.calibration) {
            Ok(sample) => sample,
            Err(e) => {
                warn!("Pressure sensor read failed: {}", e);
                self.report(format_args!("ERR pressure sensor read failed: {}", e));
                self.statistics.skipped = self.statistics.skipped.wrapping_add(1);
                return CycleOutcome::PressureSensorFailed(e);
            }
        };
        debug!(
            "Pressure sensor: {} centidegrees C, {} Pa",
            pressure_sample.temperature, pressure_sample.pressure
        );

        let (humidity_sample, humidity_error) = self.humidity_sensor.read_or_sentinel();
        let degraded = humidity_error.is_some();
        if let Some(e) = humidity_error {
            self.report_degraded(e);
        }
        debug!(
            "Humidity sensor: {} C, {} %RH",
            humidity_sample.temperature, humidity_sample.humidity
        );

        let reading = fuse_with_policy(
            pressure_sample,
            humidity_sample,
            self.config.fusion_policy,
        );

        let frame = match encode(&reading) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Failed to encode telemetry frame: {}", e);
                self.report(format_args!("ERR telemetry frame not encoded: {}", e));
                self.statistics.dropped = self.statistics.dropped.wrapping_add(1);
                return CycleOutcome::EncodeFailed(e);
            }
        };

        if let Err(e) = self.serial.write_line(frame.as_str()) {
            warn!("Failed to transmit telemetry frame: {}", e);
            self.report(format_args!("ERR telemetry frame not transmitted: {}", e));
            self.statistics.dropped = self.statistics.dropped.wrapping_add(1);
            return CycleOutcome::TransmitFailed(e);
        }
        self.statistics.transmitted = self.statistics.transmitted.wrapping_add(1);

        self.console.write_line(frame.as_str());

        CycleOutcome::Transmitted { frame, degraded }
    }

    fn report_degraded(&mut self, e: SensorError) {
        warn!("Humidity sensor read failed, using sentinel: {}", e);
        self.report(format_args!(
            "WARN humidity sensor read failed, using sentinel: {}",
            e
        ));
        self.statistics.degraded = self.statistics.degraded.wrapping_add(1);
    }

    /// Writes a diagnostic line, truncated if it does not fit.
    fn report(&mut self, args: core::fmt::Arguments<'_>) {
        let mut line = heapless::String::<DIAGNOSTIC_LINE_LEN>::new();
        let _ = line.write_fmt(args);
        self.console.write_line(line.as_str());
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        fusion::FusionPolicy,
        sample::{HumiditySample, RawPressureSample},
    };
    use std::collections::VecDeque;

    /// Pressure sensor whose "raw" values already are converted values.
    struct FakePressureSensor {
        readings: VecDeque<Result<RawPressureSample, BusError>>,
    }

    impl FakePressureSensor {
        fn new(readings: impl IntoIterator<Item = Result<RawPressureSample, BusError>>) -> Self {
            Self {
                readings: readings.into_iter().collect(),
            }
        }
    }

    impl PressureTempSensor for FakePressureSensor {
        fn read_raw(&mut self) -> Result<RawPressureSample, BusError> {
            self.readings.pop_front().expect("unexpected pressure read")
        }

        fn convert_temperature(&self, raw_temperature: i32, _: &SensorCalibration) -> i32 {
            raw_temperature
        }

        fn convert_pressure(&self, raw_pressure: i32, _: i32, _: &SensorCalibration) -> i32 {
            raw_pressure
        }
    }

    struct FakeHumiditySensor {
        readings: VecDeque<Result<HumiditySample, SensorError>>,
    }

    impl FakeHumiditySensor {
        fn new(readings: impl IntoIterator<Item = Result<HumiditySample, SensorError>>) -> Self {
            Self {
                readings: readings.into_iter().collect(),
            }
        }
    }

    impl HumidityTempSensor for FakeHumiditySensor {
        fn read(&mut self) -> Result<HumiditySample, SensorError> {
            self.readings.pop_front().expect("unexpected humidity read")
        }
    }

    #[derive(Default)]
    struct RecordingSerial {
        lines: Vec<String>,
        fail: bool,
    }

    impl SerialOutput for RecordingSerial {
        fn write_line(&mut self, line: &str) -> Result<(), IoError> {
            if self.fail {
                Err(IoError::WriteFailed)
            } else {
                self.lines.push(line.to_string());
                Ok(())
            }
        }
    }

    #[derive(Default)]
    struct RecordingConsole {
        lines: Vec<String>,
    }

    impl ConsoleOutput for RecordingConsole {
        fn write_line(&mut self, line: &str) {
            self.lines.push(line.to_string());
        }
    }

    #[derive(Default)]
    struct RecordingDelay {
        total_ns: u64,
        calls: usize,
    }

    impl DelayNs for RecordingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += u64::from(ns);
            self.calls += 1;
        }
    }

    type TestAcquisition = Acquisition<
        FakePressureSensor,
        FakeHumiditySensor,
        RecordingSerial,
        RecordingConsole,
        RecordingDelay,
    >;

    fn pressure(centidegrees: i32) -> Result<RawPressureSample, BusError> {
        Ok(RawPressureSample {
            temperature: centidegrees,
            pressure: 100_656,
        })
    }

    fn acquisition(
        pressure_readings: impl IntoIterator<Item = Result<RawPressureSample, BusError>>,
        humidity_readings: impl IntoIterator<Item = Result<HumiditySample, SensorError>>,
        config: AcquisitionConfig,
    ) -> TestAcquisition {
        Acquisition::new(
            FakePressureSensor::new(pressure_readings),
            FakeHumiditySensor::new(humidity_readings),
            RecordingSerial::default(),
            RecordingConsole::default(),
            RecordingDelay::default(),
            crate::calibration::test::datasheet_example(),
            config,
        )
    }

    #[test]
    fn both_sensors_nominal() {
        let mut acquisition = acquisition(
            [pressure(2500)],
            [Ok(HumiditySample::new(55.0, 60.0))],
            AcquisitionConfig::default(),
        );

        let CycleOutcome::Transmitted { frame, degraded } = acquisition.step() else {
            panic!("expected a transmitted frame");
        };
        assert_eq!(frame.as_str(), "TEMP:40.00;HUM:60.00\n");
        assert!(!degraded);

        assert_eq!(acquisition.serial.lines, vec!["TEMP:40.00;HUM:60.00\n"]);
        assert_eq!(acquisition.console.lines, vec!["TEMP:40.00;HUM:60.00\n"]);
        assert_eq!(acquisition.delay.total_ns, 1_000_000_000);
    }

    #[test]
    fn humidity_sensor_failure_averages_sentinel() {
        let mut acquisition = acquisition(
            [pressure(2400)],
            [Err(SensorError::ChecksumMismatch {
                expected: 0x12,
                actual: 0x34,
            })],
            AcquisitionConfig::default(),
        );

        let CycleOutcome::Transmitted { frame, degraded } = acquisition.step() else {
            panic!("expected a transmitted frame");
        };
        assert_eq!(frame.as_str(), "TEMP:12.00;HUM:0.00\n");
        assert!(degraded);

        assert_eq!(acquisition.serial.lines, vec!["TEMP:12.00;HUM:0.00\n"]);

        assert_eq!(acquisition.console.lines.len(), 2);
        assert!(acquisition.console.lines[0].starts_with("WARN humidity sensor read failed"));
        assert_eq!(acquisition.console.lines[1], "TEMP:12.00;HUM:0.00\n");

        assert_eq!(acquisition.statistics().degraded, 1);
    }

    #[test]
    fn humidity_sensor_failure_excluded_by_policy() {
        let mut acquisition = acquisition(
            [pressure(2400)],
            [Err(SensorError::Busy)],
            AcquisitionConfig {
                fusion_policy: FusionPolicy::ExcludeFailed,
                ..Default::default()
            },
        );

        acquisition.step();

        assert_eq!(acquisition.serial.lines, vec!["TEMP:24.00;HUM:0.00\n"]);
    }

    #[test]
    fn pressure_sensor_failure_skips_cycle() {
        let mut acquisition = acquisition(
            [Err(BusError::NoAcknowledge)],
            [],
            AcquisitionConfig::default(),
        );

        let outcome = acquisition.step();

        assert_eq!(
            outcome,
            CycleOutcome::PressureSensorFailed(BusError::NoAcknowledge)
        );
        assert!(acquisition.serial.lines.is_empty());
        assert_eq!(acquisition.console.lines.len(), 1);
        assert!(acquisition.console.lines[0].starts_with("ERR pressure sensor read failed"));
        assert_eq!(acquisition.delay.total_ns, 1_000_000_000);
        assert_eq!(acquisition.statistics().skipped, 1);
    }

    #[test]
    fn loop_continues_after_pressure_sensor_failure() {
        let mut acquisition = acquisition(
            [Err(BusError::Other), pressure(2500)],
            [Ok(HumiditySample::new(55.0, 60.0))],
            AcquisitionConfig::default(),
        );

        acquisition.step();
        let outcome = acquisition.step();

        assert!(matches!(outcome, CycleOutcome::Transmitted { .. }));
        assert_eq!(acquisition.serial.lines, vec!["TEMP:40.00;HUM:60.00\n"]);
        assert_eq!(acquisition.delay.calls, 2);
        assert_eq!(acquisition.delay.total_ns, 2_000_000_000);
    }

    #[test]
    fn serial_failure_drops_frame() {
        let mut acquisition = acquisition(
            [pressure(2500), pressure(2500)],
            [
                Ok(HumiditySample::new(55.0, 60.0)),
                Ok(HumiditySample::new(55.0, 60.0)),
            ],
            AcquisitionConfig::default(),
        );
        acquisition.serial.fail = true;

        let outcome = acquisition.step();
        assert_eq!(outcome, CycleOutcome::TransmitFailed(IoError::WriteFailed));
        assert_eq!(acquisition.console.lines.len(), 1);
        assert!(acquisition.console.lines[0].starts_with("ERR telemetry frame not transmitted"));

        acquisition.serial.fail = false;
        let outcome = acquisition.step();
        assert!(matches!(outcome, CycleOutcome::Transmitted { .. }));
        assert_eq!(acquisition.serial.lines.len(), 1);
    }

    #[test]
    fn unencodable_reading_drops_frame() {
        let mut acquisition = acquisition(
            [pressure(2500)],
            [Ok(HumiditySample::new(f32::NAN, 60.0))],
            AcquisitionConfig::default(),
        );

        let outcome = acquisition.step();

        assert_eq!(
            outcome,
            CycleOutcome::EncodeFailed(EncodeError::NonFiniteValue)
        );
        assert!(acquisition.serial.lines.is_empty());
    }

    #[test]
    fn configured_period() {
        let mut acquisition = acquisition(
            [pressure(2500)],
            [Ok(HumiditySample::new(55.0, 60.0))],
            AcquisitionConfig {
                period_ms: 250,
                ..Default::default()
            },
        );

        assert_eq!(acquisition.config().period_ms, 250);

        acquisition.step();

        assert_eq!(acquisition.delay.total_ns, 250_000_000);
    }

    #[test]
    fn run_cycle_does_not_pace() {
        let mut acquisition = acquisition(
            [pressure(2500)],
            [Ok(HumiditySample::new(55.0, 60.0))],
            AcquisitionConfig::default(),
        );

        acquisition.run_cycle();

        assert_eq!(acquisition.delay.calls, 0);
    }

    #[test]
    fn statistics() {
        let mut acquisition = acquisition(
            [
                pressure(2500),
                Err(BusError::Bus),
                pressure(2500),
                pressure(2500),
            ],
            [
                Ok(HumiditySample::new(55.0, 60.0)),
                Err(SensorError::Busy),
                Ok(HumiditySample::new(55.0, 60.0)),
            ],
            AcquisitionConfig::default(),
        );

        for _ in 0..4 {
            acquisition.step();
        }

        assert_eq!(
            acquisition.statistics(),
            &CycleStatistics {
                cycles: 4,
                transmitted: 3,
                degraded: 1,
                skipped: 1,
                dropped: 0,
            }
        );
    }
}
