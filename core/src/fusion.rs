use crate::sample::{FusedReading, HumiditySample, PressureSample};

/// How a failed humidity sensor read is treated when combining temperatures.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
pub enum FusionPolicy {
    /// Always average both temperatures, including the zero sentinel of a failed read.
    ///
    /// A failed humidity read therefore halves the reported temperature. This matches the
    /// original averaging arithmetic.
    #[default]
    SentinelAverage,

    /// Report the pressure sensor temperature alone when the humidity sample is invalid.
    ExcludeFailed,
}

/// Combines one sample from each sensor using [`FusionPolicy::SentinelAverage`].
pub fn fuse(pressure_sample: PressureSample, humidity_sample: HumiditySample) -> FusedReading {
    fuse_with_policy(
        pressure_sample,
        humidity_sample,
        FusionPolicy::SentinelAverage,
    )
}

pub fn fuse_with_policy(
    pressure_sample: PressureSample,
    humidity_sample: HumiditySample,
    policy: FusionPolicy,
) -> FusedReading {
    let pressure_temperature = pressure_sample.temperature_celsius();

    let temperature = match policy {
        FusionPolicy::ExcludeFailed if !humidity_sample.valid => pressure_temperature,
        _ => (pressure_temperature + humidity_sample.temperature) / 2.0,
    };

    FusedReading {
        temperature,
        humidity: humidity_sample.humidity,
    }
}
