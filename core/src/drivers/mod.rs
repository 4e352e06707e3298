//! Sensor adapters for the capability traits in [`crate::sensor`].

pub mod aht20;
pub mod bmp280;
pub mod simulated;

pub use self::{aht20::Aht20, bmp280::Bmp280, simulated::DriftingHumiditySensor};
