/// Number of bytes in the pressure sensor's trimming parameter block.
pub const CALIBRATION_BLOCK_LEN: usize = 24;

/// Factory trimming coefficients of the pressure/temperature sensor.
///
/// Read once at start-up and never modified afterwards. The acquisition loop owns the single
/// instance and lends it to every conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
pub struct SensorCalibration {
    pub dig_t1: u16,
    pub dig_t2: i16,
    pub dig_t3: i16,

    pub dig_p1: u16,
    pub dig_p2: i16,
    pub dig_p3: i16,
    pub dig_p4: i16,
    pub dig_p5: i16,
    pub dig_p6: i16,
    pub dig_p7: i16,
    pub dig_p8: i16,
    pub dig_p9: i16,
}

impl SensorCalibration {
    /// Decodes the little-endian register block starting at `0x88`.
    pub fn from_registers(block: &[u8; CALIBRATION_BLOCK_LEN]) -> Self {
        let unsigned = |i: usize| u16::from_le_bytes([block[i], block[i + 1]]);
        let signed = |i: usize| i16::from_le_bytes([block[i], block[i + 1]]);

        Self {
            dig_t1: unsigned(0),
            dig_t2: signed(2),
            dig_t3: signed(4),

            dig_p1: unsigned(6),
            dig_p2: signed(8),
            dig_p3: signed(10),
            dig_p4: signed(12),
            dig_p5: signed(14),
            dig_p6: signed(16),
            dig_p7: signed(18),
            dig_p8: signed(20),
            dig_p9: signed(22),
        }
    }
}
