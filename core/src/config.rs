use crate::fusion::FusionPolicy;

/// Time between the end of one cycle and the start of the next.
pub const DEFAULT_PERIOD_MS: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "no-std", derive(defmt::Format))]
pub struct AcquisitionConfig {
    /// Fixed sleep after every cycle, in milliseconds.
    pub period_ms: u32,

    pub fusion_policy: FusionPolicy,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            period_ms: DEFAULT_PERIOD_MS,
            fusion_policy: FusionPolicy::default(),
        }
    }
}
