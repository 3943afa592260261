use super::StoriesConfig;
use std::time::{Duration, SystemTime};

/// Stand-in for deadlines too far out to represent.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Durations derived from the config, passed to the store, viewer and controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timings {
    pub expiry: Duration,
    pub sweep_interval: Duration,
    pub auto_advance: Duration,
}

impl From<&StoriesConfig> for Timings {
    fn from(config: &StoriesConfig) -> Self {
        Self {
            expiry: Duration::from_secs(config.lifecycle.expiry_hours.saturating_mul(60 * 60)),
            sweep_interval: Duration::from_secs(config.lifecycle.sweep_interval_secs),
            auto_advance: Duration::from_secs(config.viewer.auto_advance_secs),
        }
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self::from(&StoriesConfig::default())
    }
}

/// `now + after`, clamped to a far-future instant when the sum is not
/// representable.
pub fn deadline_after(now: SystemTime, after: Duration) -> SystemTime {
    now.checked_add(after)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}
