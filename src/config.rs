//! Build-time policy values.

pub use crate::oracle::DONT_CARE;

/// Super-loop period.
pub const TIMESLICE_PERIOD_MS: u32 = 7;

/// The button state machine runs on every second tick.
pub const BUTTON_SAMPLE_DIVIDER: u8 = 2;

/// Settling delay after driving a vector, measured on the bench as the
/// shortest assertion that still gives a valid output reading.
pub const PROPAGATION_DELAY_CYCLES: u32 = 10;

/// How long a result stays on the indicator before it resets.
pub const INDICATOR_TIMEOUT_MS: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckerConfig {
    pub period_ms: u32,
    pub sample_divider: u8,
    pub settle_cycles: u32,
    pub indicator_timeout_ms: u32,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        CheckerConfig {
            period_ms: TIMESLICE_PERIOD_MS,
            sample_divider: BUTTON_SAMPLE_DIVIDER,
            settle_cycles: PROPAGATION_DELAY_CYCLES,
            indicator_timeout_ms: INDICATOR_TIMEOUT_MS,
        }
    }
}

impl CheckerConfig {
    /// Indicator timeout expressed in idle ticks, rounded up.
    pub fn indicator_timeout_ticks(&self) -> u32 {
        let period = self.period_ms.max(1);
        (self.indicator_timeout_ms + period - 1) / period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_in_ticks() {
        let config = CheckerConfig::default();
        assert_eq!(config.indicator_timeout_ticks(), 1429);

        let config = CheckerConfig {
            period_ms: 10,
            indicator_timeout_ms: 100,
            ..Default::default()
        };
        assert_eq!(config.indicator_timeout_ticks(), 10);
    }
}
