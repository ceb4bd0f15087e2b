//! Capacities and scroll engine tuning.

/// Maximum concurrently scrolling lines per display context.
pub const SCROLLABLE_LINES: usize = 16;
/// Bytes of text kept per scrolling line.
pub const SCROLL_LINE_BYTES: usize = 160;
/// Code points laid out per text pass.
pub const VISUAL_BUFFER_CHARS: usize = 128;
/// Bytes available to the formatted put variants.
pub const FORMAT_BUFFER_BYTES: usize = 256;
/// Viewports tracked per display context, the default one included.
pub const MAX_VIEWPORTS: usize = 8;

const MAX_BIDIR_LIMIT: u16 = 200;

/// Scroll engine tuning.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScrollConfig {
    /// Ticks a new line stays still before it starts moving.
    pub delay_ticks: u32,
    /// Ticks a line pauses after reaching either end.
    pub end_pause_ticks: u32,
    /// Pixels advanced per step.
    pub step: i32,
    /// Lines narrower than `width * (100 + limit) / 100` bounce instead of
    /// wrapping. `0` disables bouncing.
    pub bidir_limit: u16,
    /// Registry limit, at most [`SCROLLABLE_LINES`].
    pub max_lines: usize,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            delay_ticks: 100,
            end_pause_ticks: 200,
            step: 6,
            bidir_limit: 50,
            max_lines: SCROLLABLE_LINES,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// Step must move at least one pixel.
    InvalidStep,
    /// Bidir limit above 200%.
    InvalidBidirLimit,
    /// Line limit exceeds [`SCROLLABLE_LINES`].
    TooManyLines,
}

impl ScrollConfig {
    pub const fn with_delay(mut self, delay_ticks: u32) -> Self {
        self.delay_ticks = delay_ticks;
        self
    }

    pub const fn with_step(mut self, step: i32) -> Self {
        self.step = step;
        self
    }

    pub const fn with_bidir_limit(mut self, bidir_limit: u16) -> Self {
        self.bidir_limit = bidir_limit;
        self
    }

    pub const fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }

    pub const fn with_end_pause(mut self, end_pause_ticks: u32) -> Self {
        self.end_pause_ticks = end_pause_ticks;
        self
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.step <= 0 {
            return Err(ConfigError::InvalidStep);
        }
        if self.bidir_limit > MAX_BIDIR_LIMIT {
            return Err(ConfigError::InvalidBidirLimit);
        }
        if self.max_lines > SCROLLABLE_LINES {
            return Err(ConfigError::TooManyLines);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ScrollConfig::default().validate().is_ok());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_eq!(
            ScrollConfig::default().with_step(0).validate(),
            Err(ConfigError::InvalidStep)
        );
        assert_eq!(
            ScrollConfig::default().with_bidir_limit(250).validate(),
            Err(ConfigError::InvalidBidirLimit)
        );
        assert_eq!(
            ScrollConfig::default()
                .with_max_lines(SCROLLABLE_LINES + 1)
                .validate(),
            Err(ConfigError::TooManyLines)
        );
    }
}
