use crate::Rgb;

/// Bounds of the rendering area
///
/// The airport area starts at slot 0; whatever follows `end` belongs to the
/// legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderingBounds {
    pub start: usize,
    pub end: usize,
}

impl RenderingBounds {
    /// Bounds covering `count` slots from the start of the strip
    pub const fn leading(count: usize) -> Self {
        Self {
            start: 0,
            end: count,
        }
    }

    /// Get the number of LEDs in the rendering area
    pub const fn count(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the slot index falls inside the area
    pub const fn contains(self, index: usize) -> bool {
        index >= self.start && index < self.end
    }
}

/// Get a slice of the LEDs within the bounds
///
/// Bounds past the end of the buffer are clamped.
pub fn bounded(leds: &mut [Rgb], bounds: RenderingBounds) -> &mut [Rgb] {
    let end = bounds.end.min(leds.len());
    let start = bounds.start.min(end);
    &mut leds[start..end]
}
