//! Slider value and range.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("slider bounds must be finite")]
    NonFinite,
    #[error("slider minimum is greater than maximum")]
    Inverted,
}

/// Closed `[minimum, maximum]` range of a slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderRange {
    minimum: f32,
    maximum: f32,
}

impl SliderRange {
    pub fn new(minimum: f32, maximum: f32) -> Result<Self, RangeError> {
        if !minimum.is_finite() || !maximum.is_finite() {
            return Err(RangeError::NonFinite);
        }
        if minimum > maximum {
            return Err(RangeError::Inverted);
        }
        Ok(Self { minimum, maximum })
    }

    pub fn minimum(&self) -> f32 {
        self.minimum
    }

    pub fn maximum(&self) -> f32 {
        self.maximum
    }

    /// Midpoint of the range. The track switches images here.
    pub fn center(&self) -> f32 {
        (self.minimum + self.maximum) / 2.0
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.minimum, self.maximum)
    }

    /// Position of `value` along the range, 0.0 at the minimum.
    pub fn fraction(&self, value: f32) -> f64 {
        let span = (self.maximum - self.minimum) as f64;
        if span <= 0.0 {
            return 0.0;
        }
        ((self.clamp(value) - self.minimum) as f64 / span).clamp(0.0, 1.0)
    }

    pub fn value_at(&self, fraction: f64) -> f32 {
        let t = fraction.clamp(0.0, 1.0);
        self.minimum + ((self.maximum - self.minimum) as f64 * t) as f32
    }
}

impl Default for SliderRange {
    fn default() -> Self {
        Self {
            minimum: 0.0,
            maximum: 1.0,
        }
    }
}

/// Read access to a slider's current value and range.
pub trait ValueSource {
    fn value(&self) -> f32;
    fn range(&self) -> SliderRange;

    fn center(&self) -> f32 {
        self.range().center()
    }
}

/// Plain value holder used by [`CenterSlider`](crate::CenterSlider) and tests.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SliderModel {
    value: f32,
    range: SliderRange,
}

impl SliderModel {
    pub fn new(value: f32, range: SliderRange) -> Self {
        Self {
            value: range.clamp(value),
            range,
        }
    }

    /// Store `value` clamped to the range. NaN is ignored.
    pub fn set_value(&mut self, value: f32) {
        if !value.is_nan() {
            self.value = self.range.clamp(value);
        }
    }

    pub fn set_range(&mut self, range: SliderRange) {
        self.range = range;
        self.value = range.clamp(self.value);
    }
}

impl ValueSource for SliderModel {
    fn value(&self) -> f32 {
        self.value
    }

    fn range(&self) -> SliderRange {
        self.range
    }
}
