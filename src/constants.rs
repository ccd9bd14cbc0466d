//! Sizing, color, and styling defaults for the slider.

use crate::color::TrackColor;

/// Widget height
pub const SLIDER_HEIGHT: f32 = 28.0;

/// Thumb radius
pub const THUMB_RADIUS: f64 = 10.0;

/// Default track thickness
pub const DEFAULT_TRACK_HEIGHT: f64 = 1.5;

/// Width of the center indicator bar on the composite images
pub const INDICATOR_WIDTH: f64 = 3.0;

/// Default background color of both track halves
pub const DEFAULT_BACKGROUND: TrackColor = TrackColor::LIGHT_GRAY;

/// Default indicator color of both track halves
pub const DEFAULT_FOREGROUND: TrackColor = TrackColor::BLACK;
