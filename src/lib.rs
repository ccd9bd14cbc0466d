//! # floem-center-slider
//!
//! A center-origin slider widget for [Floem](https://github.com/lapce/floem).
//!
//! The track fills outward from the middle of the range toward the thumb, and
//! an optional haptic pulse fires whenever the value lands exactly on center.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use floem::prelude::*;
//! use floem_center_slider::{center_slider, SliderRange, TrackColor};
//!
//! let value = RwSignal::new(0.0_f32);
//! let range = SliderRange::new(-1.0, 1.0).unwrap();
//! let slider = center_slider(value, range)
//!     .minimum_track_foreground_color(TrackColor::from_rgb(59, 130, 246))
//!     .maximum_track_foreground_color(TrackColor::from_rgb(59, 130, 246));
//! // Use `slider` in your Floem view tree.
//! ```
//!
//! The image logic lives in [`TrackRenderer`], which has no Floem
//! dependency beyond its pixel buffers and can drive any host that accepts
//! RGBA images through a [`TrackImageSink`].

mod center_slider;
mod color;
mod constants;
mod feedback;
mod model;
mod raster;
mod track;

pub use center_slider::{center_slider, CenterSlider};
pub use color::TrackColor;
pub use constants::{DEFAULT_TRACK_HEIGHT, INDICATOR_WIDTH};
pub use feedback::{CenterFeedback, TactileFeedback};
pub use model::{RangeError, SliderModel, SliderRange, ValueSource};
pub use raster::{CapInsets, TrackImage};
pub use track::{
    AlignmentInsets, TrackImageSink, TrackImages, TrackRenderer, TrackSelection, TrackSide,
    TrackSlots, TrackState, TrackStyle, BOTH_SIDES,
};
