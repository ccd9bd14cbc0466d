//! Track image generation and selection.
//!
//! Each half of the track has two cached images: a flat background, and a
//! composite with a short indicator bar on the side facing center. The
//! composite's cap insets put the stretchable columns inside the indicator,
//! so when it is painted longer than its natural width the indicator color
//! fills from center out to the thumb.
//!
//! Which image a half shows depends only on whether the value is above
//! center. Images are regenerated when size, scale, colors or height change
//! and are reselected on every value notification.

use crate::color::TrackColor;
use crate::constants;
use crate::feedback::{CenterFeedback, TactileFeedback};
use crate::model::ValueSource;
use crate::raster::{CapInsets, TrackImage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackSide {
    /// From the range minimum up to the thumb.
    Minimum,
    /// From the thumb up to the range maximum.
    Maximum,
}

/// What a track half currently displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    Flat,
    Indicated,
}

/// Per-side states after a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackSelection {
    pub minimum: TrackState,
    pub maximum: TrackState,
}

impl TrackSelection {
    pub fn for_value(value: f32, center: f32) -> Self {
        if value <= center {
            Self {
                minimum: TrackState::Flat,
                maximum: TrackState::Indicated,
            }
        } else {
            Self {
                minimum: TrackState::Indicated,
                maximum: TrackState::Flat,
            }
        }
    }
}

/// Receives the image chosen for each side of the track.
pub trait TrackImageSink {
    fn set_track_image(&mut self, side: TrackSide, image: &TrackImage);
}

/// The images most recently pushed for each side.
#[derive(Debug, Clone, Default)]
pub struct TrackSlots {
    pub minimum: Option<TrackImage>,
    pub maximum: Option<TrackImage>,
}

impl TrackSlots {
    pub fn get(&self, side: TrackSide) -> Option<&TrackImage> {
        match side {
            TrackSide::Minimum => self.minimum.as_ref(),
            TrackSide::Maximum => self.maximum.as_ref(),
        }
    }
}

impl TrackImageSink for TrackSlots {
    fn set_track_image(&mut self, side: TrackSide, image: &TrackImage) {
        let slot = match side {
            TrackSide::Minimum => &mut self.minimum,
            TrackSide::Maximum => &mut self.maximum,
        };
        *slot = Some(image.clone());
    }
}

/// Background and indicator colors of one track half.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackStyle {
    pub background: TrackColor,
    pub foreground: TrackColor,
}

impl Default for TrackStyle {
    fn default() -> Self {
        Self {
            background: constants::DEFAULT_BACKGROUND,
            foreground: constants::DEFAULT_FOREGROUND,
        }
    }
}

/// Horizontal insets between the control bounds and its track.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AlignmentInsets {
    pub left: f64,
    pub right: f64,
}

/// The two cached images of one side.
#[derive(Debug, Clone)]
pub struct TrackImages {
    pub background: TrackImage,
    pub stretchable: TrackImage,
}

impl TrackImages {
    fn empty() -> Self {
        Self {
            background: TrackImage::filled(TrackColor::TRANSPARENT, 0.0, 0.0, 1.0),
            stretchable: TrackImage::filled(TrackColor::TRANSPARENT, 0.0, 0.0, 1.0),
        }
    }

    fn for_state(&self, state: TrackState) -> &TrackImage {
        match state {
            TrackState::Flat => &self.background,
            TrackState::Indicated => &self.stretchable,
        }
    }
}

pub struct TrackRenderer {
    width: f64,
    scale: f64,
    insets: AlignmentInsets,
    minimum_style: TrackStyle,
    maximum_style: TrackStyle,
    track_height: f64,
    feedback: CenterFeedback,
    minimum_images: TrackImages,
    maximum_images: TrackImages,
}

impl Default for TrackRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackRenderer {
    pub fn new() -> Self {
        Self {
            width: 0.0,
            scale: 1.0,
            insets: AlignmentInsets::default(),
            minimum_style: TrackStyle::default(),
            maximum_style: TrackStyle::default(),
            track_height: constants::DEFAULT_TRACK_HEIGHT,
            feedback: CenterFeedback::default(),
            minimum_images: TrackImages::empty(),
            maximum_images: TrackImages::empty(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn track_height(&self) -> f64 {
        self.track_height
    }

    pub fn style(&self, side: TrackSide) -> TrackStyle {
        match side {
            TrackSide::Minimum => self.minimum_style,
            TrackSide::Maximum => self.maximum_style,
        }
    }

    pub fn images(&self, side: TrackSide) -> &TrackImages {
        match side {
            TrackSide::Minimum => &self.minimum_images,
            TrackSide::Maximum => &self.maximum_images,
        }
    }

    pub fn is_center_feedback_enabled(&self) -> bool {
        self.feedback.is_enabled()
    }

    pub fn set_center_feedback_enabled(&mut self, enabled: bool) {
        self.feedback.set_enabled(enabled);
    }

    pub fn set_feedback_port(&mut self, port: Option<Box<dyn TactileFeedback>>) {
        self.feedback.set_port(port);
    }

    /// Width of the background on `side`: half the control less its inset.
    fn half_width(&self, side: TrackSide) -> f64 {
        let inset = match side {
            TrackSide::Minimum => self.insets.left,
            TrackSide::Maximum => self.insets.right,
        };
        (self.width / 2.0 - inset).max(0.0)
    }

    /// Rebuild both cached images of `side` from the current geometry and style.
    pub fn regenerate(&mut self, side: TrackSide) {
        let half = self.half_width(side);
        let height = self.track_height;
        let scale = self.scale;
        let indicator = constants::INDICATOR_WIDTH;
        let style = self.style(side);

        let background = TrackImage::filled(style.background, half, height, scale);
        let bar = TrackImage::filled(style.foreground, indicator, height, scale);
        let composite_width = half + indicator;

        let stretchable = match side {
            TrackSide::Minimum => TrackImage::composite(
                &background,
                &bar,
                composite_width,
                height,
                (half, 0.0),
                scale,
            )
            .with_cap_insets(CapInsets::new(half + 1.0, 1.0)),
            // Indicator first: the bar is stretched over the whole canvas and
            // the background laid on top from the indicator's right edge.
            TrackSide::Maximum => TrackImage::composite(
                &bar,
                &background,
                composite_width,
                height,
                (indicator, 0.0),
                scale,
            )
            .with_cap_insets(CapInsets::new(1.0, half + 1.0)),
        };

        log::debug!(
            "regenerated {:?} track images ({}/{}): background {:?}px, composite {:?}px",
            side,
            style.background.to_hex(),
            style.foreground.to_hex(),
            background.pixel_size(),
            stretchable.pixel_size()
        );

        let images = TrackImages {
            background,
            stretchable,
        };
        match side {
            TrackSide::Minimum => self.minimum_images = images,
            TrackSide::Maximum => self.maximum_images = images,
        }
    }

    /// Push the image for each side given `value` and `center` into `sink`.
    pub fn select_images(
        &self,
        value: f32,
        center: f32,
        sink: &mut impl TrackImageSink,
    ) -> TrackSelection {
        let selection = TrackSelection::for_value(value, center);
        log::trace!("value {value} (center {center}) selects {selection:?}");
        sink.set_track_image(
            TrackSide::Minimum,
            self.minimum_images.for_state(selection.minimum),
        );
        sink.set_track_image(
            TrackSide::Maximum,
            self.maximum_images.for_state(selection.maximum),
        );
        selection
    }

    /// Handle a value-change notification. Fires a pulse when the value is
    /// exactly center.
    pub fn on_value_changed(
        &mut self,
        source: &impl ValueSource,
        sink: &mut impl TrackImageSink,
    ) -> TrackSelection {
        let value = source.value();
        let center = source.center();
        let selection = self.select_images(value, center, sink);
        self.feedback.notify(value, center);
        selection
    }

    /// Regenerate `sides`, then reselect for the current value.
    pub fn on_size_or_style_changed(
        &mut self,
        sides: &[TrackSide],
        source: &impl ValueSource,
        sink: &mut impl TrackImageSink,
    ) -> TrackSelection {
        for &side in sides {
            self.regenerate(side);
        }
        self.select_images(source.value(), source.center(), sink)
    }

    /// Render for a static preview, without any interaction.
    pub fn prepare_for_preview(
        &mut self,
        source: &impl ValueSource,
        sink: &mut impl TrackImageSink,
    ) -> TrackSelection {
        self.on_size_or_style_changed(&BOTH_SIDES, source, sink)
    }

    pub fn set_width(
        &mut self,
        width: f64,
        source: &impl ValueSource,
        sink: &mut impl TrackImageSink,
    ) -> TrackSelection {
        self.width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        self.on_size_or_style_changed(&BOTH_SIDES, source, sink)
    }

    pub fn set_scale(
        &mut self,
        scale: f64,
        source: &impl ValueSource,
        sink: &mut impl TrackImageSink,
    ) -> TrackSelection {
        self.scale = if scale.is_finite() { scale.max(1.0) } else { 1.0 };
        self.on_size_or_style_changed(&BOTH_SIDES, source, sink)
    }

    pub fn set_alignment_insets(
        &mut self,
        insets: AlignmentInsets,
        source: &impl ValueSource,
        sink: &mut impl TrackImageSink,
    ) -> TrackSelection {
        self.insets = insets;
        self.on_size_or_style_changed(&BOTH_SIDES, source, sink)
    }

    pub fn set_track_height(
        &mut self,
        height: f64,
        source: &impl ValueSource,
        sink: &mut impl TrackImageSink,
    ) -> TrackSelection {
        self.track_height = if height.is_finite() { height.max(0.0) } else { 0.0 };
        self.on_size_or_style_changed(&BOTH_SIDES, source, sink)
    }

    pub fn set_minimum_track_background_color(
        &mut self,
        color: TrackColor,
        source: &impl ValueSource,
        sink: &mut impl TrackImageSink,
    ) -> TrackSelection {
        self.minimum_style.background = color;
        self.on_size_or_style_changed(&[TrackSide::Minimum], source, sink)
    }

    pub fn set_minimum_track_foreground_color(
        &mut self,
        color: TrackColor,
        source: &impl ValueSource,
        sink: &mut impl TrackImageSink,
    ) -> TrackSelection {
        self.minimum_style.foreground = color;
        self.on_size_or_style_changed(&[TrackSide::Minimum], source, sink)
    }

    pub fn set_maximum_track_background_color(
        &mut self,
        color: TrackColor,
        source: &impl ValueSource,
        sink: &mut impl TrackImageSink,
    ) -> TrackSelection {
        self.maximum_style.background = color;
        self.on_size_or_style_changed(&[TrackSide::Maximum], source, sink)
    }

    pub fn set_maximum_track_foreground_color(
        &mut self,
        color: TrackColor,
        source: &impl ValueSource,
        sink: &mut impl TrackImageSink,
    ) -> TrackSelection {
        self.maximum_style.foreground = color;
        self.on_size_or_style_changed(&[TrackSide::Maximum], source, sink)
    }
}

pub const BOTH_SIDES: [TrackSide; 2] = [TrackSide::Minimum, TrackSide::Maximum];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SliderModel, SliderRange};

    const RED: TrackColor = TrackColor::from_rgb(255, 0, 0);
    const BLUE: TrackColor = TrackColor::from_rgb(0, 0, 255);

    fn model(value: f32) -> SliderModel {
        SliderModel::new(value, SliderRange::new(0.0, 100.0).unwrap())
    }

    fn sized(width: f64) -> (TrackRenderer, TrackSlots) {
        let mut renderer = TrackRenderer::new();
        let mut slots = TrackSlots::default();
        renderer.set_width(width, &model(50.0), &mut slots);
        (renderer, slots)
    }

    fn row(img: &TrackImage) -> Vec<TrackColor> {
        (0..img.pixel_size().0)
            .map(|x| img.pixel(x, 0).unwrap())
            .collect()
    }

    #[test]
    fn minimum_composite_puts_indicator_after_background() {
        let (mut r, mut slots) = sized(20.0);
        r.set_minimum_track_background_color(RED, &model(50.0), &mut slots);
        r.set_minimum_track_foreground_color(BLUE, &model(50.0), &mut slots);
        let images = r.images(TrackSide::Minimum);
        assert_eq!(images.background.size(), (10.0, 1.5));
        let mut expected = vec![RED; 10];
        expected.extend([BLUE; 3]);
        assert_eq!(row(&images.stretchable), expected);
        assert_eq!(images.stretchable.cap_insets(), CapInsets::new(11.0, 1.0));
    }

    #[test]
    fn maximum_composite_puts_indicator_before_background() {
        let (mut r, mut slots) = sized(20.0);
        r.set_maximum_track_background_color(RED, &model(50.0), &mut slots);
        r.set_maximum_track_foreground_color(BLUE, &model(50.0), &mut slots);
        let images = r.images(TrackSide::Maximum);
        let mut expected = vec![BLUE; 3];
        expected.extend([RED; 10]);
        assert_eq!(row(&images.stretchable), expected);
        assert_eq!(images.stretchable.cap_insets(), CapInsets::new(1.0, 11.0));
    }

    #[test]
    fn stretched_composite_fills_indicator_to_thumb() {
        let (mut r, mut slots) = sized(20.0);
        r.set_minimum_track_background_color(RED, &model(50.0), &mut slots);
        r.set_minimum_track_foreground_color(BLUE, &model(50.0), &mut slots);
        let stretched = r.images(TrackSide::Minimum).stretchable.stretch_to(18);
        let row = row(&stretched);
        assert!(row[..10].iter().all(|c| *c == RED));
        assert!(row[10..].iter().all(|c| *c == BLUE));
    }

    #[test]
    fn insets_shrink_each_half() {
        let mut r = TrackRenderer::new();
        let mut slots = TrackSlots::default();
        let m = model(0.0);
        r.set_width(40.0, &m, &mut slots);
        r.set_alignment_insets(AlignmentInsets { left: 2.0, right: 5.0 }, &m, &mut slots);
        assert_eq!(r.images(TrackSide::Minimum).background.size().0, 18.0);
        assert_eq!(r.images(TrackSide::Maximum).background.size().0, 15.0);
    }

    #[test]
    fn scale_changes_pixel_density() {
        let (mut r, mut slots) = sized(20.0);
        r.set_scale(2.0, &model(50.0), &mut slots);
        assert_eq!(r.images(TrackSide::Minimum).background.pixel_size(), (20, 3));
        assert_eq!(r.images(TrackSide::Maximum).stretchable.pixel_size(), (26, 3));
    }

    #[test]
    fn degenerate_geometry_yields_empty_images() {
        let mut r = TrackRenderer::new();
        let mut slots = TrackSlots::default();
        let m = model(10.0);
        r.set_width(-5.0, &m, &mut slots);
        assert_eq!(r.width(), 0.0);
        assert!(r.images(TrackSide::Minimum).background.is_empty());
        r.set_width(10.0, &m, &mut slots);
        r.set_track_height(0.0, &m, &mut slots);
        assert!(r.images(TrackSide::Maximum).stretchable.is_empty());
        assert!(slots.minimum.is_some());
    }

    #[test]
    fn huge_track_height_leaves_images_empty() {
        let (mut r, mut slots) = sized(4000.0);
        let m = model(50.0);
        r.set_track_height(1_000_000.0, &m, &mut slots);
        assert!(r.images(TrackSide::Minimum).background.is_empty());
        assert!(r.images(TrackSide::Maximum).stretchable.is_empty());
        r.set_track_height(2.0, &m, &mut slots);
        assert_eq!(r.images(TrackSide::Minimum).background.pixel_size(), (2000, 2));
    }

    #[test]
    fn selection_is_a_function_of_value_against_center() {
        let (r, mut slots) = sized(20.0);
        let low = r.select_images(49.0, 50.0, &mut slots);
        assert_eq!(low, TrackSelection::for_value(0.0, 50.0));
        assert_eq!(low.minimum, TrackState::Flat);
        assert_eq!(
            slots.get(TrackSide::Maximum),
            Some(&r.images(TrackSide::Maximum).stretchable)
        );

        let high = r.select_images(50.5, 50.0, &mut slots);
        assert_eq!(high.minimum, TrackState::Indicated);
        assert_eq!(high.maximum, TrackState::Flat);
        assert_eq!(
            slots.get(TrackSide::Minimum),
            Some(&r.images(TrackSide::Minimum).stretchable)
        );
        assert_eq!(
            slots.get(TrackSide::Maximum),
            Some(&r.images(TrackSide::Maximum).background)
        );
    }

    #[test]
    fn color_change_only_touches_its_side() {
        let (mut r, mut slots) = sized(20.0);
        let max_before = r.images(TrackSide::Maximum).clone();
        let min_before = r.images(TrackSide::Minimum).clone();
        r.set_minimum_track_foreground_color(RED, &model(50.0), &mut slots);
        assert_eq!(r.images(TrackSide::Maximum).background, max_before.background);
        assert_eq!(r.images(TrackSide::Maximum).stretchable, max_before.stretchable);
        assert_ne!(r.images(TrackSide::Minimum).stretchable, min_before.stretchable);
        assert_ne!(r.images(TrackSide::Minimum).background, min_before.background);
    }

    #[test]
    fn height_change_regenerates_both_sides() {
        let (mut r, mut slots) = sized(20.0);
        let min_before = r.images(TrackSide::Minimum).background.clone();
        let max_before = r.images(TrackSide::Maximum).background.clone();
        r.set_track_height(4.0, &model(50.0), &mut slots);
        assert_ne!(r.images(TrackSide::Minimum).background, min_before);
        assert_ne!(r.images(TrackSide::Maximum).background, max_before);
        assert_eq!(r.images(TrackSide::Minimum).background.size(), (10.0, 4.0));
    }
}
