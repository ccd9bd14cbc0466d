//! Center-origin slider view.
//!
//! The track is painted from two raster images chosen by [`TrackRenderer`]:
//! the minimum half runs from the left edge to the thumb, the maximum half
//! from the thumb to the right edge. Each image is three-slice stretched to
//! its half's current length and cached until the image or length changes.

use floem::kurbo::{Circle, Rect};
use floem::peniko::{self, Color};

use floem::reactive::{create_effect, RwSignal, SignalGet, SignalUpdate};
use floem::views::Decorators;
use floem::{
    context::{ComputeLayoutCx, EventCx, PaintCx, UpdateCx},
    event::{Event, EventPropagation},
    View, ViewId,
};
use floem_renderer::Renderer;

use crate::color::TrackColor;
use crate::constants;
use crate::feedback::TactileFeedback;
use crate::model::{SliderModel, SliderRange, ValueSource};
use crate::raster::TrackImage;
use crate::track::{AlignmentInsets, TrackRenderer, TrackSide, TrackSlots};

enum SliderUpdate {
    Value(f32),
}

/// A stretched track image ready for the renderer.
#[derive(Default)]
struct PaintCache {
    key: Option<(u64, u32)>,
    img: Option<peniko::Image>,
    hash: Vec<u8>,
}

impl PaintCache {
    fn ensure(&mut self, image: &TrackImage, px_width: u32) {
        let key = (image.id(), px_width);
        if self.key == Some(key) {
            return;
        }
        let stretched = image.stretch_to(px_width);
        self.img = stretched.to_peniko();
        self.hash = stretched.id().to_le_bytes().to_vec();
        self.key = Some(key);
    }
}

pub struct CenterSlider {
    id: ViewId,
    held: bool,
    model: SliderModel,
    size: floem::taffy::prelude::Size<f32>,
    on_change: Option<Box<dyn Fn(f32)>>,
    renderer: TrackRenderer,
    slots: TrackSlots,
    minimum_paint: PaintCache,
    maximum_paint: PaintCache,
}

/// Calls `notify` once for every write to `value` after this call.
///
/// The effect's initial run only subscribes, so mounting never counts as a
/// value change.
fn forward_writes(value: RwSignal<f32>, notify: impl Fn(f32) + 'static) {
    create_effect(move |prev: Option<()>| {
        let v = value.get();
        if prev.is_some() {
            notify(v);
        }
    });
}

/// Value under pointer `x` on a slider `width` wide. The thumb center
/// travels over `width - 2 * THUMB_RADIUS`; `None` when that is empty.
fn value_at_pointer(range: SliderRange, x: f64, width: f64) -> Option<f32> {
    let r = constants::THUMB_RADIUS;
    let usable = width - 2.0 * r;
    if usable > 0.0 {
        Some(range.value_at((x - r) / usable))
    } else {
        None
    }
}

/// New value for a pointer at `x`, or `None` when `model` would not change.
fn pointer_change(model: &SliderModel, x: f64, width: f64) -> Option<f32> {
    let range = model.range();
    let v = range.clamp(value_at_pointer(range, x, width)?);
    (v != model.value()).then_some(v)
}

/// Thumb center x for `value` on a slider `width` wide.
fn thumb_center(range: SliderRange, value: f32, width: f64) -> f64 {
    let r = constants::THUMB_RADIUS;
    r + range.fraction(value) * (width - 2.0 * r).max(0.0)
}

/// Creates a horizontal slider whose track fills outward from the center
/// of `range`.
///
/// `value` is read for external updates and written on pointer input.
/// Every write, from either side, is one value notification.
pub fn center_slider(value: RwSignal<f32>, range: SliderRange) -> CenterSlider {
    let id = ViewId::new();

    forward_writes(value, move |v| id.update_state(SliderUpdate::Value(v)));

    let model = SliderModel::new(value.get_untracked(), range);
    let mut renderer = TrackRenderer::new();
    let mut slots = TrackSlots::default();
    renderer.prepare_for_preview(&model, &mut slots);

    CenterSlider {
        id,
        held: false,
        model,
        size: Default::default(),
        on_change: Some(Box::new(move |v| {
            value.set(v);
        })),
        renderer,
        slots,
        minimum_paint: PaintCache::default(),
        maximum_paint: PaintCache::default(),
    }
    .style(|s| {
        s.height(constants::SLIDER_HEIGHT)
            .min_width(2.0 * constants::THUMB_RADIUS as f32)
            .cursor(floem::style::CursorStyle::Pointer)
    })
}

impl CenterSlider {
    pub fn minimum_track_background_color(mut self, color: TrackColor) -> Self {
        self.renderer
            .set_minimum_track_background_color(color, &self.model, &mut self.slots);
        self
    }

    pub fn minimum_track_foreground_color(mut self, color: TrackColor) -> Self {
        self.renderer
            .set_minimum_track_foreground_color(color, &self.model, &mut self.slots);
        self
    }

    pub fn maximum_track_background_color(mut self, color: TrackColor) -> Self {
        self.renderer
            .set_maximum_track_background_color(color, &self.model, &mut self.slots);
        self
    }

    pub fn maximum_track_foreground_color(mut self, color: TrackColor) -> Self {
        self.renderer
            .set_maximum_track_foreground_color(color, &self.model, &mut self.slots);
        self
    }

    /// Track thickness in logical pixels (default 1.5).
    pub fn track_height(mut self, height: f64) -> Self {
        self.renderer
            .set_track_height(height, &self.model, &mut self.slots);
        self
    }

    pub fn alignment_insets(mut self, left: f64, right: f64) -> Self {
        self.renderer.set_alignment_insets(
            AlignmentInsets { left, right },
            &self.model,
            &mut self.slots,
        );
        self
    }

    /// Install the haptic generator used for the center pulse.
    pub fn feedback(mut self, port: impl TactileFeedback + 'static) -> Self {
        self.renderer.set_feedback_port(Some(Box::new(port)));
        self
    }

    pub fn center_feedback_enabled(mut self, enabled: bool) -> Self {
        self.renderer.set_center_feedback_enabled(enabled);
        self
    }

    fn thumb_x(&self) -> f64 {
        thumb_center(
            self.model.range(),
            self.model.value(),
            self.size.width as f64,
        )
    }

    /// Returns whether the value changed.
    fn update_from_pointer(&mut self, x: f64) -> bool {
        match pointer_change(&self.model, x, self.size.width as f64) {
            Some(v) => {
                self.model.set_value(v);
                true
            }
            None => false,
        }
    }

    fn emit_change(&self) {
        if let Some(cb) = &self.on_change {
            cb(self.model.value());
        }
    }
}

fn paint_track(
    cx: &mut PaintCx,
    cache: &mut PaintCache,
    image: Option<&TrackImage>,
    rect: Rect,
    scale: f64,
) {
    let Some(image) = image else {
        return;
    };
    let px_width = (rect.width() * scale).round() as u32;
    if px_width == 0 || rect.height() <= 0.0 {
        return;
    }
    cache.ensure(image, px_width);
    if let Some(ref img) = cache.img {
        cx.draw_img(
            floem_renderer::Img {
                img: img.clone(),
                hash: &cache.hash,
            },
            rect,
        );
    }
}

impl View for CenterSlider {
    fn id(&self) -> ViewId {
        self.id
    }

    fn update(&mut self, _cx: &mut UpdateCx, state: Box<dyn std::any::Any>) {
        if let Ok(update) = state.downcast::<SliderUpdate>() {
            match *update {
                SliderUpdate::Value(v) => {
                    self.model.set_value(v);
                    self.renderer.on_value_changed(&self.model, &mut self.slots);
                }
            }
            self.id.request_paint();
        }
    }

    fn event_before_children(&mut self, cx: &mut EventCx, event: &Event) -> EventPropagation {
        match event {
            Event::PointerDown(e) => {
                cx.update_active(self.id());
                self.held = true;
                if self.update_from_pointer(e.pos.x) {
                    self.emit_change();
                    self.id.request_paint();
                }
                EventPropagation::Stop
            }
            Event::PointerMove(e) => {
                if self.held {
                    if self.update_from_pointer(e.pos.x) {
                        self.emit_change();
                        self.id.request_paint();
                    }
                    EventPropagation::Stop
                } else {
                    EventPropagation::Continue
                }
            }
            Event::PointerUp(_) => {
                self.held = false;
                EventPropagation::Continue
            }
            Event::FocusLost => {
                self.held = false;
                EventPropagation::Continue
            }
            _ => EventPropagation::Continue,
        }
    }

    fn compute_layout(&mut self, _cx: &mut ComputeLayoutCx) -> Option<Rect> {
        let layout = self.id.get_layout().unwrap_or_default();
        self.size = layout.size;
        let width = self.size.width as f64;
        if width != self.renderer.width() {
            self.renderer.set_width(width, &self.model, &mut self.slots);
        }
        None
    }

    fn paint(&mut self, cx: &mut PaintCx) {
        let w = self.size.width as f64;
        let h = self.size.height as f64;
        if w == 0.0 || h == 0.0 {
            return;
        }

        let scale = cx.scale().max(1.0);
        if scale != self.renderer.scale() {
            self.renderer.set_scale(scale, &self.model, &mut self.slots);
        }

        let thumb_x = self.thumb_x();
        let track_h = self.renderer.track_height();
        let y0 = (h - track_h) / 2.0;
        let y1 = y0 + track_h;

        paint_track(
            cx,
            &mut self.minimum_paint,
            self.slots.get(TrackSide::Minimum),
            Rect::new(0.0, y0, thumb_x, y1),
            scale,
        );
        paint_track(
            cx,
            &mut self.maximum_paint,
            self.slots.get(TrackSide::Maximum),
            Rect::new(thumb_x, y0, w, y1),
            scale,
        );

        // Thumb
        let radius = constants::THUMB_RADIUS - 1.0;
        let circle = Circle::new((thumb_x, h / 2.0), radius);
        cx.fill(&circle, Color::WHITE, 0.0);
        cx.stroke(
            &circle,
            Color::rgba8(0, 0, 0, 60),
            &floem::kurbo::Stroke::new(1.0),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    // THUMB_RADIUS is 10, so a 220 wide slider has 200 of thumb travel.
    const WIDTH: f64 = 220.0;

    fn range() -> SliderRange {
        SliderRange::new(0.0, 100.0).unwrap()
    }

    #[test]
    fn pointer_maps_over_thumb_travel() {
        assert_eq!(value_at_pointer(range(), 10.0, WIDTH), Some(0.0));
        assert_eq!(value_at_pointer(range(), 110.0, WIDTH), Some(50.0));
        assert_eq!(value_at_pointer(range(), 210.0, WIDTH), Some(100.0));
    }

    #[test]
    fn pointer_outside_track_clamps() {
        assert_eq!(value_at_pointer(range(), -40.0, WIDTH), Some(0.0));
        assert_eq!(value_at_pointer(range(), 3.0, WIDTH), Some(0.0));
        assert_eq!(value_at_pointer(range(), 500.0, WIDTH), Some(100.0));
    }

    #[test]
    fn no_travel_means_no_pointer_value() {
        assert_eq!(value_at_pointer(range(), 10.0, 20.0), None);
        assert_eq!(value_at_pointer(range(), 5.0, 12.0), None);
        assert_eq!(thumb_center(range(), 80.0, 12.0), constants::THUMB_RADIUS);
    }

    #[test]
    fn thumb_center_inverts_pointer_mapping() {
        assert_eq!(thumb_center(range(), 0.0, WIDTH), 10.0);
        assert_eq!(thumb_center(range(), 50.0, WIDTH), 110.0);
        assert_eq!(thumb_center(range(), 100.0, WIDTH), 210.0);
        for x in [10.0, 60.0, 110.0, 185.0, 210.0] {
            let v = value_at_pointer(range(), x, WIDTH).unwrap();
            assert!((thumb_center(range(), v, WIDTH) - x).abs() < 1e-3);
        }
    }

    #[test]
    fn pointer_at_same_value_is_not_a_change() {
        let model = SliderModel::new(50.0, range());
        // Vertical drag while parked on center: x stays put.
        assert_eq!(pointer_change(&model, 110.0, WIDTH), None);
        assert_eq!(pointer_change(&model, 111.0, WIDTH), Some(50.5));
        assert_eq!(pointer_change(&model, 110.0, 15.0), None);

        let pinned = SliderModel::new(100.0, range());
        assert_eq!(pointer_change(&pinned, 400.0, WIDTH), None);
    }

    #[test]
    fn each_write_is_one_notification() {
        let value = RwSignal::new(50.0_f32);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        forward_writes(value, move |v| sink.borrow_mut().push(v));
        assert!(seen.borrow().is_empty());

        value.set(20.0);
        value.set(50.0);
        value.set(50.0);
        assert_eq!(*seen.borrow(), vec![20.0, 50.0, 50.0]);
    }
}
