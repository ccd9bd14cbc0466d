//! RGBA8 track images.
//!
//! Images are rasterized once at the display scale and kept as shared pixel
//! buffers. An image may carry cap insets, in which case it is painted with
//! horizontal three-slice stretching: the caps keep their width and the
//! columns between them are tiled to fill the requested length.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use floem::peniko::{self, Blob};

use crate::color::TrackColor;

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

fn next_image_id() -> u64 {
    NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Negative, NaN and infinite extents collapse to zero.
fn sanitize(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

fn to_pixels(v: f64, scale: f64) -> u32 {
    (sanitize(v) * scale).round() as u32
}

/// Largest pixel count a single image may allocate.
const MAX_PIXELS: usize = 1 << 26;

/// Buffer length in bytes for a `width` x `height` image, or `None` when it
/// is over [`MAX_PIXELS`] or does not fit in `usize`.
fn buffer_len(width: u32, height: u32) -> Option<usize> {
    let pixels = (width as usize).checked_mul(height as usize)?;
    if pixels > MAX_PIXELS {
        return None;
    }
    pixels.checked_mul(4)
}

/// Pixel extent of a canvas. Oversized canvases collapse to empty.
fn canvas_size(width: f64, height: f64, scale: f64) -> (u32, u32) {
    let pw = to_pixels(width, scale);
    let ph = to_pixels(height, scale);
    if buffer_len(pw, ph).is_some() {
        (pw, ph)
    } else {
        log::warn!("track image of {pw}x{ph}px is too large, leaving it empty");
        (0, 0)
    }
}

fn offset(x: u32, y: u32, width: u32) -> usize {
    (y as usize * width as usize + x as usize) * 4
}

/// Left and right widths (logical units) that are not stretched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CapInsets {
    pub left: f64,
    pub right: f64,
}

impl CapInsets {
    pub const ZERO: Self = Self {
        left: 0.0,
        right: 0.0,
    };

    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }
}

/// An immutable raster image. Clones share the pixel buffer and the id.
#[derive(Debug, Clone)]
pub struct TrackImage {
    id: u64,
    width: f64,
    height: f64,
    scale: f64,
    px_width: u32,
    px_height: u32,
    pixels: Arc<Vec<u8>>,
    cap_insets: CapInsets,
}

impl TrackImage {
    fn from_buffer(
        width: f64,
        height: f64,
        scale: f64,
        px_width: u32,
        px_height: u32,
        pixels: Vec<u8>,
    ) -> Self {
        debug_assert_eq!(Some(pixels.len()), buffer_len(px_width, px_height));
        Self {
            id: next_image_id(),
            width,
            height,
            scale,
            px_width,
            px_height,
            pixels: Arc::new(pixels),
            cap_insets: CapInsets::ZERO,
        }
    }

    /// An image of `width` x `height` logical units filled with `color`.
    pub fn filled(color: TrackColor, width: f64, height: f64, scale: f64) -> Self {
        let scale = scale.max(1.0);
        let (width, height) = (sanitize(width), sanitize(height));
        let (pw, ph) = canvas_size(width, height, scale);
        let buf = color.to_rgba8().repeat(pw as usize * ph as usize);
        Self::from_buffer(width, height, scale, pw, ph, buf)
    }

    /// Draw `base` scaled into a `width` x `height` canvas, then `overlay`
    /// at its natural size with its top-left corner at `position`.
    pub fn composite(
        base: &TrackImage,
        overlay: &TrackImage,
        width: f64,
        height: f64,
        position: (f64, f64),
        scale: f64,
    ) -> Self {
        let scale = scale.max(1.0);
        let (width, height) = (sanitize(width), sanitize(height));
        let (pw, ph) = canvas_size(width, height, scale);
        let mut buf = vec![0u8; pw as usize * ph as usize * 4];

        if base.px_width > 0 && base.px_height > 0 {
            for py in 0..ph {
                let sy = (py as u64 * base.px_height as u64 / ph as u64) as u32;
                for px in 0..pw {
                    let sx = (px as u64 * base.px_width as u64 / pw as u64) as u32;
                    let at = offset(px, py, pw);
                    buf[at..at + 4].copy_from_slice(base.raw_pixel(sx, sy));
                }
            }
        }

        let ox = (position.0 * scale).round() as i64;
        let oy = (position.1 * scale).round() as i64;
        for sy in 0..overlay.px_height {
            let ty = oy + sy as i64;
            if ty < 0 || ty >= ph as i64 {
                continue;
            }
            for sx in 0..overlay.px_width {
                let tx = ox + sx as i64;
                if tx < 0 || tx >= pw as i64 {
                    continue;
                }
                let at = offset(tx as u32, ty as u32, pw);
                blend_over(&mut buf[at..at + 4], overlay.raw_pixel(sx, sy));
            }
        }

        Self::from_buffer(width, height, scale, pw, ph, buf)
    }

    /// Mark the columns between the caps as the stretchable region.
    pub fn with_cap_insets(mut self, insets: CapInsets) -> Self {
        self.cap_insets = CapInsets {
            left: sanitize(insets.left),
            right: sanitize(insets.right),
        };
        self
    }

    /// Render the image at `target` pixels wide using three-slice stretching.
    ///
    /// The right cap takes precedence when `target` is narrower than both caps.
    /// A target too large to allocate yields an empty image.
    pub fn stretch_to(&self, target: u32) -> TrackImage {
        let (target, ph) = match buffer_len(target, self.px_height) {
            Some(_) => (target, self.px_height),
            None => (0, 0),
        };
        let mut buf = vec![0u8; target as usize * ph as usize * 4];
        if self.px_width > 0 {
            let left = to_pixels(self.cap_insets.left, self.scale).min(self.px_width);
            let right = to_pixels(self.cap_insets.right, self.scale).min(self.px_width - left);
            for px in 0..target {
                let sx = source_column(px, target, self.px_width, left, right);
                for py in 0..ph {
                    let at = offset(px, py, target);
                    buf[at..at + 4].copy_from_slice(self.raw_pixel(sx, py));
                }
            }
        }
        Self::from_buffer(
            target as f64 / self.scale,
            self.height,
            self.scale,
            target,
            ph,
            buf,
        )
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Size in logical units.
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        (self.px_width, self.px_height)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn cap_insets(&self) -> CapInsets {
        self.cap_insets
    }

    pub fn is_empty(&self) -> bool {
        self.px_width == 0 || self.px_height == 0
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<TrackColor> {
        if x >= self.px_width || y >= self.px_height {
            return None;
        }
        let [r, g, b, a] = <[u8; 4]>::try_from(self.raw_pixel(x, y)).ok()?;
        Some(TrackColor::from_rgba8(r, g, b, a))
    }

    /// Convert for painting. Empty images have no renderer counterpart.
    pub fn to_peniko(&self) -> Option<peniko::Image> {
        if self.is_empty() {
            return None;
        }
        let blob = Blob::new(self.pixels.clone());
        Some(peniko::Image::new(
            blob,
            peniko::Format::Rgba8,
            self.px_width,
            self.px_height,
        ))
    }

    fn raw_pixel(&self, x: u32, y: u32) -> &[u8] {
        let at = offset(x, y, self.px_width);
        &self.pixels[at..at + 4]
    }
}

impl PartialEq for TrackImage {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Source column for output column `x` of a `target`-wide three-slice render.
fn source_column(x: u32, target: u32, src_width: u32, left: u32, right: u32) -> u32 {
    if x + right >= target {
        return src_width - (target - x);
    }
    if x < left {
        return x;
    }
    let middle = src_width - left - right;
    if middle == 0 {
        return left.saturating_sub(1);
    }
    left + (x - left) % middle
}

/// Straight-alpha source-over.
fn blend_over(dst: &mut [u8], src: &[u8]) {
    match src[3] {
        255 => dst.copy_from_slice(src),
        0 => {}
        sa => {
            let sa = sa as f64 / 255.0;
            let da = dst[3] as f64 / 255.0;
            let out_a = sa + da * (1.0 - sa);
            for i in 0..3 {
                let s = src[i] as f64 / 255.0;
                let d = dst[i] as f64 / 255.0;
                let c = (s * sa + d * da * (1.0 - sa)) / out_a;
                dst[i] = (c * 255.0).round() as u8;
            }
            dst[3] = (out_a * 255.0).round() as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: TrackColor = TrackColor::from_rgb(255, 0, 0);
    const BLUE: TrackColor = TrackColor::from_rgb(0, 0, 255);

    fn row(img: &TrackImage) -> Vec<TrackColor> {
        (0..img.pixel_size().0)
            .map(|x| img.pixel(x, 0).unwrap())
            .collect()
    }

    #[test]
    fn filled_respects_scale() {
        let img = TrackImage::filled(RED, 10.0, 1.5, 2.0);
        assert_eq!(img.pixel_size(), (20, 3));
        assert_eq!(img.size(), (10.0, 1.5));
        assert_eq!(img.pixel(19, 2), Some(RED));
        assert_eq!(img.pixel(20, 0), None);
    }

    #[test]
    fn degenerate_geometry_is_empty() {
        assert!(TrackImage::filled(RED, 0.0, 2.0, 1.0).is_empty());
        assert!(TrackImage::filled(RED, -4.0, 2.0, 1.0).is_empty());
        assert!(TrackImage::filled(RED, f64::NAN, 2.0, 1.0).is_empty());
        assert!(TrackImage::filled(RED, 4.0, 0.0, 1.0).is_empty());
        assert!(TrackImage::filled(RED, 0.0, 0.0, 1.0).to_peniko().is_none());
    }

    #[test]
    fn oversized_geometry_is_empty() {
        let img = TrackImage::filled(RED, 2000.0, 1_000_000.0, 1.0);
        assert!(img.is_empty());
        assert_eq!(img.pixel_size(), (0, 0));
        let huge = TrackImage::filled(RED, 1e12, 1.0, 3.0);
        assert!(huge.is_empty());

        let bar = TrackImage::filled(BLUE, 3.0, 1.0, 1.0);
        let canvas = TrackImage::composite(&bar, &bar, 1e9, 1e9, (0.0, 0.0), 1.0);
        assert!(canvas.is_empty());
        assert!(bar.stretch_to(u32::MAX).is_empty());
    }

    #[test]
    fn composite_places_overlay() {
        let base = TrackImage::filled(RED, 4.0, 1.0, 1.0);
        let bar = TrackImage::filled(BLUE, 2.0, 1.0, 1.0);
        let img = TrackImage::composite(&base, &bar, 6.0, 1.0, (4.0, 0.0), 1.0);
        assert_eq!(row(&img), vec![RED, RED, RED, RED, BLUE, BLUE]);
    }

    #[test]
    fn composite_clips_overlay_to_canvas() {
        let base = TrackImage::filled(RED, 3.0, 1.0, 1.0);
        let bar = TrackImage::filled(BLUE, 3.0, 1.0, 1.0);
        let img = TrackImage::composite(&base, &bar, 3.0, 1.0, (2.0, 0.0), 1.0);
        assert_eq!(row(&img), vec![RED, RED, BLUE]);
    }

    #[test]
    fn translucent_overlay_blends() {
        let base = TrackImage::filled(TrackColor::BLACK, 1.0, 1.0, 1.0);
        let veil = TrackImage::filled(TrackColor::from_rgba8(255, 255, 255, 128), 1.0, 1.0, 1.0);
        let img = TrackImage::composite(&base, &veil, 1.0, 1.0, (0.0, 0.0), 1.0);
        assert_eq!(img.pixel(0, 0), Some(TrackColor::from_rgb(128, 128, 128)));
    }

    #[test]
    fn stretch_tiles_between_caps() {
        let base = TrackImage::filled(RED, 4.0, 1.0, 1.0);
        let bar = TrackImage::filled(BLUE, 3.0, 1.0, 1.0);
        let img = TrackImage::composite(&base, &bar, 7.0, 1.0, (4.0, 0.0), 1.0)
            .with_cap_insets(CapInsets::new(5.0, 1.0));
        let wide = img.stretch_to(10);
        assert_eq!(
            row(&wide),
            vec![RED, RED, RED, RED, BLUE, BLUE, BLUE, BLUE, BLUE, BLUE]
        );
        assert_eq!(wide.cap_insets(), CapInsets::ZERO);
    }

    #[test]
    fn stretch_narrower_than_caps_keeps_right_cap() {
        let base = TrackImage::filled(RED, 4.0, 1.0, 1.0);
        let bar = TrackImage::filled(BLUE, 1.0, 1.0, 1.0);
        let img = TrackImage::composite(&base, &bar, 5.0, 1.0, (4.0, 0.0), 1.0)
            .with_cap_insets(CapInsets::new(4.0, 1.0));
        assert_eq!(row(&img.stretch_to(3)), vec![RED, RED, BLUE]);
    }

    #[test]
    fn stretch_without_caps_tiles_whole_image() {
        let img = TrackImage::filled(RED, 2.0, 1.0, 1.0);
        assert_eq!(row(&img.stretch_to(5)), vec![RED; 5]);
    }

    #[test]
    fn clones_share_identity() {
        let a = TrackImage::filled(RED, 1.0, 1.0, 1.0);
        let b = TrackImage::filled(RED, 1.0, 1.0, 1.0);
        assert_eq!(a.clone(), a);
        assert_ne!(a, b);
    }
}
