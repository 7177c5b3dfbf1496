//! # Flow-to-colour encoding
//!
//! Renders a dense flow field as a colour image: direction maps to hue via
//! the [`ColorWheel`], magnitude maps to saturation. Near-zero flow comes
//! out whitish, full-scale flow fully saturated, unknown flow black.

use crate::color_wheel::ColorWheel;
use crate::flow_field::{is_flow_known, FlowField};
use bytemuck::{Pod, Zeroable};
use log::*;
use nalgebra as na;

/// BGR colour structure.
///
/// The encoder raster is stored in B,G,R byte order - the reverse of the
/// wheel's channel order, the way OpenCV-style image buffers lay out
/// their channels. Convert at the consumer boundary when an RGB surface
/// is needed.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Bgr {
    pub b: u8,
    pub g: u8,
    pub r: u8,
}

/// Fixed size colour image.
///
/// Pixels are stored in row-major order and fully overwritten by each
/// encode call.
pub struct ColorImage {
    data: Vec<Bgr>,
    width: usize,
}

impl ColorImage {
    /// Create a new black image.
    ///
    /// # Arguments
    ///
    /// * `width` - width of the image.
    /// * `height` - height of the image.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![Bgr::default(); width * height],
            width,
        }
    }

    /// Get width and height of the image.
    pub fn dim(&self) -> (usize, usize) {
        if self.width == 0 {
            (0, 0)
        } else {
            (self.width, self.data.len() / self.width)
        }
    }

    /// Get size of the image.
    ///
    /// This is the same as `width * height`
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Get the pixels in row-major order.
    pub fn as_slice(&self) -> &[Bgr] {
        &self.data
    }

    /// Get the raw raster in B,G,R byte order.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Get pixel at coordinates.
    ///
    /// # Arguments
    ///
    /// * `x` - horizontal coordinate.
    /// * `y` - vertical coordinate.
    pub fn get_pixel(&self, x: usize, y: usize) -> Bgr {
        self.data[self.width * y + x]
    }

    /// Set pixel at given position.
    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: Bgr) {
        self.data[self.width * y + x] = pixel;
    }

    /// Resize the image to given dimensions, resetting every pixel to black.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.data.clear();
        self.data.resize(width * height, Bgr::default());
    }
}

/// Encode a flow field into a freshly allocated colour image.
///
/// The output dimensions equal the field dimensions. See
/// [`flow_to_color_into`] for the encoding itself.
///
/// # Arguments
///
/// * `field` - input flow field.
/// * `wheel` - hue palette, must be non-empty.
pub fn flow_to_color(field: &FlowField, wheel: &ColorWheel) -> ColorImage {
    let (width, height) = field.dim();
    let mut image = ColorImage::new(width, height);
    flow_to_color_into(field, wheel, &mut image);
    image
}

/// Encode a flow field into a reused colour image buffer.
///
/// The image is resized to the field dimensions and fully overwritten.
/// Magnitudes are normalized by the field's own maximum, so scaling all
/// vectors uniformly does not change the output. Unknown vectors render
/// black, and so does the whole frame when the field carries no usable
/// motion (all-zero or all-unknown).
///
/// Passing an empty wheel is a contract violation: it panics in debug
/// builds and renders a black frame in release builds.
///
/// # Arguments
///
/// * `field` - input flow field.
/// * `wheel` - hue palette, must be non-empty.
/// * `image` - output image to overwrite.
pub fn flow_to_color_into(field: &FlowField, wheel: &ColorWheel, image: &mut ColorImage) {
    let (width, height) = field.dim();
    image.resize(width, height);

    debug_assert!(!wheel.is_empty(), "colour wheel must be built first");
    if wheel.is_empty() {
        return;
    }

    let maxrad = field.max_radius();
    if maxrad <= 0.0 {
        debug!("no usable flow in {}x{} field, frame is black", width, height);
        return;
    }

    for (x, y, motion) in field.iter() {
        let motion = motion / maxrad;

        // A sentinel divided by maxrad still exceeds the threshold.
        if !is_flow_known(&motion) {
            continue;
        }

        image.set_pixel(x, y, encode_vector(motion, wheel));
    }
}

/// Map a single normalized flow vector to a colour.
fn encode_vector(motion: na::Vector2<f32>, wheel: &ColorWheel) -> Bgr {
    let rad = motion.magnitude();
    let angle = (-motion.y).atan2(-motion.x) / std::f32::consts::PI;

    let fk = (angle + 1.0) / 2.0 * (wheel.len() - 1) as f32;
    let k0 = fk as usize;
    let k1 = (k0 + 1) % wheel.len();
    let f = fk - k0 as f32;

    let mut chans = [0u8; 3];

    for (c, out) in chans.iter_mut().enumerate() {
        let col0 = wheel.entry(k0)[c] as f32 / 255.0;
        let col1 = wheel.entry(k1)[c] as f32 / 255.0;
        let mut col = (1.0 - f) * col0 + f * col1;

        if rad <= 1.0 {
            // Saturation grows with radius.
            col = 1.0 - rad * (1.0 - col);
        } else {
            // Out of range, only reachable through rounding at the max pixel.
            col *= 0.75;
        }

        *out = (255.0 * col) as u8;
    }

    // The wheel is RGB, the raster is BGR.
    Bgr {
        b: chans[2],
        g: chans[1],
        r: chans[0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra as na;

    fn uniform_field(width: usize, height: usize, motion: na::Vector2<f32>) -> FlowField {
        let mut field = FlowField::new(width, height);
        for y in 0..height {
            for x in 0..width {
                field.set_flow(x, y, motion);
            }
        }
        field
    }

    fn all_black(image: &ColorImage) -> bool {
        image.as_slice().iter().all(|&px| px == Bgr::default())
    }

    #[test]
    fn zero_field_is_black() {
        let wheel = ColorWheel::new();
        let image = flow_to_color(&uniform_field(4, 3, na::Vector2::zeros()), &wheel);

        assert_eq!(image.dim(), (4, 3));
        assert!(all_black(&image));
    }

    #[test]
    fn unknown_field_is_black() {
        let wheel = ColorWheel::new();
        let image = flow_to_color(&uniform_field(3, 3, na::Vector2::new(2e9, -2e9)), &wheel);

        assert!(all_black(&image));
    }

    #[test]
    fn unknown_pixels_stay_black_amid_valid_flow() {
        let wheel = ColorWheel::new();
        let mut field = uniform_field(2, 1, na::Vector2::new(1.0, 0.0));
        field.set_flow(1, 0, na::Vector2::new(2e9, 0.0));

        let image = flow_to_color(&field, &wheel);
        assert_ne!(image.get_pixel(0, 0), Bgr::default());
        assert_eq!(image.get_pixel(1, 0), Bgr::default());
    }

    #[test]
    fn empty_field_yields_empty_image() {
        let wheel = ColorWheel::new();
        let image = flow_to_color(&FlowField::new(0, 0), &wheel);
        assert_eq!(image.dim(), (0, 0));
        assert_eq!(image.size(), 0);
    }

    // atan2(-0, -1) = -pi, so angle = -1, fk = 0, f = 0: wheel entry 0.
    #[test]
    fn positive_x_maps_to_wheel_start() {
        let wheel = ColorWheel::new();
        let image = flow_to_color(&uniform_field(2, 2, na::Vector2::new(1.0, 0.0)), &wheel);

        let px = image.get_pixel(1, 1);
        assert_eq!(px, Bgr { b: 0, g: 0, r: 255 });

        // Raster byte order is B,G,R.
        assert_eq!(&image.as_bytes()[..3], &[0, 0, 255]);
    }

    // atan2(-0, 1) = -0, so angle = 0, fk = 27, f = 0: wheel entry 27,
    // which sits in the cyan-blue arc at (0, 255 - 255 * 2 / 11, 255).
    #[test]
    fn negative_x_maps_to_cyan_blue_arc() {
        let wheel = ColorWheel::new();
        let image = flow_to_color(&uniform_field(2, 2, na::Vector2::new(-1.0, 0.0)), &wheel);

        assert_eq!(image.get_pixel(0, 0), Bgr { b: 255, g: 209, r: 0 });
    }

    // fy = -0.0 makes atan2(0, -1) = +pi, so angle = 1 and fk lands
    // exactly on the last entry. k1 must wrap around to entry 0.
    #[test]
    fn angle_wraps_around_last_entry() {
        let wheel = ColorWheel::new();
        let image = flow_to_color(&uniform_field(1, 1, na::Vector2::new(1.0, -0.0)), &wheel);

        assert_eq!(image.get_pixel(0, 0), Bgr { b: 43, g: 0, r: 255 });
    }

    #[test]
    fn cardinal_directions_are_distinct() {
        let wheel = ColorWheel::new();
        let dirs = [
            na::Vector2::new(1.0, 0.0),
            na::Vector2::new(-1.0, 0.0),
            na::Vector2::new(0.0, 1.0),
            na::Vector2::new(0.0, -1.0),
        ];

        let px = dirs
            .iter()
            .map(|&d| flow_to_color(&uniform_field(1, 1, d), &wheel).get_pixel(0, 0))
            .collect::<Vec<_>>();

        for i in 0..px.len() {
            for o in (i + 1)..px.len() {
                assert_ne!(px[i], px[o], "{:?} vs {:?}", dirs[i], dirs[o]);
            }
        }
    }

    // The single pixel is the field maximum, so its normalized radius is
    // exactly 1 and saturation stays at full strength - no darkening.
    #[test]
    fn max_pixel_keeps_full_saturation() {
        let wheel = ColorWheel::new();
        let image = flow_to_color(&uniform_field(1, 1, na::Vector2::new(1.0, 0.0)), &wheel);

        assert_eq!(image.get_pixel(0, 0), Bgr { b: 0, g: 0, r: 255 });
    }

    // Normalization divides by the field's own max, so the output depends
    // on direction and relative magnitude only.
    #[test]
    fn uniform_scaling_is_invariant() {
        let wheel = ColorWheel::new();

        let vecs = [
            na::Vector2::new(1.0, 0.0),
            na::Vector2::new(0.0, 2.0),
            na::Vector2::new(-3.0, 1.0),
            na::Vector2::new(0.5, -0.5),
        ];

        let mut field = FlowField::new(2, 2);
        let mut scaled = FlowField::new(2, 2);

        for (i, &v) in vecs.iter().enumerate() {
            field.set_flow(i % 2, i / 2, v);
            scaled.set_flow(i % 2, i / 2, v * 2.0);
        }

        let a = flow_to_color(&field, &wheel);
        let b = flow_to_color(&scaled, &wheel);
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn reused_buffer_is_fully_overwritten() {
        let wheel = ColorWheel::new();
        let mut image = ColorImage::new(5, 5);
        image.set_pixel(4, 4, Bgr { b: 1, g: 2, r: 3 });

        flow_to_color_into(
            &uniform_field(2, 2, na::Vector2::new(1.0, 0.0)),
            &wheel,
            &mut image,
        );

        assert_eq!(image.dim(), (2, 2));
        assert!(image
            .as_slice()
            .iter()
            .all(|&px| px == Bgr { b: 0, g: 0, r: 255 }));
    }
}
