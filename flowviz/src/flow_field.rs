//! # Fixed size dense flow field

use anyhow::{anyhow, Result};
use nalgebra::*;

/// Magnitude above which a flow component marks the whole vector as unknown.
///
/// Estimators store such sentinel values at pixels where no displacement
/// could be computed.
pub const UNKNOWN_FLOW_THRESH: f32 = 1e9;

/// Check whether a flow vector carries a known displacement.
///
/// A vector is unknown when either component's magnitude exceeds
/// [`UNKNOWN_FLOW_THRESH`].
pub fn is_flow_known(motion: &Vector2<f32>) -> bool {
    !(motion.x.abs() > UNKNOWN_FLOW_THRESH || motion.y.abs() > UNKNOWN_FLOW_THRESH)
}

/// Fixed size dense optical flow field.
pub struct FlowField {
    vf: Matrix2xX<f32>,
    width: usize,
}

impl FlowField {
    /// Create a new flow field with all vectors zeroed.
    ///
    /// # Arguments
    ///
    /// * `width` - width of the field.
    /// * `height` - height of the field.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            vf: Matrix2xX::repeat(width * height, 0f32),
            width,
        }
    }

    /// Build a flow field from raw interleaved components.
    ///
    /// The input is expected in row-major pixel order:
    ///
    /// `field[0,0].x, field[0,0].y, field[0,1].x, ... field[N,N].y`
    ///
    /// # Arguments
    ///
    /// * `width` - width of the field.
    /// * `height` - height of the field.
    /// * `data` - `width * height * 2` interleaved flow components.
    pub fn from_raw(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != width * height * 2 {
            return Err(anyhow!(
                "raw flow data of {} elements does not match {}x{} field",
                data.len(),
                width,
                height
            ));
        }

        Ok(Self {
            vf: Matrix2xX::from_column_slice(&data),
            width,
        })
    }

    /// Get width and height of the flow field.
    pub fn dim(&self) -> (usize, usize) {
        if self.width == 0 {
            (0, 0)
        } else {
            (self.width, self.vf.ncols() / self.width)
        }
    }

    /// Get size of the flow field.
    ///
    /// This is the same as `width * height`
    pub fn size(&self) -> usize {
        self.vf.ncols()
    }

    /// Get the flow field in row-major order.
    ///
    /// The elements returned are in the following order:
    ///
    /// `field[0,0].x, field[0,0].y, field[0,1].x, ... field[0,N].y, field[1,0].x, ... field[N,N].y`
    pub fn as_slice(&self) -> &[f32] {
        self.vf.as_slice()
    }

    /// Set flow at given position.
    ///
    /// # Arguments
    ///
    /// * `x` - horizontal coordinate to set at.
    /// * `y` - vertical coordinate to set at.
    /// * `motion` - flow vector to set.
    pub fn set_flow(&mut self, x: usize, y: usize, motion: Vector2<f32>) {
        self.vf.set_column(self.width * y + x, &motion);
    }

    /// Get flow at coordinates.
    ///
    /// # Arguments
    ///
    /// * `x` - horizontal coordinate.
    /// * `y` - vertical coordinate.
    pub fn get_flow(&self, x: usize, y: usize) -> Vector2<f32> {
        self.vf.column(self.width * y + x).into()
    }

    /// Iterate every element of the flow field.
    ///
    /// The resulting iterator yields `(x, y, motion)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Vector2<f32>)> + '_ {
        let (width, height) = self.dim();
        (0..height)
            .flat_map(move |y| (0..width).map(move |x| (x, y, self.get_flow(x, y))))
    }

    /// Get the maximum finite vector magnitude across the field.
    ///
    /// Vectors failing [`is_flow_known`] are excluded. Returns `-1.0` when
    /// the field contains no known vectors at all, and `0.0` for an
    /// all-zero field. Anything non-positive means the field carries no
    /// usable motion.
    pub fn max_radius(&self) -> f32 {
        let mut maxrad = -1f32;

        for (_, _, motion) in self.iter() {
            if !is_flow_known(&motion) {
                continue;
            }
            let rad = motion.magnitude();
            if rad > maxrad {
                maxrad = rad;
            }
        }

        maxrad
    }
}
