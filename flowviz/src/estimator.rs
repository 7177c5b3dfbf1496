//! # Dense flow estimation seam

use crate::flow_field::FlowField;
use anyhow::{anyhow, Result};

/// Fixed size grayscale frame.
pub struct GrayFrame {
    data: Vec<u8>,
    width: usize,
}

impl GrayFrame {
    /// Create a new black frame.
    ///
    /// # Arguments
    ///
    /// * `width` - width of the frame.
    /// * `height` - height of the frame.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![0; width * height],
            width,
        }
    }

    /// Build a frame from a raw luma buffer in row-major order.
    ///
    /// # Arguments
    ///
    /// * `width` - width of the frame.
    /// * `height` - height of the frame.
    /// * `data` - `width * height` luma samples.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        if data.len() != width * height {
            return Err(anyhow!(
                "raw luma buffer of {} bytes does not match {}x{} frame",
                data.len(),
                width,
                height
            ));
        }

        Ok(Self { data, width })
    }

    /// Get width and height of the frame.
    pub fn dim(&self) -> (usize, usize) {
        if self.width == 0 {
            (0, 0)
        } else {
            (self.width, self.data.len() / self.width)
        }
    }

    /// Get the luma samples in row-major order.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Get luma at coordinates.
    pub fn luma(&self, x: usize, y: usize) -> u8 {
        self.data[self.width * y + x]
    }
}

/// Parameters forwarded to a Farneback-style dense flow estimator.
///
/// These are passed through opaquely - this crate does not interpret them.
/// The defaults match the classic OpenCV invocation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct FarnebackParams {
    /// Image scale between pyramid layers.
    pub pyr_scale: f32,
    /// Number of pyramid layers.
    pub levels: usize,
    /// Averaging window size.
    pub winsize: usize,
    /// Iterations at each pyramid level.
    pub iterations: usize,
    /// Pixel neighborhood size for the polynomial expansion.
    pub poly_n: usize,
    /// Gaussian sigma used to smooth the polynomial expansion.
    pub poly_sigma: f32,
    /// Estimator-specific flags bitmask.
    pub flags: u32,
}

impl Default for FarnebackParams {
    fn default() -> Self {
        Self {
            pyr_scale: 0.5,
            levels: 3,
            winsize: 15,
            iterations: 3,
            poly_n: 5,
            poly_sigma: 1.1,
            flags: 0,
        }
    }
}

/// Generic dense optical flow estimator.
///
/// Implementations produce a per-pixel displacement field from two
/// consecutive grayscale frames. Not all estimators are stateless, thus
/// this trait expects sequential frames.
pub trait DenseFlowEstimator {
    /// Estimate dense flow between two frames.
    ///
    /// On success `field` holds one `(dx, dy)` vector per pixel, at the
    /// dimensions chosen by the estimator. Pixels where no displacement
    /// could be computed are set to unknown-flow sentinel values.
    ///
    /// # Arguments
    ///
    /// * `prev` - earlier grayscale frame.
    /// * `curr` - later grayscale frame.
    /// * `params` - estimator parameters, forwarded opaquely.
    /// * `field` - output flow field.
    fn estimate_flow(
        &mut self,
        prev: &GrayFrame,
        curr: &GrayFrame,
        params: &FarnebackParams,
        field: &mut FlowField,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra as na;

    struct ConstantEstimator(na::Vector2<f32>);

    impl DenseFlowEstimator for ConstantEstimator {
        fn estimate_flow(
            &mut self,
            prev: &GrayFrame,
            _curr: &GrayFrame,
            _params: &FarnebackParams,
            field: &mut FlowField,
        ) -> Result<()> {
            let (width, height) = prev.dim();
            *field = FlowField::new(width, height);
            for y in 0..height {
                for x in 0..width {
                    field.set_flow(x, y, self.0);
                }
            }
            Ok(())
        }
    }

    #[test]
    fn estimator_fills_field_through_trait_object() {
        let motion = na::Vector2::new(0.5, -0.25);
        let mut estimator: Box<dyn DenseFlowEstimator> = Box::new(ConstantEstimator(motion));

        let prev = GrayFrame::new(4, 2);
        let curr = GrayFrame::new(4, 2);
        let mut field = FlowField::new(0, 0);

        estimator
            .estimate_flow(&prev, &curr, &FarnebackParams::default(), &mut field)
            .unwrap();

        assert_eq!(field.dim(), (4, 2));
        assert_eq!(field.get_flow(3, 1), motion);
    }

    #[test]
    fn default_params_match_classic_opencv_call() {
        let params = FarnebackParams::default();
        assert_eq!(params.pyr_scale, 0.5);
        assert_eq!(params.levels, 3);
        assert_eq!(params.winsize, 15);
        assert_eq!(params.iterations, 3);
        assert_eq!(params.poly_n, 5);
        assert_eq!(params.poly_sigma, 1.1);
        assert_eq!(params.flags, 0);
    }

    #[test]
    fn gray_frame_raw_roundtrip() {
        let frame = GrayFrame::from_raw(2, 2, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(frame.dim(), (2, 2));
        assert_eq!(frame.luma(1, 1), 4);
        assert!(GrayFrame::from_raw(2, 2, vec![0; 3]).is_err());
    }
}
