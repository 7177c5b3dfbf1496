//! # Optical Flow Colour Visualisation Library
//!
//! This library renders dense optical flow fields as colour images: flow
//! direction maps to hue through a fixed cyclic colour wheel, flow
//! magnitude maps to saturation. The estimator producing the fields is an
//! external collaborator behind the [`estimator::DenseFlowEstimator`]
//! trait.
//!
//! The easiest way to use the library is to import its prelude:
//!
//! ```
//! use flowviz::prelude::v1::*;
//!
//! let mut field = FlowField::new(4, 4);
//! field.set_flow(1, 1, nalgebra::Vector2::new(1.0, 0.0));
//!
//! let wheel = ColorWheel::shared();
//! let frame = flow_to_color(&field, &wheel);
//! assert_eq!(frame.dim(), field.dim());
//! ```
//!
//! You may need [`nalgebra`](https://crates.io/crates/nalgebra) to make use of the functionality.

pub mod color_wheel;
pub mod encoder;
pub mod estimator;
pub mod flow_field;
pub mod utils;

pub mod prelude {
    pub mod v1 {
        pub use crate::{
            color_wheel::ColorWheel,
            encoder::{flow_to_color, flow_to_color_into, Bgr, ColorImage},
            estimator::{DenseFlowEstimator, FarnebackParams, GrayFrame},
            flow_field::{is_flow_known, FlowField, UNKNOWN_FLOW_THRESH},
        };
        pub use anyhow::{anyhow, Error, Result};
    }
}
