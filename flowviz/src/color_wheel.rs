//! # Cyclic colour wheel palette
//!
//! Colour encoding of flow vectors from:
//! <http://members.shaw.ca/quadibloc/other/colint.htm>
//!
//! The palette matches the one used by the Middlebury flow evaluation:
//! <http://vision.middlebury.edu/flow/data/>

use once_cell::sync::OnceCell;
use std::sync::Arc;

// Arc lengths of the six primary-to-primary hue transitions.
const RY: usize = 15;
const YG: usize = 6;
const GC: usize = 4;
const CB: usize = 11;
const BM: usize = 13;
const MR: usize = 6;

static SHARED: OnceCell<Arc<ColorWheel>> = OnceCell::new();

/// Ordered, cyclic palette mapping a hue angle to an RGB colour.
///
/// Entries are `[r, g, b]` triples. The sequence forms a closed loop -
/// interpolating from the last entry back towards the first is valid.
/// The wheel is read-only after construction and safe to share between
/// threads.
pub struct ColorWheel {
    entries: Vec<[u8; 3]>,
}

impl ColorWheel {
    /// Build the 55-entry wheel.
    ///
    /// Construction is pure and deterministic. Each arc sweeps one hue
    /// transition by linear interpolation, with the moving channel held at
    /// truncated 8-bit precision.
    pub fn new() -> Self {
        let mut entries = Vec::with_capacity(RY + YG + GC + CB + BM + MR);

        for i in 0..RY {
            entries.push([255, (255 * i / RY) as u8, 0]);
        }
        for i in 0..YG {
            entries.push([(255 - 255 * i / YG) as u8, 255, 0]);
        }
        for i in 0..GC {
            entries.push([0, 255, (255 * i / GC) as u8]);
        }
        for i in 0..CB {
            entries.push([0, (255 - 255 * i / CB) as u8, 255]);
        }
        for i in 0..BM {
            entries.push([(255 * i / BM) as u8, 0, 255]);
        }
        for i in 0..MR {
            entries.push([255, 0, (255 - 255 * i / MR) as u8]);
        }

        Self { entries }
    }

    /// Get the process-wide shared wheel.
    ///
    /// The wheel is built exactly once on first use, even when called from
    /// multiple threads concurrently.
    pub fn shared() -> Arc<ColorWheel> {
        SHARED.get_or_init(|| Self::new().into()).clone()
    }

    /// Get the number of entries in the wheel.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the wheel has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the `[r, g, b]` entry at given index.
    ///
    /// # Arguments
    ///
    /// * `idx` - entry index, must be below [`len`](Self::len).
    pub fn entry(&self, idx: usize) -> [u8; 3] {
        self.entries[idx]
    }

    /// Get all entries in wheel order.
    pub fn entries(&self) -> &[[u8; 3]] {
        &self.entries
    }
}

impl Default for ColorWheel {
    fn default() -> Self {
        Self::new()
    }
}
