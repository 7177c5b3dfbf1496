//! Common `FlowField` loader for Middlebury `.flo` files.
//!
//! The format is the one used by the Middlebury flow evaluation: a float
//! tag, two 32-bit dimensions, then interleaved `(dx, dy)` pairs in
//! row-major order, everything little-endian.

use flowviz::prelude::v1::*;
use std::io::{BufReader, Read, Write};

/// Tag opening every `.flo` file ("PIEH" read as a little-endian float).
pub const TAG_FLOAT: f32 = 202021.25;

/// Dimension bound used by the Middlebury readers to reject corrupt headers.
const MAX_DIM: i32 = 99999;

/// Load a flow field from a `.flo` file or stream.
///
/// In addition to regular paths, `tcp://` inputs are accepted the same way
/// [`flowviz::utils::open_file`] accepts them.
///
/// # Arguments
///
/// * `input` - path or endpoint to read from.
pub fn load_flo(input: &str) -> Result<FlowField> {
    let reader = flowviz::utils::open_file(input)?;
    read_flo(BufReader::new(reader))
}

/// Read a flow field from a `.flo` byte stream.
///
/// # Arguments
///
/// * `reader` - stream positioned at the start of the file.
pub fn read_flo(mut reader: impl Read) -> Result<FlowField> {
    let mut buf = [0u8; 4];

    reader.read_exact(&mut buf)?;
    let tag = f32::from_le_bytes(buf);
    if tag != TAG_FLOAT {
        return Err(anyhow!("wrong .flo tag {} (big-endian or invalid file?)", tag));
    }

    reader.read_exact(&mut buf)?;
    let width = i32::from_le_bytes(buf);
    reader.read_exact(&mut buf)?;
    let height = i32::from_le_bytes(buf);

    if !(1..=MAX_DIM).contains(&width) || !(1..=MAX_DIM).contains(&height) {
        return Err(anyhow!("illegal .flo dimensions {}x{}", width, height));
    }

    let (width, height) = (width as usize, height as usize);

    let mut data = vec![0f32; width * height * 2];
    for v in &mut data {
        reader.read_exact(&mut buf)?;
        *v = f32::from_le_bytes(buf);
    }

    FlowField::from_raw(width, height, data)
}

/// Write a flow field as a `.flo` byte stream.
///
/// # Arguments
///
/// * `writer` - stream to write to.
/// * `field` - flow field to encode.
pub fn write_flo(mut writer: impl Write, field: &FlowField) -> Result<()> {
    let (width, height) = field.dim();

    writer.write_all(&TAG_FLOAT.to_le_bytes())?;
    writer.write_all(&(width as i32).to_le_bytes())?;
    writer.write_all(&(height as i32).to_le_bytes())?;

    // Column storage of the field matches the file's interleaved order.
    for v in field.as_slice() {
        writer.write_all(&v.to_le_bytes())?;
    }

    Ok(())
}
