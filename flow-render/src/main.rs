//! Render `.flo` flow frames to colour images.

use clap::*;
use flowviz::prelude::v1::{Result, *};
use log::*;

fn main() -> Result<()> {
    env_logger::init();

    let matches = Command::new("flow-render")
        .version(crate_version!())
        .author(crate_authors!())
        .arg(Arg::new("input").takes_value(true).required(true))
        .arg(Arg::new("output").takes_value(true).required(false))
        .get_matches();

    let input = matches.value_of("input").unwrap();
    let output = matches
        .value_of("output")
        .map(Into::into)
        .unwrap_or_else(|| format!("{input}.png"));

    let field = flo_loader::load_flo(input)?;
    let (width, height) = field.dim();

    if width == 0 || height == 0 {
        return Err(anyhow!("{} contains an empty flow field", input));
    }

    info!(
        "{input}: {width}x{height} field, max radius {}",
        field.max_radius()
    );

    let wheel = ColorWheel::shared();
    let frame = flow_to_color(&field, &wheel);

    // The encoder raster is BGR, the PNG surface is RGB.
    let mut out = image::RgbImage::new(width as u32, height as u32);

    for y in 0..height {
        for x in 0..width {
            let px = frame.get_pixel(x, y);
            out.put_pixel(x as u32, y as u32, image::Rgb([px.r, px.g, px.b]));
        }
    }

    out.save(&output)?;

    info!("saved {output}");

    Ok(())
}
