use cr2_core::Sensor;

use crate::error::{Error, Result};

/// Crops a full sensor image to `sensor`'s inner borders, rounded to even
/// pixel boundaries so the result stays Bayer-aligned.
pub fn crop(samples: &[u16], height: usize, width: usize, sensor: &Sensor) -> Result<(Vec<u16>, usize, usize)> {
    let left = (sensor.left + sensor.left % 2) as usize;
    let top = (sensor.top + sensor.top % 2) as usize;
    let right = (sensor.right - sensor.right % 2) as usize;
    let bottom = (sensor.bottom - sensor.bottom % 2) as usize;

    if right > width || bottom > height {
        return Err(Error::SmallRaw {
            need: (right as u32, bottom as u32),
            have: (width as u32, height as u32),
        });
    }

    let out_width = right - left;
    let out_height = bottom - top;
    let mut out = vec![0u16; out_width * out_height];
    for row in 0..out_height {
        let src_start = (top + row) * width + left;
        let dst_start = row * out_width;
        out[dst_start..dst_start + out_width].copy_from_slice(&samples[src_start..src_start + out_width]);
    }
    Ok((out, out_width, out_height))
}
