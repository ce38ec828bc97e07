/// Remaps the lossless-JPEG decoder's flat raster output (logically
/// `H x W`, but laid out as concatenated vertical slices) into a true
/// `H x W` sensor image in row-major order.
///
/// `widths` is the slice-width sequence `S`; `sum(widths) == W` is the
/// caller's responsibility (checked by the container parser when it
/// builds `CR2Slice`).
pub fn reassemble(samples: &[u16], height: usize, widths: &[u32]) -> Vec<u16> {
    let width: usize = widths.iter().map(|&w| w as usize).sum();
    let mut out = vec![0u16; height * width];

    let mut column = 0usize;
    let mut flat_pos = 0usize;
    for &w in widths {
        let w = w as usize;
        for row in 0..height {
            let src = flat_pos + row * w;
            let dst = row * width + column;
            out[dst..dst + w].copy_from_slice(&samples[src..src + w]);
        }
        flat_pos += height * w;
        column += w;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn single_slice_is_identity() {
        let samples: Vec<u16> = (0..12).collect();
        let out = reassemble(&samples, 3, &[4]);
        assert_eq!(out, samples);
    }

    #[test]
    fn two_slices_round_trip() {
        // sensor image (H=2, W=4): rows [0,1,2,3] and [4,5,6,7]
        // split into slices of width 2 each: slice0 = cols 0..2, slice1 = cols 2..4
        // decoder raster (flat, slice-major): slice0 rows then slice1 rows
        let slice0 = [0u16, 1, 4, 5]; // (H=2, w=2) row-major
        let slice1 = [2u16, 3, 6, 7];
        let mut raster = Vec::new();
        raster.extend_from_slice(&slice0);
        raster.extend_from_slice(&slice1);

        let out = reassemble(&raster, 2, &[2, 2]);
        assert_eq!(out, vec![0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn widths_sum_matches_output_width() {
        let samples: Vec<u16> = (0..(4 * 10)).map(|v| v as u16).collect();
        let out = reassemble(&samples, 4, &[3, 3, 4]);
        assert_eq!(out.len(), 4 * 10);
    }

    proptest! {
        #[test]
        fn reassembly_round_trips_arbitrary_slice_widths(
            widths in prop::collection::vec(1u32..6, 1..5),
            height in 1usize..6,
        ) {
            let width: usize = widths.iter().map(|&w| w as usize).sum();
            // value encodes (row, col) uniquely for these small bounds
            let original: Vec<u16> = (0..height * width)
                .map(|i| ((i / width) * 100 + i % width) as u16)
                .collect();

            // slice the original column-wise, concatenated slice-major,
            // the same layout the lossless-JPEG decoder emits
            let mut raster = Vec::with_capacity(height * width);
            let mut column = 0usize;
            for &w in &widths {
                let w = w as usize;
                for row in 0..height {
                    let start = row * width + column;
                    raster.extend_from_slice(&original[start..start + w]);
                }
                column += w;
            }

            let out = reassemble(&raster, height, &widths);
            prop_assert_eq!(out, original);
        }
    }
}
