use rayon::prelude::*;

use super::cdf::CumulativeTables;
use crate::image::Image;

/// Applies the equalization formula to every pixel:
///
/// `new = round((cdf[c][old] - min_cdf[c]) / (total - min_cdf[c]) * 255)`
///
/// Each output byte depends only on the read-only tables and the input, so
/// rows are processed in parallel with no synchronization. Alpha bytes are
/// copied through unchanged.
pub(super) fn apply(input: &Image, tables: &CumulativeTables) -> Image {
    let desc = *input.desc();
    let channels = desc.channel_count.channel_count() as usize;
    let color_channels = desc.channel_count.color_channels() as usize;
    let has_alpha = desc.channel_count.has_alpha();
    let total = desc.pixel_count() as u32;
    let row_bytes = desc.row_bytes();

    let mut output = Image::new_empty(desc).expect("input descriptor is valid");

    output
        .bytes_mut()
        .par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(y, out_row)| {
            let in_row = &input.bytes()[y * row_bytes..y * row_bytes + row_bytes];

            for (src, dst) in in_row
                .chunks_exact(channels)
                .zip(out_row.chunks_exact_mut(channels))
            {
                for c in 0..color_channels {
                    dst[c] = remap_value(src[c], tables.channel(c), tables.min_cdf(c), total);
                }

                if has_alpha {
                    dst[channels - 1] = src[channels - 1];
                }
            }
        });

    output
}

#[inline]
fn remap_value(value: u8, cdf: &[u32; 256], min_cdf: u32, total: u32) -> u8 {
    let denominator = total - min_cdf;
    // A channel with a single distinct value has min_cdf == total; the
    // formula degenerates, so the channel passes through unchanged.
    if denominator == 0 {
        return value;
    }

    // Any value present in the image has a cumulative count >= min_cdf.
    let numerator = cdf[value as usize] - min_cdf;
    let scaled = numerator as f32 / denominator as f32 * 255.0;
    scaled.round() as u8
}
