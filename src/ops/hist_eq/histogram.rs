use rayon::prelude::*;

use crate::image::Image;

/// Number of intensity bins per channel.
pub const BINS: usize = 256;

/// Per-channel frequency tables counting occurrences of each intensity value.
///
/// Three fixed tables (R, G, B); for single-color-channel images only the
/// first table is populated. Every populated table sums to the pixel count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histograms {
    counts: [[u32; BINS]; 3],
    color_channels: usize,
}

impl Histograms {
    fn empty(color_channels: usize) -> Self {
        Self {
            counts: [[0; BINS]; 3],
            color_channels,
        }
    }

    /// Scans the image in parallel across row chunks.
    ///
    /// Each worker accumulates into private tables; per-bin sums are merged
    /// afterwards. Addition is commutative, so the result is exact and
    /// independent of worker count and scheduling order.
    pub fn build(image: &Image) -> Histograms {
        let channels = image.desc().channel_count.channel_count() as usize;
        let color_channels = image.desc().channel_count.color_channels() as usize;
        let row_bytes = image.desc().row_bytes();

        image
            .bytes()
            .par_chunks(row_bytes)
            .fold(
                || Histograms::empty(color_channels),
                |mut acc, row| {
                    acc.accumulate_row(row, channels);
                    acc
                },
            )
            .reduce(|| Histograms::empty(color_channels), Histograms::merge)
    }

    /// Single-threaded scan over all pixels.
    pub fn build_sequential(image: &Image) -> Histograms {
        let channels = image.desc().channel_count.channel_count() as usize;
        let color_channels = image.desc().channel_count.color_channels() as usize;

        let mut histograms = Histograms::empty(color_channels);
        for row in image.bytes().chunks(image.desc().row_bytes()) {
            histograms.accumulate_row(row, channels);
        }
        histograms
    }

    fn accumulate_row(&mut self, row: &[u8], channels: usize) {
        for pixel in row.chunks_exact(channels) {
            for c in 0..self.color_channels {
                self.counts[c][pixel[c] as usize] += 1;
            }
        }
    }

    fn merge(mut self, other: Histograms) -> Histograms {
        for c in 0..3 {
            for bin in 0..BINS {
                self.counts[c][bin] += other.counts[c][bin];
            }
        }
        self
    }

    pub fn color_channels(&self) -> usize {
        self.color_channels
    }

    pub fn channel(&self, c: usize) -> &[u32; BINS] {
        &self.counts[c]
    }

    pub(super) fn from_counts(counts: [[u32; BINS]; 3], color_channels: usize) -> Histograms {
        Histograms {
            counts,
            color_channels,
        }
    }

    pub(super) fn into_counts(self) -> [[u32; BINS]; 3] {
        self.counts
    }
}
