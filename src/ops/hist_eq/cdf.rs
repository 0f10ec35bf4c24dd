use super::histogram::{Histograms, BINS};

/// Inclusive prefix sums of the per-channel histograms, plus each channel's
/// CDF floor: the smallest strictly positive cumulative value.
///
/// Invariants: every table is non-decreasing and its last entry equals the
/// pixel count.
#[derive(Clone, Debug)]
pub struct CumulativeTables {
    tables: [[u32; BINS]; 3],
    min_cdf: [u32; 3],
    color_channels: usize,
}

impl CumulativeTables {
    /// Consumes the histograms and accumulates each table in place.
    ///
    /// A left-to-right scan over 256 bins per channel; negligible next to the
    /// pixel-count-sized stages, so deliberately not parallelized.
    pub fn from_histograms(histograms: Histograms) -> CumulativeTables {
        let color_channels = histograms.color_channels();
        let mut tables = histograms.into_counts();
        let mut min_cdf = [0u32; 3];

        for (table, min) in tables.iter_mut().zip(min_cdf.iter_mut()).take(color_channels) {
            let mut running = 0u32;
            for count in table.iter_mut() {
                running += *count;
                *count = running;
                // The tables are non-decreasing, so the first positive
                // cumulative value is the smallest one.
                if *min == 0 {
                    *min = running;
                }
            }
        }

        CumulativeTables {
            tables,
            min_cdf,
            color_channels,
        }
    }

    pub fn color_channels(&self) -> usize {
        self.color_channels
    }

    pub fn channel(&self, c: usize) -> &[u32; BINS] {
        &self.tables[c]
    }

    pub fn min_cdf(&self, c: usize) -> u32 {
        self.min_cdf[c]
    }
}
