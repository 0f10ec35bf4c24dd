mod cdf;
mod cpu;
mod gpu;
mod histogram;
mod remap;

#[cfg(test)]
mod tests;

use crate::common::Result;
use crate::gpu::{GpuHistEqPipeline, OclContext};
use crate::image::Image;

pub use cdf::CumulativeTables;
pub use histogram::{Histograms, BINS};

/// Per-channel histogram equalization.
///
/// Redistributes the intensity values of each color channel so that the
/// output histogram approximates a uniform distribution. The alpha channel,
/// if present, is copied through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistEq;

impl HistEq {
    pub fn new() -> Self {
        HistEq
    }

    /// Runs the full pipeline on the CPU, parallelized across image rows.
    pub fn apply_cpu(&self, input: &Image) -> Image {
        cpu::apply(input)
    }

    /// Runs the full pipeline as three kernel dispatches on an OpenCL device.
    ///
    /// Produces byte-identical output to [`HistEq::apply_cpu`].
    pub fn apply_gpu(
        &self,
        ctx: &OclContext,
        pipeline: &GpuHistEqPipeline,
        input: &Image,
    ) -> Result<Image> {
        gpu::apply(ctx, pipeline, input)
    }
}
