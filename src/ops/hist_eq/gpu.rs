use std::time::Instant;

use ocl::{Buffer, Kernel};

use super::cdf::CumulativeTables;
use super::histogram::{Histograms, BINS};
use crate::common::Result;
use crate::gpu::{GpuHistEqPipeline, OclContext};
use crate::image::Image;

/// Accelerator pipeline: three kernel dispatches on one in-order queue.
///
/// Kernel 2 consumes the complete output of kernel 1 and kernel 3 the
/// complete output of kernel 2; submission order plus the blocking read-back
/// at the end enforce that. The device-side histogram, cumulative-table and
/// floor buffers are transient and never observed by the host.
pub(super) fn apply(
    ctx: &OclContext,
    pipeline: &GpuHistEqPipeline,
    input: &Image,
) -> Result<Image> {
    let desc = *input.desc();
    let size_px = desc.pixel_count();
    let channels = desc.channel_count.channel_count() as i32;
    let color_channels = desc.channel_count.color_channels() as i32;

    let started = Instant::now();

    let image_in = Buffer::<u8>::builder()
        .queue(ctx.queue().clone())
        .len(input.bytes().len())
        .copy_host_slice(input.bytes())
        .build()?;

    let histograms = Buffer::<u32>::builder()
        .queue(ctx.queue().clone())
        .len(3 * BINS)
        .fill_val(0u32)
        .build()?;

    let cdfs = Buffer::<u32>::builder()
        .queue(ctx.queue().clone())
        .len(3 * BINS)
        .build()?;

    let min_cdfs = Buffer::<u32>::builder()
        .queue(ctx.queue().clone())
        .len(3)
        .build()?;

    let image_out = Buffer::<u8>::builder()
        .queue(ctx.queue().clone())
        .len(input.bytes().len())
        .build()?;

    // One work-item per pixel; concurrent increments on shared bins use
    // atomic adds.
    let accumulate = Kernel::builder()
        .name("accumulate_histograms")
        .program(pipeline.program())
        .queue(ctx.queue().clone())
        .global_work_size(size_px)
        .arg(&image_in)
        .arg(&histograms)
        .arg(size_px as i32)
        .arg(channels)
        .arg(color_channels)
        .build()?;

    unsafe {
        accumulate.enq()?;
    }

    if pipeline.scan_on_device() {
        // One 256-item work-group per color channel scans its table in
        // work-group-local memory and folds in the floor reduction.
        let scan = Kernel::builder()
            .name("scan_cdfs")
            .program(pipeline.program())
            .queue(ctx.queue().clone())
            .global_work_size(color_channels as usize * BINS)
            .local_work_size(BINS)
            .arg(&histograms)
            .arg(&cdfs)
            .arg(&min_cdfs)
            .arg_local::<u32>(BINS)
            .build()?;

        unsafe {
            scan.enq()?;
        }
    } else {
        scan_on_host(&histograms, &cdfs, &min_cdfs, color_channels as usize)?;
    }

    let remap = Kernel::builder()
        .name("remap_pixels")
        .program(pipeline.program())
        .queue(ctx.queue().clone())
        .global_work_size(size_px)
        .arg(&image_in)
        .arg(&image_out)
        .arg(&cdfs)
        .arg(&min_cdfs)
        .arg(size_px as i32)
        .arg(channels)
        .arg(color_channels)
        .build()?;

    unsafe {
        remap.enq()?;
    }

    // Blocking read; doubles as the barrier on the whole dispatch chain.
    let mut out_bytes = vec![0u8; input.bytes().len()];
    image_out.read(&mut out_bytes).enq()?;

    log::debug!(
        "device pipeline in {:.3} ms",
        started.elapsed().as_secs_f64() * 1000.0
    );

    Image::new_with_data(desc, out_bytes)
}

/// Fallback for devices whose work-group limit is below 256: read the
/// histograms back, run the host scan, and upload the finished tables. Costs
/// one extra round trip but keeps the per-pixel stages on the device.
fn scan_on_host(
    histograms: &Buffer<u32>,
    cdfs: &Buffer<u32>,
    min_cdfs: &Buffer<u32>,
    color_channels: usize,
) -> Result<()> {
    let mut counts_flat = vec![0u32; 3 * BINS];
    histograms.read(&mut counts_flat).enq()?;

    let mut counts = [[0u32; BINS]; 3];
    for (c, table) in counts.iter_mut().enumerate() {
        table.copy_from_slice(&counts_flat[c * BINS..(c + 1) * BINS]);
    }

    let tables = CumulativeTables::from_histograms(Histograms::from_counts(counts, color_channels));

    let mut cdfs_flat = vec![0u32; 3 * BINS];
    let mut mins = [0u32; 3];
    for c in 0..color_channels {
        cdfs_flat[c * BINS..(c + 1) * BINS].copy_from_slice(tables.channel(c));
        mins[c] = tables.min_cdf(c);
    }

    cdfs.write(&cdfs_flat).enq()?;
    min_cdfs.write(&mins[..]).enq()?;

    Ok(())
}
