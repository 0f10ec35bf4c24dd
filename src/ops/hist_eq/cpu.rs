use std::time::Instant;

use super::cdf::CumulativeTables;
use super::histogram::Histograms;
use super::remap;
use crate::image::Image;

/// Host pipeline: histogram -> cumulative tables -> remap.
///
/// The stages run strictly in order; the tables produced by one stage are
/// read-only for the next.
pub(super) fn apply(input: &Image) -> Image {
    let started = Instant::now();
    let histograms = Histograms::build(input);
    log::debug!("histogram built in {:.3} ms", elapsed_ms(started));

    let started = Instant::now();
    let tables = CumulativeTables::from_histograms(histograms);
    log::debug!("cumulative tables in {:.3} ms", elapsed_ms(started));

    let started = Instant::now();
    let output = remap::apply(input, &tables);
    log::debug!("remap in {:.3} ms", elapsed_ms(started));

    output
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
