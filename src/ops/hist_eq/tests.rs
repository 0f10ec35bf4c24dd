use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::cdf::CumulativeTables;
use super::histogram::{Histograms, BINS};
use super::HistEq;
use crate::image::{ChannelCount, Image, ImageDesc};

fn random_image(width: u32, height: u32, channel_count: ChannelCount, seed: u64) -> Image {
    let desc = ImageDesc::new(width, height, channel_count);
    let mut rng = StdRng::seed_from_u64(seed);
    let bytes = (0..desc.size_in_bytes()).map(|_| rng.random()).collect();
    Image::new_with_data(desc, bytes).unwrap()
}

// =============================================================================
// Histogram tests
// =============================================================================

#[test]
fn histogram_sums_to_pixel_count() {
    let image = random_image(61, 47, ChannelCount::Rgb, 1);
    let histograms = Histograms::build(&image);

    for c in 0..3 {
        let sum: u64 = histograms.channel(c).iter().map(|&v| v as u64).sum();
        assert_eq!(sum, 61 * 47, "channel {}", c);
    }
}

#[test]
fn parallel_histogram_matches_sequential() {
    for seed in 0..4 {
        let image = random_image(123, 77, ChannelCount::Rgba, seed);
        assert_eq!(
            Histograms::build(&image),
            Histograms::build_sequential(&image)
        );
    }
}

#[test]
fn histogram_counts_known_values() {
    let desc = ImageDesc::new(2, 2, ChannelCount::L);
    let image = Image::new_with_data(desc, vec![10, 10, 200, 200]).unwrap();
    let histograms = Histograms::build(&image);

    assert_eq!(histograms.color_channels(), 1);
    assert_eq!(histograms.channel(0)[10], 2);
    assert_eq!(histograms.channel(0)[200], 2);
    let sum: u32 = histograms.channel(0).iter().sum();
    assert_eq!(sum, 4);
}

// =============================================================================
// Cumulative table tests
// =============================================================================

#[test]
fn cumulative_tables_are_monotonic_and_complete() {
    let image = random_image(50, 40, ChannelCount::Rgb, 7);
    let tables = CumulativeTables::from_histograms(Histograms::build(&image));

    for c in 0..3 {
        let table = tables.channel(c);
        for i in 1..BINS {
            assert!(table[i] >= table[i - 1], "channel {} bin {}", c, i);
        }
        assert_eq!(table[BINS - 1], 50 * 40);
    }
}

#[test]
fn min_cdf_is_first_positive_cumulative_value() {
    let desc = ImageDesc::new(2, 2, ChannelCount::L);
    let image = Image::new_with_data(desc, vec![10, 10, 200, 200]).unwrap();
    let tables = CumulativeTables::from_histograms(Histograms::build(&image));

    assert_eq!(tables.min_cdf(0), 2);
    assert_eq!(tables.channel(0)[9], 0);
    assert_eq!(tables.channel(0)[10], 2);
    assert_eq!(tables.channel(0)[199], 2);
    assert_eq!(tables.channel(0)[200], 4);
    assert_eq!(tables.channel(0)[255], 4);
}

// =============================================================================
// Equalization tests
// =============================================================================

#[test]
fn two_by_two_scenario() {
    // R = [10, 10, 200, 200], G = B = 0 everywhere.
    let desc = ImageDesc::new(2, 2, ChannelCount::Rgb);
    let bytes = vec![
        10, 0, 0, //
        10, 0, 0, //
        200, 0, 0, //
        200, 0, 0,
    ];
    let image = Image::new_with_data(desc, bytes).unwrap();

    let output = HistEq::new().apply_cpu(&image);

    // old=10 -> round((2-2)/(4-2)*255) = 0; old=200 -> round((4-2)/(4-2)*255) = 255.
    let expected_r = [0u8, 0, 255, 255];
    for (px, expected) in output.bytes().chunks_exact(3).zip(expected_r) {
        assert_eq!(px[0], expected);
        // G and B hold a single distinct value and pass through unchanged.
        assert_eq!(px[1], 0);
        assert_eq!(px[2], 0);
    }
}

#[test]
fn output_shape_matches_input() {
    let image = random_image(33, 21, ChannelCount::Rgb, 3);
    let output = HistEq::new().apply_cpu(&image);

    assert_eq!(output.desc(), image.desc());
    assert_eq!(output.bytes().len(), image.bytes().len());
}

#[test]
fn alpha_passes_through_unmodified() {
    let image = random_image(37, 29, ChannelCount::Rgba, 11);
    let output = HistEq::new().apply_cpu(&image);

    for (src, dst) in image
        .bytes()
        .chunks_exact(4)
        .zip(output.bytes().chunks_exact(4))
    {
        assert_eq!(src[3], dst[3]);
    }
}

#[test]
fn gray_alpha_equalizes_only_the_gray_channel() {
    let image = random_image(25, 25, ChannelCount::LA, 13);
    let output = HistEq::new().apply_cpu(&image);

    for (src, dst) in image
        .bytes()
        .chunks_exact(2)
        .zip(output.bytes().chunks_exact(2))
    {
        assert_eq!(src[1], dst[1]);
    }
}

#[test]
fn uniform_image_is_unchanged() {
    // Every channel holds a single distinct value; the remap denominator is
    // zero and the degenerate-channel policy emits the input untouched.
    let desc = ImageDesc::new(16, 16, ChannelCount::Rgb);
    let bytes = vec![93u8; desc.size_in_bytes()];
    let image = Image::new_with_data(desc, bytes).unwrap();

    let output = HistEq::new().apply_cpu(&image);

    assert_eq!(output.bytes(), image.bytes());
}

#[test]
fn equalizing_a_uniform_histogram_is_identity() {
    // A gray image holding each intensity value exactly once already has a
    // uniform histogram: cdf[v] = v + 1, min_cdf = 1, so the remap maps every
    // value onto itself and re-equalization changes nothing.
    let desc = ImageDesc::new(16, 16, ChannelCount::L);
    let bytes: Vec<u8> = (0..=255).collect();
    let image = Image::new_with_data(desc, bytes).unwrap();

    let once = HistEq::new().apply_cpu(&image);
    for (a, b) in image.bytes().iter().zip(once.bytes()) {
        assert!((*a as i16 - *b as i16).abs() <= 1);
    }

    let twice = HistEq::new().apply_cpu(&once);
    assert_eq!(once.bytes(), twice.bytes());
}

#[test]
fn output_spans_full_range() {
    let image = random_image(64, 64, ChannelCount::L, 17);
    let output = HistEq::new().apply_cpu(&image);

    // 4096 random pixels populate both tails, so the equalized channel must
    // reach both ends of the intensity range.
    assert!(output.bytes().contains(&0));
    assert!(output.bytes().contains(&255));
}

// =============================================================================
// Accelerator path
// =============================================================================

#[test]
#[ignore = "requires an OpenCL GPU device"]
fn gpu_output_matches_cpu_byte_for_byte() {
    use crate::gpu::{GpuHistEqPipeline, OclContext};

    let source = include_str!("../../../kernels/lumeq.cl");
    let ctx = OclContext::new().unwrap();
    let pipeline = GpuHistEqPipeline::new(&ctx, source).unwrap();

    for channel_count in [
        ChannelCount::L,
        ChannelCount::LA,
        ChannelCount::Rgb,
        ChannelCount::Rgba,
    ] {
        let image = random_image(173, 131, channel_count, 23);

        let cpu = HistEq::new().apply_cpu(&image);
        let gpu = HistEq::new().apply_gpu(&ctx, &pipeline, &image).unwrap();

        assert_eq!(cpu.bytes(), gpu.bytes(), "{:?}", channel_count);
    }
}
