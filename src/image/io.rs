use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image_lib::codecs::jpeg::JpegEncoder;
use image_lib::{ExtendedColorType, ImageEncoder};

use super::{ChannelCount, Image, ImageDesc};
use crate::common::{Error, Result};

/// Quality used for JPEG output.
const JPEG_QUALITY: u8 = 100;

/// Container formats supported for writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    Bmp,
}

impl OutputFormat {
    /// Parses a format tag (the substring after the last `.` of a file name).
    pub fn from_extension(tag: &str) -> Result<OutputFormat> {
        match tag.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "bmp" => Ok(OutputFormat::Bmp),
            _ => Err(Error::InvalidExtension(tag.to_string())),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<OutputFormat> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|os_str| os_str.to_str())
            .ok_or_else(|| Error::InvalidExtension("missing extension".to_string()))?;

        OutputFormat::from_extension(extension)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Jpeg => write!(f, "jpeg"),
            OutputFormat::Png => write!(f, "png"),
            OutputFormat::Bmp => write!(f, "bmp"),
        }
    }
}

pub(super) fn load<P: AsRef<Path>>(filename: P) -> Result<Image> {
    let img = image_lib::open(&filename).map_err(|e| Error::Decode(e.to_string()))?;

    let channel_count = match img.color() {
        image_lib::ColorType::L8 => ChannelCount::L,
        image_lib::ColorType::La8 => ChannelCount::LA,
        image_lib::ColorType::Rgb8 => ChannelCount::Rgb,
        image_lib::ColorType::Rgba8 => ChannelCount::Rgba,
        other => return Err(Error::UnsupportedColorType(format!("{:?}", other))),
    };

    let desc = ImageDesc::new(img.width(), img.height(), channel_count);

    Image::new_with_data(desc, img.into_bytes())
}

pub(super) fn save<P: AsRef<Path>>(image: &Image, filename: P, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Jpeg => save_jpg(image, filename),
        OutputFormat::Png => save_buffer(image, filename, image_lib::ImageFormat::Png),
        OutputFormat::Bmp => save_buffer(image, filename, image_lib::ImageFormat::Bmp),
    }
}

fn color_type(channel_count: ChannelCount) -> ExtendedColorType {
    match channel_count {
        ChannelCount::L => ExtendedColorType::L8,
        ChannelCount::LA => ExtendedColorType::La8,
        ChannelCount::Rgb => ExtendedColorType::Rgb8,
        ChannelCount::Rgba => ExtendedColorType::Rgba8,
    }
}

fn save_jpg<P: AsRef<Path>>(image: &Image, filename: P) -> Result<()> {
    // JPEG has no alpha; reject rather than silently dropping a channel.
    let channel_count = image.desc().channel_count;
    if channel_count.has_alpha() {
        return Err(Error::Encode(format!(
            "JPEG does not support color type {:?}",
            channel_count
        )));
    }

    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);

    encoder
        .write_image(
            image.bytes(),
            image.desc().width,
            image.desc().height,
            color_type(channel_count),
        )
        .map_err(|e| Error::Encode(e.to_string()))?;

    Ok(())
}

fn save_buffer<P: AsRef<Path>>(
    image: &Image,
    filename: P,
    format: image_lib::ImageFormat,
) -> Result<()> {
    image_lib::save_buffer_with_format(
        filename,
        image.bytes(),
        image.desc().width,
        image.desc().height,
        color_type(image.desc().channel_count),
        format,
    )
    .map_err(|e| Error::Encode(e.to_string()))
}
