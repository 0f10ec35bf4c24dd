mod io;


use std::path::Path;

use crate::common::{Error, Result};

pub use io::OutputFormat;

#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone)]
#[repr(u8)]
pub enum ChannelCount {
    L = 1,
    LA = 2,
    Rgb = 3,
    Rgba = 4,
}

impl ChannelCount {
    pub fn channel_count(&self) -> u8 {
        *self as u8
    }

    /// Channels that participate in equalization (everything but alpha).
    pub fn color_channels(&self) -> u8 {
        match self {
            ChannelCount::L | ChannelCount::LA => 1,
            ChannelCount::Rgb | ChannelCount::Rgba => 3,
        }
    }

    pub fn has_alpha(&self) -> bool {
        matches!(self, ChannelCount::LA | ChannelCount::Rgba)
    }
}

#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub struct ImageDesc {
    pub width: u32,
    pub height: u32,
    pub channel_count: ChannelCount,
}

impl ImageDesc {
    pub fn new(width: u32, height: u32, channel_count: ChannelCount) -> Self {
        Self {
            width,
            height,
            channel_count,
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Bytes per row; pixel data is always tightly packed.
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.channel_count.channel_count() as usize
    }

    pub fn size_in_bytes(&self) -> usize {
        self.height as usize * self.row_bytes()
    }

    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimensions(format!(
                "{}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for ImageDesc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{} {:?}",
            self.width, self.height, self.channel_count
        )
    }
}

/// An 8-bit raster image with interleaved channels. Pixel (x, y) channel c
/// lives at byte offset `(y * width + x) * channels + c`.
#[derive(Clone, Debug)]
pub struct Image {
    desc: ImageDesc,
    bytes: Vec<u8>,
}

impl Image {
    pub fn desc(&self) -> &ImageDesc {
        &self.desc
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub fn take_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn new_empty(desc: ImageDesc) -> Result<Image> {
        desc.validate()?;

        let bytes = vec![0; desc.size_in_bytes()];

        Ok(Image { desc, bytes })
    }

    pub fn new_with_data(desc: ImageDesc, bytes: Vec<u8>) -> Result<Image> {
        desc.validate()?;

        if bytes.len() != desc.size_in_bytes() {
            return Err(Error::InvalidDimensions(format!(
                "bytes length {} does not match expected size {}",
                bytes.len(),
                desc.size_in_bytes()
            )));
        }

        Ok(Image { desc, bytes })
    }

    pub fn read_file<P: AsRef<Path>>(filename: P) -> Result<Image> {
        io::load(filename)
    }

    pub fn save_file<P: AsRef<Path>>(&self, filename: P, format: OutputFormat) -> Result<()> {
        io::save(self, filename, format)
    }
}
