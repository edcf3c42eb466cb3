use image::{ImageResult, RgbImage};
use std::fmt;
use std::path::Path;

/// Order of the three color channels inside a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

impl ChannelOrder {
    /// Index of `channel` (0 = red, 1 = green, 2 = blue) inside a pixel stored in this order.
    pub fn position_of(&self, channel: usize) -> usize {
        match self {
            ChannelOrder::Rgb => channel,
            ChannelOrder::Bgr => 2 - channel,
        }
    }
}

/// One captured image, 8 bits per channel, three channels per pixel.
#[derive(Clone, PartialEq)]
pub struct Frame {
    pixels: RgbImage,
    channel_order: ChannelOrder,
}

impl Frame {
    pub fn from_rgb_image(pixels: RgbImage) -> Self {
        Self {
            pixels,
            channel_order: ChannelOrder::Rgb,
        }
    }

    /// Wraps raw interleaved pixel data. Returns `None` when the buffer does not
    /// hold exactly `width * height * 3` bytes.
    pub fn from_raw(
        width: u32,
        height: u32,
        data: Vec<u8>,
        channel_order: ChannelOrder,
    ) -> Option<Self> {
        RgbImage::from_raw(width, height, data).map(|pixels| Self {
            pixels,
            channel_order,
        })
    }

    pub fn solid(width: u32, height: u32, color: [u8; 3], channel_order: ChannelOrder) -> Self {
        Self {
            pixels: RgbImage::from_pixel(width, height, image::Rgb(color)),
            channel_order,
        }
    }

    pub fn open(path: &Path) -> ImageResult<Self> {
        Ok(Self::from_rgb_image(image::open(path)?.to_rgb8()))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn channel_order(&self) -> ChannelOrder {
        self.channel_order
    }

    /// Pixels in their stored channel order.
    pub fn raw(&self) -> &RgbImage {
        &self.pixels
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        match self.channel_order {
            ChannelOrder::Rgb => self.pixels.clone(),
            ChannelOrder::Bgr => {
                let mut rgb = self.pixels.clone();
                for pixel in rgb.pixels_mut() {
                    pixel.0.swap(0, 2);
                }
                rgb
            }
        }
    }

    /// Writes the frame as RGB; the format follows the file extension.
    pub fn save(&self, path: &Path) -> ImageResult<()> {
        self.to_rgb_image().save(path)
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame({}x{} {:?})",
            self.width(),
            self.height(),
            self.channel_order
        )
    }
}
