use crate::frame::{ChannelOrder, Frame};
use crate::image_classifier::interface::InputBatch;
use crate::image_classifier::models::model_config::{ModelConfig, ResizeMode, TensorLayout};
use image::{imageops, RgbImage};

/// Resizes the stored pixels to a `size` x `size` square. Channel order is
/// left untouched.
pub fn resize_frame(frame: &Frame, size: u32, mode: ResizeMode) -> RgbImage {
    let image = frame.raw();

    match mode {
        ResizeMode::Stretch => imageops::resize(image, size, size, imageops::FilterType::Triangle),
        ResizeMode::Letterbox if image.width() == image.height() => {
            imageops::resize(image, size, size, imageops::FilterType::Triangle)
        }
        ResizeMode::Letterbox => {
            let (w, h) = (image.width() as f32, image.height() as f32);
            let scale = (size as f32 / w).min(size as f32 / h);
            let new_w = ((w * scale) as u32).clamp(1, size);
            let new_h = ((h * scale) as u32).clamp(1, size);

            let scaled = imageops::resize(image, new_w, new_h, imageops::FilterType::Triangle);

            let mut padded = RgbImage::new(size, size);
            let x_offset = (size - new_w) / 2;
            let y_offset = (size - new_h) / 2;
            imageops::replace(&mut padded, &scaled, x_offset as i64, y_offset as i64);

            padded
        }
    }
}

/// Where to read model channel `channel` from, in a pixel stored as `frame_order`.
fn source_channel(model_order: ChannelOrder, frame_order: ChannelOrder, channel: usize) -> usize {
    // position_of is its own inverse, so it also maps a model slot back to a color.
    frame_order.position_of(model_order.position_of(channel))
}

/// Turns a frame into a single-image batch: resize, channel reorder, normalize.
pub fn frame_to_batch(frame: &Frame, config: &ModelConfig) -> InputBatch {
    let resized = resize_frame(frame, config.input_size, config.resize);
    let size = config.input_size as usize;
    let channels: [usize; 3] =
        [0, 1, 2].map(|c| source_channel(config.channel_order, frame.channel_order(), c));

    let shape = match config.layout {
        TensorLayout::Nhwc => (1, size, size, 3),
        TensorLayout::Nchw => (1, 3, size, size),
    };

    InputBatch::from_shape_fn(shape, |(_, a, b, c)| {
        let (y, x, channel) = match config.layout {
            TensorLayout::Nhwc => (a, b, c),
            TensorLayout::Nchw => (b, c, a),
        };
        let pixel = resized.get_pixel(x as u32, y as u32);
        config.normalization.apply(pixel[channels[channel]])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_classifier::models::model_config::Normalization;

    fn config(normalization: Normalization) -> ModelConfig {
        ModelConfig::new("model.onnx".into(), normalization)
    }

    #[test]
    fn test_batch_has_model_shape_for_any_source_size() {
        let frame = Frame::solid(640, 480, [0, 0, 0], ChannelOrder::Rgb);

        let batch = frame_to_batch(&frame, &config(Normalization::ZeroToOne));

        assert_eq!(batch.shape(), &[1, 224, 224, 3]);
    }

    #[test]
    fn test_minus_one_to_one_maps_black_and_white() {
        let config = config(Normalization::MinusOneToOne);

        let black = frame_to_batch(&Frame::solid(224, 224, [0, 0, 0], ChannelOrder::Rgb), &config);
        let white = frame_to_batch(
            &Frame::solid(224, 224, [255, 255, 255], ChannelOrder::Rgb),
            &config,
        );

        assert!(black.iter().all(|&v| v == -1.0));
        assert!(white.iter().all(|&v| v > 0.99));
    }

    #[test]
    fn test_zero_to_one_maps_black_and_white() {
        let config = config(Normalization::ZeroToOne);

        let black = frame_to_batch(&Frame::solid(224, 224, [0, 0, 0], ChannelOrder::Rgb), &config);
        let white = frame_to_batch(
            &Frame::solid(224, 224, [255, 255, 255], ChannelOrder::Rgb),
            &config,
        );

        assert!(black.iter().all(|&v| v == 0.0));
        assert!(white.iter().all(|&v| v > 0.99));
    }

    #[test]
    fn test_bgr_frame_is_reordered_for_rgb_model() {
        // Stored as BGR: blue = 255, red = 0.
        let frame = Frame::solid(50, 50, [255, 0, 0], ChannelOrder::Bgr);

        let batch = frame_to_batch(&frame, &config(Normalization::ZeroToOne));

        assert_eq!(batch[[0, 10, 10, 0]], 0.0);
        assert!(batch[[0, 10, 10, 2]] > 0.99);
    }

    #[test]
    fn test_bgr_model_reads_rgb_frame_reversed() {
        let frame = Frame::solid(50, 50, [255, 0, 0], ChannelOrder::Rgb);
        let mut config = config(Normalization::ZeroToOne);
        config.channel_order = ChannelOrder::Bgr;

        let batch = frame_to_batch(&frame, &config);

        assert_eq!(batch[[0, 10, 10, 0]], 0.0);
        assert!(batch[[0, 10, 10, 2]] > 0.99);
    }

    #[test]
    fn test_nchw_layout_puts_channels_first() {
        let frame = Frame::solid(100, 100, [255, 0, 0], ChannelOrder::Rgb);
        let mut config = config(Normalization::ZeroToOne);
        config.layout = TensorLayout::Nchw;
        config.input_size = 64;

        let batch = frame_to_batch(&frame, &config);

        assert_eq!(batch.shape(), &[1, 3, 64, 64]);
        assert!(batch[[0, 0, 32, 32]] > 0.99);
        assert_eq!(batch[[0, 1, 32, 32]], 0.0);
    }

    #[test]
    fn test_letterbox_centers_wide_image() {
        let frame = Frame::solid(200, 100, [255, 0, 0], ChannelOrder::Rgb);

        let resized = resize_frame(&frame, 64, ResizeMode::Letterbox);

        assert_eq!(resized.dimensions(), (64, 64));
        assert!(resized.get_pixel(32, 32).0[0] > 250);
        assert_eq!(resized.get_pixel(32, 0).0, [0, 0, 0]);
        assert_eq!(resized.get_pixel(32, 63).0, [0, 0, 0]);
    }

    #[test]
    fn test_stretch_fills_whole_square() {
        let frame = Frame::solid(200, 100, [0, 255, 0], ChannelOrder::Rgb);

        let resized = resize_frame(&frame, 64, ResizeMode::Stretch);

        assert!(resized.get_pixel(32, 0).0[1] > 250);
        assert!(resized.get_pixel(0, 63).0[1] > 250);
    }
}
