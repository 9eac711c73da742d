//! Centering a region on a white square canvas.

use image::{imageops, DynamicImage, ImageBuffer, Pixel, Primitive};

use crate::types::{Padding, PixelBuffer};

/// Output of [`CanvasComposer::compose`].
#[derive(Debug, Clone)]
pub struct ComposedCanvas {
    pub canvas: PixelBuffer,
    pub padding: Padding,
}

/// Places a region on a `finish_size × finish_size` white canvas.
pub struct CanvasComposer;

impl CanvasComposer {
    /// Center `region` on a new white canvas of the same channel layout.
    ///
    /// A region larger than the canvas is placed at offset 0 on that axis and
    /// its far edge is clipped.
    pub fn compose(region: &PixelBuffer, finish_size: u32) -> ComposedCanvas {
        let padding = Padding::centered(finish_size, region.width(), region.height());

        let canvas = match region.as_image() {
            DynamicImage::ImageLuma8(buf) => {
                DynamicImage::ImageLuma8(place_on_white(buf, finish_size, padding))
            }
            DynamicImage::ImageRgb8(buf) => {
                DynamicImage::ImageRgb8(place_on_white(buf, finish_size, padding))
            }
            DynamicImage::ImageRgba8(buf) => {
                DynamicImage::ImageRgba8(place_on_white(buf, finish_size, padding))
            }
            DynamicImage::ImageLuma16(buf) => {
                DynamicImage::ImageLuma16(place_on_white(buf, finish_size, padding))
            }
            DynamicImage::ImageRgb16(buf) => {
                DynamicImage::ImageRgb16(place_on_white(buf, finish_size, padding))
            }
            DynamicImage::ImageRgba16(buf) => {
                DynamicImage::ImageRgba16(place_on_white(buf, finish_size, padding))
            }
            other => {
                DynamicImage::ImageRgb8(place_on_white(&other.to_rgb8(), finish_size, padding))
            }
        };

        ComposedCanvas {
            canvas: PixelBuffer::new(canvas),
            padding,
        }
    }
}

fn place_on_white<P>(
    region: &ImageBuffer<P, Vec<P::Subpixel>>,
    finish_size: u32,
    padding: Padding,
) -> ImageBuffer<P, Vec<P::Subpixel>>
where
    P: Pixel,
{
    // Every channel at full scale, alpha included.
    let white_samples = vec![
        <P::Subpixel as Primitive>::DEFAULT_MAX_VALUE;
        usize::from(P::CHANNEL_COUNT)
    ];
    let white = *P::from_slice(&white_samples);

    let mut canvas = ImageBuffer::from_pixel(finish_size, finish_size, white);
    // `replace` copies without blending and clips at the canvas edge.
    imageops::replace(
        &mut canvas,
        region,
        i64::from(padding.x),
        i64::from(padding.y),
    );
    canvas
}
