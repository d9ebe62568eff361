//! PNG to JPEG normalization with alpha flattening.

use crate::error::{ImageError, Result};
use image::{DynamicImage, GenericImageView, ImageBuffer, ImageOutputFormat, Rgba, RgbaImage};
use std::io::Cursor;
use tracing::debug;

/// JPEG quality used for every upload. The OCR service gets no compression artifacts.
pub const JPEG_QUALITY: u8 = 100;

/// Canvas color used when the caller does not pick one: opaque black.
pub const DEFAULT_BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Convert PNG bytes into JPEG bytes.
///
/// The decoded image is composited over a canvas filled with `background`
/// (or [`DEFAULT_BACKGROUND`] when `None`), the alpha channel is dropped and
/// the result is encoded at [`JPEG_QUALITY`].
///
/// # Errors
/// [`ImageError::Decode`] for malformed PNG data, [`ImageError::Encode`] if
/// the JPEG encoder rejects the buffer.
pub fn png_to_jpeg(data: &[u8], background: Option<Rgba<u8>>) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory_with_format(data, image::ImageFormat::Png)
        .map_err(ImageError::Decode)?;

    let (width, height) = decoded.dimensions();
    debug!(
        width,
        height,
        has_alpha = has_alpha_channel(&decoded),
        background_set = background.is_some(),
        "Decoded PNG"
    );

    let flattened = composite_over(
        &decoded.to_rgba8(),
        background.unwrap_or(DEFAULT_BACKGROUND),
    );

    encode_jpeg(flattened)
}

/// Composite `img` over a canvas of the same bounds filled with `background`.
///
/// The canvas is filled first (source replace), then every pixel of `img`
/// is blended on top with straight-alpha source-over.
pub fn composite_over(img: &RgbaImage, background: Rgba<u8>) -> RgbaImage {
    let (width, height) = img.dimensions();
    let mut canvas: RgbaImage = ImageBuffer::from_pixel(width, height, background);

    for (x, y, pixel) in img.enumerate_pixels() {
        let dst = canvas.get_pixel_mut(x, y);
        *dst = blend_over(*pixel, *dst);
    }

    canvas
}

fn blend_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let Rgba([sr, sg, sb, sa]) = src;
    let Rgba([dr, dg, db, da]) = dst;

    let src_alpha = f32::from(sa) / 255.0;
    let dst_alpha = f32::from(da) / 255.0;
    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);

    if out_alpha <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |s: u8, d: u8| {
        let value =
            (f32::from(s) * src_alpha + f32::from(d) * dst_alpha * (1.0 - src_alpha)) / out_alpha;
        value.round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(sr, dr),
        channel(sg, dg),
        channel(sb, db),
        (out_alpha * 255.0).round() as u8,
    ])
}

fn encode_jpeg(img: RgbaImage) -> Result<Vec<u8>> {
    // JPEG has no alpha; the flattened color channels are kept as-is.
    let rgb = DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(img).to_rgb8());

    let mut buffer = Cursor::new(Vec::new());
    rgb.write_to(&mut buffer, ImageOutputFormat::Jpeg(JPEG_QUALITY))
        .map_err(ImageError::Encode)?;
    Ok(buffer.into_inner())
}

/// Check if an image has an alpha channel
pub fn has_alpha_channel(img: &DynamicImage) -> bool {
    matches!(
        img,
        DynamicImage::ImageRgba8(_)
            | DynamicImage::ImageRgba16(_)
            | DynamicImage::ImageRgba32F(_)
            | DynamicImage::ImageLumaA8(_)
            | DynamicImage::ImageLumaA16(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{detect_format, ImageFormat};

    const TOLERANCE: i16 = 6;

    fn encode_png(img: RgbaImage) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut buffer, ImageOutputFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    /// 32x16 image: left half opaque red, right half fully transparent.
    /// Each half covers whole 16x16 JPEG MCUs.
    fn half_transparent_png() -> Vec<u8> {
        let img = ImageBuffer::from_fn(32, 16, |x, _| {
            if x < 16 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        encode_png(img)
    }

    fn assert_close(actual: [u8; 4], expected: [u8; 3]) {
        for i in 0..3 {
            let diff = (i16::from(actual[i]) - i16::from(expected[i])).abs();
            assert!(
                diff <= TOLERANCE,
                "channel {i}: got {:?}, expected {:?}",
                actual,
                expected
            );
        }
    }

    #[test]
    fn test_composite_over_white_background() {
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255])); // Opaque red
        img.put_pixel(0, 1, Rgba([0, 255, 0, 128])); // Semi-transparent green
        img.put_pixel(1, 0, Rgba([0, 0, 255, 0])); // Fully transparent blue
        img.put_pixel(1, 1, Rgba([255, 255, 0, 255])); // Opaque yellow

        let result = composite_over(&img, Rgba([255, 255, 255, 255]));

        assert_eq!(result.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(result.get_pixel(0, 1), &Rgba([127, 255, 127, 255]));
        assert_eq!(result.get_pixel(1, 0), &Rgba([255, 255, 255, 255]));
        assert_eq!(result.get_pixel(1, 1), &Rgba([255, 255, 0, 255]));
    }

    #[test]
    fn test_composite_keeps_bounds() {
        let img = RgbaImage::new(7, 3);
        let result = composite_over(&img, DEFAULT_BACKGROUND);
        assert_eq!(result.dimensions(), (7, 3));
        assert!(result.pixels().all(|p| *p == DEFAULT_BACKGROUND));
    }

    #[test]
    fn test_transparent_area_takes_background_color() {
        let background = Rgba([40, 120, 200, 255]);
        let jpeg = png_to_jpeg(&half_transparent_png(), Some(background)).unwrap();
        assert_eq!(detect_format(&jpeg).unwrap(), ImageFormat::Jpeg);

        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (32, 16));
        assert_close(decoded.get_pixel(27, 8).0, [40, 120, 200]);
        assert_close(decoded.get_pixel(4, 8).0, [255, 0, 0]);
    }

    #[test]
    fn test_transparent_area_defaults_to_black() {
        let jpeg = png_to_jpeg(&half_transparent_png(), None).unwrap();

        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_close(decoded.get_pixel(27, 8).0, [0, 0, 0]);
        assert_close(decoded.get_pixel(4, 8).0, [255, 0, 0]);
    }

    #[test]
    fn test_fully_transparent_png_on_white() {
        let png = encode_png(RgbaImage::new(8, 8));
        let jpeg = png_to_jpeg(&png, Some(Rgba([255, 255, 255, 255]))).unwrap();

        let decoded = image::load_from_memory(&jpeg).unwrap().to_rgba8();
        for pixel in decoded.pixels() {
            assert_close(pixel.0, [255, 255, 255]);
        }
    }

    #[test]
    fn test_malformed_png_is_decode_error() {
        let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        data.extend_from_slice(b"definitely not chunks");
        assert!(matches!(png_to_jpeg(&data, None), Err(ImageError::Decode(_))));
    }

    #[test]
    fn test_has_alpha_channel() {
        let rgba_img = DynamicImage::ImageRgba8(RgbaImage::new(1, 1));
        assert!(has_alpha_channel(&rgba_img));

        let rgb_img = DynamicImage::ImageRgb8(image::RgbImage::new(1, 1));
        assert!(!has_alpha_channel(&rgb_img));
    }
}
