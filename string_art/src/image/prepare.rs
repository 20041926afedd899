use image::{imageops::FilterType, DynamicImage};
use num_traits::AsPrimitive;

use crate::{
    error::{Error, ValidationError},
    geometry::Circle,
    Float, Grid,
};

use super::PixelData;

/// Decodes an encoded raster image (PNG, JPEG, ...) held in memory.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, Error> {
    Ok(image::load_from_memory(bytes)?)
}

/// Builds the working intensity array of a run from a source image.
///
/// The image is turned to luminance, center cropped to a square, resized to
/// `working_size` with Lanczos3 and masked to its inscribed circle. Pixels outside the
/// circle are white, since no chord ever crosses them.
pub fn prepare<S: Float>(
    source: &DynamicImage,
    working_size: usize,
) -> Result<PixelData<S>, ValidationError>
where
    u8: AsPrimitive<S>,
    usize: AsPrimitive<S>,
{
    let luma = source.to_luma8();
    let (width, height) = luma.dimensions();
    let side = width.min(height);
    if side == 0 {
        return Err(ValidationError::EmptyImage);
    }
    let size = u32::try_from(working_size).map_err(|_| ValidationError::WorkingSizeTooLarge {
        size: working_size,
        max: crate::settings::MAX_WORKING_SIZE,
    })?;

    let cropped =
        image::imageops::crop_imm(&luma, (width - side) / 2, (height - side) / 2, side, side)
            .to_image();
    let resized = image::imageops::resize(&cropped, size, size, FilterType::Lanczos3);
    log::debug!(
        "prepared {}x{} source as a {}x{} working image",
        width,
        height,
        size,
        size
    );

    let grid = Grid::square(working_size);
    let circle = Circle::<S>::inscribed(grid);
    Ok(PixelData::new(
        |point| {
            if circle.contains_pixel(point) {
                resized.get_pixel(point.x as u32, point.y as u32).0[0].as_()
            } else {
                S::TWO_FIVE_FIVE
            }
        },
        grid,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use image::{GrayImage, Luma, RgbImage};

    #[test]
    fn masks_outside_of_circle_to_white() {
        let source = DynamicImage::ImageLuma8(GrayImage::from_pixel(64, 64, Luma([0])));
        let working = prepare::<f32>(&source, 32).unwrap();
        assert_eq!(*working.grid(), Grid::square(32));
        assert_eq!(working.get(Point::new(0, 0)), Some(&255.0));
        assert_eq!(working.get(Point::new(31, 31)), Some(&255.0));
        assert_eq!(working.get(Point::new(16, 16)), Some(&0.0));
    }

    #[test]
    fn crops_the_centered_square() {
        // Black side bands that the crop must discard around a white center.
        let source = DynamicImage::ImageRgb8(RgbImage::from_fn(200, 100, |x, _| {
            if (50..150).contains(&x) {
                image::Rgb([255, 255, 255])
            } else {
                image::Rgb([0, 0, 0])
            }
        }));
        let working = prepare::<f64>(&source, 20).unwrap();
        assert!(working.pixels().iter().all(|&v| v > 250.0));
    }

    #[test]
    fn values_stay_in_intensity_range() {
        let source = DynamicImage::ImageLuma8(GrayImage::from_fn(40, 30, |x, y| {
            Luma([if (x + y) % 2 == 0 { 0 } else { 255 }])
        }));
        let working = prepare::<f32>(&source, 16).unwrap();
        assert!(working
            .pixels()
            .iter()
            .all(|v| (0.0..=255.0).contains(v)));
    }

    #[test]
    fn rejects_empty_images() {
        let source = DynamicImage::ImageLuma8(GrayImage::new(0, 10));
        assert!(matches!(
            prepare::<f32>(&source, 16),
            Err(ValidationError::EmptyImage)
        ));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(decode(b"not an image"), Err(Error::Decode(_))));
    }
}
