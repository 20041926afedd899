use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, Luma, RgbImage};
use proptest::prelude::*;
use string_art::{
    generate, verboser::Silent, Error, Generator, Grid, PixelData, Settings, Termination,
    ValidationError,
};

fn encoded(image: DynamicImage) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png).unwrap();
    bytes.into_inner()
}

/// A dark diagonal band over a light radial gradient.
fn portrait(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        let dx = x as f32 - width as f32 / 2.0;
        let dy = y as f32 - height as f32 / 2.0;
        let radial = (dx * dx + dy * dy).sqrt() * 2.0;
        let band = if (x as i32 - y as i32).abs() < 6 { 0.0 } else { 120.0 };
        let value = (radial + band).min(255.0) as u8;
        image::Rgb([value, value / 2, 255 - value])
    }))
}

fn small_settings(pins: usize, lines: usize) -> Settings {
    Settings {
        pins,
        lines,
        working_size: 64,
        output_size: 128,
        ..Settings::default()
    }
}

#[test]
fn same_input_gives_the_same_result() {
    let bytes = encoded(portrait(96, 80));
    let first = generate(&bytes, small_settings(60, 150)).unwrap();
    let second = generate(&bytes, small_settings(60, 150)).unwrap();
    assert_eq!(first.sequence(), second.sequence());
    assert_eq!(first.instructions, second.instructions);
    assert_eq!(first.image, second.image);
    assert!(first.sequence().len() > 1);
}

#[test]
fn outputs_describe_the_same_path() {
    let bytes = encoded(portrait(80, 80));
    let generation = generate(&bytes, small_settings(72, 60)).unwrap();

    assert_eq!(generation.image.dimensions(), (128, 128));
    assert_eq!(generation.replay.pins.len(), 72);
    assert!(generation
        .replay
        .pins
        .iter()
        .all(|&[x, y]| x < 128 && y < 128));

    let from_text: Vec<usize> = generation
        .instructions
        .split(" -> ")
        .map(|pin| pin.parse().unwrap())
        .collect();
    assert_eq!(from_text, generation.sequence());

    let json = serde_json::to_value(&generation.replay).unwrap();
    assert_eq!(json["sequence"][0], 0);
    assert_eq!(json["pins"].as_array().map(Vec::len), Some(72));
}

#[test]
fn drawing_nothing_keeps_a_blank_canvas() {
    let bytes = encoded(portrait(64, 64));
    let generation = generate(&bytes, small_settings(60, 0)).unwrap();
    assert_eq!(generation.sequence(), &[0]);
    assert_eq!(generation.instructions, "0");
    assert_eq!(generation.termination, Termination::Completed);
    assert!(generation.image.pixels().all(|p| p.0[0] == 255));
}

#[test]
fn white_image_has_nothing_to_draw() {
    let bytes = encoded(DynamicImage::ImageLuma8(GrayImage::from_pixel(
        50,
        70,
        Luma([255]),
    )));
    let generation = generate(&bytes, small_settings(60, 100)).unwrap();
    assert_eq!(generation.sequence(), &[0]);
    assert_eq!(generation.termination, Termination::Exhausted { pin: 0 });
}

#[test]
fn undecodable_bytes_are_a_decode_error() {
    let result = generate(b"definitely not a png", small_settings(60, 10));
    assert!(matches!(result, Err(Error::Decode(_))));
}

#[test]
fn settings_are_checked_before_decoding() {
    let result = generate(b"definitely not a png", small_settings(10, 10));
    assert!(matches!(
        result,
        Err(Error::Validation(ValidationError::NotEnoughPins { count: 10, .. }))
    ));
}

#[test]
fn working_images_must_be_square() {
    let working = PixelData::filled(0.0f32, Grid::new(10, 12));
    assert!(matches!(
        Generator::from_working(working, small_settings(60, 10)),
        Err(Error::Validation(ValidationError::NotSquare {
            width: 12,
            height: 10
        }))
    ));
}

#[test]
fn working_intensities_must_be_in_range() {
    let negative = PixelData::filled(-50.0f32, Grid::square(48));
    assert!(matches!(
        Generator::from_working(negative, small_settings(41, 3)),
        Err(Error::Validation(ValidationError::IntensityOutOfRange { index: 0 }))
    ));

    let mut with_nan = PixelData::filled(128.0f64, Grid::square(48));
    with_nan.pixels_mut()[100] = f64::NAN;
    assert!(matches!(
        Generator::from_working(with_nan, small_settings(41, 3)),
        Err(Error::Validation(ValidationError::IntensityOutOfRange { index: 100 }))
    ));

    let edges = PixelData::new(|p| if p.x % 2 == 0 { 0.0f32 } else { 255.0 }, Grid::square(48));
    let computation = Generator::from_working(edges, small_settings(41, 3))
        .unwrap()
        .compute(&mut Silent)
        .unwrap();
    assert!(computation
        .working()
        .pixels()
        .iter()
        .all(|v| (0.0..=255.0).contains(v)));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn sequences_start_at_zero_and_keep_their_distance(
        pins in 41usize..=72,
        lines in 1usize..=40,
        a in 1usize..20,
        b in 1usize..20,
    ) {
        let working = PixelData::new(|p| ((p.x * a + p.y * b) % 256) as f32, Grid::square(48));
        let generator = Generator::from_working(working, small_settings(pins, lines)).unwrap();
        let computation = generator.compute(&mut Silent).unwrap();
        let sequence = computation.sequence();

        prop_assert_eq!(sequence[0], 0);
        prop_assert!(sequence.len() <= lines + 1);
        for pair in sequence.windows(2) {
            let diff = pair[0].abs_diff(pair[1]);
            prop_assert!(diff.min(pins - diff) >= 20);
        }
        prop_assert!(computation
            .working()
            .pixels()
            .iter()
            .all(|v| (0.0..=255.0).contains(v)));
    }
}
