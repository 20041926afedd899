use image::{GrayImage, ImageBuffer, Luma};
use imageproc::drawing::draw_antialiased_line_segment_mut;
use svg::node::element::{Circle, Line, Rectangle};

use crate::{
    geometry::Point,
    settings::{Settings, MAX_OUTPUT_SIZE},
    verboser::{Message, Verboser},
};

/// Float grayscale surface the thread is drawn on. Lines darken it additively.
pub type Canvas = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Draws a pin sequence at the output resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Renderer {
    output_size: usize,
    line_width: usize,
    line_darkness: f32,
}

impl Renderer {
    /// `output_size` is capped at [`MAX_OUTPUT_SIZE`].
    pub fn new(output_size: usize, line_darkness: f32) -> Self {
        Self {
            output_size: output_size.min(MAX_OUTPUT_SIZE),
            line_width: 1,
            line_darkness,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.output_size, settings.line_darkness).with_line_width(settings.line_width)
    }

    pub fn with_line_width(mut self, line_width: usize) -> Self {
        self.line_width = line_width.max(1);
        self
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    pub fn line_width(&self) -> usize {
        self.line_width
    }

    pub fn line_darkness(&self) -> f32 {
        self.line_darkness
    }

    /// Blank white canvas.
    pub fn canvas(&self) -> Canvas {
        let size = self.output_size as u32;
        ImageBuffer::from_pixel(size, size, Luma([255.0]))
    }

    /// Darkens `canvas` along an anti-aliased line from `start` to `end`.
    ///
    /// Every pixel loses `line_darkness` times its coverage, down to black. Wider lines are
    /// drawn as parallel one pixel passes spread across the width.
    pub fn draw_line(&self, canvas: &mut Canvas, start: Point<usize>, end: Point<usize>) {
        let start = start.as_::<f32>();
        let end = end.as_::<f32>();
        let length = start.distance(&end);
        if length == 0.0 {
            return;
        }
        let normal = Point {
            x: (start.y - end.y) / length,
            y: (end.x - start.x) / length,
        };
        let half_width = (self.line_width as f32 - 1.0) * 0.5;
        let darkness = self.line_darkness;
        for pass in 0..self.line_width {
            let offset = normal * (pass as f32 - half_width);
            let from = (start + offset).round();
            let to = (end + offset).round();
            draw_antialiased_line_segment_mut(
                canvas,
                (from.x as i32, from.y as i32),
                (to.x as i32, to.y as i32),
                Luma([0.0]),
                |_: Luma<f32>, original: Luma<f32>, coverage: f32| {
                    Luma([(original.0[0] - darkness * coverage).max(0.0)])
                },
            );
        }
    }

    /// Draws every consecutive pair of `sequence` between the matching `pins`, in order.
    pub fn render_canvas(
        &self,
        sequence: &[usize],
        pins: &[Point<usize>],
        verboser: &mut impl Verboser,
    ) -> Canvas {
        let mut canvas = self.canvas();
        for (drawn, pair) in sequence.windows(2).enumerate() {
            verboser.verbose(Message::Rendering(drawn));
            if let (Some(&start), Some(&end)) = (pins.get(pair[0]), pins.get(pair[1])) {
                self.draw_line(&mut canvas, start, end);
            }
        }
        canvas
    }

    pub fn render(
        &self,
        sequence: &[usize],
        pins: &[Point<usize>],
        verboser: &mut impl Verboser,
    ) -> GrayImage {
        to_gray(&self.render_canvas(sequence, pins, verboser))
    }

    /// Vector preview: pins as dots and the thread as translucent lines in drawing order.
    pub fn svg(&self, sequence: &[usize], pins: &[Point<usize>]) -> svg::Document {
        let size = self.output_size;
        let mut doc = svg::Document::new()
            .set("viewBox", (0, 0, size, size))
            .set("width", size)
            .set("height", size)
            .add(
                Rectangle::new()
                    .set("width", size)
                    .set("height", size)
                    .set("fill", "white"),
            );
        for pin in pins {
            doc = doc.add(
                Circle::new()
                    .set("cx", pin.x)
                    .set("cy", pin.y)
                    .set("r", self.line_width)
                    .set("fill", "black"),
            );
        }
        for pair in sequence.windows(2) {
            let (Some(start), Some(end)) = (pins.get(pair[0]), pins.get(pair[1])) else {
                continue;
            };
            doc = doc.add(
                Line::new()
                    .set("x1", start.x)
                    .set("y1", start.y)
                    .set("x2", end.x)
                    .set("y2", end.y)
                    .set("stroke", "black")
                    .set("stroke-width", self.line_width)
                    .set(
                        "stroke-opacity",
                        format!("{:.4}", self.line_darkness / 255.0),
                    ),
            );
        }
        doc
    }
}

/// Rounds a float canvas to an 8 bit grayscale image.
pub fn to_gray(canvas: &Canvas) -> GrayImage {
    GrayImage::from_fn(canvas.width(), canvas.height(), |x, y| {
        Luma([canvas.get_pixel(x, y).0[0].round().clamp(0.0, 255.0) as u8])
    })
}
