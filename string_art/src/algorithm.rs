use num_traits::AsPrimitive;
use rayon::iter::{IntoParallelRefMutIterator, ParallelIterator};
use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::{
    chord_cache::ChordCache,
    error::ValidationError,
    image::PixelData,
    penalty::Penalty,
    pins::PinTable,
    render::Renderer,
    verboser::{Message, Verboser},
    Float,
};

/// Why the greedy search stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Termination {
    /// Every requested line was drawn.
    Completed,
    /// No chord from `pin` was darker than white anymore.
    Exhausted { pin: usize },
}

/// Greedy thread path search over a working intensity array.
///
/// Starting at pin 0, every step scores each admissible chord leaving the current pin by
/// the mean intensity of its pixels and moves along the darkest one. The chosen chord is
/// then bleached with the penalty so the search does not keep returning to it.
pub struct Algorithm<S, P> {
    image: PixelData<S>,
    table: PinTable,
    cache: ChordCache,
    penalty: P,
    current: usize,
    sequence: Vec<usize>,
    buffers: Vec<BatchBuffer<S>>,
}

impl<S: Float, P: Penalty<S>> Algorithm<S, P>
where
    usize: AsPrimitive<S>,
{
    /// `image` must share the grid of `table`, which `cache` was baked from.
    pub fn new(
        image: PixelData<S>,
        table: PinTable,
        cache: ChordCache,
        penalty: P,
    ) -> Result<Self, ValidationError> {
        if *image.grid() != table.grid() {
            return Err(ValidationError::GridMismatch {
                image: *image.grid(),
                pins: table.grid(),
            });
        }
        Ok(Self {
            image,
            table,
            cache,
            penalty,
            current: 0,
            sequence: vec![0],
            buffers: BatchBuffer::new(num_cpus::get()),
        })
    }

    /// Splits each scoring pass into `batches` ranges instead of one per cpu.
    pub fn with_batches(mut self, batches: usize) -> Self {
        self.buffers = BatchBuffer::new(batches);
        self
    }

    /// Draws up to `lines` chords, stopping early once no chord is darker than white.
    pub fn compute(mut self, lines: usize, verboser: &mut impl Verboser) -> Computation<S> {
        let mut termination = Termination::Completed;
        for step in 0..lines {
            verboser.verbose(Message::Computing(step));
            match self.get_best_line() {
                Some(next) => self.draw_line(next),
                None => {
                    termination = Termination::Exhausted { pin: self.current };
                    break;
                }
            }
        }
        log::info!(
            "selected {} lines out of {} requested ({:?})",
            self.sequence.len() - 1,
            lines,
            termination
        );
        Computation {
            sequence: self.sequence,
            termination,
            working: self.image,
            table: self.table,
        }
    }

    /// Pin reached by the darkest admissible chord from the current pin.
    ///
    /// Ties go to the lowest pin index. Candidates are scored in contiguous ascending
    /// ranges, one per buffer, and the ranges are merged in order, so the winner matches a
    /// sequential scan.
    fn get_best_line(&mut self) -> Option<usize> {
        let Self {
            image,
            cache,
            current,
            buffers,
            ..
        } = self;
        let (cache, current) = (&*cache, *current);
        let count = cache.distancer().count();
        let chunk_size = count.div_ceil(buffers.len());
        for (index, buffer) in buffers.iter_mut().enumerate() {
            let start = (index * chunk_size).min(count);
            buffer.range = start..(start + chunk_size).min(count);
        }

        let pixels = image.pixels();
        buffers.par_iter_mut().for_each(|buffer| {
            buffer.result = None;
            // A chord only qualifies while it is darker than white.
            let mut best_score = S::TWO_FIVE_FIVE;
            for next in buffer.range.clone() {
                let Some(chord) = cache.get(current, next) else {
                    continue;
                };
                let score = mean_intensity(pixels, chord);
                if score < best_score {
                    best_score = score;
                    buffer.result = Some(Candidate { pin: next, score });
                }
            }
        });

        let mut best: Option<Candidate<S>> = None;
        for candidate in buffers.iter().filter_map(|buffer| buffer.result) {
            if best.map_or(true, |best| candidate.score < best.score) {
                best = Some(candidate);
            }
        }
        best.map(|candidate| candidate.pin)
    }

    fn draw_line(&mut self, next: usize) {
        if let Some(chord) = self.cache.get(self.current, next) {
            let pixels = self.image.pixels_mut();
            let mut previous = None;
            for &idx in chord {
                // Rasterized samples may land twice on a pixel; bleach it once.
                if previous == Some(idx) {
                    continue;
                }
                previous = Some(idx);
                let intensity = &mut pixels[idx as usize];
                *intensity = self.penalty.compute(*intensity).clamp_intensity();
            }
        }
        self.sequence.push(next);
        self.current = next;
    }
}

fn mean_intensity<S: Float>(pixels: &[S], chord: &[u32]) -> S
where
    usize: AsPrimitive<S>,
{
    let sum = chord
        .iter()
        .fold(S::ZERO, |sum, &idx| sum + pixels[idx as usize]);
    sum / chord.len().as_()
}

#[derive(Clone, Copy, Debug)]
struct Candidate<S> {
    pin: usize,
    score: S,
}

struct BatchBuffer<S> {
    range: Range<usize>,
    result: Option<Candidate<S>>,
}

impl<S> BatchBuffer<S> {
    fn new(count: usize) -> Vec<Self> {
        (0..count.max(1))
            .map(|_| Self {
                range: 0..0,
                result: None,
            })
            .collect()
    }
}

/// Outcome of the greedy search.
pub struct Computation<S> {
    sequence: Vec<usize>,
    termination: Termination,
    working: PixelData<S>,
    table: PinTable,
}

impl<S> Computation<S> {
    /// Visited pins, starting with pin 0.
    pub fn sequence(&self) -> &[usize] {
        &self.sequence
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Working array after every penalty has been applied.
    pub fn working(&self) -> &PixelData<S> {
        &self.working
    }

    pub fn table(&self) -> &PinTable {
        &self.table
    }

    /// Threading instructions: the visited pins joined by `" -> "`.
    pub fn build_instructions(&self) -> String {
        self.sequence
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    /// Sequence and pin positions scaled to an output of side `output_size`.
    pub fn replay(&self, output_size: usize) -> Replay {
        Replay {
            sequence: self.sequence.clone(),
            pins: self
                .table
                .scaled(output_size)
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }

    pub fn build_image(&self, renderer: &Renderer, verboser: &mut impl Verboser) -> image::GrayImage {
        renderer.render(
            &self.sequence,
            &self.table.scaled(renderer.output_size()),
            verboser,
        )
    }

    pub fn build_svg(&self, renderer: &Renderer) -> svg::Document {
        renderer.svg(&self.sequence, &self.table.scaled(renderer.output_size()))
    }
}

/// Data needed to replay the thread path on a client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replay {
    pub sequence: Vec<usize>,
    /// `[x, y]` of every pin on the output image.
    pub pins: Vec<[usize; 2]>,
}
