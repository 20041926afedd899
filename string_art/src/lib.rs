pub mod geometry {
    pub mod circle;
    pub mod point;
    pub mod segment;

    pub use circle::Circle;
    pub use point::Point;
    pub use segment::{Raster, Segment};
}

mod algorithm;
pub mod chord_cache;
pub mod error;
mod float;
pub mod grid;
pub mod image;
pub mod penalty;
pub mod pin_distancer;
pub mod pins;
pub mod render;
pub mod settings;
pub mod verboser;

pub use algorithm::*;
pub use chord_cache::ChordCache;
pub use error::{Error, ValidationError};
pub use float::Float;
pub use grid::Grid;
pub use image::PixelData;
pub use penalty::{FlatPenalty, PercentagePenalty, Penalty};
pub use pin_distancer::PinDistancer;
pub use pins::PinTable;
pub use render::Renderer;
pub use settings::{PenaltyMode, Settings};

use ::image::{DynamicImage, GrayImage};
use num_traits::AsPrimitive;
use verboser::{Silent, Verboser};

/// One string art run: a prepared working image plus the settings to search it with.
///
/// A generator owns every piece of mutable state of its run, so concurrent runs need one
/// generator each.
pub struct Generator<S = f32> {
    working: PixelData<S>,
    settings: Settings,
    distancer: PinDistancer,
}

impl<S: Float> Generator<S>
where
    u8: AsPrimitive<S>,
    f32: AsPrimitive<S>,
    usize: AsPrimitive<S>,
{
    /// Validates `settings` and prepares the working image from `source`.
    pub fn new(source: &DynamicImage, settings: Settings) -> Result<Self, Error> {
        let distancer = settings.validate()?;
        Self::prepared(source, settings, distancer)
    }

    /// Same as [`Self::new`] for an encoded image. Settings are validated before decoding.
    pub fn from_bytes(bytes: &[u8], settings: Settings) -> Result<Self, Error> {
        let distancer = settings.validate()?;
        Self::prepared(&image::decode(bytes)?, settings, distancer)
    }

    fn prepared(
        source: &DynamicImage,
        settings: Settings,
        distancer: PinDistancer,
    ) -> Result<Self, Error> {
        let working = image::prepare(source, settings.working_size)?;
        Ok(Self {
            working,
            settings,
            distancer,
        })
    }

    /// Uses `working` as is, skipping image preparation.
    ///
    /// `working` must be square with every intensity in `[0, 255]`; its side overrides
    /// `settings.working_size`.
    pub fn from_working(working: PixelData<S>, mut settings: Settings) -> Result<Self, Error> {
        let grid = *working.grid();
        if grid.width != grid.height || grid.is_empty() {
            return Err(ValidationError::NotSquare {
                width: grid.width,
                height: grid.height,
            }
            .into());
        }
        let range = S::ZERO..=S::TWO_FIVE_FIVE;
        if let Some(index) = working.pixels().iter().position(|v| !range.contains(v)) {
            return Err(ValidationError::IntensityOutOfRange { index }.into());
        }
        settings.working_size = grid.width;
        let distancer = settings.validate()?;
        Ok(Self {
            working,
            settings,
            distancer,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn working(&self) -> &PixelData<S> {
        &self.working
    }

    /// Runs the greedy search and renders its result.
    pub fn generate(self, verboser: &mut impl Verboser) -> Result<Generation, Error> {
        let computation = self.compute(verboser)?;
        let renderer = Renderer::from_settings(&self.settings);
        let image = computation.build_image(&renderer, verboser);
        Ok(Generation {
            image,
            instructions: computation.build_instructions(),
            replay: computation.replay(renderer.output_size()),
            termination: computation.termination(),
        })
    }

    /// Runs the greedy search only.
    pub fn compute(&self, verboser: &mut impl Verboser) -> Result<Computation<S>, Error> {
        let settings = &self.settings;
        let table = PinTable::circular(*self.working.grid(), settings.pins, verboser);
        let cache = ChordCache::bake(&table, self.distancer, verboser);
        log::info!(
            "{} pins, {} chords cached ({} degenerate)",
            table.len(),
            cache.len(),
            cache.degenerate_count()
        );
        let working = self.working.clone();
        let penalty: S = settings.penalty.as_();
        let computation = match settings.penalty_mode {
            PenaltyMode::Flat => Algorithm::new(working, table, cache, FlatPenalty(penalty))?
                .compute(settings.lines, verboser),
            PenaltyMode::Percentage => {
                Algorithm::new(working, table, cache, PercentagePenalty(penalty))?
                    .compute(settings.lines, verboser)
            }
        };
        Ok(computation)
    }
}

/// Everything a run produces, held in memory.
#[derive(Clone, Debug)]
pub struct Generation {
    /// Rendered string art.
    pub image: GrayImage,
    /// Visited pins joined by `" -> "`.
    pub instructions: String,
    /// Visited pins and output pin coordinates, for animated replay.
    pub replay: Replay,
    pub termination: Termination,
}

impl Generation {
    pub fn sequence(&self) -> &[usize] {
        &self.replay.sequence
    }
}

/// Generates a string art from an encoded image with single precision and no progress output.
pub fn generate(bytes: &[u8], settings: Settings) -> Result<Generation, Error> {
    Generator::<f32>::from_bytes(bytes, settings)?.generate(&mut Silent)
}
