use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, ValueEnum};
use num_traits::AsPrimitive;
use serde::Serialize;
use string_art::{
    geometry::Point,
    verboser::{Message, Verboser},
    Float, Generation, Generator, PenaltyMode, Renderer, Settings, Termination,
};
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input file path.
    #[arg()]
    input: PathBuf,

    /// Settings file (TOML). Flags given on the command line take precedence.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of pins surrounding the image.
    #[arg(short = 'n', long)]
    pins: Option<usize>,

    /// Maximum number of lines to draw.
    #[arg(short, long)]
    lines: Option<usize>,

    /// Minimum pin count between linked pins.
    #[arg(long)]
    min_separation: Option<usize>,

    /// Side in pixels of the image the search runs on.
    #[arg(long)]
    working_size: Option<usize>,

    /// Side in pixels of the rendered image.
    #[arg(short = 'r', long, visible_alias = "resolution")]
    output_size: Option<usize>,

    /// Penalty applied to the source along each drawn line.
    #[arg(long)]
    penalty: Option<f32>,

    /// How the penalty is applied.
    #[arg(long)]
    penalty_mode: Option<PenaltyModeArg>,

    /// Darkness a single line adds to the rendered image.
    #[arg(long)]
    line_darkness: Option<f32>,

    /// Width in pixels of a rendered line.
    #[arg(long)]
    line_width: Option<usize>,

    /// Precision of calculations (Single/Double).
    #[arg(short, long, default_value_t = Precision::Single)]
    precision: Precision,

    /// Output folder. Defaults to an `output` folder next to the input.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write an svg preview.
    #[arg(long)]
    svg: bool,

    /// Log progress every this many lines.
    #[arg(long, default_value_t = 500)]
    interval: usize,
}

impl Args {
    /// Applies the command line overrides on top of `settings`.
    fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(pins) = self.pins {
            settings.pins = pins;
        }
        if let Some(lines) = self.lines {
            settings.lines = lines;
        }
        if let Some(min_separation) = self.min_separation {
            settings.min_separation = min_separation;
        }
        if let Some(working_size) = self.working_size {
            settings.working_size = working_size;
        }
        if let Some(output_size) = self.output_size {
            settings.output_size = output_size;
        }
        if let Some(penalty) = self.penalty {
            settings.penalty = penalty;
        }
        if let Some(mode) = self.penalty_mode {
            settings.penalty_mode = mode.into();
        }
        if let Some(line_darkness) = self.line_darkness {
            settings.line_darkness = line_darkness;
        }
        if let Some(line_width) = self.line_width {
            settings.line_width = line_width;
        }
        settings
    }

    fn settings(&self) -> Result<Settings, CliError> {
        let base = match &self.config {
            Some(path) => toml::from_str(&fs::read_to_string(path)?)?,
            None => Settings::default(),
        };
        Ok(self.apply(base))
    }
}

#[derive(Clone, Copy, Debug)]
enum PenaltyModeArg {
    Flat,
    Percentage,
}

impl ValueEnum for PenaltyModeArg {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Flat, Self::Percentage]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Flat => clap::builder::PossibleValue::new("Flat")
                .alias("flat")
                .alias("Flatten")
                .alias("flatten"),
            Self::Percentage => clap::builder::PossibleValue::new("Percentage")
                .alias("percentage")
                .alias("per")
                .alias("Per"),
        })
    }
}

impl From<PenaltyModeArg> for PenaltyMode {
    fn from(mode: PenaltyModeArg) -> Self {
        match mode {
            PenaltyModeArg::Flat => PenaltyMode::Flat,
            PenaltyModeArg::Percentage => PenaltyMode::Percentage,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Precision {
    Single,
    Double,
}

impl ValueEnum for Precision {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Single, Self::Double]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Single => clap::builder::PossibleValue::new("Single")
                .alias("single")
                .alias("f32"),
            Self::Double => clap::builder::PossibleValue::new("Double")
                .alias("double")
                .alias("f64"),
        })
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single => write!(f, "Single"),
            Self::Double => write!(f, "Double"),
        }
    }
}

/// Forwards library progress to the log.
struct LogVerboser {
    interval: usize,
}

impl Verboser for LogVerboser {
    fn verbose(&mut self, message: Message) {
        match message {
            Message::Baking => log::info!("Baking chords..."),
            Message::Computing(step) if step % self.interval == 0 => {
                log::info!("Computing line {}", step)
            }
            Message::Rendering(line) if line % self.interval == 0 => {
                log::debug!("Rendering line {}", line)
            }
            _ => {}
        }
    }
}

/// Summary written next to the rendered image, mirroring what a client needs to replay it.
#[derive(Serialize)]
struct Report<'a> {
    image: &'a str,
    instructions: &'a str,
    termination: Termination,
    settings: &'a Settings,
    sequence: &'a [usize],
    pins: &'a [[usize; 2]],
}

#[derive(Debug, Error)]
enum CliError {
    #[error("Invalid input path {0:?}.")]
    InvalidInput(PathBuf),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Invalid settings file: {0}")]
    Config(#[from] toml::de::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("Failed saving the image: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Generation(#[from] string_art::Error),
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let settings = args.settings()?;
    let file_name = args
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| CliError::InvalidInput(args.input.clone()))?;
    let bytes = fs::read(&args.input)?;

    let mut verboser = LogVerboser {
        interval: args.interval.max(1),
    };
    let generation = match args.precision {
        Precision::Single => with_precision::<f32>(&bytes, settings.clone(), &mut verboser)?,
        Precision::Double => with_precision::<f64>(&bytes, settings.clone(), &mut verboser)?,
    };
    save(args, file_name, &settings, generation)
}

fn with_precision<S: Float>(
    bytes: &[u8],
    settings: Settings,
    verboser: &mut LogVerboser,
) -> Result<Generation, string_art::Error>
where
    u8: AsPrimitive<S>,
    f32: AsPrimitive<S>,
    usize: AsPrimitive<S>,
{
    Generator::<S>::from_bytes(bytes, settings)?.generate(verboser)
}

fn save(
    args: &Args,
    file_name: &str,
    settings: &Settings,
    generation: Generation,
) -> Result<(), CliError> {
    let out_folder = match &args.output {
        Some(folder) => folder.clone(),
        None => args
            .input
            .parent()
            .unwrap_or(Path::new("."))
            .join("output"),
    };
    fs::create_dir_all(&out_folder)?;

    let image_name = format!("{}.png", file_name);
    let instructions_name = format!("{}_instructions.txt", file_name);
    generation.image.save(out_folder.join(&image_name))?;
    fs::write(out_folder.join(&instructions_name), &generation.instructions)?;

    let report = Report {
        image: &image_name,
        instructions: &instructions_name,
        termination: generation.termination,
        settings,
        sequence: generation.sequence(),
        pins: &generation.replay.pins,
    };
    fs::write(
        out_folder.join(format!("{}.json", file_name)),
        serde_json::to_string_pretty(&report)?,
    )?;

    if args.svg {
        let pins: Vec<_> = generation
            .replay
            .pins
            .iter()
            .map(|&[x, y]| Point::new(x, y))
            .collect();
        let doc = Renderer::from_settings(settings).svg(generation.sequence(), &pins);
        fs::write(out_folder.join(format!("{}.svg", file_name)), doc.to_string())?;
    }

    if let Termination::Exhausted { pin } = generation.termination {
        log::warn!(
            "Ran out of dark lines at pin {} after {} of {} lines",
            pin,
            generation.sequence().len() - 1,
            settings.lines
        );
    }
    log::info!("Results written to {}", out_folder.display());
    Ok(())
}
