use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use rand::{RngCore, SeedableRng};
use rand_xoshiro::SplitMix64;
use tracing::info;
use tracing_subscriber::EnvFilter;

use circlefarm::{BackgroundSource, GenParams, GlyphSource, PlacementEngine};

mod assets;
mod files;
mod inspect;

#[derive(Parser, Debug)]
#[command(name = "datagen", version, about = "Synthetic circle dataset generator")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the training split.
    Train(GenArgs),
    /// Generate the testing split.
    Test(GenArgs),
    /// Rebuild overlay and mask images from a sample's annotations.
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct GenArgs {
    /// Output root; the split folder is created beneath it.
    #[arg(long, default_value = "dataset")]
    out_dir: PathBuf,

    /// Directory of background photos; procedural backgrounds when omitted.
    #[arg(long)]
    backgrounds: Option<PathBuf>,

    /// Directory of circle sprites; procedural discs when omitted.
    #[arg(long)]
    circles: Option<PathBuf>,

    /// Batch seed; the same seed reproduces the same batch.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(long, default_value_t = 0.65)]
    alpha_min: f32,
    #[arg(long, default_value_t = 0.85)]
    alpha_max: f32,
    #[arg(long, default_value_t = 0.10)]
    alpha_noise: f32,
    #[arg(long, default_value_t = 0.25)]
    color_noise: f32,

    #[arg(long, default_value = "proto_cells")]
    name: String,
    #[arg(long, default_value = "train")]
    training_postfix: String,
    #[arg(long, default_value = "test")]
    testing_postfix: String,
    #[arg(long, default_value_t = 3)]
    leading_zeros: usize,

    #[arg(long, default_value_t = 4)]
    target_min: u32,
    #[arg(long, default_value_t = 8)]
    target_max: u32,
    #[arg(long, default_value_t = 0)]
    max_overlap: u32,
    #[arg(long, default_value_t = 100)]
    max_tries: u32,
    /// Palette size; the first N of red, green, blue, yellow, cyan, magenta.
    #[arg(long, default_value_t = 3)]
    num_colors: u32,

    #[arg(long, default_value_t = 256)]
    width: u32,
    #[arg(long, default_value_t = 256)]
    height: u32,
    #[arg(long, default_value_t = 0)]
    start_index: u32,
    #[arg(long, default_value_t = 600)]
    end_index: u32,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Output root the sample was generated into.
    #[arg(long, default_value = "dataset")]
    out_dir: PathBuf,

    /// Split folder, `training` or `testing`.
    #[arg(long, default_value = "testing")]
    folder: String,

    /// Sample base name, e.g. `proto_cells_test_004`.
    base_name: String,
}

enum Split {
    Training,
    Testing,
}

impl GenArgs {
    fn to_params(&self) -> GenParams {
        GenParams {
            alpha_min: self.alpha_min,
            alpha_max: self.alpha_max,
            alpha_noise: self.alpha_noise,
            color_noise: self.color_noise,
            file_name_base: self.name.clone(),
            training_postfix: self.training_postfix.clone(),
            testing_postfix: self.testing_postfix.clone(),
            leading_zeros: self.leading_zeros,
            target_min: self.target_min,
            target_max: self.target_max,
            max_overlap: self.max_overlap,
            max_tries: self.max_tries,
            num_colors: self.num_colors,
            output_width: self.width,
            output_height: self.height,
            start_index: self.start_index,
            end_index: self.end_index,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Train(args) => run_split(args, Split::Training),
        Command::Test(args) => run_split(args, Split::Testing),
        Command::Inspect(args) => inspect::inspect(&args.out_dir, &args.folder, &args.base_name),
    }
}

fn run_split(args: GenArgs, split: Split) -> Result<()> {
    let params = args.to_params();
    let (postfix, folder) = match split {
        Split::Training => (&params.training_postfix, "training"),
        Split::Testing => (&params.testing_postfix, "testing"),
    };
    let series = format!("{}_{}", params.file_name_base, postfix);

    let backgrounds: Box<dyn BackgroundSource> = match &args.backgrounds {
        Some(dir) => Box::new(assets::DirBackgrounds::scan(dir)?),
        None => Box::new(assets::NoiseBackgrounds),
    };
    let glyphs: Box<dyn GlyphSource> = match &args.circles {
        Some(dir) => Box::new(assets::DirGlyphs::scan(dir)?),
        None => Box::new(assets::DiscGlyphs),
    };

    let engine_seed = SplitMix64::seed_from_u64(args.seed).next_u64();

    info!(
        series = %series,
        folder,
        start = params.start_index,
        end = params.end_index,
        seed = args.seed,
        "starting batch"
    );

    let start = params.start_index;
    let end = params.end_index;
    let mut engine = PlacementEngine::new(params, backgrounds, glyphs, engine_seed)?;
    for index in start..=end {
        let sample = engine.generate(&series, index)?;
        let image_path =
            files::save_image(&sample.image.to_image(), &args.out_dir, folder, &sample.base_name)?;
        let annotation_path = files::save_text(
            &sample.document.to_json()?,
            &args.out_dir,
            folder,
            &format!("{}_annotations", sample.base_name),
            "json",
        )?;
        info!(
            image = %image_path.display(),
            annotations = %annotation_path.display(),
            labels = sample.document.labels().len(),
            "wrote sample"
        );
    }

    Ok(())
}
