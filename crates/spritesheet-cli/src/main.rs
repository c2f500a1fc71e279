use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use image::ImageReader;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use spritesheet_core::config::{MetadataFormat, SheetConfig, SortOrder};
use spritesheet_core::{Sprite, SpritePacker, SpriteSheetError};
use tracing::{error, info};

mod output;
mod scan;

use scan::{InputFile, gather_inputs};

/// Exit code when no input sprites were found.
const EXIT_NO_INPUT: i32 = 2;
/// Exit code when the sprites do not fit the requested canvas.
const EXIT_DOES_NOT_FIT: i32 = 5;

#[derive(Parser, Debug)]
#[command(
    name = "spritesheet",
    about = "Pack a folder of images into one sprite sheet",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --progress false or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack images into a sheet image plus a coordinate file
    Pack(PackArgs),
    /// Layout-only: read image sizes and write the coordinate file (no PNG)
    Layout(PackArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    // Input/Output
    /// Input directory (or a single image file)
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output base path; writes <OUT>.png and <OUT>.lua / <OUT>.json
    #[arg(short, long, default_value = "spritesheet", help_heading = "Input/Output")]
    out: PathBuf,
    /// Descend into subdirectories; sprite names become relative paths
    #[arg(short, long, default_value_t = false, help_heading = "Input/Output")]
    recursive: bool,
    /// YAML config file path (overrides layout/export options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Include patterns (glob, relative to the input). If set, only matching files are packed
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob, relative to the input)
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,

    // Layout
    /// Transparent pixels around every sprite
    #[arg(short, long, default_value_t = spritesheet_core::DEFAULT_PADDING, help_heading = "Layout")]
    padding: u32,
    /// Fixed canvas width (requires --height); the canvas never grows
    #[arg(long, requires = "height", help_heading = "Layout")]
    width: Option<u32>,
    /// Fixed canvas height (requires --width)
    #[arg(long, requires = "width", help_heading = "Layout")]
    height: Option<u32>,
    /// Sort order: area_desc|max_side_desc|height_desc|width_desc|name_asc|none
    #[arg(long, default_value = "area_desc", help_heading = "Layout")]
    sort_order: String,
    /// Try growth candidates in parallel (requires feature `parallel`)
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    parallel: bool,

    // Export
    /// Metadata format: lua | json (alias: json-hash)
    #[arg(long, default_value = "lua", help_heading = "Export")]
    metadata: String,
    /// Export packing stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: compute layout and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    let result = match &cli.command {
        Commands::Pack(args) => run(args, false, cli.progress && !cli.quiet),
        Commands::Layout(args) => run(args, true, false),
    };
    if let Err(e) = result {
        error!("{e:#}");
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(e: &anyhow::Error) -> i32 {
    match e
        .chain()
        .find_map(|c| c.downcast_ref::<SpriteSheetError>())
    {
        Some(SpriteSheetError::Empty) => EXIT_NO_INPUT,
        Some(SpriteSheetError::DoesNotFit { .. }) => EXIT_DOES_NOT_FIT,
        _ => 1,
    }
}

fn run(args: &PackArgs, layout_only: bool, show_progress: bool) -> anyhow::Result<()> {
    let cfg = build_config(args)?;

    if args.print_config {
        match args.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let files = gather_inputs(&args.input, args.recursive, &args.include, &args.exclude)?;
    if files.is_empty() {
        return Err(SpriteSheetError::Empty)
            .with_context(|| format!("no images found in {}", args.input.display()));
    }
    info!(count = files.len(), "found input images");

    let sprites = if layout_only {
        read_sizes(&files, cfg.padding)?
    } else {
        load_sprites_with_progress(&files, cfg.padding, show_progress)?
    };

    let format = cfg.metadata_format;
    let mut packer = SpritePacker::new(sprites, cfg)?;
    packer.pack_configured().with_context(|| match packer.config().fixed_size() {
        Some((w, h)) => format!("pack into fixed {w}x{h} canvas"),
        None => "pack sprites".to_string(),
    })?;

    let stats = packer.stats()?;
    info!(
        width = stats.width,
        height = stats.height,
        sprites = stats.sprites,
        attempts = stats.attempts,
        occupancy = format!("{:.2}%", stats.occupancy * 100.0),
        "stats"
    );

    let meta = packer.metadata()?;
    if args.dry_run {
        println!("{}", stats.summary());
        return Ok(());
    }

    if !layout_only {
        let canvas = packer.compose()?;
        output::write_sheet_png(&args.out, &canvas)?;
    }
    output::write_metadata(&args.out, &meta, format)?;
    if let Some(stats_path) = &args.export_stats {
        output::write_stats(stats_path, &stats)?;
    }
    Ok(())
}

/// Command-line values, then the YAML file (if any) on top.
fn build_config(args: &PackArgs) -> anyhow::Result<SheetConfig> {
    let mut cfg = SheetConfig {
        padding: args.padding,
        width: args.width,
        height: args.height,
        sort_order: parse_sort_order(&args.sort_order)?,
        metadata_format: parse_metadata_format(&args.metadata)?,
        parallel: args.parallel,
    };
    if let Some(path) = &args.config {
        let file = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)
            .with_context(|| format!("parse config {}", path.display()))?;
        cfg = y.into_sheet_config(cfg)?;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn read_sizes(files: &[InputFile], padding: u32) -> anyhow::Result<Vec<Sprite>> {
    files
        .iter()
        .map(|f| {
            let (w, h) = image::image_dimensions(&f.path)
                .with_context(|| format!("read size of {}", f.path.display()))?;
            Ok(Sprite::new(f.name.clone(), w, h, padding)?)
        })
        .collect()
}

fn load_sprites_with_progress(
    files: &[InputFile],
    padding: u32,
    progress: bool,
) -> anyhow::Result<Vec<Sprite>> {
    let bar = if progress {
        let b = ProgressBar::new(files.len() as u64);
        b.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} loading {pos}/{len} [{elapsed_precise}] {wide_msg}",
            )
            .context("progress bar template")?,
        );
        Some(b)
    } else {
        None
    };
    let mut list = Vec::with_capacity(files.len());
    for f in files {
        if let Some(b) = &bar {
            b.set_message(f.name.clone());
        }
        let img = load_image(&f.path).with_context(|| format!("load {}", f.path.display()))?;
        list.push(Sprite::from_image(f.name.clone(), img, padding)?);
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
}

fn load_image(p: &Path) -> anyhow::Result<image::DynamicImage> {
    let img = ImageReader::open(p)?.with_guessed_format()?.decode()?;
    Ok(img)
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct YamlConfig {
    padding: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
    sort_order: Option<String>,
    metadata: Option<String>,
    parallel: Option<bool>,
}

impl YamlConfig {
    fn into_sheet_config(self, mut cfg: SheetConfig) -> anyhow::Result<SheetConfig> {
        if let Some(v) = self.padding {
            cfg.padding = v;
        }
        if let Some(v) = self.width {
            cfg.width = Some(v);
        }
        if let Some(v) = self.height {
            cfg.height = Some(v);
        }
        if let Some(v) = self.sort_order {
            cfg.sort_order = parse_sort_order(&v)?;
        }
        if let Some(v) = self.metadata {
            cfg.metadata_format = parse_metadata_format(&v)?;
        }
        if let Some(v) = self.parallel {
            cfg.parallel = v;
        }
        Ok(cfg)
    }
}

fn parse_sort_order(s: &str) -> anyhow::Result<SortOrder> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("unknown sort order: {}", s))
}

fn parse_metadata_format(s: &str) -> anyhow::Result<MetadataFormat> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("unknown metadata format: {}", s))
}
