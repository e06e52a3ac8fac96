use std::path::PathBuf;

use apptools::helpers::format_file_size;
use apptools::{ProjectLayout, ToolConfig, cli, iconset, logger};
use clap::Parser;

/// Generate the iOS AppIcon set from a source image.
///
/// The image is center-cropped to a square, resized to the master canvas,
/// flattened onto the configured background (the App Store rejects alpha)
/// and exported at every size listed in the icon set's Contents.json.
#[derive(Debug, Parser)]
#[command(name = "mkiconset", version)]
struct Args {
    /// Source image (PNG or JPEG).
    #[arg(value_name = "SOURCE")]
    source: PathBuf,

    /// Project root that relative paths resolve against.
    #[arg(long, value_name = "DIR", default_value = ".")]
    project_root: PathBuf,

    /// Icon set directory, overriding the configured one.
    #[arg(long, value_name = "DIR")]
    iconset: Option<PathBuf>,

    /// Configuration file (default: apptools.toml in the project root).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// More output; repeat for trace level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args: Args = cli::parse_args();
    let mut cfg = ToolConfig::discover(args.config.as_deref(), &args.project_root)?;
    logger::init(cfg.logging.level, args.verbose);
    if let Some(dir) = args.iconset {
        cfg.iconset.iconset_dir = dir;
    }

    let layout = ProjectLayout::new(&args.project_root);
    let icons = iconset::generate(&args.source, &layout, &cfg.iconset)?;

    for icon in &icons {
        println!("  {} ({}x{}, {})", icon.filename, icon.pixel_size, icon.pixel_size, format_file_size(icon.bytes));
    }
    println!(
        "Done. {} icons written to {} without alpha channel.",
        icons.len(),
        layout.iconset_dir(&cfg.iconset).display()
    );
    Ok(())
}
