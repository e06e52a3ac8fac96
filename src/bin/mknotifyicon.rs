use std::path::PathBuf;

use apptools::silhouette::{self, LegacyResource, OutputLocation};
use apptools::{ProjectLayout, ToolConfig, cli, logger};
use clap::Parser;

/// Generate the Android notification icon (white silhouette on transparent)
/// from the app icon.
#[derive(Debug, Parser)]
#[command(name = "mknotifyicon", version)]
struct Args {
    /// Project root that the source candidates and resource paths hang off.
    #[arg(long, value_name = "DIR", default_value = ".")]
    project_root: PathBuf,

    /// Configuration file (default: apptools.toml in the project root).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// More output; repeat for trace level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args: Args = cli::parse_args();
    let cfg = ToolConfig::discover(args.config.as_deref(), &args.project_root)?;
    logger::init(cfg.logging.level, args.verbose);

    let layout = ProjectLayout::new(&args.project_root);
    let report = silhouette::convert(&layout, &cfg.silhouette)?;
    println!("Using icon: {}", report.source.display());

    match &report.output {
        OutputLocation::Primary(path) => {
            println!("Saved: {} ({}x{})", path.display(), report.size, report.size);
        }
        OutputLocation::Fallback { written, .. } => {
            println!("Saved to fallback location: {}", written.display());
            println!("To use it for notifications:");
            for (n, step) in report.relocation_steps().iter().enumerate() {
                println!("  {}. {}", n + 1, step);
            }
        }
    }

    match &report.legacy {
        LegacyResource::Absent => {}
        LegacyResource::Removed(path) => {
            println!("Removed {} so the generated PNG is used.", path.display());
        }
        LegacyResource::ManualRemovalNeeded(path) => {
            println!("Delete {} manually so the generated PNG is used.", path.display());
        }
    }
    Ok(())
}
