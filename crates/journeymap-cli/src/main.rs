mod render;

use std::path::{Path, PathBuf};

use anyhow::bail;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use walkdir::WalkDir;

use journeymap_core::{
    plot, AcceptancePolicy, CancellationToken, ExifExtractor, ProcessOptions,
};

use render::GeoJsonRenderer;

#[derive(Parser)]
#[command(
    name = "journeymap",
    version,
    about = "Map a batch of photos: extract locations, build the journey path, report trip stats"
)]
struct Cli {
    /// Photo files or directories to scan
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Capture year to accept (repeatable; defaults to the current year)
    #[arg(long = "year")]
    years: Vec<i32>,

    /// Accept photos from any capture year
    #[arg(long)]
    any_year: bool,

    /// Write the journey as GeoJSON map data to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the shareable summary line
    #[arg(long)]
    share: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let files = collect_photo_files(&cli.inputs)?;
    if files.is_empty() {
        bail!("no image files found in the given inputs");
    }

    let policy = if cli.any_year {
        AcceptancePolicy::any()
    } else if cli.years.is_empty() {
        AcceptancePolicy::current_year()
    } else {
        AcceptancePolicy::years(cli.years.iter().copied())
    };

    let token = CancellationToken::new();
    {
        let token = token.clone();
        ctrlc::set_handler(move || token.cancel())?;
    }

    let bar = ProgressBar::new(100);
    bar.set_style(ProgressStyle::with_template("{bar:40} {pos:>3}% {msg}")?);

    let options = ProcessOptions {
        files,
        policy,
    };
    let progress_bar = bar.clone();
    let outcome = journeymap_core::process_photos(
        &ExifExtractor,
        &options,
        Some(&token),
        &move |percent, status| {
            progress_bar.set_position(percent as u64);
            progress_bar.set_message(status.to_string());
        },
    )?;
    bar.finish_and_clear();

    for warning in &outcome.report.warnings {
        eprintln!("warning: {}", warning);
    }

    if outcome.report.is_empty_result() {
        eprintln!(
            "No photos with location data found ({} skipped, {} failed)",
            outcome.report.skipped_no_location + outcome.report.skipped_year,
            outcome.report.failed
        );
        return Ok(());
    }

    let stats = journeymap_core::statistics(&outcome.journey);
    eprintln!(
        "Done! {} photos processed, {} accepted, {} skipped, {} failed",
        outcome.report.total,
        outcome.report.accepted,
        outcome.report.skipped_no_location + outcome.report.skipped_year,
        outcome.report.failed
    );

    println!("Photos:          {}", stats.total_photos);
    println!("Locations:       {}", stats.total_points);
    println!("Distance:        {} km", stats.distance_display_km());
    if let (Some(start), Some(end)) = (stats.start_date, stats.end_date) {
        println!(
            "Dates:           {} - {}",
            start.format("%b %-d, %Y"),
            end.format("%b %-d, %Y")
        );
        println!("Duration:        {} days", stats.duration_days);
    }
    if let Some((month, count)) = &stats.most_active_period {
        println!("Most active:     {} ({} photos)", month, count);
    }

    if cli.share {
        println!("{}", stats.share_text());
    }

    if let Some(path) = cli.output {
        let mut renderer = GeoJsonRenderer::new(path.clone());
        plot::plot_journey(&outcome.journey, &mut renderer)?;
        renderer.finish()?;
        eprintln!("Map data written to {}", path.display());
    }

    Ok(())
}

/// Expand the inputs into a flat, deterministic list of image files.
/// Directories are walked recursively; explicit file arguments are taken
/// as-is.
fn collect_photo_files(inputs: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry = entry?;
                if entry.file_type().is_file() && is_image(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

fn is_image(path: &Path) -> bool {
    mime_guess::from_path(path)
        .first()
        .map_or(false, |mime| mime.type_() == mime_guess::mime::IMAGE)
}
