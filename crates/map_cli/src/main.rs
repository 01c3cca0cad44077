//! `school-transit-map`: command-line front end for `map_core`.

mod cli;

use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use map_core::{build_geocoder, RunSummary};
use tracing::error;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(summary: &RunSummary) {
    println!("Map written to {}", summary.output_path.display());
    println!("  place:   {}", summary.place);
    println!("  bbox:    {}", summary.bbox);
    for (label, counts) in [
        ("schools", &summary.schools),
        ("zones", &summary.zones),
        ("routes", &summary.routes),
        ("stops", &summary.stops),
    ] {
        println!(
            "  {label:<8} {} kept, {} outside bbox, {} skipped",
            counts.kept, counts.dropped, counts.skipped
        );
    }
    let gtfs = &summary.transit_skipped;
    if gtfs.trips + gtfs.shape_points + gtfs.stop_times > 0 {
        println!(
            "  gtfs     {} trips, {} shape points, {} stop times skipped",
            gtfs.trips, gtfs.shape_points, gtfs.stop_times
        );
    }
    println!(
        "  {} of {} schools matched a zone",
        summary.matched_schools, summary.schools.kept
    );
    if !summary.unmatched_zones.is_empty() {
        println!("  unmatched zones: {}", summary.unmatched_zones.join(", "));
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = cli.to_config()?;
    config.validate()?;
    let geocoder = build_geocoder(&config.geocoder_kind())?;
    let summary = map_core::run(&config, geocoder.as_ref())?;
    if cli.summary_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
